//! Shared types for the COOL STUFF! game server.
//!
//! These types form the data model used across all modules.
//! They are kept free of engine logic so that the registry, the
//! HTTP layer and the snapshot store can depend on them without
//! circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier handed to a player when they join (first 8 chars of a UUIDv4).
pub type PlayerId = String;

/// Normalized game code (upper-case alphanumeric).
pub type GameCode = String;

/// Whole currency units. Budgets, bids and item values all use this.
pub type Amount = u64;

// ---------------------------------------------------------------------------
// Items & players
// ---------------------------------------------------------------------------

/// A collectible that is auctioned in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub value: Amount,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${})", self.name, self.value)
    }
}

impl Item {
    pub fn new(name: impl Into<String>, value: Amount) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a player with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        let mut id = uuid::Uuid::new_v4().to_string();
        id.truncate(8);
        Self {
            id,
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Game lifecycle phase.
///
/// `Lobby → Play → Reveal → Play → … → Reveal → Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Play,
    Reveal,
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lobby => write!(f, "lobby"),
            Phase::Play => write!(f, "play"),
            Phase::Reveal => write!(f, "reveal"),
            Phase::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A validated action for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Abstain from bidding, optionally selling one owned item by index.
    SitOut { sell_item: Option<usize> },
    /// Sealed bid on the current item.
    Bid { amount: Amount },
}

impl Action {
    pub fn is_sit_out(&self) -> bool {
        matches!(self, Action::SitOut { .. })
    }
}

/// Raw action as submitted by a client, before validation.
///
/// Mirrors the wire shape `{sit_out, bid, sell_item}`. The numeric fields
/// are kept as raw JSON so that a negative, fractional, oversized or
/// non-numeric bid reaches validation instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub sit_out: bool,
    #[serde(default)]
    pub bid: Option<serde_json::Value>,
    #[serde(default)]
    pub sell_item: Option<serde_json::Value>,
}

impl ActionRequest {
    pub fn bid(amount: i64) -> Self {
        Self {
            sit_out: false,
            bid: Some(amount.into()),
            sell_item: None,
        }
    }

    pub fn sit_out() -> Self {
        Self {
            sit_out: true,
            ..Self::default()
        }
    }

    pub fn sell(index: i64) -> Self {
        Self {
            sit_out: true,
            bid: None,
            sell_item: Some(index.into()),
        }
    }

    /// Validate against the player's current budget.
    ///
    /// A missing bid counts as 0. Anything other than a non-negative JSON
    /// integer is an invalid bid. A sell index that is not a non-negative
    /// integer can never be in range, so it collapses to "sell nothing".
    pub fn into_action(self, budget: Amount) -> Result<Action, GameError> {
        if self.sit_out {
            return Ok(Action::SitOut {
                sell_item: self
                    .sell_item
                    .as_ref()
                    .and_then(serde_json::Value::as_u64)
                    .and_then(|i| usize::try_from(i).ok()),
            });
        }

        let amount = match self.bid {
            None => 0,
            Some(raw) => raw.as_u64().ok_or(GameError::InvalidBid)?,
        };
        if amount > budget {
            return Err(GameError::InvalidBid);
        }
        Ok(Action::Bid { amount })
    }
}

// ---------------------------------------------------------------------------
// Resolution result
// ---------------------------------------------------------------------------

/// Outcome of the last resolved round, kept until the host advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub item: Item,
    pub winner: Option<PlayerId>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller-facing validation failures. None of these are internal faults;
/// a failed operation leaves the game untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Game code must be at least 4 letters or digits")]
    CodeInvalid,

    #[error("Game code already taken")]
    CodeTaken,

    #[error("Game not found")]
    GameNotFound,

    #[error("Game is full")]
    GameFull,

    #[error("Game already started")]
    NotJoinable,

    #[error("Player name is required")]
    NameRequired,

    #[error("Not enough players to start")]
    TooFewPlayers,

    #[error("Action not allowed in the current phase")]
    WrongPhase,

    #[error("Unknown player")]
    UnknownPlayer,

    #[error("Action already submitted this round")]
    AlreadySubmitted,

    #[error("Bid must be between 0 and your budget")]
    InvalidBid,

    #[error("Not every player has submitted")]
    NotAllSubmitted,

    #[error("Nothing to advance")]
    NothingToAdvance,

    #[error("No items to auction")]
    NoItems,
}

impl GameError {
    /// Stable machine-readable code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::CodeInvalid => "code_invalid",
            GameError::CodeTaken => "code_taken",
            GameError::GameNotFound => "not_found",
            GameError::GameFull => "game_full",
            GameError::NotJoinable => "not_joinable",
            GameError::NameRequired => "name_required",
            GameError::TooFewPlayers => "not_enough_players",
            GameError::WrongPhase => "wrong_phase",
            GameError::UnknownPlayer => "invalid_player",
            GameError::AlreadySubmitted => "already_submitted",
            GameError::InvalidBid => "invalid_bid",
            GameError::NotAllSubmitted => "not_all_submitted",
            GameError::NothingToAdvance => "nothing_to_advance",
            GameError::NoItems => "no_items",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
