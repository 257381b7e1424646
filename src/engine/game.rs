//! Game state machine.
//!
//! One `Game` per game code. Every operation validates first and only
//! then mutates, so a rejected call leaves the game exactly as it was.
//!
//! `Lobby → Play → Reveal → Play → … → Reveal → Ended`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::GameSettings;
use crate::engine::resolver::{self, Resolution};
use crate::types::{
    Action, ActionRequest, Amount, GameCode, GameError, Item, Phase, Player, PlayerId,
    RoundOutcome,
};

/// Name used when the host leaves theirs blank.
pub const DEFAULT_HOST_NAME: &str = "Host";

/// Upper-case, keep `[A-Z0-9]` only, truncate to `max_len`.
pub fn normalize_code(raw: &str, max_len: usize) -> GameCode {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(max_len)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    id: GameCode,
    rules: GameSettings,
    players: Vec<Player>,
    items: Vec<Item>,
    current_round: usize,
    phase: Phase,
    budgets: HashMap<PlayerId, Amount>,
    collections: HashMap<PlayerId, Vec<Item>>,
    /// Submission log for the current round, in arrival order.
    actions: Vec<(PlayerId, Action)>,
    outcome: Option<RoundOutcome>,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Create a game in the lobby with the host seated first.
    ///
    /// `items` is the round sequence and is never changed afterwards. It
    /// must not be empty: every round in play needs an item on the block.
    pub fn create(
        code: &str,
        host_name: &str,
        items: Vec<Item>,
        rules: GameSettings,
    ) -> Result<(Self, Player), GameError> {
        let id = normalize_code(code, rules.code_max_len);
        if id.len() < rules.code_min_len {
            return Err(GameError::CodeInvalid);
        }
        if items.is_empty() {
            return Err(GameError::NoItems);
        }

        let mut game = Self {
            id,
            rules,
            players: Vec::new(),
            items,
            current_round: 0,
            phase: Phase::Lobby,
            budgets: HashMap::new(),
            collections: HashMap::new(),
            actions: Vec::new(),
            outcome: None,
            created_at: Utc::now(),
        };

        let host_name = match host_name.trim() {
            "" => DEFAULT_HOST_NAME,
            name => name,
        };
        let host = game.join(host_name)?;

        info!(game = %game.id, host = %host.name, rounds = game.rounds_total(), "Game created");
        Ok((game, host))
    }

    /// Seat a new player with the starting budget and an empty collection.
    pub fn join(&mut self, name: &str) -> Result<Player, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::NameRequired);
        }
        if self.phase != Phase::Lobby {
            return Err(GameError::NotJoinable);
        }
        if self.players.len() >= self.rules.max_players {
            return Err(GameError::GameFull);
        }

        let player = Player::new(name);
        self.budgets.insert(player.id.clone(), self.rules.starting_budget);
        self.collections.insert(player.id.clone(), Vec::new());
        self.players.push(player.clone());

        info!(game = %self.id, player = %player.id, name = %player.name, seats = self.players.len(), "Player joined");
        Ok(player)
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::WrongPhase);
        }
        if self.players.len() < self.rules.min_players {
            return Err(GameError::TooFewPlayers);
        }

        self.phase = Phase::Play;
        self.current_round = 0;
        self.actions.clear();

        info!(game = %self.id, players = self.players.len(), "Game started");
        Ok(())
    }

    /// Record a player's action for the current round.
    ///
    /// Returns `true` when this submission completed the round and
    /// triggered resolution.
    pub fn submit_action(
        &mut self,
        player_id: &str,
        request: ActionRequest,
    ) -> Result<bool, GameError> {
        if self.phase != Phase::Play {
            return Err(GameError::WrongPhase);
        }
        let budget = self.budget(player_id).ok_or(GameError::UnknownPlayer)?;
        if self.has_submitted(player_id) {
            return Err(GameError::AlreadySubmitted);
        }
        let action = request.into_action(budget)?;

        self.actions.push((player_id.to_string(), action));
        debug!(
            game = %self.id,
            player = player_id,
            round = self.current_round,
            submitted = self.actions.len(),
            "Action recorded"
        );

        if self.all_submitted() {
            self.resolve();
            return Ok(true);
        }
        Ok(false)
    }

    /// Host fallback for resolving a round. Same precondition as the
    /// automatic path: every player must have submitted.
    pub fn force_resolve(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Play {
            return Err(GameError::WrongPhase);
        }
        if !self.all_submitted() {
            return Err(GameError::NotAllSubmitted);
        }
        self.resolve();
        Ok(())
    }

    /// Leave the reveal screen: next round, or the end of the game.
    pub fn advance(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Reveal {
            return Err(GameError::NothingToAdvance);
        }

        self.current_round += 1;
        self.actions.clear();
        self.outcome = None;

        self.phase = if self.current_round >= self.rounds_total() {
            Phase::Ended
        } else {
            Phase::Play
        };

        info!(game = %self.id, round = self.current_round, phase = %self.phase, "Advanced");
        Ok(())
    }

    /// The host's "next" button: starts from the lobby, advances from
    /// the reveal screen, and has nothing to do otherwise.
    pub fn host_advance(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Lobby => self.start(),
            Phase::Reveal => self.advance(),
            Phase::Play | Phase::Ended => Err(GameError::NothingToAdvance),
        }
    }

    fn resolve(&mut self) {
        let Resolution { sales, winner } =
            resolver::resolve_round(&self.actions, &self.collections, self.rules.sell_multiplier);

        for sale in &sales {
            if let Some(collection) = self.collections.get_mut(&sale.player) {
                collection.remove(sale.index);
            }
            if let Some(budget) = self.budgets.get_mut(&sale.player) {
                *budget += sale.payout;
            }
        }

        let Some(item) = self.current_item().cloned() else {
            return;
        };

        if let Some(winner) = &winner {
            if let Some(budget) = self.budgets.get_mut(&winner.player) {
                *budget = budget.saturating_sub(winner.amount);
            }
            if let Some(collection) = self.collections.get_mut(&winner.player) {
                collection.push(item.clone());
            }
        }

        info!(
            game = %self.id,
            round = self.current_round,
            item = %item.name,
            winner = winner.as_ref().map(|w| w.player.as_str()).unwrap_or("none"),
            sales = sales.len(),
            "Round resolved"
        );

        self.outcome = Some(RoundOutcome {
            item,
            winner: winner.map(|w| w.player),
        });
        self.phase = Phase::Reveal;
    }

    // -- Accessors ---------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rules(&self) -> &GameSettings {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn rounds_total(&self) -> usize {
        self.items.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn budget(&self, player_id: &str) -> Option<Amount> {
        self.budgets.get(player_id).copied()
    }

    pub fn collection(&self, player_id: &str) -> Option<&[Item]> {
        self.collections.get(player_id).map(Vec::as_slice)
    }

    /// Sum of the values of everything a player owns (cash excluded).
    pub fn collection_value(&self, player_id: &str) -> Amount {
        self.collection(player_id)
            .map(|items| items.iter().map(|i| i.value).sum())
            .unwrap_or(0)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.current_round)
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    pub fn action_of(&self, player_id: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|(p, _)| p == player_id)
            .map(|(_, a)| a)
    }

    pub fn has_submitted(&self, player_id: &str) -> bool {
        self.action_of(player_id).is_some()
    }

    pub fn submitted_count(&self) -> usize {
        self.actions.len()
    }

    /// Whether every seated player has acted. Trivially true once the
    /// rounds are exhausted.
    pub fn all_submitted(&self) -> bool {
        if self.current_item().is_none() {
            return true;
        }
        self.players.iter().all(|p| self.has_submitted(&p.id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
