//! Player-scoped projection of a game.
//!
//! Everything a client sees goes through [`public_view`]. Budgets are
//! only ever shown to their owner, and bid amounts are never shown to
//! anyone: not during play, not on the reveal screen. Player ids act as
//! seat credentials, so other players appear by name only.

use serde::Serialize;

use crate::engine::game::Game;
use crate::types::{Action, Amount, GameCode, Item, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub game_id: GameCode,
    pub phase: Phase,
    pub current_round: usize,
    pub rounds_total: usize,
    pub players: Vec<PlayerSummary>,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Name of the item on the block. Its value stays hidden until reveal.
    pub current_item: Option<CurrentItem>,
    pub my_action: Option<ActionView>,
    pub has_submitted: bool,
    pub resolved: Option<RevealView>,
    pub my_collection: Vec<Item>,
    pub my_budget: Option<Amount>,
    pub all_submitted: bool,
    pub submitted_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub total_value: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentItem {
    pub name: String,
}

/// The requester's own pending action, minus any amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub sit_out: bool,
    pub sell_item: Option<usize>,
}

impl From<&Action> for ActionView {
    fn from(action: &Action) -> Self {
        match action {
            Action::SitOut { sell_item } => Self {
                sit_out: true,
                sell_item: *sell_item,
            },
            Action::Bid { .. } => Self {
                sit_out: false,
                sell_item: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealView {
    pub item_name: String,
    pub item_value: Amount,
    pub winner_name: Option<String>,
}

/// Project `game` for `player_id`. An absent or unknown player gets the
/// shared fields only.
pub fn public_view(game: &Game, player_id: Option<&str>) -> GameView {
    let me = player_id.and_then(|pid| game.player(pid)).map(|p| p.id.as_str());

    let players = game
        .players()
        .iter()
        .map(|p| PlayerSummary {
            name: p.name.clone(),
        })
        .collect();

    let mut leaderboard: Vec<LeaderboardEntry> = game
        .players()
        .iter()
        .map(|p| LeaderboardEntry {
            name: p.name.clone(),
            total_value: game.collection_value(&p.id),
        })
        .collect();
    // Stable: equal totals keep join order.
    leaderboard.sort_by(|a, b| b.total_value.cmp(&a.total_value));

    let current_item = match game.phase() {
        Phase::Play => game.current_item().map(|item| CurrentItem {
            name: item.name.clone(),
        }),
        _ => None,
    };

    let resolved = match (game.phase(), game.outcome()) {
        (Phase::Reveal, Some(outcome)) => Some(RevealView {
            item_name: outcome.item.name.clone(),
            item_value: outcome.item.value,
            winner_name: outcome
                .winner
                .as_deref()
                .and_then(|pid| game.player(pid))
                .map(|p| p.name.clone()),
        }),
        _ => None,
    };

    GameView {
        game_id: game.id().to_string(),
        phase: game.phase(),
        current_round: game.current_round(),
        rounds_total: game.rounds_total(),
        players,
        leaderboard,
        current_item,
        my_action: me.and_then(|pid| game.action_of(pid)).map(ActionView::from),
        has_submitted: me.is_some_and(|pid| game.has_submitted(pid)),
        resolved,
        my_collection: me
            .and_then(|pid| game.collection(pid))
            .map(<[Item]>::to_vec)
            .unwrap_or_default(),
        my_budget: me.and_then(|pid| game.budget(pid)),
        all_submitted: game.all_submitted(),
        submitted_count: game.submitted_count(),
    }
}
