//! Round resolution.
//!
//! Computes the outcome of a round from the submission log without
//! touching the game: first every sale, then the sealed-bid auction.
//! The caller applies the returned [`Resolution`].

use rust_decimal::prelude::*;
use std::collections::HashMap;

use crate::types::{Action, Amount, Item, PlayerId};

/// One item sold back to the house.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub player: PlayerId,
    /// Index into the seller's collection at resolution time.
    pub index: usize,
    pub payout: Amount,
}

/// The winning bid of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningBid {
    pub player: PlayerId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub sales: Vec<Sale>,
    pub winner: Option<WinningBid>,
}

/// Sale price of an item: `floor(value × multiplier)`.
pub fn sell_payout(value: Amount, multiplier: Decimal) -> Amount {
    (Decimal::from(value) * multiplier)
        .floor()
        .to_u64()
        .unwrap_or(0)
}

/// Resolve a round.
///
/// `actions` is the submission log in arrival order. Sell indices that
/// fall outside the seller's collection are skipped. Among bidders the
/// highest amount wins and the earliest submission breaks ties.
pub fn resolve_round(
    actions: &[(PlayerId, Action)],
    collections: &HashMap<PlayerId, Vec<Item>>,
    sell_multiplier: Decimal,
) -> Resolution {
    let sales = actions
        .iter()
        .filter_map(|(player, action)| match action {
            Action::SitOut {
                sell_item: Some(index),
            } => {
                let item = collections.get(player)?.get(*index)?;
                Some(Sale {
                    player: player.clone(),
                    index: *index,
                    payout: sell_payout(item.value, sell_multiplier),
                })
            }
            _ => None,
        })
        .collect();

    let mut winner: Option<WinningBid> = None;
    for (player, action) in actions {
        if let Action::Bid { amount } = action {
            // Strictly greater: an equal later bid never displaces the leader.
            if winner.as_ref().map_or(true, |w| *amount > w.amount) {
                winner = Some(WinningBid {
                    player: player.clone(),
                    amount: *amount,
                });
            }
        }
    }

    Resolution { sales, winner }
}
