//! Persistence layer.
//!
//! Saves and loads a snapshot of every game to/from a JSON file.
//! Games live in memory while the server runs; the snapshot only
//! carries them across a restart.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::engine::game::Game;

/// On-disk snapshot format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub games: Vec<Game>,
}

/// Save all games to a JSON file.
pub fn save_games(games: &[Game], path: &str) -> Result<()> {
    let snapshot = SnapshotRef {
        saved_at: Utc::now(),
        games,
    };
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialise games")?;

    std::fs::write(path, &json).with_context(|| format!("Failed to write snapshot to {path}"))?;

    debug!(path, games = games.len(), "Snapshot saved");
    Ok(())
}

/// Load games from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_games(path: &str) -> Result<Option<Vec<Game>>> {
    if !Path::new(path).exists() {
        info!(path, "No snapshot found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {path}"))?;

    let snapshot: Snapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot from {path}"))?;

    info!(
        path,
        games = snapshot.games.len(),
        saved_at = %snapshot.saved_at,
        "Snapshot loaded from disk"
    );

    Ok(Some(snapshot.games))
}

/// Borrowing twin of [`Snapshot`] so saving doesn't clone every game.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    saved_at: DateTime<Utc>,
    games: &'a [Game],
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
