//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults matching the party-game rules, so a
//! missing section (or an empty file) yields a playable server.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::types::Amount;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Rules of the game. Shared by every game in a registry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub starting_budget: Amount,
    pub rounds: usize,
    /// Fraction of an item's value paid out when it is sold.
    pub sell_multiplier: Decimal,
    pub min_players: usize,
    pub max_players: usize,
    pub code_min_len: usize,
    pub code_max_len: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_budget: 1000,
            rounds: 10,
            sell_multiplier: dec!(0.75),
            min_players: 2,
            max_players: 8,
            code_min_len: 4,
            code_max_len: 6,
        }
    }
}

impl GameSettings {
    /// Reject rule combinations that would make a game unplayable.
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            bail!("game.rounds must be at least 1");
        }
        if self.min_players == 0 || self.min_players > self.max_players {
            bail!(
                "game.min_players ({}) must be between 1 and game.max_players ({})",
                self.min_players,
                self.max_players
            );
        }
        if self.sell_multiplier <= Decimal::ZERO || self.sell_multiplier > Decimal::ONE {
            bail!("game.sell_multiplier must be in (0, 1], got {}", self.sell_multiplier);
        }
        if self.code_min_len == 0 || self.code_min_len > self.code_max_len {
            bail!(
                "game.code_min_len ({}) must be between 1 and game.code_max_len ({})",
                self.code_min_len,
                self.code_max_len
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file with `[{"name": ..., "value": ...}]`. Uses the built-in
    /// catalog when unset.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Where to snapshot games on shutdown. Games are memory-only when unset.
    pub snapshot_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.game.validate()?;
        Ok(config)
    }
}
