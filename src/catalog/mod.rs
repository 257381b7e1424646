//! Item catalog.
//!
//! The mega-list of things that can be auctioned. Each game draws its
//! round items from here without replacement at creation time.

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::types::Item;

/// The built-in catalog (compiled into the binary).
const BUILTIN_ITEMS: &str = include_str!("items.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog from an explicit item list.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            bail!("Item catalog is empty");
        }
        if let Some(item) = items.iter().find(|i| i.value == 0) {
            bail!("Catalog item '{}' has no value", item.name);
        }
        Ok(Self { items })
    }

    /// Parse a JSON list of `{name, value}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json).context("Failed to parse item catalog")?;
        Self::new(items)
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ITEMS)
    }

    /// Load from a file, or fall back to the built-in catalog.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read item catalog: {path}"))?;
                Self::from_json(&json).with_context(|| format!("Invalid item catalog: {path}"))?
            }
            None => Self::builtin()?,
        };
        info!(items = catalog.items.len(), source = path.unwrap_or("builtin"), "Item catalog loaded");
        Ok(catalog)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Shuffle and draw up to `count` distinct items.
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Item> {
        let mut drawn = self.items.clone();
        drawn.shuffle(rng);
        drawn.truncate(count);
        drawn
    }
}
