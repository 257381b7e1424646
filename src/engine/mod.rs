//! Auction round engine: create → join → start → bid/sell → resolve → advance.

pub mod game;
pub mod resolver;
pub mod view;
pub mod registry;

pub use game::Game;
pub use registry::GameRegistry;
