//! COOL STUFF! blind auction party game server
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod catalog;
pub mod engine;
pub mod storage;
pub mod api;
