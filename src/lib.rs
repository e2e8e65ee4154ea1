//! BTMS Overlay Node
//!
//! Admission rules and unspent-token index for a UTXO-based fungible token
//! protocol whose tokens live in push-drop locking scripts.
//!
//! - `codec`: token script decoding and encoding
//! - `beef`: transaction envelope parsing
//! - `engine`: which outputs of a transaction are admitted as tokens
//! - `database`: SQLite index of unspent tokens
//! - `lookup`: index maintenance from framework events, and queries

pub mod beef;
pub mod cli;
pub mod codec;
pub mod config;
pub mod database;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod lookup;
pub mod types;
pub mod utils;
