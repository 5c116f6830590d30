//! # Storage Layer
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Boards and tasks | JSON | `.db.tt` (or `--db`, `TT_DB`, `db_path`) |
//! | Config | TOML | `~/.config/tt/config.toml` (or `--config`, `TT_CONFIG`) |
//!
//! ## Key Types
//!
//! - [`Database`] - Reads and rewrites the task file
//! - [`Config`] - User configuration

mod database;
mod config;

pub use database::{Database, PersistenceError};
pub use config::{Config, ConfigError, DEFAULT_DB_FILE};
