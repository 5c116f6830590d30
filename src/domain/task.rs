//! Task domain model
//!
//! A task is a single line of work on a board. Its text doubles as the
//! de-duplication key within the board, and its creation timestamp drives
//! the aging buckets.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of persisted creation timestamps (`YYYY-MM-DD HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp the way tasks persist it
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a persisted timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
}

/// Current local time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    // Round-trip through the persisted format so "now" compares equal to a
    // freshly stored timestamp.
    parse_timestamp(&format_timestamp(now)).unwrap_or(now)
}

/// A task on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the owning board
    #[serde(default)]
    pub id: i64,

    /// User-visible description
    #[serde(rename = "name", default)]
    pub text: String,

    /// True once the task is done
    #[serde(rename = "status", default)]
    pub done: bool,

    /// Creation timestamp in [`TIMESTAMP_FORMAT`]; empty for records written
    /// before timestamps were tracked
    #[serde(rename = "date", default)]
    pub created_at: String,
}

impl Task {
    /// Creates an open task
    pub fn new(id: i64, text: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
            created_at: format_timestamp(created_at),
        }
    }

    /// Marks the task as done
    pub fn complete(&mut self) {
        self.done = true;
    }

    /// Returns true if the task is still open
    pub fn is_open(&self) -> bool {
        !self.done
    }

    /// Parses the creation timestamp
    pub fn created_at(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        parse_timestamp(&self.created_at)
    }
}
