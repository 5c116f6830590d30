//! Board domain model
//!
//! Boards are named, ordered collections of tasks. Names are short single
//! words so they can be typed after `--board` without quoting.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use unicode_general_category::{get_general_category, GeneralCategory};

use super::task::Task;

/// Longest accepted board name, in characters
pub const MAX_BOARD_NAME_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardNameError {
    #[error("board name must not be empty")]
    Empty,

    #[error("board name must not be longer than 32 characters")]
    TooLong,

    #[error("board name must not contain spaces")]
    Whitespace,

    #[error("board name must not contain special characters")]
    Punctuation,
}

fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// Checks that a board name is non-empty, short, and a single plain word.
///
/// Punctuation is any character in a Unicode `P*` category; symbols such as
/// `+` or `$` are allowed. Control characters are rejected as well.
pub fn validate_board_name(name: &str) -> Result<(), BoardNameError> {
    if name.is_empty() {
        return Err(BoardNameError::Empty);
    }
    if name.chars().count() > MAX_BOARD_NAME_LEN {
        return Err(BoardNameError::TooLong);
    }
    for c in name.chars() {
        if c.is_whitespace() {
            return Err(BoardNameError::Whitespace);
        }
        if is_punctuation(c) || c.is_control() {
            return Err(BoardNameError::Punctuation);
        }
    }
    Ok(())
}

/// A named collection of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Board {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub name: String,

    /// Reserved, currently unused
    #[serde(default)]
    pub status: bool,

    /// Highest task id this board has ever issued
    #[serde(rename = "last_id", default, skip_serializing_if = "is_zero")]
    pub last_task_id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
}

fn is_zero(val: &i64) -> bool {
    *val == 0
}

/// Reads `null` as an empty list; older files wrote empty lists that way
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Board {
    /// Creates an empty board. The name is not validated here.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if the board's name equals `name`, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Highest task id the board has issued or holds
    pub fn highest_task_id(&self) -> i64 {
        let max_existing = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max_existing.max(self.last_task_id)
    }

    /// The id the next inserted task receives, `None` once ids run out
    pub fn next_task_id(&self) -> Option<i64> {
        self.highest_task_id().checked_add(1)
    }

    /// Returns true if a task with exactly this text exists on the board
    pub fn contains_text(&self, text: &str) -> bool {
        self.tasks.iter().any(|t| t.text == text)
    }

    /// Appends a task, keeping its id, and advances the id counter past it
    pub fn push(&mut self, task: Task) {
        self.last_task_id = self.last_task_id.max(task.id);
        self.tasks.push(task);
    }

    /// Removes the task at `index`, if any
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    /// Number of tasks on the board
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the board holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
