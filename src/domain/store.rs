//! The task store
//!
//! [`Store`] is the root of the object graph and the unit of persistence:
//! it owns every board, and boards own their tasks. One store lives for the
//! duration of a single command.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::board::{validate_board_name, Board, BoardNameError};
use super::task::Task;

/// Board created when the first task arrives and no name was given
pub const DEFAULT_BOARD: &str = "actual";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    InvalidBoardName(#[from] BoardNameError),

    #[error("board with this name already exists: {0}")]
    DuplicateBoard(String),

    #[error("board not found: {0}")]
    BoardNotFound(String),

    #[error("task text must not be empty")]
    EmptyTask,

    #[error("no task ids left on board {0}")]
    IdsExhausted(String),
}

/// Result of [`Store::add_task`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The task was appended to the board
    Created { board: String, task: Task },
    /// A task with the same text already exists on the board; nothing changed
    DuplicateSkipped { board: String, text: String },
}

/// Completion counters over the whole store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub done: usize,
    pub open: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.done + self.open
    }

    /// Share of done tasks, 0 for an empty store
    pub fn percent_done(&self) -> usize {
        if self.total() == 0 {
            0
        } else {
            self.done * 100 / self.total()
        }
    }
}

/// All boards of one task file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    boards: Vec<Board>,
}

impl Store {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from decoded boards, giving id-less boards fresh ids
    pub fn from_boards(boards: Vec<Board>) -> Self {
        let mut store = Self { boards };
        let mut next_id = store.max_board_id();
        for board in store.boards.iter_mut().filter(|b| b.id <= 0) {
            next_id += 1;
            board.id = next_id;
        }
        store
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Returns true if the store has no boards
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Looks up a board by name, ignoring case
    pub fn board(&self, name: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.is_named(name))
    }

    /// Mutable lookup by name, ignoring case
    pub fn board_mut(&mut self, name: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.is_named(name))
    }

    pub(crate) fn board_at_mut(&mut self, index: usize) -> Option<&mut Board> {
        self.boards.get_mut(index)
    }

    /// Iterates over every task, board by board
    pub fn tasks(&self) -> impl Iterator<Item = (&Board, &Task)> {
        self.boards
            .iter()
            .flat_map(|board| board.tasks.iter().map(move |task| (board, task)))
    }

    fn max_board_id(&self) -> i64 {
        self.boards.iter().map(|b| b.id).max().unwrap_or(0)
    }

    /// Creates a new, empty board
    pub fn create_board(&mut self, name: &str) -> Result<&Board, StoreError> {
        let index = self.insert_board(name)?;
        Ok(&self.boards[index])
    }

    fn insert_board(&mut self, name: &str) -> Result<usize, StoreError> {
        validate_board_name(name)?;
        if self.board(name).is_some() {
            return Err(StoreError::DuplicateBoard(name.to_string()));
        }

        let board = Board::new(self.max_board_id() + 1, name);
        debug!(board = %board.name, id = board.id, "created board");
        self.boards.push(board);
        Ok(self.boards.len() - 1)
    }

    /// Finds a board by name or creates it
    pub fn ensure_board(&mut self, name: &str) -> Result<&mut Board, StoreError> {
        let index = match self.boards.iter().position(|b| b.is_named(name)) {
            Some(index) => index,
            None => self.insert_board(name)?,
        };
        Ok(&mut self.boards[index])
    }

    /// Creates the first board of an empty store.
    ///
    /// Falls back to [`DEFAULT_BOARD`] when `name` is empty. Returns `None`
    /// and leaves the store untouched if any board already exists.
    pub fn ensure_default_board(&mut self, name: &str) -> Result<Option<&Board>, StoreError> {
        if !self.is_empty() {
            return Ok(None);
        }
        let name = if name.is_empty() { DEFAULT_BOARD } else { name };
        self.create_board(name).map(Some)
    }

    /// Adds an open task to an existing board.
    ///
    /// A task whose text exactly matches one already on the board is skipped
    /// rather than rejected.
    pub fn add_task(
        &mut self,
        text: &str,
        board_name: &str,
        created_at: NaiveDateTime,
    ) -> Result<AddOutcome, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyTask);
        }
        let board = self
            .board_mut(board_name)
            .ok_or_else(|| StoreError::BoardNotFound(board_name.to_string()))?;

        if board.contains_text(text) {
            debug!(board = %board.name, text, "skipped duplicate task");
            return Ok(AddOutcome::DuplicateSkipped {
                board: board.name.clone(),
                text: text.to_string(),
            });
        }

        let id = board
            .next_task_id()
            .ok_or_else(|| StoreError::IdsExhausted(board.name.clone()))?;
        let task = Task::new(id, text, created_at);
        debug!(board = %board.name, id = task.id, "added task");
        board.push(task.clone());

        Ok(AddOutcome::Created {
            board: board.name.clone(),
            task,
        })
    }

    /// Removes the task at a position within the named board.
    ///
    /// Returns `None` without touching the store when the board is missing or
    /// empty, or the index is past its end.
    pub fn remove_task_at(&mut self, board_name: &str, index: usize) -> Option<Task> {
        let board = self.board_mut(board_name)?;
        let removed = board.remove_at(index)?;
        debug!(board = %board.name, id = removed.id, "removed task");
        Some(removed)
    }

    /// Counts done and open tasks
    pub fn stats(&self) -> Stats {
        self.tasks().fold(Stats::default(), |mut stats, (_, task)| {
            if task.done {
                stats.done += 1;
            } else {
                stats.open += 1;
            }
            stats
        })
    }
}
