//! Fuzzy task resolution
//!
//! Commands that act on a single task (`done`, `remove`) take a short
//! free-text pattern instead of an id. A pattern matches a task when its
//! characters appear in the task text in order, ignoring case; matches are
//! ranked by edit distance so the closest text sorts first.
//!
//! When more than one task matches, the choice is delegated to a
//! [`Chooser`]. The terminal implementation lives in the CLI; tests pass a
//! closure.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::board::Board;
use super::store::Store;
use super::task::Task;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no task matches '{0}'")]
    NotFound(String),

    #[error("task selection aborted")]
    SelectionAborted,
}

/// What to do with the resolved task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Complete,
    Remove,
}

impl Action {
    /// Only open tasks can be completed; any task can be removed
    fn accepts(&self, task: &Task) -> bool {
        match self {
            Action::Complete => task.is_open(),
            Action::Remove => true,
        }
    }
}

/// Ranks `text` against `pattern`.
///
/// Returns `None` unless every character of the pattern occurs in the text
/// in order (case-insensitive). The rank is the Levenshtein distance between
/// the two, so 0 means an exact match.
pub fn fuzzy_rank(pattern: &str, text: &str) -> Option<usize> {
    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();

    let mut chars = text.chars();
    for wanted in pattern.chars() {
        chars.find(|&c| c == wanted)?;
    }

    Some(strsim::levenshtein(&pattern, &text))
}

/// A task that matched a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub board: String,
    #[serde(skip)]
    pub board_index: usize,
    #[serde(skip)]
    pub task_index: usize,
    pub id: i64,
    pub text: String,
    pub rank: usize,
}

/// Picks one of several candidates
pub trait Chooser {
    /// Returns the index of the chosen candidate, or `None` to abort
    fn choose(&mut self, candidates: &[Candidate]) -> Option<usize>;
}

impl<F> Chooser for F
where
    F: FnMut(&[Candidate]) -> Option<usize>,
{
    fn choose(&mut self, candidates: &[Candidate]) -> Option<usize> {
        self(candidates)
    }
}

/// Collects every task eligible for `action` that matches `pattern`, best
/// rank first. Ties keep board-then-task order.
pub fn candidates(store: &Store, pattern: &str, action: Action) -> Vec<Candidate> {
    let mut found = Vec::new();

    for (board_index, board) in store.boards().iter().enumerate() {
        for (task_index, task) in board.tasks.iter().enumerate() {
            if !action.accepts(task) {
                continue;
            }
            if let Some(rank) = fuzzy_rank(pattern, &task.text) {
                found.push(Candidate {
                    board: board.name.clone(),
                    board_index,
                    task_index,
                    id: task.id,
                    text: task.text.clone(),
                    rank,
                });
            }
        }
    }

    found.sort_by_key(|c| c.rank);
    found
}

/// The task an action was applied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub action: Action,
    pub board: String,
    /// State of the task after the action (the removed task for removals)
    pub task: Task,
    /// True if the chooser had to be consulted
    pub prompted: bool,
}

/// Resolves `pattern` to exactly one task and applies `action` to it.
///
/// A single match is acted on directly. Several matches are handed to
/// `chooser` once; a `None` or out-of-range answer aborts.
pub fn resolve(
    store: &mut Store,
    pattern: &str,
    action: Action,
    chooser: &mut dyn Chooser,
) -> Result<Resolution, ResolveError> {
    let mut found = candidates(store, pattern, action);
    debug!(pattern, matches = found.len(), ?action, "resolving task");

    let (target, prompted) = match found.len() {
        0 => return Err(ResolveError::NotFound(pattern.to_string())),
        1 => (found.remove(0), false),
        _ => {
            let index = chooser
                .choose(&found)
                .filter(|&i| i < found.len())
                .ok_or(ResolveError::SelectionAborted)?;
            (found.swap_remove(index), true)
        }
    };

    let task = apply(store, &target, action)
        .ok_or_else(|| ResolveError::NotFound(pattern.to_string()))?;

    Ok(Resolution {
        action,
        board: target.board,
        task,
        prompted,
    })
}

fn apply(store: &mut Store, target: &Candidate, action: Action) -> Option<Task> {
    let board: &mut Board = store.board_at_mut(target.board_index)?;
    match action {
        Action::Complete => {
            let task = board.tasks.get_mut(target.task_index)?;
            task.complete();
            Some(task.clone())
        }
        Action::Remove => board.remove_at(target.task_index),
    }
}

/// A board restricted to the tasks matching a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView<'a> {
    pub name: &'a str,
    pub tasks: Vec<&'a Task>,
}

/// Read-only listing of every board with its matching tasks. An empty
/// pattern keeps everything.
pub fn filter<'a>(store: &'a Store, pattern: &str) -> Vec<BoardView<'a>> {
    store
        .boards()
        .iter()
        .map(|board| BoardView {
            name: &board.name,
            tasks: board
                .tasks
                .iter()
                .filter(|task| fuzzy_rank(pattern, &task.text).is_some())
                .collect(),
        })
        .collect()
}
