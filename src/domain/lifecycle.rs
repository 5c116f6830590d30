//! Task aging
//!
//! Every invocation re-sorts tasks into three buckets by how long ago they
//! were created:
//!
//! | Bucket | Age |
//! |--------|-----|
//! | `actual` | up to 7 days |
//! | `month` | over 7, up to 30 days |
//! | `rotten` | over 30 days |
//!
//! Each edge belongs to the younger bucket. The result is a new [`Store`]
//! containing only bucket boards; the input is left untouched so a failed
//! pass changes nothing.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::store::Store;

/// Oldest age, in hours, still counted as `actual`
pub const WEEK_HOURS: i64 = 7 * 24;

/// Oldest age, in hours, still counted as `month`
pub const MONTH_HOURS: i64 = 30 * 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid date format '{value}' for task {task} on board {board}")]
    InvalidDateFormat {
        board: String,
        task: i64,
        value: String,
    },

    #[error(transparent)]
    Store(#[from] super::store::StoreError),
}

/// Age bucket of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Actual,
    Month,
    Rotten,
}

impl Bucket {
    /// Board name used for the bucket
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Actual => "actual",
            Bucket::Month => "month",
            Bucket::Rotten => "rotten",
        }
    }

    /// Classifies an age in whole hours. Negative ages (clock skew) count as
    /// `actual`.
    pub fn for_age(hours: i64) -> Self {
        if hours <= WEEK_HOURS {
            Bucket::Actual
        } else if hours <= MONTH_HOURS {
            Bucket::Month
        } else {
            Bucket::Rotten
        }
    }

    /// Classifies a creation time relative to `now`
    pub fn for_created(created_at: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self::for_age((now - created_at).num_hours())
    }
}

/// Builds a new store with every task moved to its age bucket.
///
/// All timestamps are checked before anything is built: one unparsable
/// `created_at` fails the whole pass. Tasks keep their id, text, status and
/// timestamp; bucket boards appear in order of first use.
pub fn recalculate(store: &Store, now: NaiveDateTime) -> Result<Store, LifecycleError> {
    let mut placements = Vec::new();
    for (board, task) in store.tasks() {
        let created_at = task
            .created_at()
            .map_err(|_| LifecycleError::InvalidDateFormat {
                board: board.name.clone(),
                task: task.id,
                value: task.created_at.clone(),
            })?;
        placements.push((Bucket::for_created(created_at, now), task));
    }

    let high_water = store
        .boards()
        .iter()
        .map(|b| b.highest_task_id())
        .max()
        .unwrap_or(0);

    let mut rebuilt = Store::new();
    for (bucket, task) in placements {
        let board = rebuilt.ensure_board(bucket.as_str())?;
        board.last_task_id = board.last_task_id.max(high_water);
        board.push(task.clone());
    }

    debug!(
        tasks = store.tasks().count(),
        boards = rebuilt.boards().len(),
        "recalculated buckets"
    );
    Ok(rebuilt)
}
