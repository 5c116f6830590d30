//! Domain models for tt
//!
//! Boards, tasks, fuzzy resolution and aging. No I/O happens here; the
//! storage and CLI layers load a [`Store`], hand it to these functions and
//! persist the result.

mod task;
mod board;
mod store;
pub mod matcher;
pub mod lifecycle;

pub use task::{format_timestamp, now, parse_timestamp, Task, TIMESTAMP_FORMAT};
pub use board::{validate_board_name, Board, BoardNameError, MAX_BOARD_NAME_LEN};
pub(crate) use board::null_as_empty;
pub use store::{AddOutcome, Stats, Store, StoreError, DEFAULT_BOARD};
pub use matcher::{Action, Candidate, Chooser, Resolution, ResolveError};
pub use lifecycle::{Bucket, LifecycleError};
