//! tt - a personal command-line task tracker
//!
//! Tasks live on named boards in a single JSON file. Commands that act on
//! one task take a fuzzy text pattern instead of an id, and every run
//! re-sorts tasks into `actual`, `month` and `rotten` boards by age.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Action, Board, Bucket, Store, Task};
