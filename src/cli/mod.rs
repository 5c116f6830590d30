//! # Command-Line Interface
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `tt` / `tt list [PATTERN]` | Show boards, optionally filtered |
//! | `tt add TEXT [--board NAME]` | Add a task |
//! | `tt done PATTERN` | Mark the matching task as done |
//! | `tt remove PATTERN` | Remove the matching task |
//! | `tt board NAME` | Create a board |
//!
//! Every command loads the task file, sorts tasks into age buckets (unless
//! `--no-aging` or `aging = false`), runs, and writes the file back.
//!
//! All commands support `--format text|json`. Use `--verbose` (or
//! `RUST_LOG`) for debug logs on stderr.

mod app;
mod output;
mod prompt;
mod render;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use prompt::TerminalChooser;
pub use render::{Palette, Renderer};
