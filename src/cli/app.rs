//! Main CLI application structure

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::prompt::TerminalChooser;
use super::render::{Palette, Renderer};
use crate::domain::lifecycle;
use crate::domain::matcher::{self, Action, Chooser, Resolution};
use crate::domain::{now, AddOutcome, Store};
use crate::storage::{Config, Database};

#[derive(Parser)]
#[command(name = "tt")]
#[command(author, version, about = "Personal task tracker with fuzzy matching and task aging")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Task file
    #[arg(long, global = true, env = "TT_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = "TT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Keep tasks on their boards instead of sorting them by age
    #[arg(long, global = true)]
    pub no_aging: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    ///
    /// Examples:
    ///   tt add buy milk
    ///   tt add "review PR" --board work
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,

        /// Target board (defaults to the configured default board)
        #[arg(long, short)]
        board: Option<String>,
    },

    /// List tasks, optionally only those matching a pattern
    #[command(visible_alias = "ls")]
    List {
        /// Fuzzy pattern
        pattern: Vec<String>,
    },

    /// Mark the task matching a pattern as done
    #[command(visible_alias = "check")]
    Done {
        /// Fuzzy pattern
        #[arg(required = true)]
        pattern: Vec<String>,
    },

    /// Remove the task matching a pattern
    #[command(visible_alias = "rm")]
    Remove {
        /// Fuzzy pattern
        #[arg(required = true)]
        pattern: Vec<String>,
    },

    /// Create a board
    Board {
        /// Board name (one word, at most 32 characters)
        name: String,
    },
}

/// What a command did, shown once the store is saved
enum Outcome {
    Listed { pattern: String },
    Added(AddOutcome),
    BoardCreated { id: i64, name: String },
    Resolved(Resolution),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let output = Output::new(cli.format);
    let palette = Palette::new(config.color && !output.is_json() && io::stdout().is_terminal());
    let renderer = Renderer::new(palette, config.indent);

    let database = Database::new(config.resolve_db_path(cli.db.as_deref()));
    debug!(path = %database.path().display(), "opening task file");
    let mut store = database.load()?;

    let aging = config.aging && !cli.no_aging;
    if aging {
        store = age(store);
    }

    let mut chooser = TerminalChooser::stdio(Palette::new(config.color && io::stderr().is_terminal()));
    let result = execute(cli.command, &mut store, &config, aging, &mut chooser);

    // The store is written back even when the command failed
    let saved = database.save(&store);
    let outcome = result?;
    saved?;

    show(&output, &renderer, &store, outcome)
}

/// Re-sorts tasks into age buckets, keeping the loaded store if any
/// timestamp is unreadable
fn age(store: Store) -> Store {
    match lifecycle::recalculate(&store, now()) {
        Ok(rebuilt) => rebuilt,
        Err(e) => {
            warn!(error = %e, "skipping bucket recalculation");
            store
        }
    }
}

fn execute(
    command: Option<Commands>,
    store: &mut Store,
    config: &Config,
    aging: bool,
    chooser: &mut dyn Chooser,
) -> Result<Outcome> {
    let command = command.unwrap_or(Commands::List { pattern: vec![] });

    match command {
        Commands::List { pattern } => Ok(Outcome::Listed {
            pattern: pattern.join(" "),
        }),

        Commands::Add { text, board } => {
            let text = text.join(" ");
            let board = board.unwrap_or_else(|| config.default_board.clone());
            add_task(store, config, &text, &board).map(Outcome::Added)
        }

        Commands::Done { pattern } => {
            let resolution = matcher::resolve(store, &pattern.join(" "), Action::Complete, chooser)?;
            Ok(Outcome::Resolved(resolution))
        }

        Commands::Remove { pattern } => {
            let resolution = matcher::resolve(store, &pattern.join(" "), Action::Remove, chooser)?;
            Ok(Outcome::Resolved(resolution))
        }

        Commands::Board { name } => {
            // Re-bucketing drops every empty board on the next run
            if aging {
                anyhow::bail!(
                    "cannot create board {}: boards are rebuilt from task age on every run; \
                     use --no-aging or set `aging = false`",
                    name
                );
            }
            let board = store.create_board(&name)?;
            Ok(Outcome::BoardCreated {
                id: board.id,
                name: board.name.clone(),
            })
        }
    }
}

fn add_task(store: &mut Store, config: &Config, text: &str, board: &str) -> Result<AddOutcome> {
    if let Some(created) = store.ensure_default_board(board)? {
        debug!(board = %created.name, "created first board");
    }

    // Re-bucketing drops empty buckets, so the default board may be gone
    if store.board(board).is_none() && board.to_lowercase() == config.default_board.to_lowercase() {
        store.ensure_board(board)?;
    }

    Ok(store.add_task(text, board, now())?)
}

fn show(output: &Output, renderer: &Renderer, store: &Store, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Listed { pattern } => list(output, renderer, store, &pattern),

        Outcome::Added(AddOutcome::Created { board, task }) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "created": true,
                    "board": board,
                    "task": task,
                }));
            } else {
                output.success(&format!(
                    "task \"{}\" is now added to your {} board.",
                    task.text, board
                ));
            }
            Ok(())
        }

        Outcome::Added(AddOutcome::DuplicateSkipped { board, text }) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "created": false,
                    "reason": "duplicate",
                    "board": board,
                    "text": text,
                }));
            } else {
                output.success(&format!(
                    "task \"{}\" already exists on the {} board, skipped.",
                    text, board
                ));
            }
            Ok(())
        }

        Outcome::BoardCreated { id, name } => {
            if output.is_json() {
                output.data(&serde_json::json!({ "id": id, "name": name }));
            } else {
                output.success(&format!("board {} created.", name));
            }
            Ok(())
        }

        Outcome::Resolved(resolution) => {
            if output.is_json() {
                output.data(&resolution);
                return Ok(());
            }

            let verb = match resolution.action {
                Action::Complete => "checked as done",
                Action::Remove => "removed",
            };
            output.success(&format!(
                "task \"{}\" from board {} {}.",
                resolution.task.text, resolution.board, verb
            ));
            println!();
            list(output, renderer, store, "")
        }
    }
}

fn list(output: &Output, renderer: &Renderer, store: &Store, pattern: &str) -> Result<()> {
    let boards = matcher::filter(store, pattern);

    if output.is_json() {
        let stats = store.stats();
        output.data(&serde_json::json!({
            "boards": boards,
            "stats": {
                "done": stats.done,
                "open": stats.open,
                "percent_done": stats.percent_done(),
            },
        }));
        return Ok(());
    }

    let stdout = io::stdout();
    renderer
        .render(&mut stdout.lock(), &boards, store.stats(), !pattern.is_empty())
        .context("Failed to write listing")
}
