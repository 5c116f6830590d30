//! Configuration handling for tt
//!
//! Configuration is read from `~/.config/tt/config.toml` (or the platform
//! equivalent), or from the file given with `--config` / `TT_CONFIG`.
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_BOARD;

/// Task file used when neither the command line nor the config names one
pub const DEFAULT_DB_FILE: &str = ".db.tt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task file; relative paths resolve against the working directory
    pub db_path: Option<PathBuf>,

    /// Board that `tt add` targets when `--board` is omitted
    pub default_board: String,

    /// Re-sort tasks into age buckets on every run
    pub aging: bool,

    /// Width of the id column in listings
    pub indent: usize,

    /// Colored output when writing to a terminal
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            default_board: DEFAULT_BOARD.to_string(),
            aging: true,
            indent: 10,
            color: true,
        }
    }
}

impl Config {
    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tt").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from `path`, or the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&content).map_err(|message| ConfigError::Parse { path, message })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Resolves the task file: command line, then config, then `.db.tt`
    pub fn resolve_db_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.default_board, "actual");
        assert!(config.aging);
        assert_eq!(config.indent, 10);
        assert_eq!(config.resolve_db_path(None), PathBuf::from(".db.tt"));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
default_board = "inbox"
aging = false
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.default_board, "inbox");
        assert!(!config.aging);
        assert_eq!(config.indent, 10);
        assert!(config.color);
    }

    #[test]
    fn db_path_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("/tmp/from-config")),
            ..Config::default()
        };

        assert_eq!(config.resolve_db_path(None), PathBuf::from("/tmp/from-config"));
        assert_eq!(
            config.resolve_db_path(Some(Path::new("cli.tt"))),
            PathBuf::from("cli.tt")
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "indent = 6\ncolor = false\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.indent, 6);
        assert!(!config.color);
    }

    #[test]
    fn invalid_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "indent = \"wide\"\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
