use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

/// Name of the directory holding puzzle inputs.
pub const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("data directory {} does not exist", .0.display())]
    #[diagnostic(code(runner::data_dir_missing))]
    NotADirectory(PathBuf),

    #[error("no '{}' directory found in {} or any parent", DATA_DIR_NAME, .0.display())]
    #[diagnostic(
        code(runner::data_dir_not_found),
        help("pass --data-dir or set AOC_DATA_DIR")
    )]
    NotFound(PathBuf),
}

/// Settings resolved once at startup and handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    data_dir: PathBuf,
}

impl RunConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Uses `explicit` when given, otherwise walks up from `search_from`
    /// looking for a `data` directory.
    pub fn resolve(explicit: Option<PathBuf>, search_from: &Path) -> Result<Self, ConfigError> {
        let data_dir = match explicit {
            Some(dir) if dir.is_dir() => dir,
            Some(dir) => return Err(ConfigError::NotADirectory(dir)),
            None => find_data_dir(search_from)
                .ok_or_else(|| ConfigError::NotFound(search_from.to_path_buf()))?,
        };
        debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self::new(data_dir))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn input_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

fn find_data_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}
