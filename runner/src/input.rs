use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::config::RunConfig;

#[derive(Debug, Error, Diagnostic)]
#[error("failed to read puzzle input {}", .path.display())]
#[diagnostic(code(runner::input_unreadable))]
pub struct InputError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// Raw contents of one puzzle input file.
#[derive(Debug, Clone)]
pub struct PuzzleInput {
    path: PathBuf,
    text: String,
}

impl PuzzleInput {
    pub fn load(config: &RunConfig, file: &str) -> Result<Self, InputError> {
        let path = config.input_path(file);
        let text = std::fs::read_to_string(&path).map_err(|source| InputError {
            path: path.clone(),
            source,
        })?;
        let input = Self { path, text };
        debug!(
            path = %input.path.display(),
            lines = input.lines().count(),
            "loaded puzzle input"
        );
        Ok(input)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Input lines in file order, without line terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn reads_lines_from_the_data_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("day07-input.txt"), "S..\r\n.^.\n...\n").unwrap();
        let config = RunConfig::new(tmp.path());

        let input = PuzzleInput::load(&config, "day07-input.txt").unwrap();
        assert_eq!(input.lines().collect::<Vec<_>>(), ["S..", ".^.", "..."]);
        assert_eq!(input.path(), tmp.path().join("day07-input.txt"));
        assert!(input.text().starts_with("S.."));
    }

    #[test]
    fn missing_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RunConfig::new(tmp.path());
        let err = PuzzleInput::load(&config, "absent.txt").unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
