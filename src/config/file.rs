//! File-based configuration sources.

use std::path::{Path, PathBuf};

use toml::Table;

use super::ConfigError;

/// One parsed configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    table: Table,
}

impl ConfigFile {
    /// Loads and parses the TOML file at `path`.
    ///
    /// Returns `Ok(None)` if there is no file there. Every candidate source is
    /// optional, so a missing file is never an error; unreadable or malformed
    /// files are.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(path, &contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(_) if path.is_dir() => Ok(None),
            Err(e) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Parses `contents` as if it had been read from `path`.
    pub fn parse(path: impl AsRef<Path>, contents: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let table = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}
