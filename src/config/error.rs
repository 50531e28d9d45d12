use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse TOML in '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown section [{section}] in '{path}'")]
    UnknownSection { path: PathBuf, section: String },

    #[error("missing [envelope] in '{path}', which contains a nodes list")]
    NodesWithoutEnvelope { path: PathBuf },

    #[error("'{key}' in '{path}' must be an array")]
    NotAnArray { path: PathBuf, key: &'static str },

    #[error("node #{index} in '{path}': {reason}")]
    InvalidNode {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("2D sweep #{index} in '{path}': {reason}")]
    InvalidSweep {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("[parameters.{name}] in '{path}' is neither a number nor a table")]
    ParameterNotTable { path: PathBuf, name: String },

    #[error("parameter '{name}' in '{path}' has no nominal value")]
    MissingNominal { path: PathBuf, name: String },

    #[error("parameter '{name}' in '{path}' must have exactly one of sigma or sig_abs")]
    SigmaChoice { path: PathBuf, name: String },

    #[error("included parameter '{name}' must end with exactly one non-zero sigma or sig_abs")]
    SpreadInvariant { name: String },

    #[error("option '{key}' is out of range: {reason}")]
    InvalidOption { key: &'static str, reason: String },

    #[error("target '{0}' must be a relative path")]
    AbsoluteTarget(String),

    #[error("target '{0}' must not contain '..'")]
    ParentTarget(String),

    #[error("cannot determine the current directory: {0}")]
    CurrentDir(std::io::Error),

    #[error("cannot resolve start directory '{path}': {source}")]
    StartDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot create working directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot open '{path}' for writing: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize configuration snapshot: {0}")]
    SerializeError(#[from] toml::ser::Error),
}
