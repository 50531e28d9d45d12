use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the malt-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid log directive: {0}")]
    LogDirective(#[from] tracing_subscriber::filter::ParseError),
}
