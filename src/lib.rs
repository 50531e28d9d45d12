pub mod config;
pub mod context;
mod error;
pub mod logging;

pub use config::{configure, ConfigError, Configuration};
pub use context::{Log, ParamRedeclare, Request, RunMode};
pub use error::Error;
