//! Hierarchical configuration resolution.
//!
//! A run's configuration is merged from every `.toml` file between the
//! project root marker and the target directory, most general first.

mod builder;
mod configuration;
mod entity;
mod error;
mod file;
mod locate;
mod merge;
mod partition;
mod read;
mod resolve;
mod root;
mod schema;
mod sections;
mod snapshot;
mod target;
mod tree;
mod types;

pub use configuration::Configuration;
pub use entity::{Node, Param, Sweep};
pub use error::ConfigError;
pub use resolve::configure;
pub use root::ROOT_MARKER;
pub use tree::PathTree;
pub use types::{Envelope, Extensions, FileNames, Options};
