use std::path::{Path, PathBuf};

use super::entity::{Node, Param, Sweep};
use super::tree::PathTree;
use super::types::{Envelope, Extensions, FileNames, Options};
use crate::context::{Log, RunMode};

/// The resolved configuration for one run.
///
/// Produced once per run by [`configure`](super::configure) and never
/// mutated afterwards. Parameters are partitioned:
/// `params()[..num_params()]` are varied normally,
/// the next `num_params_corn()` are corner parameters, and the rest are
/// nominal-only constants.
#[derive(Debug)]
pub struct Configuration {
    pub(crate) mode: RunMode,
    pub(crate) log: Log,
    pub(crate) keep_files: bool,
    pub(crate) working: PathTree,
    pub(crate) file_names: FileNames,
    pub(crate) envelope: Envelope,
    pub(crate) extensions: Extensions,
    pub(crate) options: Options,
    pub(crate) nodes: Vec<Node>,
    pub(crate) params: Vec<Param>,
    pub(crate) num_params: usize,
    pub(crate) num_params_corn: usize,
    pub(crate) sweeps: Vec<Sweep>,
}

impl Configuration {
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn keep_files(&self) -> bool {
        self.keep_files
    }

    /// The mirrored output directories, root first.
    pub fn working_tree(&self) -> &PathTree {
        &self.working
    }

    /// The deepest working directory, where run artifacts go.
    pub fn working_dir(&self) -> PathBuf {
        self.working.leaf()
    }

    pub fn file_names(&self) -> &FileNames {
        &self.file_names
    }

    /// Where the snapshot of this configuration is written.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.file_names.config.as_deref()
    }

    /// Envelope defaults in effect after the last source.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn num_params(&self) -> usize {
        self.num_params
    }

    pub fn num_params_corn(&self) -> usize {
        self.num_params_corn
    }

    pub fn num_params_all(&self) -> usize {
        self.params.len()
    }

    /// Included parameters that are not corners.
    pub fn varied_params(&self) -> &[Param] {
        &self.params[..self.num_params]
    }

    pub fn corner_params(&self) -> &[Param] {
        &self.params[self.num_params..self.num_params + self.num_params_corn]
    }

    /// Parameters held at their nominal value.
    pub fn constant_params(&self) -> &[Param] {
        &self.params[self.num_params + self.num_params_corn..]
    }

    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }
}
