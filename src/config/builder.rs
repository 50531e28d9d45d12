use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::configuration::Configuration;
use super::entity::{EntitySet, Node, Param, Sweep};
use super::file::ConfigFile;
use super::locate::find_input;
use super::merge::{read_envelope, read_nodes, read_parameters, read_sweeps};
use super::partition::partition;
use super::schema::check_document;
use super::sections;
use super::tree::PathTree;
use super::types::{Envelope, Extensions, FileNames, Options};
use super::ConfigError;
use crate::context::{Log, ParamRedeclare, Request, RunMode};

/// Name of the working-tree root created under the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Mutable accumulator for one resolution.
///
/// Sources are applied with [`apply`](Self::apply) in increasing order of
/// specificity; every key a source sets overwrites what earlier sources set.
/// [`finish`](Self::finish) ends mutability and produces the [`Configuration`].
#[derive(Debug)]
#[must_use = "builders do nothing until .finish() is called"]
pub struct Builder {
    pub(crate) mode: RunMode,
    pub(crate) keep_files: bool,
    pub(crate) redeclare: ParamRedeclare,
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) log: Log,

    /// Real directories, read for input files.
    pub(crate) project: PathTree,
    /// Mirrored directories, written for run artifacts.
    pub(crate) working: PathTree,

    pub(crate) file_names: FileNames,

    pub(crate) envelope_set: bool,
    pub(crate) envelope: Envelope,
    pub(crate) extensions: Extensions,
    pub(crate) options: Options,

    pub(crate) nodes: EntitySet<Node>,
    pub(crate) params: EntitySet<Param>,
    pub(crate) sweeps: Vec<Sweep>,
}

impl Builder {
    /// Creates a builder holding only built-in defaults.
    pub fn new(request: &Request, log: Log) -> Self {
        Self {
            mode: request.mode(),
            keep_files: request.keep_files(),
            redeclare: request.redeclare(),
            output_root: request.output_root().map(Path::to_path_buf),
            log,
            project: PathTree::default(),
            working: PathTree::default(),
            file_names: FileNames::default(),
            envelope_set: false,
            envelope: Envelope::default(),
            extensions: Extensions::default(),
            options: Options::default(),
            nodes: EntitySet::new(),
            params: EntitySet::new(),
            sweeps: Vec::new(),
        }
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn project(&self) -> &PathTree {
        &self.project
    }

    /// Roots both trees: the project tree at `root`, the working tree at the
    /// requested output root or `<root>/out`.
    pub fn plant(&mut self, root: &Path) -> Result<(), ConfigError> {
        let output_root = self
            .output_root
            .clone()
            .unwrap_or_else(|| root.join(DEFAULT_OUTPUT_DIR));
        create_dir(&output_root)?;
        self.project = PathTree::new(root);
        self.working = PathTree::new(output_root);
        Ok(())
    }

    /// Descends one level in both trees, creating the mirrored directory.
    pub fn push_component(&mut self, component: impl AsRef<OsStr>) -> Result<(), ConfigError> {
        let component = component.as_ref();
        self.project.push(component);
        self.working.push(component);
        create_dir(&self.working.leaf())
    }

    /// Parses the file at `path` if it exists and applies it.
    ///
    /// Returns `Ok(false)` when there is no such file.
    pub fn try_apply(&mut self, path: &Path) -> Result<bool, ConfigError> {
        match ConfigFile::load(path)? {
            Some(file) => {
                self.apply(&file)?;
                tracing::info!(
                    parent: self.log.span(),
                    path = %path.display(),
                    "parsed config file"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Applies one parsed source on top of everything applied so far.
    pub fn apply(&mut self, file: &ConfigFile) -> Result<(), ConfigError> {
        let t = file.table();
        check_document(t, file.path(), &self.log)?;

        sections::read_general(&mut self.options, t);

        // [envelope] first: nodes in the same file inherit it.
        self.envelope_set |= read_envelope(&mut self.envelope, t);
        read_nodes(
            &mut self.nodes,
            &self.envelope,
            self.envelope_set,
            file,
            &self.log,
        )?;
        read_parameters(&mut self.params, self.redeclare, file, &self.log)?;

        sections::read_extensions(&mut self.extensions, t);
        sections::read_define(&mut self.options, t);
        sections::read_yield(&mut self.options, t);
        sections::read_optimize(&mut self.options, t);
        sections::read_xy(&mut self.options, t);
        read_sweeps(&mut self.sweeps, file, &self.log)?;
        Ok(())
    }

    /// Where this run's snapshot is written.
    pub fn snapshot_path(&self) -> PathBuf {
        self.working.leaf().join(format!(
            "config.{}{}",
            self.mode.tag(),
            self.extensions.config
        ))
    }

    /// Searches both trees for every input file.
    pub fn resolve_file_names(&mut self) {
        let find = |extension: &str| find_input(&self.project, &self.working, extension);
        let file_names = FileNames {
            circuit: find(&self.extensions.circuit),
            param: find(&self.extensions.param),
            passf: find(&self.extensions.passf),
            envelope: find(&self.extensions.envelope),
            env_call: find(&self.extensions.env_call).or_else(|| {
                Some(
                    self.working
                        .leaf()
                        .join(format!("the{}", self.extensions.env_call)),
                )
            }),
            config: Some(self.snapshot_path()),
        };

        match &file_names.circuit {
            Some(circuit) => tracing::info!(
                parent: self.log.span(),
                path = %circuit.display(),
                "using circuit file"
            ),
            None => tracing::warn!(
                parent: self.log.span(),
                extension = %self.extensions.circuit,
                "no circuit file found"
            ),
        }
        if self.log.is_verbose() {
            tracing::info!(parent: self.log.span(), ?file_names, "resolved input files");
        }
        self.file_names = file_names;
    }

    /// Moves the accumulated state into an immutable [`Configuration`].
    ///
    /// Runs the final range checks, requires every included parameter to
    /// have exactly one non-zero spread, and partitions the parameters. The
    /// project tree stays behind; only the working tree is handed on.
    pub fn finish(self) -> Result<Configuration, ConfigError> {
        self.options.validate()?;
        self.envelope.validate()?;
        if let Some(p) = self
            .params
            .iter()
            .find(|p| p.include && !p.has_one_spread())
        {
            return Err(ConfigError::SpreadInvariant {
                name: p.name.clone(),
            });
        }

        let Builder {
            mode,
            keep_files,
            log,
            working,
            file_names,
            envelope,
            extensions,
            options,
            nodes,
            params,
            sweeps,
            ..
        } = self;

        let mut params = params.into_vec();
        let (num_params, num_params_corn) = partition(&mut params);

        Ok(Configuration {
            mode,
            log,
            keep_files,
            working,
            file_names,
            envelope,
            extensions,
            options,
            nodes: nodes.into_vec(),
            params,
            num_params,
            num_params_corn,
            sweeps,
        })
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|e| ConfigError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}
