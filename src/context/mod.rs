//! The immutable run request and the log handle threaded through resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::Span;

/// What the run is for. The tag names the per-run snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RunMode {
    #[default]
    Define,
    Margins,
    #[value(name = "2d")]
    TwoD,
    Shmoo,
    Yield,
    Optimize,
}

impl RunMode {
    pub fn tag(self) -> char {
        match self {
            RunMode::Define => 'd',
            RunMode::Margins => 'm',
            RunMode::TwoD => '2',
            RunMode::Shmoo => 's',
            RunMode::Yield => 'y',
            RunMode::Optimize => 'o',
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// How a parameter declared again by a later file is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamRedeclare {
    /// Keep earlier fields; only keys present in the new declaration overwrite.
    #[default]
    Overlay,
    /// Reset the parameter to defaults, then apply the new declaration.
    Reset,
}

/// Everything the caller decides before resolution starts.
///
/// ## Example
///
/// ```no_run
/// use malt_config::{configure, Request, RunMode};
///
/// let request = Request::builder("filters/lowpass")
///     .mode(RunMode::Margins)
///     .verbosity(1)
///     .build();
/// let config = configure(&request)?;
/// println!("{} varied parameters", config.num_params());
/// # Ok::<(), malt_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    target: String,
    mode: RunMode,
    verbosity: u8,
    keep_files: bool,
    start_dir: Option<PathBuf>,
    output_root: Option<PathBuf>,
    redeclare: ParamRedeclare,
}

impl Request {
    /// Creates a new builder for a run on `target`.
    pub fn builder(target: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            request: Request {
                target: target.into(),
                mode: RunMode::default(),
                verbosity: 0,
                keep_files: false,
                start_dir: None,
                output_root: None,
                redeclare: ParamRedeclare::default(),
            },
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn keep_files(&self) -> bool {
        self.keep_files
    }

    /// Directory the root search starts from; `None` means the process's current directory.
    pub fn start_dir(&self) -> Option<&Path> {
        self.start_dir.as_deref()
    }

    /// Root of the working tree; `None` means `<project root>/out`.
    pub fn output_root(&self) -> Option<&Path> {
        self.output_root.as_deref()
    }

    pub fn redeclare(&self) -> ParamRedeclare {
        self.redeclare
    }
}

/// Builder for constructing a [`Request`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    pub fn mode(mut self, mode: RunMode) -> Self {
        self.request.mode = mode;
        self
    }

    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.request.verbosity = verbosity;
        self
    }

    pub fn keep_files(mut self, keep_files: bool) -> Self {
        self.request.keep_files = keep_files;
        self
    }

    pub fn start_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.request.start_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn output_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.request.output_root = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn redeclare(mut self, policy: ParamRedeclare) -> Self {
        self.request.redeclare = policy;
        self
    }

    pub fn build(self) -> Request {
        self.request
    }
}

/// Log handle for one resolution.
///
/// Every event raised while resolving is parented to this span, so the
/// destination is whatever subscriber the span belongs to rather than
/// ambient state. Dropping the handle closes the span.
#[derive(Debug, Clone)]
pub struct Log {
    span: Span,
    verbosity: u8,
}

impl Log {
    pub fn new(request: &Request) -> Self {
        Self {
            span: tracing::info_span!(
                "configure",
                mode = %request.mode(),
                target = request.target()
            ),
            verbosity: request.verbosity(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity > 0
    }
}
