use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A base directory plus the components descended into below it.
///
/// Concrete paths are joined on demand; the component list only grows.
/// Components are kept as OS strings so non-UTF-8 directory names survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    base: PathBuf,
    components: Vec<OsString>,
}

impl PathTree {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            components: Vec::new(),
        }
    }

    pub fn push(&mut self, component: impl AsRef<OsStr>) {
        self.components.push(component.as_ref().to_os_string());
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn components(&self) -> &[OsString] {
        &self.components
    }

    /// The deepest directory.
    pub fn leaf(&self) -> PathBuf {
        self.components
            .iter()
            .fold(self.base.clone(), |path, component| path.join(component))
    }

    /// Every directory from the base down to the leaf.
    pub fn dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.components.len() + 1);
        let mut current = self.base.clone();
        dirs.push(current.clone());
        for component in &self.components {
            current.push(component);
            dirs.push(current.clone());
        }
        dirs
    }
}

/// Appends `suffix` to the last component of `path` (`/a/run` + `.toml` is `/a/run.toml`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut joined = path.as_os_str().to_owned();
    joined.push(suffix);
    PathBuf::from(joined)
}
