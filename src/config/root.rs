//! Locating the project root marker above the start directory.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use super::builder::Builder;
use super::snapshot::{write_file, Snapshot};
use super::ConfigError;

/// File whose presence marks the top of a project.
pub const ROOT_MARKER: &str = "Malt.toml";

/// Where the marker was found, and the way back down to the start directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLocation {
    pub root: PathBuf,
    /// Directory names from just below `root` down to the start directory.
    pub components: Vec<OsString>,
}

/// Walks up from `start` looking for [`ROOT_MARKER`], stopping only at the
/// filesystem root.
///
/// `start` should be absolute. `.` and `..` are folded lexically, so callers
/// wanting symlinks resolved must canonicalize first. Returns `None` if no
/// ancestor has a marker.
pub fn find_root(start: &Path) -> Option<RootLocation> {
    let mut base = PathBuf::new();
    let mut names: Vec<OsString> = Vec::new();
    for component in start.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => base.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                names.pop();
            }
            Component::Normal(name) => names.push(name.to_os_string()),
        }
    }

    let mut below = Vec::new();
    loop {
        let dir = names.iter().fold(base.clone(), |path, name| path.join(name));
        if dir.join(ROOT_MARKER).is_file() {
            below.reverse();
            return Some(RootLocation {
                root: dir,
                components: below,
            });
        }
        below.push(names.pop()?);
    }
}

/// Finds the root, applies its marker as the first source and plants both trees.
///
/// When no marker exists anywhere above `start`, a default one is generated
/// in `start`, which then becomes the root.
pub fn locate_root(builder: &mut Builder, start: &Path) -> Result<RootLocation, ConfigError> {
    let location = match find_root(start) {
        Some(location) => location,
        None => {
            tracing::warn!(
                parent: builder.log().span(),
                start = %start.display(),
                "no Malt.toml configuration files found"
            );
            bootstrap_marker(builder, start)?;
            RootLocation {
                root: start.to_path_buf(),
                components: Vec::new(),
            }
        }
    };

    builder.try_apply(&location.root.join(ROOT_MARKER))?;
    builder.plant(&location.root)?;
    Ok(location)
}

/// Writes the builder's current state as a fresh root marker in `dir`.
fn bootstrap_marker(builder: &Builder, dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(ROOT_MARKER);
    let contents = Snapshot::from_builder(builder).to_toml_string()?;
    write_file(&path, &contents)?;
    tracing::info!(
        parent: builder.log().span(),
        path = %path.display(),
        "generated a default configuration file"
    );
    Ok(path)
}
