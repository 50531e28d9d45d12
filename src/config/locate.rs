//! Finding the most specific input file for an extension.

use std::path::{Path, PathBuf};

use super::tree::{with_suffix, PathTree};

/// Stem of the file that lives inside a directory rather than beside it.
pub const INNER_STEM: &str = "the";

/// The two places a file for `dir` may live: `<dir><ext>`, then `<dir>/the<ext>`.
pub fn candidates(dir: &Path, extension: &str) -> [PathBuf; 2] {
    [
        with_suffix(dir, extension),
        dir.join(format!("{INNER_STEM}{extension}")),
    ]
}

/// Returns the first candidate naming an existing regular file.
///
/// `dirs` must be ordered most specific first.
pub fn most_specific_file<I, P>(dirs: I, extension: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .flat_map(|dir| candidates(dir.as_ref(), extension))
        .find(|candidate| candidate.is_file())
}

/// Searches the project tree leaf-first, then the working tree leaf-first.
pub fn find_input(project: &PathTree, working: &PathTree, extension: &str) -> Option<PathBuf> {
    let dirs = project
        .dirs()
        .into_iter()
        .rev()
        .chain(working.dirs().into_iter().rev());
    most_specific_file(dirs, extension)
}
