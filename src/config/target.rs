//! Descending from the project root toward the requested target.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use super::builder::Builder;
use super::locate::candidates;
use super::types::Extensions;
use super::ConfigError;

/// Splits a user-supplied target into path components.
///
/// The target must be relative and must not contain `..`: configuration
/// already applied for a directory cannot be backed out of. One trailing
/// config or circuit extension is stripped, then one trailing `/`. Empty and
/// `.` components are skipped.
pub fn target_components(target: &str, extensions: &Extensions) -> Result<Vec<String>, ConfigError> {
    if target.starts_with('/') || Path::new(target).is_absolute() {
        return Err(ConfigError::AbsoluteTarget(target.to_owned()));
    }
    let trimmed = target
        .strip_suffix(extensions.config.as_str())
        .or_else(|| target.strip_suffix(extensions.circuit.as_str()))
        .unwrap_or(target);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let mut components = Vec::new();
    for part in trimmed.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(ConfigError::ParentTarget(target.to_owned())),
            component => components.push(component.to_owned()),
        }
    }
    Ok(components)
}

/// Replays the `known` components between the root and the start directory,
/// then descends into `target`, applying `<dir>.toml` and `<dir>/the.toml` at
/// every level.
pub fn descend(builder: &mut Builder, known: &[OsString], target: &str) -> Result<(), ConfigError> {
    for component in known {
        step(builder, component)?;
    }
    // Validated in full before touching anything below the start directory.
    let components = target_components(target, &builder.extensions)?;
    for component in &components {
        step(builder, OsStr::new(component))?;
    }
    Ok(())
}

fn step(builder: &mut Builder, component: &OsStr) -> Result<(), ConfigError> {
    builder.push_component(component)?;
    let dir = builder.project().leaf();
    let extension = builder.extensions.config.clone();
    for candidate in candidates(&dir, &extension) {
        builder.try_apply(&candidate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Log, Request};
    use std::fs;
    use tempfile::TempDir;

    fn builder(root: &Path) -> Builder {
        let request = Request::builder("").build();
        let log = Log::new(&request);
        let mut b = Builder::new(&request, log);
        b.plant(root).unwrap();
        b
    }

    #[test]
    fn test_plain_target() {
        let ext = Extensions::default();
        assert_eq!(target_components("a/b", &ext).unwrap(), ["a", "b"]);
        assert_eq!(target_components("run", &ext).unwrap(), ["run"]);
        assert!(target_components("", &ext).unwrap().is_empty());
    }

    #[test]
    fn test_suffixes_stripped_once() {
        let ext = Extensions::default();
        assert_eq!(target_components("a/run.toml", &ext).unwrap(), ["a", "run"]);
        assert_eq!(target_components("a/run.cir", &ext).unwrap(), ["a", "run"]);
        assert_eq!(target_components("a/run/", &ext).unwrap(), ["a", "run"]);
        assert_eq!(target_components("./a//run", &ext).unwrap(), ["a", "run"]);
        assert_eq!(
            target_components("run.cir.toml", &ext).unwrap(),
            ["run.cir"]
        );
    }

    #[test]
    fn test_configured_circuit_extension() {
        let ext = Extensions {
            circuit: ".sp".to_owned(),
            ..Extensions::default()
        };
        assert_eq!(target_components("run.sp", &ext).unwrap(), ["run"]);
        assert_eq!(target_components("run.cir", &ext).unwrap(), ["run.cir"]);
    }

    #[test]
    fn test_rejects_absolute_and_parent() {
        let ext = Extensions::default();
        assert!(matches!(
            target_components("/etc/run", &ext),
            Err(ConfigError::AbsoluteTarget(_))
        ));
        assert!(matches!(
            target_components("a/b/../c", &ext),
            Err(ConfigError::ParentTarget(_))
        ));
        assert!(matches!(
            target_components("..", &ext),
            Err(ConfigError::ParentTarget(_))
        ));
    }

    #[test]
    fn test_parent_rejected_before_io() {
        let tmp = TempDir::new().unwrap();
        let mut b = builder(tmp.path());
        let result = descend(&mut b, &[], "a/b/../c");
        assert!(matches!(result, Err(ConfigError::ParentTarget(_))));
        assert!(!tmp.path().join("out").join("a").exists());
    }

    #[test]
    fn test_each_level_overrides_the_last() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("run")).unwrap();
        fs::write(root.join("run.toml"), "[envelope]\ndt = 2e-9\ndx = 2.0\n").unwrap();
        fs::write(root.join("run").join("the.toml"), "[envelope]\ndx = 3.0\n").unwrap();
        fs::write(root.join("run").join("extra.toml"), "print_terminal = false\n").unwrap();

        let mut b = builder(root);
        descend(&mut b, &[], "run/extra").unwrap();

        assert_eq!(b.envelope.dt, 2e-9);
        assert_eq!(b.envelope.dx, 3.0);
        assert!(!b.options.print_terminal);
        assert!(root.join("out").join("run").join("extra").is_dir());
        assert_eq!(b.project().leaf(), root.join("run").join("extra"));
    }

    #[test]
    fn test_known_components_replayed_first() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("lib").join("cells")).unwrap();
        fs::write(root.join("lib").join("the.toml"), "[simulator]\nthreads = 2\n").unwrap();
        fs::write(
            root.join("lib").join("cells.toml"),
            "[simulator]\nthreads = 3\n",
        )
        .unwrap();
        fs::write(
            root.join("lib").join("cells").join("dff.toml"),
            "[simulator]\nmax_subprocesses = 4\n",
        )
        .unwrap();

        let mut b = builder(root);
        let known = [OsString::from("lib"), OsString::from("cells")];
        descend(&mut b, &known, "dff").unwrap();

        assert_eq!(b.options.threads, 3);
        assert_eq!(b.options.max_subprocesses, 4);
        assert_eq!(
            b.working.leaf(),
            root.join("out").join("lib").join("cells").join("dff")
        );
    }
}
