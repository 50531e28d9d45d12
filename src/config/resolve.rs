//! One full resolution from a [`Request`] to a [`Configuration`].

use std::path::PathBuf;

use super::builder::Builder;
use super::configuration::Configuration;
use super::root::locate_root;
use super::snapshot::{render_run, write_file};
use super::target::descend;
use super::ConfigError;
use crate::context::{Log, Request};

/// Resolves the configuration for `request`.
///
/// Finds the project root above the start directory, applies every
/// configuration file from the root down to the target, locates the input
/// files and finalizes. A snapshot of the result is written to the working
/// leaf; failing to write it is logged and does not fail the run.
pub fn configure(request: &Request) -> Result<Configuration, ConfigError> {
    let log = Log::new(request);
    let start = start_dir(request)?;

    let mut builder = Builder::new(request, log);
    let location = locate_root(&mut builder, &start)?;
    descend(&mut builder, &location.components, request.target())?;
    builder.resolve_file_names();

    let config = builder.finish()?;
    write_snapshot(&config, request.target());
    Ok(config)
}

/// The absolute, symlink-free directory the root search starts from.
fn start_dir(request: &Request) -> Result<PathBuf, ConfigError> {
    let dir = match request.start_dir() {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
    };
    dir.canonicalize()
        .map_err(|source| ConfigError::StartDir { path: dir, source })
}

fn write_snapshot(config: &Configuration, target: &str) {
    let Some(path) = config.snapshot_path() else {
        return;
    };
    let result = render_run(config, target).and_then(|contents| write_file(path, &contents));
    match result {
        Ok(()) => tracing::info!(
            parent: config.log().span(),
            path = %path.display(),
            "configuration written"
        ),
        Err(e) => tracing::warn!(
            parent: config.log().span(),
            error = %e,
            "could not write configuration snapshot"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::ConfigFile;
    use crate::config::root::ROOT_MARKER;
    use crate::context::RunMode;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A temp project with a root marker, and its canonical path.
    fn project() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::write(
            root.join(ROOT_MARKER),
            "[envelope]\ndt = 1e-9\n[simulator]\nthreads = 2\n",
        )
        .unwrap();
        (tmp, root)
    }

    fn request(root: &Path, target: &str) -> Request {
        Request::builder(target).start_dir(root).build()
    }

    #[test]
    fn test_target_file_overrides_root() {
        let (_tmp, root) = project();
        fs::write(root.join("run.toml"), "[envelope]\ndt = 2e-9\n").unwrap();

        let config = configure(&request(&root, "run")).unwrap();
        assert_eq!(config.envelope().dt, 2e-9);
        assert_eq!(config.options().threads, 2);

        let deeper = configure(&request(&root, "run/extra")).unwrap();
        assert_eq!(deeper.envelope().dt, 2e-9);
        assert_eq!(
            deeper.working_dir(),
            root.join("out").join("run").join("extra")
        );
    }

    #[test]
    fn test_start_below_root() {
        let (_tmp, root) = project();
        let sub = root.join("lib");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("the.toml"), "[simulator]\nthreads = 6\n").unwrap();

        let config = configure(&request(&sub, "cell")).unwrap();
        assert_eq!(config.options().threads, 6);
        assert_eq!(
            config.working_dir(),
            root.join("out").join("lib").join("cell")
        );
    }

    #[test]
    fn test_start_dir_with_parent_component_finds_real_root() {
        let (_tmp, root) = project();
        fs::create_dir_all(root.join("a").join("b")).unwrap();
        let start = root.join("a").join("b").join("..");

        let config = configure(&request(&start, "run")).unwrap();
        assert_eq!(config.options().threads, 2);
        assert!(!root.join("a").join(ROOT_MARKER).exists());
        assert_eq!(config.working_dir(), root.join("out").join("a").join("run"));
    }

    #[test]
    fn test_missing_start_dir_is_an_error() {
        let (_tmp, root) = project();
        let result = configure(&request(&root.join("absent"), "run"));
        assert!(matches!(result, Err(ConfigError::StartDir { .. })));
    }

    #[test]
    fn test_parent_target_rejected() {
        let (_tmp, root) = project();
        let result = configure(&request(&root, "a/../b"));
        assert!(matches!(result, Err(ConfigError::ParentTarget(_))));
    }

    #[test]
    fn test_output_root_override() {
        let (_tmp, root) = project();
        let scratch = TempDir::new().unwrap();
        let request = Request::builder("run")
            .start_dir(&root)
            .output_root(scratch.path())
            .build();

        let config = configure(&request).unwrap();
        assert_eq!(config.working_dir(), scratch.path().join("run"));
        assert!(!root.join("out").exists());
    }

    #[test]
    fn test_snapshot_written_and_rereadable() {
        let (_tmp, root) = project();
        fs::write(
            root.join("run.toml"),
            r#"
            [parameters.XJ]
            nominal = 1.2
            sigma = 0.1
            [parameters.K]
            nominal = 3.0
            include = false
            "#,
        )
        .unwrap();
        let request = Request::builder("run")
            .start_dir(&root)
            .mode(RunMode::Margins)
            .build();

        let config = configure(&request).unwrap();
        let path = root.join("out").join("run").join("config.m.toml");
        assert_eq!(config.snapshot_path(), Some(path.as_path()));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Resolved configuration for 'run'"));

        let reread = ConfigFile::parse(&path, &contents).unwrap();
        let params = reread.table()["parameters"].as_table().unwrap();
        assert_eq!(params["XJ"]["nominal"].as_float(), Some(1.2));
        assert_eq!(params["XJ"]["sigma"].as_float(), Some(0.1));
        assert_eq!(params["K"]["include"].as_bool(), Some(false));
    }

    #[test]
    fn test_partition_counts() {
        let (_tmp, root) = project();
        fs::write(
            root.join("run.toml"),
            r#"
            [parameters]
            VDD = 1.8
            [parameters.A]
            nominal = 1.0
            sigma = 0.1
            corners = true
            [parameters.B]
            nominal = 1.0
            sig_abs = 0.05
            [parameters.C]
            nominal = 1.0
            sigma = 0.2
            "#,
        )
        .unwrap();

        let config = configure(&request(&root, "run")).unwrap();
        assert_eq!(config.num_params(), 2);
        assert_eq!(config.num_params_corn(), 1);
        assert_eq!(config.num_params_all(), 4);
        let varied: Vec<&str> = config.varied_params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(varied, ["B", "C"]);
        assert_eq!(config.corner_params()[0].name, "A");
        assert_eq!(config.constant_params()[0].name, "VDD");
    }

    #[test]
    fn test_most_specific_input_file_wins() {
        let (_tmp, root) = project();
        fs::create_dir(root.join("run")).unwrap();
        fs::write(root.join("the.cir"), "* root\n").unwrap();
        fs::write(root.join("run.cir"), "* run\n").unwrap();
        fs::write(root.join("run").join("the.cir"), "* inner\n").unwrap();
        fs::write(root.join("the.param"), "").unwrap();

        let config = configure(&request(&root, "run")).unwrap();
        let files = config.file_names();
        assert_eq!(files.circuit, Some(root.join("run.cir")));
        assert_eq!(files.param, Some(root.join("the.param")));
        assert_eq!(files.passf, None);

        fs::remove_file(root.join("run.cir")).unwrap();
        let config = configure(&request(&root, "run")).unwrap();
        assert_eq!(
            config.file_names().circuit,
            Some(root.join("run").join("the.cir"))
        );
    }

    #[test]
    fn test_final_check_failure_is_an_error() {
        let (_tmp, root) = project();
        fs::write(root.join("run.toml"), "[yield]\nsearch_depth = 11\n").unwrap();

        let result = configure(&request(&root, "run"));
        assert!(matches!(result, Err(ConfigError::InvalidOption { .. })));
    }
}
