//! Allow-lists for every table a configuration file may contain.

use std::path::Path;

use toml::{Table, Value};

use super::ConfigError;
use crate::context::Log;

/// Plain keys allowed at the top of a document.
pub const TOP_LEVEL_KEYS: &[&str] = &["print_terminal", "binsearch_accuracy", "nodes"];

/// Known sections and the keys each one accepts.
///
/// `[parameters]` holds user-chosen names, so its keys are checked one level
/// further down against [`PARAMETER_KEYS`].
pub const SECTIONS: &[(&str, &[&str])] = &[
    (
        "simulator",
        &["command", "verbose", "threads", "max_subprocesses"],
    ),
    ("parameters", &[]),
    ("envelope", &["dt", "dx", "units"]),
    (
        "extensions",
        &["circuit", "parameters", "passfail", "envelope", "plot", "env_call"],
    ),
    ("define", &["simulate", "envelope"]),
    (
        "yield",
        &[
            "search_depth",
            "search_width",
            "search_steps",
            "max_mem_k",
            "accuracy",
            "print_every",
        ],
    ),
    ("optimize", &["min_iter", "max_mem_k"]),
    ("xy", &["sweeps", "iterations"]),
];

pub const PARAMETER_KEYS: &[&str] = &[
    "nominal", "sigma", "sig_abs", "min", "max", "nom_min", "nom_max", "static", "include",
    "logs", "corners",
];

pub const NODE_KEYS: &[&str] = &["name", "dt", "dx", "units"];

pub const SWEEP_KEYS: &[&str] = &["x", "y"];

/// Validates a whole document.
///
/// An unknown top-level table is fatal, since it most likely means the file
/// was written for something else. Unknown keys anywhere else are logged and
/// ignored.
pub fn check_document(table: &Table, path: &Path, log: &Log) -> Result<(), ConfigError> {
    for (key, value) in table {
        if TOP_LEVEL_KEYS.contains(&key.as_str()) {
            continue;
        }
        match (section_keys(key), value) {
            (Some(allowed), Value::Table(section)) => {
                if key == "parameters" {
                    check_parameters(section, path, log);
                } else {
                    check_keys(section, allowed, key, path, log);
                }
            }
            (Some(_), _) => {
                tracing::warn!(
                    parent: log.span(),
                    path = %path.display(),
                    section = %key,
                    "expected a table; ignoring"
                );
            }
            (None, value) if is_section(value) => {
                return Err(ConfigError::UnknownSection {
                    path: path.to_path_buf(),
                    section: key.clone(),
                });
            }
            (None, _) => warn_unknown(key, "top level", path, log),
        }
    }

    if let Some(Value::Array(nodes)) = table.get("nodes") {
        for node in nodes.iter().filter_map(Value::as_table) {
            check_keys(node, NODE_KEYS, "nodes", path, log);
        }
    }
    if let Some(Value::Array(sweeps)) = table.get("xy").and_then(|xy| xy.get("sweeps")) {
        for sweep in sweeps.iter().filter_map(Value::as_table) {
            check_keys(sweep, SWEEP_KEYS, "xy.sweeps", path, log);
        }
    }

    Ok(())
}

/// Warns about every key of `table` not in `allowed`. Returns how many were found.
pub fn check_keys(table: &Table, allowed: &[&str], context: &str, path: &Path, log: &Log) -> usize {
    let mut unknown = 0;
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            warn_unknown(key, context, path, log);
            unknown += 1;
        }
    }
    unknown
}

fn check_parameters(parameters: &Table, path: &Path, log: &Log) {
    for (name, value) in parameters {
        if let Value::Table(fields) = value {
            check_keys(fields, PARAMETER_KEYS, &format!("parameters.{name}"), path, log);
        }
    }
}

/// A `[table]`, or an `[[array]]` of tables.
fn is_section(value: &Value) -> bool {
    match value {
        Value::Table(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_table),
        _ => false,
    }
}

fn section_keys(name: &str) -> Option<&'static [&'static str]> {
    SECTIONS
        .iter()
        .find(|(section, _)| *section == name)
        .map(|(_, keys)| *keys)
}

fn warn_unknown(key: &str, context: &str, path: &Path, log: &Log) {
    tracing::warn!(
        parent: log.span(),
        path = %path.display(),
        key,
        context,
        "unknown key ignored"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Request;
    use crate::logging::capture::capture;

    fn make_table(toml_str: &str) -> Table {
        toml::from_str(toml_str).unwrap()
    }

    fn log() -> Log {
        Log::new(&Request::builder("t").build())
    }

    #[test]
    fn test_known_document_passes() {
        let table = make_table(
            r#"
            print_terminal = true
            nodes = ["a", { name = "b", dt = 1e-12 }]

            [simulator]
            threads = 4

            [envelope]
            dt = 1e-9
            dx = 1.0

            [parameters.XJ]
            nominal = 1.0
            sigma = 0.05

            [xy]
            sweeps = [{ x = "XJ", y = "XL" }]
            "#,
        );
        assert!(check_document(&table, Path::new("Malt.toml"), &log()).is_ok());
    }

    #[test]
    fn test_unknown_section_is_fatal() {
        let table = make_table(
            r#"
            [margins]
            step = 3
            "#,
        );
        let result = check_document(&table, Path::new("Malt.toml"), &log());
        assert!(matches!(
            result,
            Err(ConfigError::UnknownSection { ref section, .. }) if section == "margins"
        ));
    }

    #[test]
    fn test_unknown_array_of_tables_is_fatal() {
        let table = make_table(
            r#"
            [[margins]]
            step = 3
            "#,
        );
        let result = check_document(&table, Path::new("Malt.toml"), &log());
        assert!(matches!(
            result,
            Err(ConfigError::UnknownSection { ref section, .. }) if section == "margins"
        ));
    }

    #[test]
    fn test_unknown_scalar_array_only_warns() {
        let table = make_table("tags = [\"a\", \"b\"]\nempty = []\n");
        assert!(check_document(&table, Path::new("run.toml"), &log()).is_ok());
    }

    #[test]
    fn test_unknown_keys_only_warn() {
        let table = make_table(
            r#"
            colour = "blue"

            [yield]
            search_depth = 3
            serch_width = 4

            [parameters.XJ]
            nominal = 1.0
            sigma = 0.1
            sigma_pct = 5
            "#,
        );
        assert!(check_document(&table, Path::new("run.toml"), &log()).is_ok());
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let table = make_table(
            r#"
            colour = "blue"
            [yield]
            serch_width = 4
            [parameters.XJ]
            nominal = 1.0
            sigma = 0.1
            sigma_pct = 5
            "#,
        );
        let (result, output) = capture(|| check_document(&table, Path::new("run.toml"), &log()));
        assert!(result.is_ok());
        assert_eq!(output.matches("unknown key ignored").count(), 3);
        for key in ["colour", "serch_width", "sigma_pct"] {
            assert!(output.contains(key), "{key} not reported in {output}");
        }
    }

    #[test]
    fn test_known_keys_are_silent() {
        let table = make_table("[envelope]\ndt = 1e-9\n[simulator]\nthreads = 2\n");
        let (result, output) = capture(|| check_document(&table, Path::new("run.toml"), &log()));
        assert!(result.is_ok());
        assert!(!output.contains("unknown key ignored"));
    }

    #[test]
    fn test_check_keys_counts_unknown() {
        let table = make_table(
            r#"
            x = "A"
            y = "B"
            z = "C"
            "#,
        );
        let count = check_keys(&table, SWEEP_KEYS, "xy.sweeps", Path::new("f"), &log());
        assert_eq!(count, 1);
    }
}
