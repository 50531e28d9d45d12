//! Find-or-append merging of nodes, parameters and 2D sweeps.
//!
//! Node and sweep lists are all-or-nothing: a source that declares the list
//! replaces whatever earlier sources declared. Parameters merge by name, one
//! key of `[parameters]` at a time.

use toml::{Table, Value};

use super::entity::{EntitySet, Node, Param, Sweep};
use super::file::ConfigFile;
use super::read::{as_number, lookup, read_bool, read_double, read_string};
use super::types::Envelope;
use super::ConfigError;
use crate::context::{Log, ParamRedeclare};

/// Applies the `[envelope]` section. Returns whether the section was present.
pub fn read_envelope(envelope: &mut Envelope, table: &Table) -> bool {
    if !matches!(table.get("envelope"), Some(Value::Table(_))) {
        return false;
    }
    read_double(&mut envelope.dt, table, Some("envelope"), "dt");
    read_double(&mut envelope.dx, table, Some("envelope"), "dx");
    read_string(&mut envelope.units, table, Some("envelope"), "units");
    true
}

/// Reads the top-level `nodes` list, replacing `nodes` when it is present.
///
/// String elements take the current `envelope`; table elements may override
/// `dt`, `dx` and `units` per node. `envelope_set` says whether this source or
/// an earlier one provided an `[envelope]`, which a nodes list requires.
///
/// Returns the number of nodes read.
pub fn read_nodes(
    nodes: &mut EntitySet<Node>,
    envelope: &Envelope,
    envelope_set: bool,
    file: &ConfigFile,
    log: &Log,
) -> Result<usize, ConfigError> {
    let list = match file.table().get("nodes") {
        None => return Ok(0),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(ConfigError::NotAnArray {
                path: file.path().to_path_buf(),
                key: "nodes",
            })
        }
    };
    if !envelope_set {
        return Err(ConfigError::NodesWithoutEnvelope {
            path: file.path().to_path_buf(),
        });
    }

    let mut replacement = EntitySet::new();
    for (index, element) in list.iter().enumerate() {
        let node = match element {
            Value::String(name) => Node {
                name: name.clone(),
                units: envelope.units.clone(),
                dt: envelope.dt,
                dx: envelope.dx,
            },
            Value::Table(fields) => node_from_table(fields, envelope, index, file)?,
            _ => {
                return Err(invalid_node(file, index, "neither a string nor a table"));
            }
        };
        if let Some(previous) = replacement.upsert(node) {
            tracing::warn!(
                parent: log.span(),
                path = %file.path().display(),
                node = %previous.name,
                "node listed twice; keeping the later entry"
            );
        }
    }

    if !nodes.is_empty() {
        tracing::warn!(
            parent: log.span(),
            path = %file.path().display(),
            discarded = nodes.len(),
            "overwriting previously configured node list"
        );
    }
    let count = replacement.len();
    *nodes = replacement;
    Ok(count)
}

fn node_from_table(
    fields: &Table,
    envelope: &Envelope,
    index: usize,
    file: &ConfigFile,
) -> Result<Node, ConfigError> {
    let mut node = Node {
        name: String::new(),
        units: envelope.units.clone(),
        dt: envelope.dt,
        dx: envelope.dx,
    };
    if !read_string(&mut node.name, fields, None, "name") || node.name.is_empty() {
        return Err(invalid_node(file, index, "table form requires a name"));
    }
    read_double(&mut node.dt, fields, None, "dt");
    read_double(&mut node.dx, fields, None, "dx");
    read_string(&mut node.units, fields, None, "units");
    if node.dt <= 0.0 || node.dx <= 0.0 {
        return Err(invalid_node(file, index, "dt and dx must be positive"));
    }
    Ok(node)
}

fn invalid_node(file: &ConfigFile, index: usize, reason: &str) -> ConfigError {
    ConfigError::InvalidNode {
        path: file.path().to_path_buf(),
        index,
        reason: reason.to_owned(),
    }
}

/// Merges the `[parameters]` table into `params`.
///
/// A bare number declares a nominal-only constant. A table declares a full
/// parameter; while it stays included it must give `nominal` and exactly one
/// of `sigma` / `sig_abs`.
///
/// Returns the number of parameters declared by this source.
pub fn read_parameters(
    params: &mut EntitySet<Param>,
    policy: ParamRedeclare,
    file: &ConfigFile,
    log: &Log,
) -> Result<usize, ConfigError> {
    let Some(Value::Table(parameters)) = file.table().get("parameters") else {
        tracing::debug!(
            parent: log.span(),
            path = %file.path().display(),
            "no [parameters] in config file"
        );
        return Ok(0);
    };

    for (name, value) in parameters {
        let (param, created) = params.find_or_insert_with(name, || Param::named(name.as_str()));
        if !created && policy == ParamRedeclare::Reset {
            *param = Param::named(name.as_str());
        }

        if let Some(nominal) = as_number(value) {
            param.make_constant(nominal);
            continue;
        }
        let Value::Table(fields) = value else {
            return Err(ConfigError::ParameterNotTable {
                path: file.path().to_path_buf(),
                name: name.clone(),
            });
        };
        apply_param_fields(param, fields, file)?;
    }
    Ok(parameters.len())
}

fn apply_param_fields(param: &mut Param, fields: &Table, file: &ConfigFile) -> Result<(), ConfigError> {
    read_bool(&mut param.staticc, fields, None, "static");
    read_bool(&mut param.include, fields, None, "include");
    read_bool(&mut param.logs, fields, None, "logs");
    read_bool(&mut param.corners, fields, None, "corners");

    if !read_double(&mut param.nominal, fields, None, "nominal") && param.include {
        return Err(ConfigError::MissingNominal {
            path: file.path().to_path_buf(),
            name: param.name.clone(),
        });
    }

    let sigma = lookup(fields, None, "sigma").and_then(as_number);
    let sigabs = lookup(fields, None, "sig_abs").and_then(as_number);
    match (sigma, sigabs) {
        (Some(sigma), None) => {
            param.sigma = sigma;
            param.sigabs = 0.0;
        }
        (None, Some(sigabs)) => {
            param.sigma = 0.0;
            param.sigabs = sigabs;
        }
        (Some(sigma), Some(sigabs)) if !param.include => {
            param.sigma = sigma;
            param.sigabs = sigabs;
        }
        (None, None) if !param.include => {}
        _ => {
            return Err(ConfigError::SigmaChoice {
                path: file.path().to_path_buf(),
                name: param.name.clone(),
            });
        }
    }

    param.top_min |= read_double(&mut param.min, fields, None, "min");
    param.top_max |= read_double(&mut param.max, fields, None, "max");
    param.is_nom_min |= read_double(&mut param.nom_min, fields, None, "nom_min");
    param.is_nom_max |= read_double(&mut param.nom_max, fields, None, "nom_max");
    Ok(())
}

/// Reads `[xy].sweeps`, replacing `sweeps` when it is present.
///
/// Returns the number of sweeps read.
pub fn read_sweeps(sweeps: &mut Vec<Sweep>, file: &ConfigFile, log: &Log) -> Result<usize, ConfigError> {
    let list = match lookup(file.table(), Some("xy"), "sweeps") {
        None => return Ok(0),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(ConfigError::NotAnArray {
                path: file.path().to_path_buf(),
                key: "xy.sweeps",
            })
        }
    };

    let mut replacement = Vec::with_capacity(list.len());
    for (index, element) in list.iter().enumerate() {
        let Value::Table(sweep) = element else {
            return Err(invalid_sweep(file, index, "not a table"));
        };
        let (mut x, mut y) = (String::new(), String::new());
        if !(read_string(&mut x, sweep, None, "x") && read_string(&mut y, sweep, None, "y")) {
            return Err(invalid_sweep(file, index, "must define both x and y parameters"));
        }
        replacement.push(Sweep { x, y });
    }

    if !sweeps.is_empty() {
        tracing::warn!(
            parent: log.span(),
            path = %file.path().display(),
            discarded = sweeps.len(),
            "overwriting previously configured 2D sweeps"
        );
    }
    *sweeps = replacement;
    Ok(sweeps.len())
}

fn invalid_sweep(file: &ConfigFile, index: usize, reason: &str) -> ConfigError {
    ConfigError::InvalidSweep {
        path: file.path().to_path_buf(),
        index,
        reason: reason.to_owned(),
    }
}
