//! TOML rendering of a configuration in the same schema the files are read in.
//!
//! Reading a rendered snapshot back as a root marker reproduces the
//! configuration it was rendered from.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Serialize, Serializer};

use super::builder::Builder;
use super::configuration::Configuration;
use super::entity::{Node, Param, Sweep};
use super::types::{Envelope, Extensions, Options};
use super::ConfigError;

/// Borrowed view of everything a snapshot records.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    envelope: &'a Envelope,
    extensions: &'a Extensions,
    options: &'a Options,
    nodes: &'a [Node],
    params: &'a [Param],
    sweeps: &'a [Sweep],
}

impl<'a> Snapshot<'a> {
    /// The state accumulated so far, e.g. built-in defaults for a fresh root marker.
    pub fn from_builder(builder: &'a Builder) -> Self {
        Self {
            envelope: &builder.envelope,
            extensions: &builder.extensions,
            options: &builder.options,
            nodes: builder.nodes.as_slice(),
            params: builder.params.as_slice(),
            sweeps: &builder.sweeps,
        }
    }

    pub fn from_configuration(config: &'a Configuration) -> Self {
        Self {
            envelope: &config.envelope,
            extensions: &config.extensions,
            options: &config.options,
            nodes: &config.nodes,
            params: &config.params,
            sweeps: &config.sweeps,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(&self.document())?)
    }

    fn document(&self) -> Document<'a> {
        let o = self.options;
        let e = self.extensions;
        Document {
            print_terminal: o.print_terminal,
            binsearch_accuracy: o.binsearch_accuracy,
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeEntry::new(node, self.envelope))
                .collect(),
            simulator: Simulator {
                command: &o.spice_call_name,
                verbose: o.spice_verbose,
                threads: o.threads,
                max_subprocesses: o.max_subprocesses,
            },
            envelope: EnvelopeSection {
                dt: self.envelope.dt,
                dx: self.envelope.dx,
                units: &self.envelope.units,
            },
            extensions: ExtensionsSection {
                circuit: &e.circuit,
                parameters: &e.param,
                passfail: &e.passf,
                envelope: &e.envelope,
                plot: &e.plot,
                env_call: &e.env_call,
            },
            define: Define {
                simulate: o.d_simulate,
                envelope: o.d_envelope,
            },
            yield_options: YieldSection {
                search_depth: o.y_search_depth,
                search_width: o.y_search_width,
                search_steps: o.y_search_steps,
                max_mem_k: o.y_max_mem_k,
                accuracy: o.y_accuracy,
                print_every: o.y_print_every,
            },
            optimize: Optimize {
                min_iter: o.o_min_iter,
                max_mem_k: o.o_max_mem_k,
            },
            xy: Xy {
                iterations: o.xy_iter,
                sweeps: self.sweeps,
            },
            parameters: Parameters(self.params),
        }
    }
}

/// Renders `config` with a comment header naming the run and its input files.
pub fn render_run(config: &Configuration, target: &str) -> Result<String, ConfigError> {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Resolved configuration for '{target}' (mode {})", config.mode);
    let files = &config.file_names;
    for (label, path) in [
        ("circuit", &files.circuit),
        ("parameters", &files.param),
        ("passfail", &files.passf),
        ("envelope", &files.envelope),
        ("env_call", &files.env_call),
    ] {
        if let Some(path) = path {
            let _ = writeln!(out, "# {label} file: {}", path.display());
        }
    }
    out.push('\n');
    out.push_str(&Snapshot::from_configuration(config).to_toml_string()?);
    Ok(out)
}

/// Writes `contents` to `path`, replacing any existing file.
pub fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[derive(Serialize)]
struct Document<'a> {
    print_terminal: bool,
    binsearch_accuracy: f64,
    nodes: Vec<NodeEntry<'a>>,
    simulator: Simulator<'a>,
    envelope: EnvelopeSection<'a>,
    extensions: ExtensionsSection<'a>,
    define: Define,
    #[serde(rename = "yield")]
    yield_options: YieldSection,
    optimize: Optimize,
    xy: Xy<'a>,
    parameters: Parameters<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum NodeEntry<'a> {
    Name(&'a str),
    Table {
        name: &'a str,
        dt: f64,
        dx: f64,
        units: &'a str,
    },
}

impl<'a> NodeEntry<'a> {
    fn new(node: &'a Node, envelope: &Envelope) -> Self {
        if node.dt == envelope.dt && node.dx == envelope.dx && node.units == envelope.units {
            NodeEntry::Name(&node.name)
        } else {
            NodeEntry::Table {
                name: &node.name,
                dt: node.dt,
                dx: node.dx,
                units: &node.units,
            }
        }
    }
}

#[derive(Serialize)]
struct Simulator<'a> {
    command: &'a str,
    verbose: bool,
    threads: i64,
    max_subprocesses: i64,
}

#[derive(Serialize)]
struct EnvelopeSection<'a> {
    dt: f64,
    dx: f64,
    units: &'a str,
}

#[derive(Serialize)]
struct ExtensionsSection<'a> {
    circuit: &'a str,
    parameters: &'a str,
    passfail: &'a str,
    envelope: &'a str,
    plot: &'a str,
    env_call: &'a str,
}

#[derive(Serialize)]
struct Define {
    simulate: bool,
    envelope: bool,
}

#[derive(Serialize)]
struct YieldSection {
    search_depth: i64,
    search_width: i64,
    search_steps: i64,
    max_mem_k: i64,
    accuracy: f64,
    print_every: i64,
}

#[derive(Serialize)]
struct Optimize {
    min_iter: i64,
    max_mem_k: i64,
}

#[derive(Serialize)]
struct Xy<'a> {
    iterations: i64,
    sweeps: &'a [Sweep],
}

/// Parameters keyed by name, in collection order.
struct Parameters<'a>(&'a [Param]);

impl Serialize for Parameters<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|p| (p.name.as_str(), ParamEntry::new(p))))
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ParamEntry {
    Constant(f64),
    Table(ParamTable),
}

#[derive(Serialize)]
struct ParamTable {
    nominal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sig_abs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nom_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nom_max: Option<f64>,
    #[serde(rename = "static")]
    staticc: bool,
    include: bool,
    logs: bool,
    corners: bool,
}

impl ParamEntry {
    fn new(p: &Param) -> Self {
        if p.is_constant() {
            return ParamEntry::Constant(p.nominal);
        }
        let nonzero = |v: f64| (v != 0.0).then_some(v);
        let (sigma, sig_abs) = if p.include {
            // exactly one is written; finalization guarantees one is non-zero
            match nonzero(p.sigma) {
                Some(sigma) => (Some(sigma), None),
                None => (None, Some(p.sigabs)),
            }
        } else {
            (nonzero(p.sigma), nonzero(p.sigabs))
        };
        ParamEntry::Table(ParamTable {
            nominal: p.nominal,
            sigma,
            sig_abs,
            min: p.top_min.then_some(p.min),
            max: p.top_max.then_some(p.max),
            nom_min: p.is_nom_min.then_some(p.nom_min),
            nom_max: p.is_nom_max.then_some(p.nom_max),
            staticc: p.staticc,
            include: p.include,
            logs: p.logs,
            corners: p.corners,
        })
    }
}
