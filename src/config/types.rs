use std::path::PathBuf;

use super::ConfigError;

/// Envelope defaults inherited by nodes declared as bare names.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub units: String,
    pub dt: f64,
    pub dx: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            units: "V".to_owned(),
            dt: 100e-12,
            dx: 1.0,
        }
    }
}

/// File extensions used to find input files and to strip target suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    pub circuit: String,
    pub param: String,
    pub passf: String,
    pub envelope: String,
    pub config: String,
    pub plot: String,
    pub env_call: String,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            circuit: ".cir".to_owned(),
            param: ".param".to_owned(),
            passf: ".passf".to_owned(),
            envelope: ".envelope".to_owned(),
            config: ".toml".to_owned(),
            plot: ".plot".to_owned(),
            env_call: ".env_call".to_owned(),
        }
    }
}

/// Numeric and boolean run options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Fraction of sigma.
    pub binsearch_accuracy: f64,
    pub spice_call_name: String,
    pub spice_verbose: bool,
    pub threads: i64,
    /// 0 means unlimited.
    pub max_subprocesses: i64,
    pub print_terminal: bool,

    pub d_simulate: bool,
    pub d_envelope: bool,

    pub xy_iter: i64,

    pub y_search_depth: i64,
    pub y_search_width: i64,
    pub y_search_steps: i64,
    pub y_max_mem_k: i64,
    pub y_accuracy: f64,
    pub y_print_every: i64,

    pub o_min_iter: i64,
    pub o_max_mem_k: i64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            binsearch_accuracy: 0.1,
            spice_call_name: "wrspice".to_owned(),
            spice_verbose: false,
            threads: 16,
            max_subprocesses: 0,
            print_terminal: true,
            d_simulate: true,
            d_envelope: true,
            xy_iter: 16,
            y_search_depth: 5,
            y_search_width: 5,
            y_search_steps: 12,
            y_max_mem_k: 4_194_304,
            y_accuracy: 10.0,
            y_print_every: 0,
            o_min_iter: 100,
            o_max_mem_k: 4_194_304,
        }
    }
}

impl Options {
    /// Range checks that only make sense once every source has been applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(self.threads >= 1, "threads", "must be at least 1")?;
        check(
            self.max_subprocesses >= 0,
            "max_subprocesses",
            "must not be negative (0 means unlimited)",
        )?;
        check(
            self.binsearch_accuracy > 0.0,
            "binsearch_accuracy",
            "must be positive",
        )?;
        check(self.xy_iter >= 1, "xy.iterations", "must be at least 1")?;
        check(
            (0..=10).contains(&self.y_search_depth),
            "yield.search_depth",
            "must be within 0..=10",
        )?;
        check(
            (0..=9).contains(&self.y_search_width),
            "yield.search_width",
            "must be within 0..=9",
        )?;
        check(
            (1..=40).contains(&self.y_search_steps),
            "yield.search_steps",
            "must be within 1..=40",
        )?;
        check(self.y_max_mem_k > 0, "yield.max_mem_k", "must be positive")?;
        check(self.y_print_every >= 0, "yield.print_every", "must not be negative")?;
        check(self.o_min_iter >= 0, "optimize.min_iter", "must not be negative")?;
        check(self.o_max_mem_k > 0, "optimize.max_mem_k", "must be positive")?;
        Ok(())
    }
}

impl Envelope {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(self.dt > 0.0, "envelope.dt", "must be positive")?;
        check(self.dx > 0.0, "envelope.dx", "must be positive")
    }
}

fn check(ok: bool, key: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidOption {
            key,
            reason: reason.to_owned(),
        })
    }
}

/// Input files found for this run, plus where the snapshot goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNames {
    pub circuit: Option<PathBuf>,
    pub param: Option<PathBuf>,
    pub passf: Option<PathBuf>,
    pub envelope: Option<PathBuf>,
    pub env_call: Option<PathBuf>,
    pub config: Option<PathBuf>,
}
