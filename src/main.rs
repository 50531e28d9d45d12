//! Resolves and prints the configuration for one Malt run.

use std::path::PathBuf;

use clap::Parser;

use malt_config::logging::init_logging;
use malt_config::{configure, Configuration, Error, ParamRedeclare, Request, RunMode};

/// Resolve the hierarchical configuration for a Malt circuit-analysis run
#[derive(Parser, Debug)]
#[command(name = "malt-config")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run target, relative to the current directory (e.g. `filters/lowpass`)
    #[arg(default_value = "")]
    target: String,

    /// What the run is for; selects the snapshot file name
    #[arg(short, long, value_enum, default_value_t = RunMode::Define)]
    mode: RunMode,

    /// Increase log detail (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep intermediate simulator files
    #[arg(short, long)]
    keep_files: bool,

    /// Root of the working tree instead of `<project root>/out`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Directory to start the root search from instead of the current one
    #[arg(short = 'C', long)]
    start_dir: Option<PathBuf>,

    /// Reset a parameter declared again by a later file instead of overlaying it
    #[arg(long)]
    reset_redeclared: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut builder = Request::builder(cli.target)
        .mode(cli.mode)
        .verbosity(cli.verbose)
        .keep_files(cli.keep_files);
    if let Some(out) = &cli.out {
        builder = builder.output_root(out);
    }
    if let Some(dir) = &cli.start_dir {
        builder = builder.start_dir(dir);
    }
    if cli.reset_redeclared {
        builder = builder.redeclare(ParamRedeclare::Reset);
    }

    let config = configure(&builder.build())?;
    print_summary(&config);
    Ok(())
}

fn print_summary(config: &Configuration) {
    let files = config.file_names();
    for (label, path) in [
        ("circuit", &files.circuit),
        ("parameters", &files.param),
        ("passfail", &files.passf),
        ("envelope", &files.envelope),
        ("env_call", &files.env_call),
        ("config", &files.config),
    ] {
        match path {
            Some(path) => println!("{label:<11} {}", path.display()),
            None => println!("{label:<11} -"),
        }
    }
    println!("working     {}", config.working_dir().display());
    println!(
        "parameters  {} varied, {} corner, {} total",
        config.num_params(),
        config.num_params_corn(),
        config.num_params_all()
    );
    println!("nodes       {}", config.nodes().len());
    println!("2D sweeps   {}", config.sweeps().len());
}
