#[cfg(test)]
pub(crate) mod capture;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Error;

/// Installs the global subscriber, writing human-readable events to stderr.
///
/// `verbosity` 0 shows info and above for this crate, 1 adds debug, 2 or
/// more adds trace. `RUST_LOG` directives are honoured on top.
pub fn init_logging(verbosity: u8) -> Result<(), Error> {
    let directive = match verbosity {
        0 => "malt_config=info",
        1 => "malt_config=debug",
        _ => "malt_config=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .try_init()?;
    Ok(())
}
