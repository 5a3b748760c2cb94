//! Tracing initialization
//!
//! Log output goes to stderr so command output on stdout stays clean.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `finance_tracker=debug`
pub const LOG_ENV: &str = "FINTRACK_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber
///
/// `FINTRACK_LOG` wins when set. Otherwise the level is `warn`, or `debug`
/// for this crate when `verbose` is true. Calling this more than once is a
/// no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("warn,finance_tracker=debug")
            } else {
                EnvFilter::new("warn")
            }
        });

        // Another subscriber may already be installed by an embedding program.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
