//! Log setup. Everything goes to stderr so stdout stays parseable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter for a `-v` count, used when `RUST_LOG` is not set.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let ansi = console::Term::stderr().features().colors_supported();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(verbose > 2);

    // A subscriber may already be set when embedded in tests
    let _ = tracing_subscriber::registry().with(layer).with(filter).try_init();
}
