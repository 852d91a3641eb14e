//! Logging setup
//!
//! Events go to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` overrides the level chosen from the command line, e.g.
//! `RUST_LOG=gbx=trace gbx candidates ...`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global subscriber.
///
/// Default level is `warn`; `verbose` raises this crate to `debug`.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,gbx=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initialise logging for tests, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
