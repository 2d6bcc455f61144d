//! Diagnostic logging for the CLI.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or the
/// dimcheck crates at debug level with `--verbose`. Repeat calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,dimcheck_catalog=debug,dimcheck_http=debug,dimcheck=debug")
    } else {
        EnvFilter::new("warn")
    }
}
