//! Diagnostic logging for the command-line tool.
//!
//! Library code only emits `tracing` events; the binary decides where
//! they go. Output is written to stderr so stdout stays clean for the
//! rendered graph.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Returns the default filter directive for a verbosity count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "interview_graph=info",
        2 => "interview_graph=debug",
        _ => "interview_graph=trace",
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter comes from `verbose`
/// (`-v` info, `-vv` debug, `-vvv` trace).
///
/// # Example
/// ```bash
/// RUST_LOG=interview_graph=trace interview-graph render interview.json
/// ```
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
