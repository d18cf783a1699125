//! Diagnostics via **tracing**.
//!
//! Everything goes to stderr: stdout carries only the generated header, so the
//! two streams never mix. The default format is compact and human-readable;
//! JSON lines are available for machine consumption.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Subscriber options chosen by the front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Log every file and name visited during the scan.
    pub debug: bool,
    /// Emit JSON lines instead of the compact text format.
    pub json: bool,
}

impl LogOptions {
    /// Level used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// Call *once* at startup. A second call is ignored rather than panicking.
///
/// # Environment Variables
/// - `RUST_LOG`: Overrides the level chosen by [`LogOptions`] (e.g. `RUST_LOG=shimgen_core=trace`)
pub fn init_logging(options: LogOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let result = if options.json {
        tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .compact()
            .without_time()
            .with_target(false)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("[WARN] logging already initialized: {}", e);
    }
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}
