//! Logging setup for the packfuse binary.
//!
//! Library code only emits `tracing` events; the binary installs a
//! `tracing-subscriber` formatter writing to stderr so stdout stays free for
//! command output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "PACKFUSE_LOG";

/// Default directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Pick the filter directive: a non-empty `PACKFUSE_LOG` wins over `-v`.
pub fn filter_directive(verbosity: u8, env_value: Option<&str>) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => level_for_verbosity(verbosity).to_string(),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(verbosity, env_value.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
