//! `tracing-subscriber` setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used as the filter.
/// Calling this twice is harmless.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter for a `0..=2` debug level: warnings only, run progress, or
/// progress plus a grid dump after every step.
pub fn debug_level_filter(level: u8) -> &'static str {
    match level {
        0 => "warn",
        1 => "info",
        _ => "info,blockgrid::dump=debug",
    }
}
