//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber on stderr.
///
/// `RUST_LOG` wins over the configured filter; an unparseable configured
/// filter falls back to `info`.
pub fn init(configured_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Ignore a second init (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
