//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use log::LevelFilter;

/// Initialize the logging system at `info` level
///
/// `RUST_LOG` still takes precedence when set.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Initialize the logging system with a default level filter
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init_with_level(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_env("RUST_LOG");
    // A second init (tests, embedding) keeps the logger that is already there.
    let _ = builder.try_init();
}

/// Parse a level name such as `"debug"` or `"warn"`
///
/// Unknown names fall back to `info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
