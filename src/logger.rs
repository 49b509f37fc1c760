//! Logging setup.
//!
//! Diagnostics go to stderr through `env_logger`, leaving stdout for the
//! user-facing notices. The level comes from the `-v` count only.

use log::LevelFilter;

/// Maps a `-v` repetition count to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the logger. Calling this more than once is a no-op.
pub fn init(verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for_verbosity(verbose))
        .format_timestamp_millis()
        .format_target(false)
        .try_init();
}
