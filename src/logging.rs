//! Logger setup for the command-line tool
//!
//! The library itself only emits records through the `log` facade.

use chrono::Local;
use log::LevelFilter;
use std::io::Write;

/// Initialise `env_logger`.
///
/// `RUST_LOG` is honoured when set; otherwise the level is `debug` for
/// `verbose` runs and `info` otherwise.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(default_level);

    // repeated initialisation is ignored
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
    log::debug!("Logger initialized (level: {level})");
}
