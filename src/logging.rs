//! Logger setup for the command-line binary.
//!
//! The library only emits records through the `log` facade; the binary
//! installs `env_logger` here. `RUST_LOG` always wins over the verbosity
//! flag:
//!
//! ```no_run
//! datalens::logging::init(1); // info
//! log::info!("App started");
//! ```

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Maps the number of `-v` flags to a level: warn, info, then debug.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initializes the global logger. Calling it twice is a no-op.
pub fn init(verbosity: u8) {
    let default = level_for(verbosity).to_string().to_lowercase();
    let result = Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::debug!("Logging initialized at {}", level_for(verbosity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(5), LevelFilter::Debug);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}
