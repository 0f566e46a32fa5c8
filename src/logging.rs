//! Log setup for the binary. Everything goes to stderr.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUIRE_LOG";

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `-v` flags win over `QUIRE_LOG`; with neither, only warnings are shown.
pub fn init(verbosity: u8) {
    let filter = if verbosity > 0 {
        EnvFilter::new(level_for(verbosity))
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level_for(0)))
    };

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}
