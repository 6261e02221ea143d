// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for the thaterror binaries.
//!
//! Logs go to stderr through a `tracing-subscriber` fmt layer. The filter is
//! taken from `THATERROR_LOG` when set, otherwise from the `-v` count, and
//! otherwise from the configured level.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding every other level setting.
pub const LOG_ENV: &str = "THATERROR_LOG";

/// Maps a `-v` count to a directive; 0 keeps the configured level.
pub fn verbosity_to_directive(verbosity: u8, configured: &str) -> &str {
    match verbosity {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Uses `try_init`, so repeated calls are harmless.
pub fn init(verbosity: u8, configured: &str) {
    let directive = verbosity_to_directive(verbosity, configured);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none())
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_directive() {
        assert_eq!(verbosity_to_directive(0, "warn"), "warn");
        assert_eq!(verbosity_to_directive(1, "warn"), "debug");
        assert_eq!(verbosity_to_directive(2, "warn"), "trace");
        assert_eq!(verbosity_to_directive(255, "info"), "trace");
    }

    #[test]
    fn test_init_twice() {
        init(0, "info");
        init(3, "info");
    }
}
