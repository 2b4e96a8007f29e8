//! Logging configuration module
//!
//! Provides configurable JSON/Pretty logging output
//!
//! # Usage
//! ```no_run
//! use dca_pool::config::logging::init_logging;
//! init_logging();
//! ```
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `json` (default) or `pretty`
//! - `RUST_LOG`: Log level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Output formats understood by `init_logging`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything but `pretty` means JSON
    pub fn parse(value: &str) -> Self {
        if value == "pretty" {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }

    /// Read `LOG_FORMAT` from the environment
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or(LogFormat::Json)
    }
}

/// Initialize logging with configurable format
///
/// Reads `LOG_FORMAT` from environment:
/// - `json` (default): Machine-parseable JSON output for production
/// - `pretty`: Human-readable output for development
///
/// Also respects `RUST_LOG` for log level filtering (default: `info`)
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    // tracing_subscriber can only be initialized once per process, so only
    // the format selection is tested here.
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_pretty_format_detection() {
        let test_cases = vec![
            ("pretty", LogFormat::Pretty),
            ("json", LogFormat::Json),
            ("PRETTY", LogFormat::Json), // Case sensitive
            ("", LogFormat::Json),
            ("other", LogFormat::Json),
        ];

        for (input, expected) in test_cases {
            assert_eq!(LogFormat::parse(input), expected, "Failed for input: {}", input);
        }
    }

    #[test]
    #[serial]
    fn test_log_format_default_is_json() {
        std::env::remove_var("LOG_FORMAT");
        assert_eq!(LogFormat::from_env(), LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_log_format_env_pretty() {
        std::env::set_var("LOG_FORMAT", "pretty");
        assert_eq!(LogFormat::from_env(), LogFormat::Pretty);
        std::env::remove_var("LOG_FORMAT");
    }
}
