//=========================================================================
// Logging
//=========================================================================
//
// Logger bootstrap for binaries and tests.
//
// The library itself only speaks the `log` facade; this module installs
// `env_logger` as the backend exactly once per process.
//
// Filter precedence: explicit config → RUST_LOG → info.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info"` or `"tempo_engine=debug,winit=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Config with an explicit filter string.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

//=== init_logging() ======================================================

static INIT: Once = Once::new();

/// Installs the global logger. Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style);

        // try_init: another backend may already be installed (e.g. by a test harness).
        if builder.try_init().is_ok() {
            log::debug!(target: "engine", "logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
