//! Logger setup
//!
//! `RUST_LOG` wins over the configured level when set.

use env_logger::{Builder, Env};

use crate::config::LoggingConfig;

/// Install the global logger. Later calls are ignored, so tests and embedding
/// applications may call this freely. Returns whether this call installed it.
pub fn init(config: &LoggingConfig) -> bool {
    Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        let config = LoggingConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
