use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean. `RUST_LOG` wins over the configured level.
///
/// Calling it again is a no-op.
pub fn init_tracing(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    // An already-installed subscriber (tests, embedding apps) is fine.
    let _ = Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
    }

    #[test]
    fn bad_level_falls_back() {
        init_tracing(&LogConfig {
            log_level: "not a [filter".to_string(),
        });
    }
}
