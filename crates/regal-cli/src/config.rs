//! Shell configuration loaded from environment variables.
//!
//! All settings have usable defaults; override any variable at process
//! startup — no config file required.
//!
//! | Variable          | Default | Description                                  |
//! |-------------------|---------|----------------------------------------------|
//! | `REGAL_LOG_LEVEL` | `info`  | tracing filter (trace/debug/info/warn/error) |
//! | `REGAL_DATABASE`  | unset   | database file preloaded before the loop      |

/// Runtime configuration for the RegalDB shell process.
#[derive(Debug)]
pub struct Config {
    /// Tracing filter string, e.g. `"regal=debug,info"`.
    pub log_level: String,

    /// Database file to preload, if any.
    pub database: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, applying defaults where
    /// a variable is absent.
    pub fn from_env() -> Self {
        Self {
            log_level: env_str("REGAL_LOG_LEVEL", "info"),
            database:  std::env::var("REGAL_DATABASE").ok().filter(|v| !v.is_empty()),
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::from_env();
        assert!(!cfg.log_level.is_empty());
    }

    #[test]
    fn env_override_applied() {
        std::env::set_var("REGAL_LOG_LEVEL", "debug");
        std::env::set_var("REGAL_DATABASE", "/tmp/catalog.db");
        let cfg = Config::from_env();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.database.as_deref(), Some("/tmp/catalog.db"));
        std::env::remove_var("REGAL_LOG_LEVEL");
        std::env::remove_var("REGAL_DATABASE");
    }
}
