//! Process configuration read from the environment.

use std::env;
use std::time::Duration;

/// Listen address, e.g. `0.0.0.0:8080` or `:8080`.
pub const ENV_BIND_ADDR: &str = "APP_PORT";
/// Path of the SQLite database file.
pub const ENV_DB_PATH: &str = "DB_PATH";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PATH: &str = "university.db";

/// Longest a client may take to send a request body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Longest a request may take to produce its response.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
/// Time in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let mut bind_addr = read(ENV_BIND_ADDR, DEFAULT_BIND_ADDR);
        // ":8080" means every interface.
        if bind_addr.starts_with(':') {
            bind_addr.insert_str(0, "0.0.0.0");
        }

        Self {
            bind_addr,
            db_path: read(ENV_DB_PATH, DEFAULT_DB_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.db_path, "university.db");

        let blank = config_from(&[(ENV_BIND_ADDR, "  "), (ENV_DB_PATH, "")]);
        assert_eq!(blank, config);
    }

    #[test]
    fn test_port_only_binds_all_interfaces() {
        let config = config_from(&[(ENV_BIND_ADDR, ":9090")]);
        assert_eq!(config.bind_addr, "0.0.0.0:9090");

        let config = config_from(&[(ENV_BIND_ADDR, "127.0.0.1:3000"), (ENV_DB_PATH, ":memory:")]);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.db_path, ":memory:");
    }
}
