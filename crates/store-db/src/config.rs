//! Store configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default    |
//! |---------------------------------|------------|
//! | `STORE_DATABASE_PATH`           | `store.db` |
//! | `STORE_DB_MAX_CONNECTIONS`      | `5`        |
//! | `STORE_DB_CONNECT_TIMEOUT_SECS` | `30`       |
//! | `STORE_LOG`                     | `info`     |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pool::DbConfig;

/// Store service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size upper bound
    pub max_connections: u32,

    /// Seconds to wait for a free connection
    pub connect_timeout_secs: u64,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            database_path: PathBuf::from("store.db"),
            max_connections: 5,
            connect_timeout_secs: 30,
            log_filter: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();

        let config = StoreConfig {
            database_path: lookup("STORE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: match lookup("STORE_DB_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("STORE_DB_MAX_CONNECTIONS".to_string()))?,
                None => defaults.max_connections,
            },

            connect_timeout_secs: match lookup("STORE_DB_CONNECT_TIMEOUT_SECS") {
                Some(raw) => raw.parse().map_err(|_| {
                    ConfigError::InvalidValue("STORE_DB_CONNECT_TIMEOUT_SECS".to_string())
                })?,
                None => defaults.connect_timeout_secs,
            },

            log_filter: lookup("STORE_LOG").unwrap_or(defaults.log_filter),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "STORE_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings for [`Database::new`](crate::Database::new).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.db_config().max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("STORE_DATABASE_PATH", "/var/lib/store/data.db"),
            ("STORE_DB_MAX_CONNECTIONS", "12"),
            ("STORE_DB_CONNECT_TIMEOUT_SECS", "3"),
            ("STORE_LOG", "store_db=debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/store/data.db"));
        assert_eq!(config.log_filter, "store_db=debug");

        let db = config.db_config();
        assert_eq!(db.max_connections, 12);
        assert_eq!(db.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        let err = StoreConfig::from_lookup(lookup_from(&[("STORE_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for STORE_DB_MAX_CONNECTIONS");

        assert!(StoreConfig::from_lookup(lookup_from(&[("STORE_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(
            StoreConfig::from_lookup(lookup_from(&[("STORE_DB_CONNECT_TIMEOUT_SECS", "-1")]))
                .is_err()
        );
    }
}
