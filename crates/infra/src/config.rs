//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TAPROOM_BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `USE_PERSISTENT_STORES` | `false` | `true` selects Postgres |
//! | `DATABASE_URL` | (none) | required when persistent |
//! | `TAPROOM_DEFAULT_AUDITOR` | `system` | actor stamped when a request names none |

use std::net::SocketAddr;

use thiserror::Error;

use taproom_core::AuditContext;

pub const BIND_ADDR_VAR: &str = "TAPROOM_BIND_ADDR";
pub const PERSISTENT_STORES_VAR: &str = "USE_PERSISTENT_STORES";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DEFAULT_AUDITOR_VAR: &str = "TAPROOM_DEFAULT_AUDITOR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("{0} must be set when {PERSISTENT_STORES_VAR}=true")]
    Missing(&'static str),
}

/// Which beer store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub default_auditor: AuditContext,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: BIND_ADDR_VAR,
                message: e.to_string(),
            })?;

        let persistent = match get(PERSISTENT_STORES_VAR) {
            None => false,
            Some(raw) => raw.trim().to_ascii_lowercase().parse::<bool>().map_err(|_| ConfigError::Invalid {
                key: PERSISTENT_STORES_VAR,
                message: format!("expected true or false, got {raw:?}"),
            })?,
        };

        let storage = if persistent {
            let database_url = get(DATABASE_URL_VAR).ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory
        };

        let default_auditor = get(DEFAULT_AUDITOR_VAR)
            .map(AuditContext::new)
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            storage,
            default_auditor,
        })
    }

    /// In-memory configuration with every default; what tests run against.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageConfig::InMemory,
            default_auditor: AuditContext::system(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_8080() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.storage, StorageConfig::InMemory);
        assert_eq!(config.default_auditor.actor(), "system");
    }

    #[test]
    fn persistent_requires_database_url() {
        let err = load(&[(PERSISTENT_STORES_VAR, "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DATABASE_URL_VAR));

        let config = load(&[
            (PERSISTENT_STORES_VAR, "TRUE"),
            (DATABASE_URL_VAR, "postgres://localhost/taproom"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Postgres {
                database_url: "postgres://localhost/taproom".to_string()
            }
        );
    }

    #[test]
    fn rejects_garbage_values() {
        assert!(matches!(
            load(&[(PERSISTENT_STORES_VAR, "maybe")]),
            Err(ConfigError::Invalid { key: PERSISTENT_STORES_VAR, .. })
        ));
        assert!(matches!(
            load(&[(BIND_ADDR_VAR, "not-an-addr")]),
            Err(ConfigError::Invalid { key: BIND_ADDR_VAR, .. })
        ));
    }

    #[test]
    fn default_auditor_is_configurable() {
        let config = load(&[(DEFAULT_AUDITOR_VAR, "taproom-bot")]).unwrap();
        assert_eq!(config.default_auditor.actor(), "taproom-bot");
    }
}
