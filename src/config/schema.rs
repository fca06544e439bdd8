//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every section has defaults so a minimal config stays small; node
//! descriptors are the one part that must be filled in.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Database nodes and pool sizing.
    pub database: DatabaseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Database topology: one writable primary and zero or more read replicas.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Maximum live connections per node pool, applied uniformly.
    pub pool_size: u32,

    /// How long a pool acquire may wait before failing, in seconds.
    pub acquire_timeout_secs: u64,

    /// The single node that accepts writes.
    pub primary: NodeConfig,

    /// Read-only replicas, tried in the order given here.
    pub replicas: Vec<NodeConfig>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            acquire_timeout_secs: 5,
            primary: NodeConfig::default(),
            replicas: Vec::new(),
        }
    }
}

/// Connection parameters for one database node. Immutable after startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Hostname or IP of the MySQL server.
    pub host: String,

    /// MySQL port.
    pub port: u16,

    /// Username for authentication.
    pub user: String,

    /// Password for authentication.
    pub password: String,

    /// Target schema.
    pub database: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3306,
            user: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.acquire_timeout_secs, 5);
        assert!(config.database.replicas.is_empty());
        assert_eq!(config.database.primary.port, 3306);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [database.primary]
            host = "db.internal"
            user = "pizzeria"
            database = "pizzeria"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.primary.host, "db.internal");
        assert_eq!(config.database.primary.port, 3306);
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.listener.request_timeout_secs, 30);
    }
}
