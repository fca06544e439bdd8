//! Configuration loading and validation tests.

use std::fs;

use tempfile::TempDir;

use pizzeria_backend::config::{load_config, ConfigError};

#[test]
fn load_full_config() {
    let toml = r#"
[listener]
bind_address = "127.0.0.1:8080"
request_timeout_secs = 15

[database]
pool_size = 5
acquire_timeout_secs = 3

[database.primary]
host = "db-primary.internal"
user = "pizzeria"
password = "secret"
database = "pizzeria"

[[database.replicas]]
host = "db-replica-1.internal"
user = "pizzeria"
password = "secret"
database = "pizzeria"

[[database.replicas]]
host = "db-replica-2.internal"
port = 3307
user = "pizzeria"
password = "secret"
database = "pizzeria"

[observability]
log_level = "info"
metrics_enabled = false
"#;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
    assert_eq!(config.listener.request_timeout_secs, 15);
    assert_eq!(config.database.pool_size, 5);
    assert_eq!(config.database.acquire_timeout_secs, 3);
    assert_eq!(config.database.primary.host, "db-primary.internal");
    assert_eq!(config.database.primary.port, 3306);
    assert_eq!(config.database.replicas.len(), 2);
    assert_eq!(config.database.replicas[1].port, 3307);
    assert!(!config.observability.metrics_enabled);
}

#[test]
fn minimal_config_gets_defaults() {
    let toml = r#"
[database.primary]
host = "127.0.0.1"
user = "root"
database = "pizzeria"
"#;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    assert_eq!(config.database.pool_size, 5);
    assert_eq!(config.database.acquire_timeout_secs, 5);
    assert!(config.database.replicas.is_empty());
}

#[test]
fn validation_collects_every_problem() {
    let toml = r#"
[database]
pool_size = 0

[database.primary]
host = ""
user = "root"
database = "pizzeria"

[[database.replicas]]
host = "db-replica-1.internal"
user = ""
database = "pizzeria"
"#;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).unwrap();

    let error = load_config(&path).unwrap_err();
    let ConfigError::Validation(errors) = error else {
        panic!("expected validation error, got {error}");
    };

    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"database.pool_size"));
    assert!(fields.contains(&"database.primary.host"));
    assert!(fields.contains(&"database.replicas[0].user"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[database.primary\nhost = ").unwrap();

    assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
}
