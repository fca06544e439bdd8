//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool size and timeouts > 0)
//! - Require complete node descriptors for the primary and every replica
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the deserialized config
//! - Runs before any pool is constructed

use std::fmt;

use crate::config::schema::{AppConfig, NodeConfig};

/// One semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the config for semantic problems, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            "must not be empty",
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.database.pool_size == 0 {
        errors.push(ValidationError::new(
            "database.pool_size",
            "must be greater than zero",
        ));
    }
    if config.database.acquire_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "database.acquire_timeout_secs",
            "must be greater than zero",
        ));
    }

    validate_node("database.primary", &config.database.primary, &mut errors);
    for (index, node) in config.database.replicas.iter().enumerate() {
        validate_node(&format!("database.replicas[{index}]"), node, &mut errors);
    }

    if config.observability.metrics_enabled && config.observability.metrics_address.is_empty() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must not be empty when metrics are enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_node(field: &str, node: &NodeConfig, errors: &mut Vec<ValidationError>) {
    if node.host.is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.host"),
            "must not be empty",
        ));
    }
    if node.user.is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.user"),
            "must not be empty",
        ));
    }
    if node.database.is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.database"),
            "must not be empty",
        ));
    }
    if node.port == 0 {
        errors.push(ValidationError::new(
            format!("{field}.port"),
            "must be a valid port",
        ));
    }
}
