//! Observability: structured logging lives in each subsystem via
//! `tracing`; this module owns the metrics exporter and recording helpers.

pub mod metrics;
