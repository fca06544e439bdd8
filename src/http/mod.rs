//! HTTP API layer.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (middleware: request id, trace, timeout, metrics)
//!     → handlers.rs (extract params, call repository)
//!     → repos/* (lease a routed connection, run SQL)
//!     → JSON response or ApiError (400/404/500/503)
//! ```

pub mod handlers;
pub mod server;

pub use handlers::ApiError;
pub use server::{AppState, HttpServer};
