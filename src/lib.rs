//! Pizza-ordering backend with a replica-aware database layer.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                PIZZERIA BACKEND                 │
//!                    │                                                 │
//!   Client Request   │  ┌────────┐    ┌──────────┐    ┌────────────┐  │
//!   ─────────────────┼─▶│  http  │───▶│ handlers │───▶│   repos    │  │
//!                    │  │ server │    │          │    │ menu/cart/ │  │
//!                    │  └────────┘    └──────────┘    │ user/order │  │
//!                    │                                └─────┬──────┘  │
//!                    │                                      │ intent  │
//!                    │                                      ▼         │
//!                    │                               ┌────────────┐   │
//!                    │                               │ db router  │   │
//!                    │                               │ primary +  │   │
//!                    │                               │ N replicas │   │
//!                    │                               └─────┬──────┘   │
//!                    │                                     │          │
//!                    │          writes ────────────────────┤          │
//!                    │          reads (round robin, ───────┘          │
//!                    │                 primary fallback)              │
//!                    │                                                 │
//!                    │  ┌──────────────────────────────────────────┐  │
//!                    │  │           Cross-Cutting Concerns          │  │
//!                    │  │  ┌────────┐ ┌──────────────┐ ┌─────────┐ │  │
//!                    │  │  │ config │ │observability │ │lifecycle│ │  │
//!                    │  │  └────────┘ └──────────────┘ └─────────┘ │  │
//!                    │  └──────────────────────────────────────────┘  │
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! The interesting part is `db`: every request declares an intent (read or
//! write), writes always go to the primary, and reads rotate across the
//! replicas with the primary as a last resort. Everything above it is
//! single-statement SQL behind thin handlers.

// Core subsystems
pub mod config;
pub mod db;
pub mod http;
pub mod repos;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use db::{Database, DbRouter, Intent, RouterError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
