//! Record repositories.
//!
//! Each repository is a thin wrapper around single-statement SQL: it leases
//! a connection from the router with a declared intent, runs its query, and
//! drops the handle back into the pool. Repositories never talk to a node
//! directly and never decide routing themselves.

pub mod cart;
pub mod menu;
pub mod order;
pub mod user;

pub use cart::CartRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use crate::db::RouterError;

/// Failures surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No suitable node could produce a connection.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// The leased connection was fine but the statement failed.
    #[error("database query failed")]
    Query(#[from] sqlx::Error),
}
