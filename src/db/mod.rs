//! Database access subsystem.
//!
//! # Data Flow
//! ```text
//! Repository declares intent (Read | Write)
//!     → router.rs (select node):
//!         - Write → primary pool, no fallback
//!         - Read  → replica pools in rotation, primary as last resort
//!     → pool.rs (lease a connection from the selected bounded pool)
//!     → Return connection handle or typed error
//! ```
//!
//! # Design Decisions
//! - One router per process, constructed at startup and injected via Arc;
//!   no ambient global state
//! - Replicas never receive writes; they may lag behind the primary
//! - A failed replica stays in rotation and is re-attempted on later reads
//! - Pool mechanics (capacity, queuing, timeouts) belong to sqlx; the
//!   router only decides which pool to ask

pub mod pool;
pub mod router;

pub use pool::{ConnectionPool, MySqlNodePool, PoolSettings};
pub use router::{DbRouter, Intent, RouterError};

use crate::config::DatabaseConfig;

/// The production router type: one primary and N replica MySQL pools.
pub type Database = DbRouter<MySqlNodePool>;

/// Build every pool named in the configuration and assemble the router.
///
/// Pools connect eagerly, so an unreachable or misconfigured node fails
/// startup here instead of surfacing on the first request.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, sqlx::Error> {
    let settings = PoolSettings::from_config(config);

    let primary = MySqlNodePool::connect("primary", &config.primary, settings).await?;

    let mut replicas = Vec::with_capacity(config.replicas.len());
    for (index, node) in config.replicas.iter().enumerate() {
        let label = format!("replica-{index}");
        replicas.push(MySqlNodePool::connect(&label, node, settings).await?);
    }

    tracing::info!(
        primary = %config.primary.host,
        replicas = replicas.len(),
        pool_size = settings.size,
        "Database pools constructed"
    );

    Ok(DbRouter::new(primary, replicas))
}
