//! Connection pool abstraction.
//!
//! # Responsibilities
//! - Define the seam between the router and the pooling library
//! - Wrap a bounded sqlx MySQL pool per database node
//! - Enforce uniform pool capacity and an explicit acquire timeout

use std::future::Future;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};

use crate::config::{DatabaseConfig, NodeConfig};

/// A bounded source of live connections to one database node.
///
/// The router treats pools as opaque: it only asks for a connection and
/// observes success or failure. Tests implement this trait with scripted
/// pools; production uses [`MySqlNodePool`].
pub trait ConnectionPool: Send + Sync {
    /// The connection handle leased to callers. Callers return it to the
    /// pool by dropping it; the router does not track handle lifetime.
    type Conn: Send;

    /// Human-readable node label for logs and metrics.
    fn label(&self) -> &str;

    /// Lease a connection, failing when the pool is exhausted or the node
    /// is unreachable.
    fn acquire(&self) -> impl Future<Output = Result<Self::Conn, sqlx::Error>> + Send;

    /// Close the pool, releasing all connections.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

impl<P: ConnectionPool> ConnectionPool for std::sync::Arc<P> {
    type Conn = P::Conn;

    fn label(&self) -> &str {
        (**self).label()
    }

    async fn acquire(&self) -> Result<Self::Conn, sqlx::Error> {
        (**self).acquire().await
    }

    async fn close(&self) {
        (**self).close().await;
    }
}

/// Sizing applied uniformly to every node's pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    /// Maximum live connections per node.
    pub size: u32,

    /// How long an acquire may wait on an exhausted pool before failing.
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            size: config.pool_size,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
        }
    }
}

/// A bounded sqlx pool for a single MySQL node.
#[derive(Debug)]
pub struct MySqlNodePool {
    label: String,
    pool: MySqlPool,
}

impl MySqlNodePool {
    /// Connect eagerly to the node and build its pool.
    ///
    /// Fails if the node parameters are invalid or the node is unreachable,
    /// so misconfiguration aborts startup rather than the first request.
    pub async fn connect(
        label: &str,
        node: &NodeConfig,
        settings: PoolSettings,
    ) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.size)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(connect_options(node))
            .await?;

        tracing::debug!(node = %label, host = %node.host, "Node pool connected");

        Ok(Self {
            label: label.to_string(),
            pool,
        })
    }
}

impl ConnectionPool for MySqlNodePool {
    type Conn = PoolConnection<MySql>;

    fn label(&self) -> &str {
        &self.label
    }

    async fn acquire(&self) -> Result<Self::Conn, sqlx::Error> {
        self.pool.acquire().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(node: &NodeConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&node.host)
        .port(node.port)
        .username(&node.user)
        .password(&node.password)
        .database(&node.database)
}
