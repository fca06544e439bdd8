//! Intent-based routing between the primary and replica pools.
//!
//! # Responsibilities
//! - Route writes to the primary pool, with no fallback
//! - Rotate reads across replica pools, one attempt per replica
//! - Fall back to the primary when every replica is exhausted
//! - Hide individual replica failures from callers

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::db::pool::ConnectionPool;
use crate::observability::metrics;

/// Caller-declared purpose of an acquisition, which determines routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The connection will only run reads; a lagging replica is acceptable.
    Read,
    /// The connection will run mutations; only the primary may serve it.
    Write,
}

/// Routing failures surfaced to callers.
///
/// A single replica failing during rotation is not an error at this level;
/// it is logged and absorbed by trying the next replica.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The primary pool could not produce a connection for a write.
    #[error("primary database node is unavailable")]
    PrimaryUnavailable(#[source] sqlx::Error),

    /// Every replica and the primary fallback failed for a read.
    #[error("all database nodes are unavailable")]
    AllNodesUnavailable(#[source] sqlx::Error),
}

/// Routes each acquisition to one node out of a primary and N replicas.
///
/// The rotation cursor is shared by all callers. It advances on every
/// replica attempt, success or failure, so sequential reads cycle through
/// all replicas before repeating and a failed replica costs exactly one
/// attempt per pass. Under concurrent load the ordering is best-effort:
/// two racing readers may land on the same replica, but the selected slot
/// is always in range.
pub struct DbRouter<P> {
    primary: P,
    replicas: Vec<P>,
    cursor: AtomicUsize,
}

impl<P: ConnectionPool> DbRouter<P> {
    /// Assemble a router over already-constructed pools.
    ///
    /// The service builds exactly one router at startup and shares it via
    /// `Arc`; there is no process-global instance to re-initialize.
    pub fn new(primary: P, replicas: Vec<P>) -> Self {
        Self {
            primary,
            replicas,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of configured replica pools.
    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    /// Lease a connection suitable for the declared intent.
    pub async fn acquire(&self, intent: Intent) -> Result<P::Conn, RouterError> {
        match intent {
            Intent::Read => self.read().await,
            Intent::Write => self.write().await,
        }
    }

    /// Lease a connection from the primary pool.
    ///
    /// Writes never fall back: replicas may lag and must not receive
    /// mutations. The cursor is untouched.
    pub async fn write(&self) -> Result<P::Conn, RouterError> {
        self.primary.acquire().await.map_err(|error| {
            metrics::record_router_error("primary_unavailable");
            tracing::error!(
                node = %self.primary.label(),
                error = %error,
                "Primary pool failed to produce a write connection"
            );
            RouterError::PrimaryUnavailable(error)
        })
    }

    /// Lease a read connection, preferring replicas.
    ///
    /// Makes exactly one attempt per configured replica, starting at the
    /// shared cursor, then falls back to the primary. With no replicas
    /// configured, reads go straight to the primary.
    pub async fn read(&self) -> Result<P::Conn, RouterError> {
        let count = self.replicas.len();

        for _ in 0..count {
            let index = self.cursor.fetch_add(1, Ordering::Relaxed) % count;
            let replica = &self.replicas[index];

            match replica.acquire().await {
                Ok(conn) => return Ok(conn),
                Err(error) => {
                    metrics::record_replica_failure(replica.label());
                    tracing::warn!(
                        replica = %replica.label(),
                        error = %error,
                        "Replica pool failed, rotating to next"
                    );
                }
            }
        }

        if count > 0 {
            metrics::record_primary_fallback();
            tracing::warn!("All replicas unavailable, falling back to primary");
        }

        self.primary.acquire().await.map_err(|error| {
            metrics::record_router_error("all_nodes_unavailable");
            tracing::error!(
                node = %self.primary.label(),
                error = %error,
                "Primary fallback failed, no node can serve reads"
            );
            RouterError::AllNodesUnavailable(error)
        })
    }

    /// Close every pool. Called once during shutdown, after in-flight
    /// handles have been returned.
    pub async fn close(&self) {
        for replica in &self.replicas {
            replica.close().await;
        }
        self.primary.close().await;
    }
}
