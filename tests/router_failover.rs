//! Rotation and failover tests for the database connection router.
//!
//! The router is exercised through its pool seam with scripted pools, so
//! every failure mode is reproducible without a live database.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pizzeria_backend::db::{ConnectionPool, DbRouter, Intent, RouterError};

/// A scripted pool: pops one outcome per acquire, then settles into a
/// steady state. Counts attempts and successful leases separately.
struct MockPool {
    label: String,
    script: Mutex<VecDeque<bool>>,
    steady_up: bool,
    attempts: AtomicUsize,
    leases: AtomicUsize,
}

impl MockPool {
    fn up(label: &str) -> Arc<Self> {
        Self::scripted(label, [], true)
    }

    fn down(label: &str) -> Arc<Self> {
        Self::scripted(label, [], false)
    }

    fn scripted(
        label: &str,
        script: impl IntoIterator<Item = bool>,
        steady_up: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            script: Mutex::new(script.into_iter().collect()),
            steady_up,
            attempts: AtomicUsize::new(0),
            leases: AtomicUsize::new(0),
        })
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn leases(&self) -> usize {
        self.leases.load(Ordering::SeqCst)
    }
}

impl ConnectionPool for MockPool {
    type Conn = String;

    fn label(&self) -> &str {
        &self.label
    }

    async fn acquire(&self) -> Result<Self::Conn, sqlx::Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let up = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.steady_up);
        if up {
            self.leases.fetch_add(1, Ordering::SeqCst);
            Ok(self.label.clone())
        } else {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    async fn close(&self) {}
}

fn router(
    primary: &Arc<MockPool>,
    replicas: &[&Arc<MockPool>],
) -> DbRouter<Arc<MockPool>> {
    DbRouter::new(primary.clone(), replicas.iter().map(|r| (*r).clone()).collect())
}

#[tokio::test]
async fn healthy_rotation_visits_each_replica_exactly_once() {
    let primary = MockPool::up("primary");
    let r0 = MockPool::up("r0");
    let r1 = MockPool::up("r1");
    let r2 = MockPool::up("r2");
    let router = router(&primary, &[&r0, &r1, &r2]);

    let mut visited = Vec::new();
    for _ in 0..3 {
        visited.push(router.read().await.unwrap());
    }

    assert_eq!(visited, ["r0", "r1", "r2"]);
    assert_eq!(primary.leases(), 0, "healthy reads must not touch the primary");

    // The cycle repeats in the same order.
    assert_eq!(router.read().await.unwrap(), "r0");
}

#[tokio::test]
async fn dead_replica_is_skipped_but_never_evicted() {
    let primary = MockPool::up("primary");
    let r0 = MockPool::down("r0");
    let r1 = MockPool::up("r1");
    let router = router(&primary, &[&r0, &r1]);

    for _ in 0..4 {
        assert_eq!(router.read().await.unwrap(), "r1");
    }

    // No health memory: the dead replica is re-attempted on every read.
    assert_eq!(r0.attempts(), 4);
    assert_eq!(primary.leases(), 0);
}

#[tokio::test]
async fn all_replicas_down_falls_back_to_primary() {
    let primary = MockPool::up("primary");
    let r0 = MockPool::down("r0");
    let r1 = MockPool::down("r1");
    let router = router(&primary, &[&r0, &r1]);

    assert_eq!(router.read().await.unwrap(), "primary");

    // Exactly one attempt per replica before the fallback.
    assert_eq!(r0.attempts(), 1);
    assert_eq!(r1.attempts(), 1);
}

#[tokio::test]
async fn everything_down_surfaces_all_nodes_unavailable() {
    let primary = MockPool::down("primary");
    let r0 = MockPool::down("r0");
    let router = router(&primary, &[&r0]);

    let error = router.read().await.unwrap_err();
    assert!(matches!(error, RouterError::AllNodesUnavailable(_)));
}

#[tokio::test]
async fn writes_always_target_primary_and_never_advance_the_cursor() {
    let primary = MockPool::up("primary");
    let r0 = MockPool::up("r0");
    let r1 = MockPool::up("r1");
    let router = router(&primary, &[&r0, &r1]);

    for _ in 0..3 {
        assert_eq!(router.write().await.unwrap(), "primary");
    }
    assert_eq!(r0.attempts() + r1.attempts(), 0);

    // Cursor untouched: the next read starts at the first replica.
    assert_eq!(router.read().await.unwrap(), "r0");
}

#[tokio::test]
async fn write_failure_is_primary_unavailable_even_with_healthy_replicas() {
    let primary = MockPool::down("primary");
    let r0 = MockPool::up("r0");
    let router = router(&primary, &[&r0]);

    let error = router.write().await.unwrap_err();
    assert!(matches!(error, RouterError::PrimaryUnavailable(_)));
    assert_eq!(r0.attempts(), 0, "writes must never try a replica");
}

#[tokio::test]
async fn zero_replicas_routes_reads_to_primary() {
    let primary = MockPool::up("primary");
    let router = DbRouter::new(primary.clone(), Vec::new());

    assert_eq!(router.replica_count(), 0);
    assert_eq!(router.read().await.unwrap(), "primary");
    assert_eq!(router.acquire(Intent::Read).await.unwrap(), "primary");
}

#[tokio::test]
async fn zero_replicas_with_dead_primary_is_all_nodes_unavailable() {
    let primary = MockPool::down("primary");
    let router = DbRouter::new(primary.clone(), Vec::new());

    let error = router.read().await.unwrap_err();
    assert!(matches!(error, RouterError::AllNodesUnavailable(_)));
}

#[tokio::test]
async fn replica_recovers_after_one_failure() {
    // replica 0 fails exactly once, then comes back.
    let primary = MockPool::up("primary");
    let r0 = MockPool::scripted("r0", [false], true);
    let r1 = MockPool::up("r1");
    let router = router(&primary, &[&r0, &r1]);

    // First read: r0 fails, rotation lands on r1. The failure advanced the
    // cursor, so the next reads come back around to the recovered r0.
    let mut visited = Vec::new();
    for _ in 0..4 {
        visited.push(router.read().await.unwrap());
    }

    assert_eq!(visited, ["r1", "r0", "r1", "r0"]);
    assert_eq!(primary.leases(), 0);
}

#[tokio::test]
async fn concurrent_reads_always_land_on_a_valid_replica() {
    let primary = MockPool::up("primary");
    let r0 = MockPool::up("r0");
    let r1 = MockPool::up("r1");
    let router = Arc::new(router(&primary, &[&r0, &r1]));

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move { router.read().await }));
    }

    for task in tasks {
        let label = task.await.unwrap().unwrap();
        assert!(label == "r0" || label == "r1");
    }

    // Every read was served by a replica, none leaked to the primary.
    assert_eq!(r0.leases() + r1.leases(), 50);
}
