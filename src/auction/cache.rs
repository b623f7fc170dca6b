use {
    super::entities,
    std::{
        collections::HashMap,
        time::Duration,
    },
    tokio::{
        sync::RwLock,
        time::Instant,
    },
};

mod get_by_id;
mod get_by_status;
mod insert;
mod upsert;

/// In-memory auction store, partitioned by [`entities::AuctionStatus`].
///
/// A given auction id lives in at most one partition at a time: `upsert`
/// moves a record between partitions when its status changes, under a single
/// write guard, so the invariant also holds across concurrent writers.
/// Expiry is per partition, not per record: once a partition's deadline
/// passes, the whole partition reads as absent and the next write to it
/// starts from empty.
#[derive(Debug)]
pub struct AuctionCache {
    ttl:        Duration,
    partitions: RwLock<HashMap<entities::AuctionStatus, Partition>>,
}

#[derive(Debug)]
struct Partition {
    records:    HashMap<entities::AuctionId, entities::AuctionRecord>,
    expires_at: Instant,
}

impl Partition {
    fn new(ttl: Duration) -> Self {
        Self {
            records:    HashMap::new(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }

    /// Restarts the absolute TTL; called on every write that touches the partition.
    fn refresh(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }
}

impl AuctionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            partitions: RwLock::new(HashMap::new()),
        }
    }
}
