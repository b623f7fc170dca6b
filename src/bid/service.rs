use {
    crate::{
        auction::{
            cache::AuctionCache,
            entities::AuctionId,
        },
        publisher::BidPublisher,
    },
    std::{
        collections::HashMap,
        sync::Arc,
    },
    tokio::sync::Mutex,
};

pub mod get_auctions_by_status;
pub mod place_bid;

/// Serializes the read-validate-write window of bid placement per auction.
pub type BidLock = Arc<Mutex<()>>;

pub struct ServiceInner<P: BidPublisher> {
    cache:     Arc<AuctionCache>,
    publisher: P,
    bid_locks: Mutex<HashMap<AuctionId, BidLock>>,
}

pub struct Service<P: BidPublisher>(Arc<ServiceInner<P>>);

impl<P: BidPublisher> Clone for Service<P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P: BidPublisher> std::ops::Deref for Service<P> {
    type Target = ServiceInner<P>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P: BidPublisher> Service<P> {
    pub fn new(cache: Arc<AuctionCache>, publisher: P) -> Self {
        Self(Arc::new(ServiceInner {
            cache,
            publisher,
            bid_locks: Mutex::new(HashMap::new()),
        }))
    }

    pub(super) async fn get_or_create_bid_lock(&self, auction_id: AuctionId) -> BidLock {
        self.bid_locks
            .lock()
            .await
            .entry(auction_id)
            .or_default()
            .clone()
    }

    pub(super) async fn remove_bid_lock(&self, auction_id: &AuctionId) {
        let mut locks = self.bid_locks.lock().await;
        if let Some(bid_lock) = locks.get(auction_id) {
            // Whenever no other placement is borrowing the lock for this auction,
            // we can remove it from the locks HashMap.
            if Arc::strong_count(bid_lock) == 1 {
                locks.remove(auction_id);
            }
        }
    }
}
