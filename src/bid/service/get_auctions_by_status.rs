use {
    super::Service,
    crate::{
        auction::entities,
        publisher::BidPublisher,
    },
};

impl<P: BidPublisher> Service<P> {
    /// Read-only listing accessor for status queries; serves straight from the
    /// cache, so a lapsed partition yields an empty list.
    pub async fn get_auctions_by_status(
        &self,
        status: entities::AuctionStatus,
    ) -> Vec<entities::AuctionRecord> {
        self.cache.get_by_status(status).await
    }
}
