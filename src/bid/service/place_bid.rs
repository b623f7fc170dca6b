use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities::AuctionStatus,
        bid::entities,
        publisher::BidPublisher,
    },
};

pub struct PlaceBidInput {
    pub request: entities::BidRequest,
}

impl<P: BidPublisher> Service<P> {
    /// Validates and commits a single bid against the current cache state.
    ///
    /// The per-auction lock makes the read-validate-write window exclusive, so
    /// concurrent bids on one auction serialize instead of overwriting each
    /// other. The lock is released before the publish call; a publish failure
    /// fails the placement, but the cache mutation stands.
    #[tracing::instrument(skip_all, fields(
        auction_id = %input.request.auction_id,
        amount = %input.request.amount
    ))]
    pub async fn place_bid(
        &self,
        input: PlaceBidInput,
    ) -> Result<entities::BidRecord, RestError> {
        let request = input.request;
        let auction_id = request.auction_id;

        let bid_lock = self.get_or_create_bid_lock(auction_id).await;
        let committed = {
            let _guard = bid_lock.lock().await;
            self.validate_and_commit(&request).await
        };
        drop(bid_lock);
        self.remove_bid_lock(&auction_id).await;

        let record = committed?;
        self.publisher.publish(record.clone()).await.map_err(|err| {
            tracing::error!(
                error = ?err,
                bid_id = %record.bid_id,
                "Failed to publish accepted bid",
            );
            RestError::TemporarilyUnavailable
        })?;
        tracing::info!(
            bid_id = %record.bid_id,
            bidder_id = %record.bidder_id,
            "Accepted bid",
        );
        Ok(record)
    }

    async fn validate_and_commit(
        &self,
        request: &entities::BidRequest,
    ) -> Result<entities::BidRecord, RestError> {
        let Some(mut auction) = self.cache.get_by_id(request.auction_id).await else {
            tracing::warn!("Rejecting bid on unknown auction");
            return Err(RestError::AuctionNotFound);
        };

        if auction.status != AuctionStatus::Active {
            tracing::warn!(status = ?auction.status, "Rejecting bid on auction that is not active");
            return Err(RestError::AuctionNotActive);
        }

        // equal to the current high bid is not enough
        if request.amount < auction.min_bid || request.amount <= auction.current_bid {
            tracing::warn!(
                min_bid = %auction.min_bid,
                current_bid = %auction.current_bid,
                "Rejecting bid below the acceptable amount",
            );
            return Err(RestError::BidTooLow);
        }

        auction.current_bid = request.amount;
        // same status, so this is a same-partition replace
        self.cache.upsert(auction).await;
        Ok(entities::BidRecord::new(request))
    }
}
