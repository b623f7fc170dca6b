use {
    super::AuctionCache,
    crate::auction::entities,
    strum::IntoEnumIterator,
};

impl AuctionCache {
    /// Scans every live status partition for the given id. Lapsed partitions
    /// read as absent, so a hit is always a fresh snapshot.
    pub async fn get_by_id(
        &self,
        auction_id: entities::AuctionId,
    ) -> Option<entities::AuctionRecord> {
        let partitions = self.partitions.read().await;
        entities::AuctionStatus::iter().find_map(|status| {
            partitions
                .get(&status)
                .filter(|partition| partition.is_live())
                .and_then(|partition| partition.records.get(&auction_id))
                .cloned()
        })
    }
}
