use {
    super::AuctionCache,
    crate::auction::entities,
};

impl AuctionCache {
    /// Returns the full contents of one status partition; an absent or lapsed
    /// partition yields an empty vec, never an error.
    pub async fn get_by_status(
        &self,
        status: entities::AuctionStatus,
    ) -> Vec<entities::AuctionRecord> {
        let partitions = self.partitions.read().await;
        match partitions.get(&status) {
            Some(partition) if partition.is_live() => {
                partition.records.values().cloned().collect()
            }
            _ => Vec::new(),
        }
    }
}
