use {
    super::{
        AuctionCache,
        Partition,
    },
    crate::auction::entities,
};

impl AuctionCache {
    /// Append-only write for records known not to exist yet. Skips the
    /// cross-partition cleanup scan `upsert` performs, so it does not uphold
    /// the single-partition invariant if the id already lives elsewhere;
    /// callers that are not certain the record is new should use `upsert`.
    #[tracing::instrument(skip_all, fields(auction_id = %record.id, status = ?record.status))]
    pub async fn insert(&self, record: entities::AuctionRecord) {
        let mut partitions = self.partitions.write().await;
        partitions.retain(|_, partition| partition.is_live());

        let partition = partitions
            .entry(record.status)
            .or_insert_with(|| Partition::new(self.ttl));
        partition.records.insert(record.id, record);
        partition.refresh(self.ttl);
    }
}
