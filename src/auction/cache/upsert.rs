use {
    super::{
        AuctionCache,
        Partition,
    },
    crate::auction::entities,
    strum::IntoEnumIterator,
};

impl AuctionCache {
    /// Writes the record into the partition matching its status, replacing any
    /// existing entry with the same id there, then removes the id from every
    /// other partition. Both steps run under one write guard, so the record is
    /// never observable in two partitions (or none) mid-move. Each step
    /// restarts the TTL of the partition it modified.
    #[tracing::instrument(skip_all, fields(auction_id = %record.id, status = ?record.status))]
    pub async fn upsert(&self, record: entities::AuctionRecord) {
        let id = record.id;
        let target = record.status;

        let mut partitions = self.partitions.write().await;
        partitions.retain(|_, partition| partition.is_live());

        let partition = partitions
            .entry(target)
            .or_insert_with(|| Partition::new(self.ttl));
        partition.records.insert(id, record);
        partition.refresh(self.ttl);

        for status in entities::AuctionStatus::iter() {
            if status == target {
                continue;
            }
            if let Some(partition) = partitions.get_mut(&status) {
                if partition.records.remove(&id).is_some() {
                    partition.refresh(self.ttl);
                }
            }
        }
    }
}
