use {
    rust_decimal::Decimal,
    serde::{
        Deserialize,
        Serialize,
    },
    strum::EnumIter,
    time::OffsetDateTime,
    utoipa::ToSchema,
    uuid::Uuid,
};

pub type AuctionId = Uuid;

/// Lifecycle state of an auction, as reported by the external auction service.
/// The state determines which cache partition holds the record.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter,
)]
pub enum AuctionStatus {
    Inactive,
    Active,
    Closed,
}

/// Snapshot of a single auction as the cache currently believes it to be.
///
/// `current_bid` is monotonically non-decreasing while the auction is Active;
/// `end_date` is advisory only, closing is enforced by the external service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    #[serde(rename = "auctionId")]
    #[schema(example = "11111111-1111-1111-1111-111111111111", value_type = String)]
    pub id:          AuctionId,
    pub status:      AuctionStatus,
    /// Minimum acceptable bid amount.
    #[schema(example = "100", value_type = String)]
    pub min_bid:     Decimal,
    /// Highest accepted bid so far.
    #[schema(example = "150", value_type = String)]
    pub current_bid: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(example = "2026-08-08T12:00:00Z", value_type = String)]
    pub end_date:    OffsetDateTime,
}
