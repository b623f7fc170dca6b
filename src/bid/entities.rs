use {
    crate::auction::entities::AuctionId,
    rust_decimal::Decimal,
    serde::{
        Deserialize,
        Serialize,
    },
    time::OffsetDateTime,
    utoipa::ToSchema,
    uuid::Uuid,
};

pub type BidId = Uuid;
pub type BidderId = Uuid;

/// A bid as submitted by a bidder. Ephemeral: it lives only for the duration
/// of the placement and is never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BidRequest {
    #[schema(example = "11111111-1111-1111-1111-111111111111", value_type = String)]
    pub auction_id: AuctionId,
    #[schema(example = "a51788e4-44fe-4cd8-8a8b-71d15e5ea9b0", value_type = String)]
    pub bidder_id:  BidderId,
    #[schema(example = "200", value_type = String)]
    pub amount:     Decimal,
}

/// An accepted bid, handed to the publish channel exactly once. Immutable
/// after construction; nothing retains it beyond the publish call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    pub bid_id:     BidId,
    pub auction_id: AuctionId,
    pub bidder_id:  BidderId,
    pub amount:     Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub placed_at:  OffsetDateTime,
}

impl BidRecord {
    /// Captures the accepted amount under a fresh identity and the current time.
    pub fn new(request: &BidRequest) -> Self {
        Self {
            bid_id:     Uuid::new_v4(),
            auction_id: request.auction_id,
            bidder_id:  request.bidder_id,
            amount:     request.amount,
            placed_at:  OffsetDateTime::now_utc(),
        }
    }
}
