use {
    crate::{
        api::{
            ApiService,
            ErrorBodyResponse,
            RestError,
        },
        bid::{
            entities::{
                BidId,
                BidRequest,
            },
            service::place_bid::PlaceBidInput,
        },
    },
    axum::{
        extract::State,
        Json,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    utoipa::{
        ToResponse,
        ToSchema,
    },
};

#[derive(Serialize, Deserialize, ToResponse, ToSchema, Clone)]
pub struct BidResult {
    pub status: String,
    /// The unique id created to identify the accepted bid.
    #[schema(example = "beedbeed-58cc-4372-a567-0e02b2c3d479", value_type = String)]
    pub id:     BidId,
}

/// Place a bid on an auction.
///
/// The bid is validated against the cached auction snapshot: the auction must
/// be active and the amount must meet the minimum bid and exceed the current
/// high bid. An accepted bid updates the cache and is forwarded to the bid
/// channel.
#[utoipa::path(post, path = "/v1/bids", request_body = BidRequest, responses(
    (status = 200, description = "Bid was accepted", body = BidResult,
    example = json!({"status": "OK", "id": "beedbeed-b346-4fa1-8fab-2541a9e1872d"})),
    (status = 400, response = ErrorBodyResponse),
    (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
),)]
pub async fn post_bid(
    State(service): State<ApiService>,
    Json(request): Json<BidRequest>,
) -> Result<Json<BidResult>, RestError> {
    let record = service.place_bid(PlaceBidInput { request }).await?;
    Ok(Json(BidResult {
        status: "OK".to_string(),
        id:     record.bid_id,
    }))
}
