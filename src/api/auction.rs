use {
    crate::{
        api::ApiService,
        auction::entities::{
            AuctionRecord,
            AuctionStatus,
        },
    },
    axum::{
        extract::{
            Query,
            State,
        },
        Json,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    utoipa::IntoParams,
};

#[derive(Serialize, Deserialize, IntoParams)]
pub struct StatusQueryParams {
    /// Status partition to list. Defaults to Active.
    #[param(example = "Active", value_type = Option < String >)]
    pub status: Option<AuctionStatus>,
}

/// List the auctions the cache currently holds under one status.
///
/// Served straight from the cache: a partition whose TTL has lapsed reads as
/// empty until the sync worker repopulates it.
#[utoipa::path(get, path = "/v1/auctions", params(StatusQueryParams), responses(
    (status = 200, description = "Cached auctions with the requested status", body = Vec<AuctionRecord>),
),)]
pub async fn get_auctions(
    State(service): State<ApiService>,
    Query(params): Query<StatusQueryParams>,
) -> Json<Vec<AuctionRecord>> {
    let status = params.status.unwrap_or(AuctionStatus::Active);
    Json(service.get_auctions_by_status(status).await)
}
