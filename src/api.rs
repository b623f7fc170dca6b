use {
    crate::{
        api::bid::BidResult,
        auction::entities::{
            AuctionRecord,
            AuctionStatus,
        },
        bid::{
            entities::BidRequest,
            service::Service,
        },
        config::RunOptions,
        publisher::ChannelBidPublisher,
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
    },
    anyhow::Result,
    axum::{
        http::StatusCode,
        response::{
            IntoResponse,
            Response,
        },
        routing::{
            get,
            post,
        },
        Json,
        Router,
    },
    axum_prometheus::PrometheusMetricLayer,
    clap::crate_version,
    serde::Serialize,
    std::sync::atomic::Ordering,
    tower_http::cors::CorsLayer,
    utoipa::{
        OpenApi,
        ToResponse,
        ToSchema,
    },
    utoipa_redoc::{
        Redoc,
        Servable,
    },
};

mod auction;
mod bid;

/// The concrete service the routes are served with.
pub type ApiService = Service<ChannelBidPublisher>;

async fn root() -> String {
    format!("Bid Server API {}", crate_version!())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestError {
    /// No cache partition holds an auction with the requested id
    AuctionNotFound,
    /// The auction exists but is not open for bidding
    AuctionNotActive,
    /// The bid amount does not clear the minimum bid or the current high bid
    BidTooLow,
    /// Internal error occurred during processing the request
    TemporarilyUnavailable,
}

impl RestError {
    pub fn to_status_and_message(&self) -> (StatusCode, String) {
        match self {
            RestError::AuctionNotFound => (
                StatusCode::NOT_FOUND,
                "Auction with the specified id was not found".to_string(),
            ),
            RestError::AuctionNotActive => (
                StatusCode::BAD_REQUEST,
                "Auction is not open for bidding".to_string(),
            ),
            RestError::BidTooLow => (
                StatusCode::BAD_REQUEST,
                "Bid amount must meet the minimum bid and exceed the current bid".to_string(),
            ),
            RestError::TemporarilyUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "This service is temporarily unavailable".to_string(),
            ),
        }
    }
}

#[derive(ToResponse, ToSchema, Serialize)]
#[response(description = "An error occurred processing the request")]
pub struct ErrorBodyResponse {
    error: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, msg) = self.to_status_and_message();
        (status, Json(ErrorBodyResponse { error: msg })).into_response()
    }
}

pub async fn live() -> Response {
    (StatusCode::OK, "OK").into_response()
}

pub async fn start_api(run_options: RunOptions, service: ApiService) -> Result<()> {
    #[derive(OpenApi)]
    #[openapi(
    paths(
    bid::post_bid,
    auction::get_auctions,
    ),
    components(
    schemas(
    AuctionRecord,
    AuctionStatus,
    BidRequest,
    BidResult,
    ErrorBodyResponse,
    ),
    responses(
    ErrorBodyResponse,
    BidResult,
    ),
    ),
    tags(
    (name = "Bid Server", description = "Bid Server accepts bids against a cached view of the \
    external auction service and forwards every accepted bid to the bid channel.")
    )
    )]
    struct ApiDoc;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let v1_routes = Router::new().nest(
        "/v1",
        Router::new()
            .nest("/bids", Router::new().route("/", post(bid::post_bid)))
            .nest("/auctions", Router::new().route("/", get(auction::get_auctions))),
    );

    let app: Router<()> = Router::new()
        .merge(Redoc::with_url("/docs", ApiDoc::openapi()))
        .merge(v1_routes)
        .route("/", get(root))
        .route("/live", get(live))
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(CorsLayer::permissive())
        .layer(prometheus_layer)
        .with_state(service);

    let listener = tokio::net::TcpListener::bind(&run_options.server.listen_addr).await?;
    tracing::info!(
        listen_addr = %run_options.server.listen_addr,
        "Starting API server...",
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            while !SHOULD_EXIT.load(Ordering::Acquire) {
                tokio::time::sleep(EXIT_CHECK_INTERVAL).await;
            }
            tracing::info!("Shutting down API server...");
        })
        .await?;
    Ok(())
}
