use {
    crate::{
        auction::{
            cache::AuctionCache,
            entities::AuctionRecord,
        },
        config::SyncConfig,
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
    },
    anyhow::{
        anyhow,
        Result,
    },
    futures_util::{
        SinkExt,
        StreamExt,
    },
    serde::Serialize,
    std::{
        sync::{
            atomic::Ordering,
            Arc,
        },
        time::Duration,
    },
    tokio::net::TcpStream,
    tokio_tungstenite::{
        connect_async,
        tungstenite::{
            client::IntoClientRequest,
            Message,
        },
        MaybeTlsStream,
        WebSocketStream,
    },
};

type SyncStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
enum SubscribeRequestType {
    Subscribe,
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    #[serde(rename = "type")]
    request_type: SubscribeRequestType,
    channel:      &'a str,
}

enum SyncState {
    Connecting { attempt: u32 },
    Listening { stream: Box<SyncStream> },
    Stopped,
    Failed,
}

/// Long-lived reconciliation worker: subscribes to the external auction event
/// channel and applies every decodable update to the cache. The only writer
/// that changes an auction's status.
///
/// Connection failures retry on a fixed backoff up to the configured attempt
/// bound; exhausting the bound is terminal for this run and leaves the rest of
/// the process serving from the now-stale cache. A successful connection
/// rearms the full retry budget. The shutdown flag is honored at every wait
/// point.
pub async fn run_sync_loop(cache: Arc<AuctionCache>, config: SyncConfig) -> Result<()> {
    tracing::info!(
        url = config.url.as_str(),
        channel = config.channel.as_str(),
        "Starting auction sync worker...",
    );

    let mut state = SyncState::Connecting { attempt: 0 };
    loop {
        if SHOULD_EXIT.load(Ordering::Acquire) {
            state = SyncState::Stopped;
        }
        state = match state {
            SyncState::Connecting { attempt } => match connect(&config).await {
                Ok(stream) => {
                    tracing::info!(
                        channel = config.channel.as_str(),
                        "Listening for auction updates",
                    );
                    SyncState::Listening {
                        stream: Box::new(stream),
                    }
                }
                Err(err) => {
                    let attempt = attempt + 1;
                    if attempt >= config.max_connect_attempts {
                        tracing::error!(
                            error = ?err,
                            attempts = attempt,
                            "Giving up on the auction event source",
                        );
                        SyncState::Failed
                    } else {
                        tracing::warn!(
                            error = ?err,
                            attempt = attempt,
                            max_attempts = config.max_connect_attempts,
                            "Connecting to the auction event source failed, retrying...",
                        );
                        if wait_for_backoff(config.connect_backoff).await {
                            SyncState::Stopped
                        } else {
                            SyncState::Connecting { attempt }
                        }
                    }
                }
            },
            SyncState::Listening { stream } => listen(&cache, *stream).await,
            SyncState::Stopped => {
                tracing::info!("Auction sync worker stopped");
                return Ok(());
            }
            SyncState::Failed => {
                return Err(anyhow!(
                    "Could not reach the auction event source after {} attempts",
                    config.max_connect_attempts
                ));
            }
        };
    }
}

async fn connect(config: &SyncConfig) -> Result<SyncStream> {
    let request = config.url.as_str().into_client_request()?;
    let (mut stream, _) = connect_async(request).await?;

    let subscribe = serde_json::to_string(&SubscribeRequest {
        request_type: SubscribeRequestType::Subscribe,
        channel:      &config.channel,
    })?;
    stream.send(Message::Text(subscribe)).await?;
    Ok(stream)
}

async fn listen(cache: &AuctionCache, mut stream: SyncStream) -> SyncState {
    let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
    loop {
        tokio::select! {
            message = stream.next() => match message {
                Some(Ok(Message::Text(payload))) => apply_auction_update(cache, &payload).await,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::warn!("Auction event stream closed, reconnecting...");
                    return SyncState::Connecting { attempt: 0 };
                }
                // ping/pong/binary frames are not auction updates
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(error = ?err, "Auction event stream failed, reconnecting...");
                    return SyncState::Connecting { attempt: 0 };
                }
            },
            _ = exit_check_interval.tick() => {
                if SHOULD_EXIT.load(Ordering::Acquire) {
                    return SyncState::Stopped;
                }
            }
        }
    }
}

/// Decodes one inbound payload and reconciles it into the cache. A malformed
/// message is logged and dropped; the subscription survives it.
async fn apply_auction_update(cache: &AuctionCache, payload: &str) {
    let update: AuctionRecord = match serde_json::from_str(payload) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(
                error = %err,
                payload = payload,
                "Dropping auction update that failed to decode",
            );
            return;
        }
    };

    if cache.get_by_id(update.id).await.is_some() {
        tracing::debug!(auction_id = %update.id, status = ?update.status, "Updating auction in cache");
        cache.upsert(update).await;
    } else {
        tracing::debug!(auction_id = %update.id, status = ?update.status, "Adding new auction to cache");
        cache.insert(update).await;
    }
}

/// Sleeps out the backoff while staying responsive to shutdown. Returns true
/// if the shutdown flag was raised.
async fn wait_for_backoff(backoff: Duration) -> bool {
    let sleep = tokio::time::sleep(backoff);
    tokio::pin!(sleep);
    let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
    loop {
        tokio::select! {
            _ = &mut sleep => return SHOULD_EXIT.load(Ordering::Acquire),
            _ = exit_check_interval.tick() => {
                if SHOULD_EXIT.load(Ordering::Acquire) {
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{
            apply_auction_update,
            run_sync_loop,
        },
        crate::{
            auction::{
                cache::AuctionCache,
                entities::AuctionStatus,
            },
            config::SyncConfig,
        },
        futures_util::{
        SinkExt,
        StreamExt,
    },
        serde_json::json,
        std::{
            sync::Arc,
            time::Duration,
        },
        tokio_tungstenite::tungstenite::Message,
        uuid::Uuid,
    };

    fn payload(id: Uuid, status: &str, min_bid: u32, current_bid: u32) -> String {
        json!({
            "auctionId": id,
            "status": status,
            "minBid": min_bid,
            "currentBid": current_bid,
            "endDate": "2026-08-09T12:00:00Z",
        })
        .to_string()
    }

    fn cache() -> Arc<AuctionCache> {
        Arc::new(AuctionCache::new(Duration::from_secs(600)))
    }

    #[tokio::test]
    async fn update_for_unknown_auction_is_added_to_the_cache() {
        let cache = cache();
        let id = Uuid::new_v4();

        apply_auction_update(&cache, &payload(id, "Active", 100, 150)).await;

        let cached = cache.get_by_id(id).await.unwrap();
        assert_eq!(cached.status, AuctionStatus::Active);
    }

    #[tokio::test]
    async fn status_change_moves_the_auction_between_partitions() {
        let cache = cache();
        let id = Uuid::new_v4();
        apply_auction_update(&cache, &payload(id, "Active", 100, 150)).await;

        apply_auction_update(&cache, &payload(id, "Closed", 100, 150)).await;

        assert!(cache.get_by_status(AuctionStatus::Active).await.is_empty());
        assert_eq!(cache.get_by_status(AuctionStatus::Closed).await.len(), 1);
    }

    #[tokio::test]
    async fn malformed_update_is_dropped_without_touching_the_cache() {
        let cache = cache();

        apply_auction_update(&cache, "{ not json").await;
        apply_auction_update(&cache, r#"{"auctionId": "not-a-uuid"}"#).await;

        assert!(cache.get_by_status(AuctionStatus::Active).await.is_empty());
        assert!(cache.get_by_status(AuctionStatus::Inactive).await.is_empty());
        assert!(cache.get_by_status(AuctionStatus::Closed).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_event_source_fails_after_the_attempt_budget() {
        // bind and drop so the port is known to refuse connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = SyncConfig {
            url:                  format!("ws://{}", addr),
            channel:              "syncAuctionQueue".to_string(),
            max_connect_attempts: 3,
            connect_backoff:      Duration::from_millis(10),
        };

        let result = run_sync_loop(cache(), config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn sync_loop_subscribes_and_applies_updates_from_the_stream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let auction_id = Uuid::new_v4();
        let update = payload(auction_id, "Active", 100, 150);

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws_stream = tokio_tungstenite::accept_async(stream).await.unwrap();
            let subscribe = ws_stream.next().await.unwrap().unwrap().into_text().unwrap();
            ws_stream.send(Message::Text(update)).await.unwrap();
            let _ = ws_stream.close(None).await;
            drop(listener);
            subscribe
        });

        let cache = cache();
        let config = SyncConfig {
            url:                  format!("ws://{}", addr),
            channel:              "syncAuctionQueue".to_string(),
            max_connect_attempts: 1,
            connect_backoff:      Duration::from_millis(10),
        };
        // the loop consumes the one update, loses the connection, and the
        // already-spent attempt budget turns the reconnect into terminal failure
        let result = run_sync_loop(cache.clone(), config).await;
        assert!(result.is_err());

        let subscribe: serde_json::Value =
            serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(subscribe["type"], "subscribe");
        assert_eq!(subscribe["channel"], "syncAuctionQueue");

        let cached = cache.get_by_id(auction_id).await.unwrap();
        assert_eq!(cached.status, AuctionStatus::Active);
    }
}
