use {
    crate::{
        bid::entities::BidRecord,
        config::PublishConfig,
    },
    anyhow::Result,
    axum::async_trait,
    futures_util::SinkExt,
    serde::Serialize,
    tokio_tungstenite::{
        connect_async,
        tungstenite::{
            client::IntoClientRequest,
            Message,
        },
    },
};

#[cfg(test)]
use mockall::automock;

/// Seam between bid placement and the outbound transport. At-most-once:
/// failures surface to the caller, retries are the caller's decision.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BidPublisher: Send + Sync + 'static {
    async fn publish(&self, bid: BidRecord) -> Result<()>;
}

/// Envelope carrying a serialized record on a named channel.
#[derive(Serialize)]
struct ChannelMessage<'a, T> {
    channel: &'a str,
    data:    &'a T,
}

pub struct ChannelBidPublisher {
    config: PublishConfig,
}

impl ChannelBidPublisher {
    pub fn new(config: PublishConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BidPublisher for ChannelBidPublisher {
    /// Opens a fresh connection per call, sends the one frame, and returns as
    /// soon as the send succeeds. No pooling, no delivery confirmation.
    #[tracing::instrument(skip_all, fields(bid_id = %bid.bid_id))]
    async fn publish(&self, bid: BidRecord) -> Result<()> {
        let request = self.config.url.as_str().into_client_request()?;
        let (mut ws_stream, _) = connect_async(request).await?;

        let frame = serde_json::to_string(&ChannelMessage {
            channel: &self.config.channel,
            data:    &bid,
        })?;
        ws_stream.send(Message::Text(frame)).await?;
        let _ = ws_stream.close(None).await;

        tracing::info!(
            auction_id = %bid.auction_id,
            channel = self.config.channel.as_str(),
            "Published bid",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{
            BidPublisher,
            ChannelBidPublisher,
        },
        crate::{
            bid::entities::{
                BidRecord,
                BidRequest,
            },
            config::PublishConfig,
        },
        futures::StreamExt,
        rust_decimal::Decimal,
        uuid::Uuid,
    };

    fn bid() -> BidRecord {
        BidRecord::new(&BidRequest {
            auction_id: Uuid::new_v4(),
            bidder_id:  Uuid::new_v4(),
            amount:     Decimal::from(200),
        })
    }

    #[tokio::test]
    async fn publish_sends_one_envelope_on_the_bid_channel() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws_stream = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws_stream.next().await.unwrap().unwrap().into_text().unwrap()
        });

        let publisher = ChannelBidPublisher::new(PublishConfig {
            url:     format!("ws://{}", addr),
            channel: "bidQueue".to_string(),
        });
        let bid = bid();
        publisher.publish(bid.clone()).await.unwrap();

        let frame = server.await.unwrap();
        let envelope: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(envelope["channel"], "bidQueue");
        assert_eq!(envelope["data"]["auctionId"], bid.auction_id.to_string());
        assert_eq!(envelope["data"]["bidId"], bid.bid_id.to_string());
        assert_eq!(envelope["data"]["amount"], "200");
    }

    #[tokio::test]
    async fn publish_failure_surfaces_to_the_caller() {
        // bind and drop so the port is known to refuse connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let publisher = ChannelBidPublisher::new(PublishConfig {
            url:     format!("ws://{}", addr),
            channel: "bidQueue".to_string(),
        });

        assert!(publisher.publish(bid()).await.is_err());
    }
}
