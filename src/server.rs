use {
    crate::{
        api,
        auction::cache::AuctionCache,
        bid::service::Service,
        config::{
            Config,
            RunOptions,
        },
        publisher::ChannelBidPublisher,
        sync,
    },
    anyhow::{
        anyhow,
        Result,
    },
    futures::future::join_all,
    std::{
        sync::{
            atomic::{
                AtomicBool,
                Ordering,
            },
            Arc,
        },
        time::Duration,
    },
};

pub async fn start_server(run_options: RunOptions) -> Result<()> {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to listen for the shutdown signal");
            return;
        }
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });

    let config = Config::load_or_default(&run_options.config.config).map_err(|err| {
        anyhow!(
            "Failed to load config from file({path}): {:?}",
            err,
            path = run_options.config.config
        )
    })?;

    let cache = Arc::new(AuctionCache::new(config.cache.ttl));
    let service = Service::new(
        cache.clone(),
        ChannelBidPublisher::new(config.publish.clone()),
    );

    let sync_loop = tokio::spawn({
        let cache = cache.clone();
        let sync_config = config.sync.clone();
        async move {
            if let Err(err) = sync::run_sync_loop(cache, sync_config).await {
                tracing::error!(error = ?err, "Auction sync worker exited with error");
            }
        }
    });
    let server_loop = tokio::spawn(async move {
        if let Err(err) = api::start_api(run_options, service).await {
            tracing::error!(error = ?err, "API server exited with error");
        }
    });
    join_all(vec![sync_loop, server_loop]).await;
    Ok(())
}

// A static exit flag to indicate to running threads that we're shutting down. This is used to
// gracefully shutdown the application.
//
// NOTE: A more idiomatic approach would be to use a tokio::sync::broadcast channel, and to send a
// shutdown signal to all running tasks. However, this is a bit more complicated to implement and
// we don't rely on global state for anything else.
pub(crate) static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);
