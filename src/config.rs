use {
    anyhow::Result,
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    std::{
        fs,
        path::Path,
        time::Duration,
    },
};

mod server;

#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Run the bid server service.
    Run(RunOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    #[command(flatten)]
    pub config: ConfigOptions,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Config Options")]
#[group(id = "Config")]
pub struct ConfigOptions {
    /// Path to a configuration file describing the external auction event source,
    /// the bid publish channel, and the cache expiry.
    #[arg(long = "config")]
    #[arg(env = "BID_CONFIG")]
    #[arg(default_value = "config.yaml")]
    pub config: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync:    SyncConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub cache:   CacheConfig,
}

impl Config {
    /// Loads the configuration from a YAML file. A missing file is not an error:
    /// every field has a documented default, so startup proceeds on defaults.
    pub fn load_or_default(path: &str) -> Result<Config> {
        if !Path::new(path).exists() {
            tracing::info!(path = path, "Config file not found, using defaults");
            return Ok(Config::default());
        }
        let yaml_content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&yaml_content)?;
        Ok(config)
    }
}

/// Connection policy for the inbound auction-state event channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// WebSocket URL of the external auction event source.
    pub url: String,

    /// Channel carrying auction-state change events.
    pub channel: String,

    /// Number of consecutive failed connection attempts after which the sync
    /// worker gives up for good.
    pub max_connect_attempts: u32,

    /// Fixed wait between connection attempts.
    #[serde(with = "humantime_serde")]
    pub connect_backoff: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            url:                  "ws://localhost:9002/events".to_string(),
            channel:              "syncAuctionQueue".to_string(),
            max_connect_attempts: 50,
            connect_backoff:      Duration::from_secs(5),
        }
    }
}

/// Delivery target for accepted bids.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// WebSocket URL of the outbound event channel.
    pub url: String,

    /// Channel accepted bids are published on.
    pub channel: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            url:     "ws://localhost:9003/events".to_string(),
            channel: "bidQueue".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Absolute time-to-live of a status partition, measured from its last write.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = Config::load_or_default("/nonexistent/bid-server.yaml").unwrap();
        assert_eq!(config.sync.channel, "syncAuctionQueue");
        assert_eq!(config.sync.max_connect_attempts, 50);
        assert_eq!(config.sync.connect_backoff, Duration::from_secs(5));
        assert_eq!(config.publish.channel, "bidQueue");
        assert_eq!(config.cache.ttl, Duration::from_secs(600));
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_sections() {
        let config: Config = serde_yaml::from_str(
            "sync:\n  url: ws://auctions.internal:9002/events\n  connect_backoff: 2s\n",
        )
        .unwrap();
        assert_eq!(config.sync.url, "ws://auctions.internal:9002/events");
        assert_eq!(config.sync.connect_backoff, Duration::from_secs(2));
        // untouched sections and fields come from the defaults
        assert_eq!(config.sync.channel, "syncAuctionQueue");
        assert_eq!(config.publish.url, "ws://localhost:9003/events");
        assert_eq!(config.cache.ttl, Duration::from_secs(600));
    }
}
