use tracing::{instrument, warn};

use crate::aggregator::Aggregator;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::*;
use crate::source::{HttpSource, StatsSource};

/// The main entry point for refreshing a user's external profile statistics.
///
/// `StatsClient` wraps a [`reqwest::Client`] and a [`StatsConfig`] and exposes methods
/// to refresh all competitive or social platforms at once, a single platform, or to
/// query one adapter directly.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> profile_stats::Result<()> {
/// use profile_stats::{Platform, ProfileLinks, StatsClient, StatsConfig};
///
/// let client = StatsClient::with_config(StatsConfig::from_env())?;
/// let links = ProfileLinks::from([
///     (Platform::LeetCode, "https://leetcode.com/u/alice/".to_string()),
///     (Platform::Codeforces, String::new()),
/// ]);
/// let result = client.fetch_all_competitive_stats(&links).await;
/// let (summaries, _details) = result.into_parts();
/// println!("refreshed {} platforms", summaries.len());
/// # Ok(())
/// # }
/// ```
pub struct StatsClient {
    aggregator: Aggregator<HttpSource>,
}

impl StatsClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        let config = StatsConfig::default();
        let http = build_http(&config).unwrap_or_default();
        Self::from_parts(http, config)
    }

    /// Create a new client using the provided [`reqwest::Client`] and default settings.
    ///
    /// The client's own timeout and user agent apply; [`StatsConfig::timeout`] is not
    /// re-applied to it.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self::from_parts(client, StatsConfig::default())
    }

    /// Create a new client whose HTTP client is built from `config`.
    pub fn with_config(config: StatsConfig) -> Result<Self> {
        let http = build_http(&config).map_err(StatsError::ClientBuild)?;
        Ok(Self::from_parts(http, config))
    }

    /// Combine an existing [`reqwest::Client`] with explicit settings.
    pub fn from_parts(client: reqwest::Client, config: StatsConfig) -> Self {
        let limit = config.max_concurrency;
        Self {
            aggregator: Aggregator::new(HttpSource::new(client, config)).with_max_concurrency(limit),
        }
    }

    pub fn config(&self) -> &StatsConfig {
        self.aggregator.source().config()
    }

    /// Refresh LeetCode, Codeforces, CodeChef, AtCoder and SPOJ from the user's links.
    #[instrument(skip(self))]
    pub async fn fetch_all_competitive_stats(&self, links: &ProfileLinks) -> AggregateResult {
        self.aggregator
            .aggregate_all(&Platform::COMPETITIVE, links)
            .await
    }

    /// Refresh GitHub, LinkedIn, Twitter, Facebook and Instagram from the user's links.
    #[instrument(skip(self))]
    pub async fn fetch_all_social_stats(&self, links: &ProfileLinks) -> AggregateResult {
        self.aggregator.aggregate_all(&Platform::SOCIAL, links).await
    }

    /// Refresh one platform from its profile link.
    #[instrument(skip(self))]
    pub async fn refresh_platform(&self, platform: Platform, link: &str) -> PlatformResult {
        self.aggregator.aggregate_one(platform, link).await
    }

    /// Fetch one platform for a username that is already known.
    ///
    /// Failures come back as default statistics pointing at the canonical profile page.
    #[instrument(skip(self))]
    pub async fn fetch_social_stats(&self, platform: Platform, username: &str) -> PlatformResult {
        let username = username.trim();
        if username.is_empty() {
            return PlatformResult::unconfigured(platform);
        }
        self.aggregator
            .settle(platform, username, &platform.profile_url(username))
            .await
    }

    /// Run a single adapter, returning `None` when it fails.
    #[instrument(skip(self))]
    pub async fn fetch_stats(&self, platform: Platform, username: &str) -> Option<PlatformStats> {
        match self.aggregator.source().fetch(platform, username).await {
            Ok(stats) => Some(stats),
            Err(error) => {
                warn!(%platform, username, %error, "fetch failed");
                None
            }
        }
    }
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_http(config: &StatsConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}
