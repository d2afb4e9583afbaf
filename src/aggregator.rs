use std::panic::AssertUnwindSafe;

use futures::{FutureExt, StreamExt};
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::model::{AggregateResult, Platform, PlatformResult, ProfileLinks};
use crate::source::StatsSource;
use crate::username::extract_username;

/// Refreshes several platforms for one user, keeping each platform's outcome separate.
///
/// Nothing here returns an error: a platform without a usable link comes back
/// [`unconfigured`](crate::FetchStatus::Unconfigured), and one whose fetch errors or panics
/// comes back [`failed`](crate::FetchStatus::Failed) with default statistics.
pub struct Aggregator<S> {
    source: S,
    max_concurrency: usize,
}

impl<S: StatsSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Limit how many platforms are fetched at the same time. Values below 1 are treated as 1.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Refresh every platform in `platforms`, looking each one's link up in `links`.
    pub async fn aggregate_all(
        &self,
        platforms: &[Platform],
        links: &ProfileLinks,
    ) -> AggregateResult {
        let results: Vec<(Platform, PlatformResult)> = futures::stream::iter(platforms.iter().copied())
            .map(|platform| async move {
                let link = links.get(&platform).map(String::as_str).unwrap_or_default();
                (platform, self.aggregate_one(platform, link).await)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;
        results.into_iter().collect()
    }

    /// Refresh a single platform from the user's profile link.
    pub async fn aggregate_one(&self, platform: Platform, link: &str) -> PlatformResult {
        let link = link.trim();
        if link.is_empty() {
            return PlatformResult::unconfigured(platform);
        }
        let Some(username) = extract_username(platform, link) else {
            debug!(%platform, link, "no username in profile link");
            return PlatformResult::unconfigured(platform);
        };
        self.settle(platform, &username, link).await
    }

    /// Fetch `username` and fold any error or panic into a failed result pointing at
    /// `fallback_url`.
    pub(crate) async fn settle(
        &self,
        platform: Platform,
        username: &str,
        fallback_url: &str,
    ) -> PlatformResult {
        let fetch = AssertUnwindSafe(self.source.fetch(platform, username)).catch_unwind();
        match fetch.await {
            Ok(Ok(stats)) => stats.into(),
            Ok(Err(error)) => {
                warn!(%platform, username, %error, "fetch failed, using default stats");
                PlatformResult::failed(platform, fallback_url)
            }
            Err(_) => {
                warn!(%platform, username, "fetch panicked, using default stats");
                PlatformResult::failed(platform, fallback_url)
            }
        }
    }
}
