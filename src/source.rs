use async_trait::async_trait;

use crate::config::StatsConfig;
use crate::error::Result;
use crate::model::{Platform, PlatformStats};
use crate::{api, scraper, unavailable};

/// Something that can turn a platform username into statistics.
///
/// [`HttpSource`] talks to the real upstreams; tests swap in their own implementations.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch(&self, platform: Platform, username: &str) -> Result<PlatformStats>;
}

/// Dispatches each platform to its HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    config: StatsConfig,
}

impl HttpSource {
    pub fn new(http: reqwest::Client, config: StatsConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }
}

#[async_trait]
impl StatsSource for HttpSource {
    async fn fetch(&self, platform: Platform, username: &str) -> Result<PlatformStats> {
        let (http, config) = (&self.http, &self.config);
        match platform {
            Platform::LeetCode => api::leetcode::fetch(http, config, username).await,
            Platform::Codeforces => api::codeforces::fetch(http, config, username).await,
            Platform::CodeChef => scraper::codechef::fetch(http, config, username).await,
            Platform::AtCoder => scraper::atcoder::fetch(http, config, username).await,
            Platform::Spoj => scraper::spoj::fetch(http, config, username).await,
            Platform::GitHub => api::github::fetch(http, config, username).await,
            Platform::LinkedIn | Platform::Twitter | Platform::Facebook | Platform::Instagram => {
                Ok(unavailable::stub(platform, username))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;
    use crate::config::Endpoints;
    use crate::model::Summary;

    #[tokio::test]
    async fn test_dispatches_to_platform_adapter() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/user.info")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "OK", "result": [{"handle": "tourist", "rating": 3800}]}"#)
            .create_async()
            .await;
        let config = StatsConfig::default().with_endpoints(Endpoints::with_base(&server.url()));
        let source = HttpSource::new(reqwest::Client::new(), config);

        let stats = source.fetch(Platform::Codeforces, "tourist").await.unwrap();
        assert!(matches!(stats.summary, Summary::Codeforces(ref s) if s.current_rating == 3800));
    }

    #[tokio::test]
    async fn test_social_stubs_make_no_requests() {
        let mut server = Server::new_async().await;
        let untouched = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let config = StatsConfig::default().with_endpoints(Endpoints::with_base(&server.url()));
        let source = HttpSource::new(reqwest::Client::new(), config);

        for platform in [Platform::LinkedIn, Platform::Facebook, Platform::Instagram] {
            let stats = source.fetch(platform, "someone").await.unwrap();
            assert!(matches!(stats.summary, Summary::Unavailable(_)));
        }
        untouched.assert_async().await;
    }
}
