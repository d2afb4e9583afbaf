use std::time::Duration;

use tracing::warn;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("profile-stats/", env!("CARGO_PKG_VERSION"));

const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
const TIMEOUT_VAR: &str = "PROFILE_STATS_TIMEOUT_SECS";
const MAX_CONCURRENCY_VAR: &str = "PROFILE_STATS_MAX_CONCURRENCY";

/// Base URLs of every upstream. Overridable so tests can point adapters at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub leetcode_graphql: String,
    pub codeforces_api: String,
    pub codechef: String,
    pub atcoder: String,
    pub spoj: String,
    pub github_api: String,
    pub github_graphql: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            leetcode_graphql: "https://leetcode.com/graphql".to_string(),
            codeforces_api: "https://codeforces.com/api".to_string(),
            codechef: "https://www.codechef.com".to_string(),
            atcoder: "https://atcoder.jp".to_string(),
            spoj: "https://www.spoj.com".to_string(),
            github_api: "https://api.github.com".to_string(),
            github_graphql: "https://api.github.com/graphql".to_string(),
        }
    }
}

impl Endpoints {
    /// Route every upstream through a single base URL, keeping each platform's path layout.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            leetcode_graphql: format!("{base}/graphql"),
            codeforces_api: format!("{base}/api"),
            codechef: base.to_string(),
            atcoder: base.to_string(),
            spoj: base.to_string(),
            github_api: base.to_string(),
            github_graphql: format!("{base}/graphql"),
        }
    }
}

/// Settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub endpoints: Endpoints,
    /// Applied to every upstream request.
    pub timeout: Duration,
    pub user_agent: String,
    /// Bearer token for the GitHub APIs. The contribution calendar cannot be fetched without it.
    pub github_token: Option<String>,
    /// Upper bound on platforms refreshed at the same time.
    pub max_concurrency: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            github_token: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl StatsConfig {
    /// Defaults overlaid with `GITHUB_TOKEN`, `PROFILE_STATS_TIMEOUT_SECS` and
    /// `PROFILE_STATS_MAX_CONCURRENCY` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(token) = lookup(GITHUB_TOKEN_VAR).filter(|t| !t.trim().is_empty()) {
            config.github_token = Some(token.trim().to_string());
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(var = TIMEOUT_VAR, value = %raw, "ignoring invalid timeout"),
            }
        }

        if let Some(raw) = lookup(MAX_CONCURRENCY_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.max_concurrency = limit,
                _ => warn!(var = MAX_CONCURRENCY_VAR, value = %raw, "ignoring invalid concurrency limit"),
            }
        }

        config
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Values below one are clamped to one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_from_lookup_reads_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_TOKEN", " ghp_secret "),
            ("PROFILE_STATS_TIMEOUT_SECS", "30"),
            ("PROFILE_STATS_MAX_CONCURRENCY", "2"),
        ]);
        let config = StatsConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.github_token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrency, 2);
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_TOKEN", "  "),
            ("PROFILE_STATS_TIMEOUT_SECS", "soon"),
            ("PROFILE_STATS_MAX_CONCURRENCY", "0"),
        ]);
        let config = StatsConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.github_token, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_endpoints_with_base() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:1234/");
        assert_eq!(endpoints.leetcode_graphql, "http://127.0.0.1:1234/graphql");
        assert_eq!(endpoints.codeforces_api, "http://127.0.0.1:1234/api");
        assert_eq!(endpoints.github_api, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_max_concurrency_is_clamped() {
        assert_eq!(StatsConfig::default().with_max_concurrency(0).max_concurrency, 1);
    }
}
