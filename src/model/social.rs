use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Persisted GitHub statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitHubSummary {
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub public_gists: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_contributions: u64,
    pub longest_streak: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Everything else the GitHub adapter synthesizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubMoreInfo {
    pub profile: GitHubProfile,
    pub repo_stats: RepoStats,
    pub contributions: ContributionCalendar,
    pub event_types: BTreeMap<String, u32>,
    pub streak: StreakStats,
    pub social: SocialGraph,
    pub organizations: Vec<String>,
    pub starred_count: u64,
    pub starred_languages: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubProfile {
    pub login: String,
    pub name: String,
    pub bio: String,
    pub company: String,
    pub location: String,
    pub blog: String,
    pub avatar_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate statistics over a user's own repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_watchers: u64,
    pub total_size: u64,
    pub most_starred: Option<RepoHighlight>,
    pub most_forked: Option<RepoHighlight>,
    /// Summed repository size per primary language.
    pub languages: BTreeMap<String, u64>,
    pub topics: BTreeMap<String, u32>,
    pub licenses: BTreeMap<String, u32>,
    pub size_distribution: SizeDistribution,
    pub active_repos: u32,
    pub stale_repos: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoHighlight {
    pub name: String,
    pub url: String,
    pub count: u64,
}

/// Repository count per size bucket (`< 1000`, `< 10000`, the rest).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizeDistribution {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total: u64,
    pub days: BTreeMap<NaiveDate, u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialGraph {
    pub followers: u64,
    pub following: u64,
    pub mutual: u64,
}

/// Summary for platforms that cannot be fetched without a logged-in session.
///
/// The counters stay `None` because the platform never supplies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnavailableSummary {
    pub message: String,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub posts: Option<u64>,
}
