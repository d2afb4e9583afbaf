use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::{
    AtCoderMoreInfo, AtCoderSummary, CodeChefMoreInfo, CodeChefSummary, CodeforcesMoreInfo,
    CodeforcesSummary, GitHubMoreInfo, GitHubSummary, LeetCodeMoreInfo, LeetCodeSummary,
    Platform, SpojMoreInfo, SpojSummary, UnavailableSummary,
};

/// Compact, persisted statistics for one platform.
///
/// Serializes as the bare inner record; the platform is carried by the surrounding map key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    LeetCode(LeetCodeSummary),
    Codeforces(CodeforcesSummary),
    CodeChef(CodeChefSummary),
    AtCoder(AtCoderSummary),
    Spoj(SpojSummary),
    GitHub(GitHubSummary),
    Unavailable(UnavailableSummary),
}

impl Summary {
    /// The zero-valued summary used when a platform is unconfigured or its fetch failed.
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::LeetCode => Summary::LeetCode(Default::default()),
            Platform::Codeforces => Summary::Codeforces(Default::default()),
            Platform::CodeChef => Summary::CodeChef(Default::default()),
            Platform::AtCoder => Summary::AtCoder(Default::default()),
            Platform::Spoj => Summary::Spoj(Default::default()),
            Platform::GitHub => Summary::GitHub(Default::default()),
            Platform::LinkedIn | Platform::Twitter | Platform::Facebook | Platform::Instagram => {
                Summary::Unavailable(Default::default())
            }
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Summary::LeetCode(s) => s.updated_at,
            Summary::Codeforces(s) => s.updated_at,
            Summary::CodeChef(s) => s.updated_at,
            Summary::AtCoder(s) => s.updated_at,
            Summary::Spoj(s) => s.updated_at,
            Summary::GitHub(s) => s.updated_at,
            Summary::Unavailable(_) => None,
        }
    }

    /// Replace the refresh timestamp, if this summary carries one.
    pub fn set_updated_at(&mut self, at: Option<DateTime<Utc>>) {
        match self {
            Summary::LeetCode(s) => s.updated_at = at,
            Summary::Codeforces(s) => s.updated_at = at,
            Summary::CodeChef(s) => s.updated_at = at,
            Summary::AtCoder(s) => s.updated_at = at,
            Summary::Spoj(s) => s.updated_at = at,
            Summary::GitHub(s) => s.updated_at = at,
            Summary::Unavailable(_) => {}
        }
    }
}

/// Transient per-platform detail, returned with a refresh but never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MoreInfo {
    LeetCode(LeetCodeMoreInfo),
    Codeforces(CodeforcesMoreInfo),
    CodeChef(CodeChefMoreInfo),
    AtCoder(AtCoderMoreInfo),
    Spoj(SpojMoreInfo),
    GitHub(Box<GitHubMoreInfo>),
}

/// What a source adapter hands back on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub summary: Summary,
    #[serde(serialize_with = "serialize_more_info")]
    pub more_info: Option<MoreInfo>,
    pub profile_url: String,
}

/// How a platform's entry in an [`AggregateResult`] came to be.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// No usable link; no request was made.
    Unconfigured,
    Ok,
    /// A request was made and failed; the summary holds defaults.
    Failed,
}

/// One platform's entry in a refresh result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResult {
    pub summary: Summary,
    #[serde(serialize_with = "serialize_more_info")]
    pub more_info: Option<MoreInfo>,
    pub profile_url: String,
    pub fetch_status: FetchStatus,
}

impl PlatformResult {
    pub(crate) fn unconfigured(platform: Platform) -> Self {
        Self {
            summary: Summary::default_for(platform),
            more_info: None,
            profile_url: String::new(),
            fetch_status: FetchStatus::Unconfigured,
        }
    }

    pub(crate) fn failed(platform: Platform, link: &str) -> Self {
        Self {
            summary: Summary::default_for(platform),
            more_info: None,
            profile_url: link.to_string(),
            fetch_status: FetchStatus::Failed,
        }
    }
}

impl From<PlatformStats> for PlatformResult {
    fn from(stats: PlatformStats) -> Self {
        Self {
            summary: stats.summary,
            more_info: stats.more_info,
            profile_url: stats.profile_url,
            fetch_status: FetchStatus::Ok,
        }
    }
}

/// The outcome of refreshing several platforms for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult(pub BTreeMap<Platform, PlatformResult>);

impl AggregateResult {
    pub fn get(&self, platform: Platform) -> Option<&PlatformResult> {
        self.0.get(&platform)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The persisted part of the result.
    pub fn summaries(&self) -> BTreeMap<Platform, Summary> {
        self.0
            .iter()
            .map(|(platform, result)| (*platform, result.summary.clone()))
            .collect()
    }

    /// Split into the summaries to persist and the transient details to return.
    pub fn into_parts(self) -> (BTreeMap<Platform, Summary>, BTreeMap<Platform, Option<MoreInfo>>) {
        let mut summaries = BTreeMap::new();
        let mut details = BTreeMap::new();
        for (platform, result) in self.0 {
            summaries.insert(platform, result.summary);
            details.insert(platform, result.more_info);
        }
        (summaries, details)
    }
}

impl FromIterator<(Platform, PlatformResult)> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = (Platform, PlatformResult)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn serialize_more_info<S: Serializer>(
    more_info: &Option<MoreInfo>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match more_info {
        Some(info) => info.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
