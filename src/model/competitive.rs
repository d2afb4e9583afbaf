use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Persisted LeetCode statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeetCodeSummary {
    pub total_solved: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
    pub ranking: u64,
    pub reputation: i64,
    pub contest_rating: f64,
    pub contests_attended: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Detail payload for LeetCode, returned once per refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeMoreInfo {
    pub global_ranking: u64,
    pub total_participants: u64,
    pub top_percentage: f64,
    pub contest_badge: Option<String>,
    pub contest_history: Vec<LeetCodeContest>,
    pub badges: Vec<String>,
    /// Accepted submissions per day, keyed by UTC date.
    pub submission_calendar: BTreeMap<NaiveDate, u32>,
}

/// A single attended LeetCode contest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContest {
    pub title: String,
    pub start_time: Option<DateTime<Utc>>,
    pub rating: f64,
    pub ranking: u64,
    pub problems_solved: u32,
    pub total_problems: u32,
}

/// Persisted Codeforces statistics.
///
/// `total_solved` is always zero: `user.info` does not expose a solved count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeforcesSummary {
    pub current_rating: i64,
    pub max_rating: i64,
    pub rank: String,
    pub max_rank: String,
    pub contribution: i64,
    pub total_solved: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesMoreInfo {
    pub handle: String,
    pub friend_of_count: u64,
    pub organization: String,
    pub country: String,
    pub avatar: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub last_online_at: Option<DateTime<Utc>>,
}

/// Persisted CodeChef statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeChefSummary {
    pub current_rating: u32,
    pub highest_rating: u32,
    pub stars: u8,
    pub global_rank: u64,
    pub country_rank: u64,
    pub total_solved: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChefMoreInfo {
    pub name: String,
    pub country: String,
    pub division: String,
    pub institution: String,
}

/// Persisted AtCoder statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtCoderSummary {
    pub rating: u32,
    pub highest_rating: u32,
    pub rank: u64,
    pub rated_matches: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtCoderMoreInfo {
    /// Kyu/Dan grade shown next to the highest rating, e.g. "2 Dan".
    pub grade: String,
    pub last_competed: Option<NaiveDate>,
    pub country: String,
    pub affiliation: String,
}

/// Persisted SPOJ statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpojSummary {
    pub world_rank: u64,
    pub points: f64,
    pub problems_solved: u32,
    pub solutions_submitted: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpojMoreInfo {
    pub name: String,
    pub joined: String,
    pub institution: String,
    pub solved_problems: Vec<String>,
}
