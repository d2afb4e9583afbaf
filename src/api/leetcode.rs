use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::api::post_graphql;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{
    LeetCodeContest, LeetCodeMoreInfo, LeetCodeSummary, MoreInfo, Platform, PlatformStats,
    Summary,
};

const PROFILE_QUERY: &str = r#"
query userProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile { ranking reputation }
    submitStatsGlobal { acSubmissionNum { difficulty count } }
    badges { name }
    submissionCalendar
  }
  userContestRanking(username: $username) { rating attendedContestsCount }
}
"#;

const CONTEST_QUERY: &str = r#"
query userContestRankingInfo($username: String!) {
  userContestRanking(username: $username) {
    attendedContestsCount
    rating
    globalRanking
    totalParticipants
    topPercentage
    badge { name }
  }
  userContestRankingHistory(username: $username) {
    attended
    rating
    ranking
    problemsSolved
    totalProblems
    contest { title startTime }
  }
}
"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileData {
    matched_user: Option<MatchedUser>,
    user_contest_ranking: Option<ContestRanking>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MatchedUser {
    profile: Option<UserProfile>,
    submit_stats_global: Option<SubmitStats>,
    badges: Vec<Badge>,
    submission_calendar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserProfile {
    ranking: Option<u64>,
    reputation: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SubmitStats {
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DifficultyCount {
    difficulty: String,
    count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Badge {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContestData {
    user_contest_ranking: Option<ContestRanking>,
    user_contest_ranking_history: Option<Vec<ContestHistoryEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContestRanking {
    attended_contests_count: Option<u32>,
    rating: Option<f64>,
    global_ranking: Option<u64>,
    total_participants: Option<u64>,
    top_percentage: Option<f64>,
    badge: Option<Badge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContestHistoryEntry {
    attended: bool,
    rating: f64,
    ranking: u64,
    problems_solved: u32,
    total_problems: u32,
    contest: ContestRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContestRef {
    title: String,
    start_time: i64,
}

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let url = &config.endpoints.leetcode_graphql;
    let variables = json!({ "username": username });

    let profile: ProfileData = post_graphql(
        graphql_request(client, config, url),
        url,
        PROFILE_QUERY,
        &variables,
    )
    .await?;

    // The advanced ranking lives behind a second query; without it we fall back to the
    // basic rating from the profile query.
    let contest = match post_graphql::<_, ContestData>(
        graphql_request(client, config, url),
        url,
        CONTEST_QUERY,
        &variables,
    )
    .await
    {
        Ok(contest) => Some(contest),
        Err(err) => {
            warn!(username, %err, "leetcode contest ranking unavailable");
            None
        }
    };

    let stats = build_stats(username, profile, contest, Utc::now())?;
    debug!(username, "parsed leetcode profile");
    Ok(stats)
}

fn graphql_request(
    client: &reqwest::Client,
    config: &StatsConfig,
    url: &str,
) -> reqwest::RequestBuilder {
    client
        .post(url)
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .header(reqwest::header::REFERER, "https://leetcode.com")
}

fn build_stats(
    username: &str,
    profile: ProfileData,
    contest: Option<ContestData>,
    now: DateTime<Utc>,
) -> Result<PlatformStats> {
    let user = profile
        .matched_user
        .ok_or_else(|| StatsError::UserNotFound {
            platform: Platform::LeetCode,
            username: username.to_string(),
        })?;

    let solved = user
        .submit_stats_global
        .map(|s| s.ac_submission_num)
        .unwrap_or_default();
    let solved_for = |difficulty: &str| {
        solved
            .iter()
            .find(|d| d.difficulty.eq_ignore_ascii_case(difficulty))
            .map(|d| d.count)
            .unwrap_or(0)
    };

    let basic = profile.user_contest_ranking.unwrap_or_default();
    let (advanced, history) = match contest {
        Some(contest) => (
            contest.user_contest_ranking,
            contest.user_contest_ranking_history.unwrap_or_default(),
        ),
        None => (None, Vec::new()),
    };

    let contest_rating = advanced
        .as_ref()
        .and_then(|a| a.rating)
        .or(basic.rating)
        .unwrap_or(0.0);
    let contests_attended = advanced
        .as_ref()
        .and_then(|a| a.attended_contests_count)
        .or(basic.attended_contests_count)
        .unwrap_or(0);

    let user_profile = user.profile.unwrap_or_default();
    let summary = LeetCodeSummary {
        total_solved: solved_for("All"),
        easy_solved: solved_for("Easy"),
        medium_solved: solved_for("Medium"),
        hard_solved: solved_for("Hard"),
        ranking: user_profile.ranking.unwrap_or(0),
        reputation: user_profile.reputation.unwrap_or(0),
        contest_rating,
        contests_attended,
        updated_at: Some(now),
    };

    let advanced = advanced.unwrap_or_default();
    let more_info = LeetCodeMoreInfo {
        global_ranking: advanced.global_ranking.unwrap_or(0),
        total_participants: advanced.total_participants.unwrap_or(0),
        top_percentage: advanced.top_percentage.unwrap_or(0.0),
        contest_badge: advanced.badge.map(|b| b.name).filter(|n| !n.is_empty()),
        contest_history: history
            .into_iter()
            .filter(|entry| entry.attended)
            .map(|entry| LeetCodeContest {
                title: entry.contest.title,
                start_time: DateTime::from_timestamp(entry.contest.start_time, 0),
                rating: entry.rating,
                ranking: entry.ranking,
                problems_solved: entry.problems_solved,
                total_problems: entry.total_problems,
            })
            .collect(),
        badges: user.badges.into_iter().map(|b| b.name).collect(),
        submission_calendar: user
            .submission_calendar
            .as_deref()
            .map(parse_submission_calendar)
            .unwrap_or_default(),
    };

    Ok(PlatformStats {
        summary: Summary::LeetCode(summary),
        more_info: Some(MoreInfo::LeetCode(more_info)),
        profile_url: Platform::LeetCode.profile_url(username),
    })
}

/// Decode the JSON-encoded `{"<unix seconds>": count}` calendar into per-day counts.
fn parse_submission_calendar(raw: &str) -> BTreeMap<NaiveDate, u32> {
    let entries: HashMap<String, u32> = serde_json::from_str(raw).unwrap_or_default();
    let mut calendar = BTreeMap::new();
    for (timestamp, count) in entries {
        let Some(day) = timestamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|t| t.date_naive())
        else {
            continue;
        };
        *calendar.entry(day).or_insert(0) += count;
    }
    calendar
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::config::Endpoints;

    const PROFILE_BODY: &str = r#"{
      "data": {
        "matchedUser": {
          "username": "alice",
          "profile": { "ranking": 12345, "reputation": 17 },
          "submitStatsGlobal": {
            "acSubmissionNum": [
              { "difficulty": "All", "count": 300 },
              { "difficulty": "Easy", "count": 150 },
              { "difficulty": "Medium", "count": 120 }
            ]
          },
          "badges": [{ "name": "50 Days Badge 2024" }],
          "submissionCalendar": "{\"1704067200\": 3, \"1704153600\": 1, \"oops\": 9}"
        },
        "userContestRanking": { "rating": 1650.2, "attendedContestsCount": 9 }
      }
    }"#;

    const CONTEST_BODY: &str = r#"{
      "data": {
        "userContestRanking": {
          "attendedContestsCount": 10,
          "rating": 1702.75,
          "globalRanking": 54321,
          "totalParticipants": 600000,
          "topPercentage": 9.8,
          "badge": null
        },
        "userContestRankingHistory": [
          { "attended": false, "rating": 1500, "ranking": 0, "problemsSolved": 0, "totalProblems": 4,
            "contest": { "title": "Weekly Contest 1", "startTime": 1700000000 } },
          { "attended": true, "rating": 1702.75, "ranking": 1234, "problemsSolved": 3, "totalProblems": 4,
            "contest": { "title": "Weekly Contest 2", "startTime": 1700600000 } }
        ]
      }
    }"#;

    fn config_for(server: &mockito::Server) -> StatsConfig {
        StatsConfig::default().with_endpoints(Endpoints::with_base(&server.url()))
    }

    async fn mock_query(
        server: &mut mockito::Server,
        operation: &str,
        status: usize,
        body: &str,
    ) -> mockito::Mock {
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(operation.to_string()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_fetch_prefers_advanced_contest_rating() {
        let mut server = mockito::Server::new_async().await;
        let _p = mock_query(&mut server, "userProfile", 200, PROFILE_BODY).await;
        let _c = mock_query(&mut server, "userContestRankingInfo", 200, CONTEST_BODY).await;

        let client = reqwest::Client::new();
        let stats = fetch(&client, &config_for(&server), "alice").await.unwrap();

        let Summary::LeetCode(summary) = &stats.summary else {
            panic!("expected leetcode summary");
        };
        assert_eq!(summary.total_solved, 300);
        assert_eq!(summary.easy_solved, 150);
        assert_eq!(summary.medium_solved, 120);
        assert_eq!(summary.hard_solved, 0);
        assert_eq!(summary.ranking, 12345);
        assert_eq!(summary.contest_rating, 1702.75);
        assert_eq!(summary.contests_attended, 10);
        assert!(summary.updated_at.is_some());
        assert_eq!(stats.profile_url, "https://leetcode.com/u/alice/");

        let Some(MoreInfo::LeetCode(info)) = &stats.more_info else {
            panic!("expected leetcode details");
        };
        assert_eq!(info.global_ranking, 54321);
        assert_eq!(info.contest_history.len(), 1);
        assert_eq!(info.contest_history[0].title, "Weekly Contest 2");
        assert_eq!(info.badges, vec!["50 Days Badge 2024".to_string()]);
        assert_eq!(info.submission_calendar.len(), 2);
        assert_eq!(
            info.submission_calendar[&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
            3
        );
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_basic_rating() {
        let mut server = mockito::Server::new_async().await;
        let _p = mock_query(&mut server, "userProfile", 200, PROFILE_BODY).await;
        let _c = mock_query(&mut server, "userContestRankingInfo", 500, "").await;

        let client = reqwest::Client::new();
        let stats = fetch(&client, &config_for(&server), "alice").await.unwrap();

        let Summary::LeetCode(summary) = &stats.summary else {
            panic!("expected leetcode summary");
        };
        assert_eq!(summary.contest_rating, 1650.2);
        assert_eq!(summary.contests_attended, 9);
    }

    #[tokio::test]
    async fn test_fetch_unknown_user() {
        let mut server = mockito::Server::new_async().await;
        let _p = mock_query(
            &mut server,
            "userProfile",
            200,
            r#"{"data": {"matchedUser": null, "userContestRanking": null},
                "errors": [{"message": "That user does not exist."}]}"#,
        )
        .await;
        let _c = mock_query(&mut server, "userContestRankingInfo", 200, r#"{"data": {}}"#).await;

        let client = reqwest::Client::new();
        let result = fetch(&client, &config_for(&server), "ghost").await;
        assert!(matches!(result, Err(StatsError::UserNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _p = mock_query(&mut server, "userProfile", 502, "bad gateway").await;

        let client = reqwest::Client::new();
        let result = fetch(&client, &config_for(&server), "alice").await;
        assert!(matches!(result, Err(StatsError::UnexpectedStatus { .. })));
    }

    #[test]
    fn test_parse_submission_calendar_merges_same_day() {
        let calendar = parse_submission_calendar(r#"{"1704067200": 2, "1704070800": 5}"#);
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar.values().sum::<u32>(), 7);
        assert!(parse_submission_calendar("not json").is_empty());
    }
}
