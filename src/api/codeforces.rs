use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::fetch_json;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{
    CodeforcesMoreInfo, CodeforcesSummary, MoreInfo, Platform, PlatformStats, Summary,
};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct User {
    handle: String,
    rating: i64,
    max_rating: i64,
    rank: String,
    max_rank: String,
    contribution: i64,
    friend_of_count: u64,
    organization: String,
    country: String,
    avatar: String,
    registration_time_seconds: Option<i64>,
    last_online_time_seconds: Option<i64>,
}

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let handle: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    let url = format!(
        "{}/user.info?handles={handle}",
        config.endpoints.codeforces_api
    );
    let request = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, &config.user_agent);
    let response: ApiResponse = fetch_json(request, &url).await?;
    let stats = build_stats(username, response, Utc::now())?;
    debug!(username, "parsed codeforces profile");
    Ok(stats)
}

fn build_stats(username: &str, response: ApiResponse, now: DateTime<Utc>) -> Result<PlatformStats> {
    // An HTTP 200 is not enough: the API reports failures in `status`.
    if response.status != "OK" {
        return Err(StatsError::Upstream {
            platform: Platform::Codeforces,
            message: response
                .comment
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    let user = response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| StatsError::UserNotFound {
            platform: Platform::Codeforces,
            username: username.to_string(),
        })?;

    let summary = CodeforcesSummary {
        current_rating: user.rating,
        max_rating: user.max_rating,
        rank: user.rank,
        max_rank: user.max_rank,
        contribution: user.contribution,
        // user.info has no solved count.
        total_solved: 0,
        updated_at: Some(now),
    };

    let more_info = CodeforcesMoreInfo {
        handle: user.handle.clone(),
        friend_of_count: user.friend_of_count,
        organization: user.organization,
        country: user.country,
        avatar: user.avatar,
        registered_at: user
            .registration_time_seconds
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        last_online_at: user
            .last_online_time_seconds
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    };

    let handle = if user.handle.is_empty() {
        username
    } else {
        &user.handle
    };

    Ok(PlatformStats {
        summary: Summary::Codeforces(summary),
        more_info: Some(MoreInfo::Codeforces(more_info)),
        profile_url: Platform::Codeforces.profile_url(handle),
    })
}
