use ::scraper::{Html, Selector};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::{
    element_text, fetch_page, parse_float_or_zero, parse_int_or_zero, select_text,
    value_after_label,
};
use crate::api::endpoint_url;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{MoreInfo, Platform, PlatformStats, SpojMoreInfo, SpojSummary, Summary};

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let url = endpoint_url(&config.endpoints.spoj, &["users", username, ""])?;
    let body = fetch_page(client, &url, &config.user_agent).await?;
    let document = Html::parse_document(&body);
    let (summary, more_info) = parse_profile(&document, username, Utc::now())?;
    debug!(
        username,
        solved = summary.problems_solved,
        "parsed spoj profile"
    );
    Ok(PlatformStats {
        summary: Summary::Spoj(summary),
        more_info: Some(MoreInfo::Spoj(more_info)),
        profile_url: Platform::Spoj.profile_url(username),
    })
}

pub(crate) fn parse_profile(
    document: &Html,
    username: &str,
    now: DateTime<Utc>,
) -> Result<(SpojSummary, SpojMoreInfo)> {
    let left_selector = Selector::parse("#user-profile-left")?;
    let Some(left) = document.select(&left_selector).next() else {
        return Err(StatsError::UserNotFound {
            platform: Platform::Spoj,
            username: username.to_string(),
        });
    };

    let paragraph_selector = Selector::parse("p")?;
    let paragraphs: Vec<String> = left
        .select(&paragraph_selector)
        .map(|p| element_text(&p))
        .collect();
    let line_with = |marker: &str| {
        paragraphs
            .iter()
            .find(|p| p.contains(marker))
            .cloned()
            .unwrap_or_default()
    };

    // "World Rank: #12,345 (42.517 points)"
    let rank_line = line_with("World Rank");
    let (rank_text, points_text) = rank_line.split_once('(').unwrap_or((rank_line.as_str(), ""));
    let world_rank = parse_int_or_zero(rank_text);
    let points = parse_float_or_zero(points_text);

    let stat_selector = Selector::parse("dl.profile-info-data-stats dt")?;
    let stat = |label: &str| {
        value_after_label(document, &stat_selector, label)
            .map(|dd| parse_int_or_zero(&element_text(&dd)))
            .unwrap_or(0)
    };

    let name_selector = Selector::parse("h3")?;
    let name = select_text(&left, &name_selector);

    let solved_selector = Selector::parse("#user-profile-tables table td a")?;
    let solved_problems = document
        .select(&solved_selector)
        .map(|a| element_text(&a))
        .filter(|code| !code.is_empty())
        .collect();

    let summary = SpojSummary {
        world_rank,
        points,
        problems_solved: stat("Problems solved"),
        solutions_submitted: stat("Solutions submitted"),
        updated_at: Some(now),
    };
    let more_info = SpojMoreInfo {
        name,
        joined: line_with("Joined")
            .trim_start_matches("Joined")
            .trim()
            .to_string(),
        institution: line_with("Institution:")
            .split_once(':')
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default(),
        solved_problems,
    };
    Ok((summary, more_info))
}
