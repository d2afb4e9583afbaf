use ::scraper::{Html, Selector};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument};

use super::{element_text, fetch_page, parse_int_or_zero, value_after_label};
use crate::api::endpoint_url;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{AtCoderMoreInfo, AtCoderSummary, MoreInfo, Platform, PlatformStats, Summary};

const LAST_COMPETED_FORMAT: &str = "%Y/%m/%d";

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let url = endpoint_url(&config.endpoints.atcoder, &["users", username])?;
    let body = fetch_page(client, &url, &config.user_agent).await?;
    let document = Html::parse_document(&body);
    let (summary, more_info) = parse_profile(&document, username, Utc::now())?;
    debug!(username, rating = summary.rating, "parsed atcoder profile");
    Ok(PlatformStats {
        summary: Summary::AtCoder(summary),
        more_info: Some(MoreInfo::AtCoder(more_info)),
        profile_url: Platform::AtCoder.profile_url(username),
    })
}

pub(crate) fn parse_profile(
    document: &Html,
    username: &str,
    now: DateTime<Utc>,
) -> Result<(AtCoderSummary, AtCoderMoreInfo)> {
    let username_selector = Selector::parse("a.username")?;
    if document.select(&username_selector).next().is_none() {
        return Err(StatsError::UserNotFound {
            platform: Platform::AtCoder,
            username: username.to_string(),
        });
    }

    let label_selector = Selector::parse("table.dl-table th")?;
    let row_text = |label: &str| {
        value_after_label(document, &label_selector, label)
            .map(|td| element_text(&td))
            .unwrap_or_default()
    };

    // Highest rating cell reads like "2604 ― 4 Dan (+196 to promote)".
    let grade_selector = Selector::parse("span.bold")?;
    let grade = value_after_label(document, &label_selector, "Highest Rating")
        .and_then(|td| td.select(&grade_selector).next())
        .map(|span| element_text(&span))
        .unwrap_or_default();

    let summary = AtCoderSummary {
        rating: parse_int_or_zero(&row_text("Rating")),
        highest_rating: parse_int_or_zero(&row_text("Highest Rating")),
        rank: parse_int_or_zero(&row_text("Rank")),
        rated_matches: parse_int_or_zero(&row_text("Rated Matches")),
        updated_at: Some(now),
    };
    let more_info = AtCoderMoreInfo {
        grade,
        last_competed: NaiveDate::parse_from_str(&row_text("Last Competed"), LAST_COMPETED_FORMAT)
            .ok(),
        country: row_text("Country/Region"),
        affiliation: row_text("Affiliation"),
    };
    Ok((summary, more_info))
}
