use chrono::{DateTime, Utc};
use ::scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::{
    element_text, fetch_page, parse_int_or_zero, select_document_text, value_after_label,
};
use crate::api::endpoint_url;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{CodeChefMoreInfo, CodeChefSummary, MoreInfo, Platform, PlatformStats, Summary};

const STAR_GLYPH: char = '★';

/// Lower rating bound of each star band, from 2★ upwards.
const STAR_BANDS: [u32; 6] = [1400, 1600, 1800, 2000, 2200, 2500];

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let url = endpoint_url(&config.endpoints.codechef, &["users", username])?;
    let body = fetch_page(client, &url, &config.user_agent).await?;
    let document = Html::parse_document(&body);
    let (summary, more_info) = parse_profile(&document, username, Utc::now())?;
    debug!(username, rating = summary.current_rating, "parsed codechef profile");
    Ok(PlatformStats {
        summary: Summary::CodeChef(summary),
        more_info: Some(MoreInfo::CodeChef(more_info)),
        profile_url: Platform::CodeChef.profile_url(username),
    })
}

pub(crate) fn parse_profile(
    document: &Html,
    username: &str,
    now: DateTime<Utc>,
) -> Result<(CodeChefSummary, CodeChefMoreInfo)> {
    // Unknown users are redirected to a page without the details container.
    let container_selector = Selector::parse("div.user-details-container")?;
    if document.select(&container_selector).next().is_none() {
        return Err(StatsError::UserNotFound {
            platform: Platform::CodeChef,
            username: username.to_string(),
        });
    }

    let rating_selector = Selector::parse("div.rating-header div.rating-number")?;
    let current_rating = parse_int_or_zero(&select_document_text(document, &rating_selector));

    let highest_selector = Selector::parse("div.rating-header small")?;
    let highest_rating = parse_int_or_zero(&select_document_text(document, &highest_selector));

    let star_selector = Selector::parse("div.rating-star")?;
    let stars = star_count(&select_document_text(document, &star_selector), current_rating);

    let rank_selector = Selector::parse("div.rating-ranks li")?;
    let strong_selector = Selector::parse("strong")?;
    let mut global_rank = 0;
    let mut country_rank = 0;
    for item in document.select(&rank_selector) {
        let label = element_text(&item);
        let value = item
            .select(&strong_selector)
            .next()
            .map(|s| parse_int_or_zero(&element_text(&s)))
            .unwrap_or(0);
        if label.contains("Global") {
            global_rank = value;
        } else if label.contains("Country") {
            country_rank = value;
        }
    }

    let solved_selector = Selector::parse("section.problems-solved h3")?;
    let total_solved = parse_int_or_zero(&select_document_text(document, &solved_selector));

    let name_selector = Selector::parse("div.user-details-container header h1")?;
    let country_selector = Selector::parse("span.user-country-name")?;
    let division_selector = Selector::parse("div.rating-header div")?;
    let label_selector = Selector::parse("div.user-details-container li label")?;

    let division = document
        .select(&division_selector)
        .map(|d| element_text(&d))
        .find(|t| t.contains("Div"))
        .map(|t| t.trim_matches(|c| c == '(' || c == ')').to_string())
        .unwrap_or_default();
    let institution = value_after_label(document, &label_selector, "Institution:")
        .map(|e| element_text(&e))
        .unwrap_or_default();

    let summary = CodeChefSummary {
        current_rating,
        highest_rating,
        stars,
        global_rank,
        country_rank,
        total_solved,
        updated_at: Some(now),
    };
    let more_info = CodeChefMoreInfo {
        name: select_document_text(document, &name_selector),
        country: select_document_text(document, &country_selector),
        division,
        institution,
    };
    Ok((summary, more_info))
}

/// Stars shown on the profile: the number of star glyphs, or the rating band when the
/// glyphs are missing from the markup.
fn star_count(star_text: &str, rating: u32) -> u8 {
    let glyphs = star_text.chars().filter(|c| *c == STAR_GLYPH).count();
    if glyphs > 0 {
        return u8::try_from(glyphs).unwrap_or(u8::MAX);
    }
    stars_for_rating(rating)
}

fn stars_for_rating(rating: u32) -> u8 {
    if rating == 0 {
        return 0;
    }
    1 + STAR_BANDS.iter().filter(|band| rating >= **band).count() as u8
}
