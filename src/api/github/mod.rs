mod analysis;

use std::collections::BTreeMap;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::api::{endpoint_url, fetch_json, post_graphql};
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::{
    ContributionCalendar, GitHubMoreInfo, GitHubProfile, GitHubSummary, MoreInfo, Platform,
    PlatformStats, SocialGraph, Summary,
};

const PER_PAGE: u32 = 100;

const CONTRIBUTIONS_QUERY: &str = r#"
query userContributions($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks { contributionDays { date contributionCount } }
      }
    }
  }
}
"#;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
    blog: Option<String>,
    avatar_url: String,
    followers: u64,
    following: u64,
    public_repos: u64,
    public_gists: u64,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Repo {
    pub(crate) name: String,
    pub(crate) html_url: String,
    pub(crate) stargazers_count: u64,
    pub(crate) forks_count: u64,
    pub(crate) watchers_count: u64,
    pub(crate) size: u64,
    pub(crate) language: Option<String>,
    pub(crate) topics: Vec<String>,
    pub(crate) license: Option<License>,
    pub(crate) pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct License {
    pub(crate) spdx_id: Option<String>,
    pub(crate) name: Option<String>,
}

impl License {
    /// SPDX id when GitHub recognised the license, the free-form name otherwise.
    pub(crate) fn display_name(&self) -> &str {
        self.spdx_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "NOASSERTION")
            .or(self.name.as_deref())
            .unwrap_or("Other")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Event {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserRef {
    pub(crate) login: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContributionsData {
    user: Option<ContributionsUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContributionsUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContributionsCollection {
    contribution_calendar: RawCalendar,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCalendar {
    total_contributions: u64,
    weeks: Vec<RawWeek>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawWeek {
    contribution_days: Vec<RawDay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDay {
    date: Option<NaiveDate>,
    contribution_count: u32,
}

/// Everything fetched for one GitHub user, before synthesis.
struct RawProfile {
    user: User,
    repos: Vec<Repo>,
    events: Vec<Event>,
    orgs: Vec<UserRef>,
    starred: Vec<Repo>,
    followers: Vec<UserRef>,
    following: Vec<UserRef>,
    calendar: RawCalendar,
}

#[instrument(skip(client, config))]
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &StatsConfig,
    username: &str,
) -> Result<PlatformStats> {
    let token = config
        .github_token
        .as_deref()
        .ok_or(StatsError::MissingCredential("github token"))?;

    let user_url = endpoint_url(&config.endpoints.github_api, &["users", username])?;
    let url = |path: &str| format!("{user_url}{path}");

    // Any one failure fails the whole adapter.
    let (user, repos, events, orgs, starred, followers, following) = futures::try_join!(
        rest_get::<User>(client, config, token, url("")),
        rest_get::<Vec<Repo>>(
            client,
            config,
            token,
            url(&format!("/repos?per_page={PER_PAGE}&sort=updated"))
        ),
        rest_get::<Vec<Event>>(
            client,
            config,
            token,
            url(&format!("/events/public?per_page={PER_PAGE}"))
        ),
        rest_get::<Vec<UserRef>>(client, config, token, url("/orgs")),
        rest_get::<Vec<Repo>>(
            client,
            config,
            token,
            url(&format!("/starred?per_page={PER_PAGE}"))
        ),
        rest_get::<Vec<UserRef>>(
            client,
            config,
            token,
            url(&format!("/followers?per_page={PER_PAGE}"))
        ),
        rest_get::<Vec<UserRef>>(
            client,
            config,
            token,
            url(&format!("/following?per_page={PER_PAGE}"))
        ),
    )?;

    let now = Utc::now();
    let calendar = fetch_contributions(client, config, token, username, now).await?;

    let raw = RawProfile {
        user,
        repos,
        events,
        orgs,
        starred,
        followers,
        following,
        calendar,
    };
    let stats = build_stats(raw, now);
    debug!(username, "parsed github profile");
    Ok(stats)
}

async fn rest_get<T: DeserializeOwned>(
    client: &reqwest::Client,
    config: &StatsConfig,
    token: &str,
    url: String,
) -> Result<T> {
    let request = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .bearer_auth(token);
    fetch_json(request, &url).await
}

async fn fetch_contributions(
    client: &reqwest::Client,
    config: &StatsConfig,
    token: &str,
    username: &str,
    now: DateTime<Utc>,
) -> Result<RawCalendar> {
    let url = &config.endpoints.github_graphql;
    let from = now.checked_sub_months(Months::new(12)).unwrap_or(now);
    let request = client
        .post(url)
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .bearer_auth(token);
    let data: ContributionsData = post_graphql(
        request,
        url,
        CONTRIBUTIONS_QUERY,
        json!({ "login": username, "from": from, "to": now }),
    )
    .await?;

    data.user
        .map(|u| u.contributions_collection.contribution_calendar)
        .ok_or_else(|| StatsError::UserNotFound {
            platform: Platform::GitHub,
            username: username.to_string(),
        })
}

fn build_stats(raw: RawProfile, now: DateTime<Utc>) -> PlatformStats {
    let repo_stats = analysis::repo_stats(&raw.repos, now);
    let timestamps: Vec<DateTime<Utc>> = raw.events.iter().filter_map(|e| e.created_at).collect();
    let streak = analysis::streaks(&timestamps);

    let contributions = ContributionCalendar {
        total: raw.calendar.total_contributions,
        days: raw
            .calendar
            .weeks
            .iter()
            .flat_map(|w| &w.contribution_days)
            .filter_map(|d| d.date.map(|date| (date, d.contribution_count)))
            .collect::<BTreeMap<_, _>>(),
    };

    let social = SocialGraph {
        followers: raw.user.followers,
        following: raw.user.following,
        mutual: analysis::mutual_count(&raw.followers, &raw.following),
    };

    let summary = GitHubSummary {
        followers: raw.user.followers,
        following: raw.user.following,
        public_repos: raw.user.public_repos,
        public_gists: raw.user.public_gists,
        total_stars: repo_stats.total_stars,
        total_forks: repo_stats.total_forks,
        total_contributions: contributions.total,
        longest_streak: streak.longest,
        updated_at: Some(now),
    };

    let profile_url = Platform::GitHub.profile_url(&raw.user.login);
    let more_info = GitHubMoreInfo {
        profile: GitHubProfile {
            login: raw.user.login,
            name: raw.user.name.unwrap_or_default(),
            bio: raw.user.bio.unwrap_or_default(),
            company: raw.user.company.unwrap_or_default(),
            location: raw.user.location.unwrap_or_default(),
            blog: raw.user.blog.unwrap_or_default(),
            avatar_url: raw.user.avatar_url,
            created_at: raw.user.created_at,
        },
        repo_stats,
        contributions,
        event_types: analysis::event_types(&raw.events),
        streak,
        social,
        organizations: raw.orgs.into_iter().map(|o| o.login).collect(),
        starred_count: raw.starred.len() as u64,
        starred_languages: analysis::language_histogram(&raw.starred),
    };

    PlatformStats {
        summary: Summary::GitHub(summary),
        more_info: Some(MoreInfo::GitHub(Box::new(more_info))),
        profile_url,
    }
}
