//! Pure synthesis over raw GitHub API data.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Months, TimeDelta, Utc};
use itertools::Itertools;

use super::{Event, Repo, UserRef};
use crate::model::{RepoHighlight, RepoStats, SizeDistribution, StreakStats};

/// Repositories below this size are "small".
pub(crate) const SMALL_REPO_LIMIT: u64 = 1_000;
/// Repositories below this size (and not small) are "medium".
pub(crate) const MEDIUM_REPO_LIMIT: u64 = 10_000;

pub(crate) fn repo_stats(repos: &[Repo], now: DateTime<Utc>) -> RepoStats {
    let active_cutoff = now.checked_sub_months(Months::new(6)).unwrap_or(now);
    let stale_cutoff = now.checked_sub_months(Months::new(12)).unwrap_or(now);

    let mut stats = RepoStats::default();
    for repo in repos {
        stats.total_stars += repo.stargazers_count;
        stats.total_forks += repo.forks_count;
        stats.total_watchers += repo.watchers_count;
        stats.total_size += repo.size;

        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            *stats.languages.entry(language.to_string()).or_default() += repo.size;
        }
        for topic in &repo.topics {
            *stats.topics.entry(topic.clone()).or_default() += 1;
        }
        if let Some(license) = repo.license.as_ref().map(|l| l.display_name()) {
            *stats.licenses.entry(license.to_string()).or_default() += 1;
        }

        match repo.size {
            size if size < SMALL_REPO_LIMIT => stats.size_distribution.small += 1,
            size if size < MEDIUM_REPO_LIMIT => stats.size_distribution.medium += 1,
            _ => stats.size_distribution.large += 1,
        }

        match repo.pushed_at {
            Some(pushed) if pushed >= active_cutoff => stats.active_repos += 1,
            Some(pushed) if pushed < stale_cutoff => stats.stale_repos += 1,
            _ => {}
        }
    }

    stats.most_starred = highlight(repos, |r| r.stargazers_count);
    stats.most_forked = highlight(repos, |r| r.forks_count);
    stats
}

/// The repo with the highest `count`; ties go to the first one listed.
fn highlight(repos: &[Repo], count: impl Fn(&Repo) -> u64) -> Option<RepoHighlight> {
    repos
        .iter()
        .rev()
        .max_by_key(|r| count(r))
        .map(|r| RepoHighlight {
            name: r.name.clone(),
            url: r.html_url.clone(),
            count: count(r),
        })
}

pub(crate) fn event_types(events: &[Event]) -> BTreeMap<String, u32> {
    let mut histogram = BTreeMap::new();
    for event in events {
        *histogram.entry(event.kind.clone()).or_insert(0) += 1;
    }
    histogram
}

/// Activity streaks over event timestamps.
///
/// Events are walked newest-first: an event exactly one day before the previous one extends
/// the streak, a gap longer than a day starts a new streak at 1, and a shorter gap leaves the
/// streak unchanged.
pub(crate) fn streaks(timestamps: &[DateTime<Utc>]) -> StreakStats {
    let mut stats = StreakStats::default();
    let mut streak = 0;
    let mut in_first_run = true;
    let mut previous: Option<DateTime<Utc>> = None;

    for at in timestamps.iter().copied().sorted_unstable_by(|a, b| b.cmp(a)) {
        streak = match previous.map(|prev| prev - at) {
            None => 1,
            Some(gap) if gap == TimeDelta::days(1) => streak + 1,
            Some(gap) if gap > TimeDelta::days(1) => {
                in_first_run = false;
                1
            }
            Some(_) => streak,
        };
        if in_first_run {
            stats.current = streak;
        }
        stats.longest = stats.longest.max(streak);
        previous = Some(at);
    }
    stats
}

/// Number of logins that appear both among followers and among followed users.
pub(crate) fn mutual_count(followers: &[UserRef], following: &[UserRef]) -> u64 {
    let following: HashSet<&str> = following.iter().map(|u| u.login.as_str()).collect();
    followers
        .iter()
        .map(|u| u.login.as_str())
        .unique()
        .filter(|login| following.contains(login))
        .count() as u64
}

pub(crate) fn language_histogram(repos: &[Repo]) -> BTreeMap<String, u32> {
    let mut histogram = BTreeMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        *histogram.entry(language.to_string()).or_insert(0) += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::api::github::License;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn repo(name: &str, stars: u64, forks: u64, size: u64, pushed: DateTime<Utc>) -> Repo {
        Repo {
            name: name.to_string(),
            html_url: format!("https://github.com/alice/{name}"),
            stargazers_count: stars,
            forks_count: forks,
            watchers_count: stars,
            size,
            pushed_at: Some(pushed),
            ..Default::default()
        }
    }

    #[test]
    fn test_streak_three_consecutive_days() {
        let events = [at(2024, 1, 1), at(2024, 1, 2), at(2024, 1, 3)];
        let stats = streaks(&events);
        assert_eq!(stats.longest, 3);
        assert_eq!(stats.current, 3);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let events = [at(2024, 1, 1), at(2024, 1, 2), at(2024, 1, 3), at(2024, 1, 5)];
        let stats = streaks(&events);
        assert_eq!(stats.longest, 3);
        assert_eq!(stats.current, 1);
    }

    #[test]
    fn test_streak_gap_in_middle() {
        let events = [
            at(2024, 1, 1),
            at(2024, 1, 2),
            at(2024, 1, 3),
            at(2024, 1, 10),
            at(2024, 1, 11),
        ];
        let stats = streaks(&events);
        assert_eq!(stats.longest, 3);
        assert_eq!(stats.current, 2);
    }

    #[test]
    fn test_streak_gap_under_a_day_is_neutral() {
        let stats = streaks(&[
            at(2024, 1, 3),
            Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
            at(2024, 1, 2),
            at(2024, 1, 1),
        ]);
        assert_eq!(stats.longest, 2);
        assert_eq!(stats.current, 2);
    }

    #[test]
    fn test_streak_short_gap_across_midnight_is_not_consecutive() {
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        let stats = streaks(&[early, late]);
        assert_eq!(stats.longest, 1);
        assert_eq!(stats.current, 1);
    }

    #[test]
    fn test_streak_gap_over_a_day_resets() {
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 23, 0, 0).unwrap();
        let stats = streaks(&[later, at(2024, 1, 1)]);
        assert_eq!(stats.longest, 1);
        assert_eq!(stats.current, 1);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(streaks(&[]), StreakStats::default());
    }

    #[test]
    fn test_repo_stats() {
        let now = at(2024, 6, 1);
        let mut rust = repo("engine", 50, 4, 20_000, at(2024, 5, 1));
        rust.language = Some("Rust".to_string());
        rust.topics = vec!["cli".to_string(), "parser".to_string()];
        rust.license = Some(License {
            spdx_id: Some("MIT".to_string()),
            name: Some("MIT License".to_string()),
        });
        let mut py = repo("scripts", 5, 9, 500, at(2023, 1, 1));
        py.language = Some("Python".to_string());
        py.topics = vec!["cli".to_string()];
        let mut other = repo("notes", 0, 0, 5_000, at(2023, 10, 1));
        other.language = Some("Rust".to_string());

        let stats = repo_stats(&[rust, py, other], now);
        assert_eq!(stats.total_stars, 55);
        assert_eq!(stats.total_forks, 13);
        assert_eq!(stats.total_size, 25_500);
        assert_eq!(stats.languages["Rust"], 25_000);
        assert_eq!(stats.languages["Python"], 500);
        assert_eq!(stats.topics["cli"], 2);
        assert_eq!(stats.licenses["MIT"], 1);
        assert_eq!(
            stats.size_distribution,
            SizeDistribution {
                small: 1,
                medium: 1,
                large: 1
            }
        );
        assert_eq!(stats.active_repos, 1);
        assert_eq!(stats.stale_repos, 1);
        assert_eq!(stats.most_starred.unwrap().name, "engine");
        assert_eq!(stats.most_forked.unwrap().name, "scripts");
    }

    #[test]
    fn test_repo_stats_empty() {
        let stats = repo_stats(&[], at(2024, 6, 1));
        assert_eq!(stats, RepoStats::default());
    }

    #[test]
    fn test_highlight_tie_goes_to_first() {
        let now = at(2024, 6, 1);
        let stats = repo_stats(&[repo("a", 3, 0, 1, now), repo("b", 3, 0, 1, now)], now);
        assert_eq!(stats.most_starred.unwrap().name, "a");
    }

    #[test]
    fn test_mutual_count() {
        let users = |logins: &[&str]| {
            logins
                .iter()
                .map(|l| UserRef {
                    login: l.to_string(),
                })
                .collect::<Vec<_>>()
        };
        let followers = users(&["ann", "ben", "cat", "ben"]);
        let following = users(&["ben", "cat", "dan"]);
        assert_eq!(mutual_count(&followers, &following), 2);
        assert_eq!(mutual_count(&followers, &[]), 0);
    }

    #[test]
    fn test_event_types() {
        let events = ["PushEvent", "PushEvent", "WatchEvent"]
            .iter()
            .map(|kind| Event {
                kind: kind.to_string(),
                created_at: None,
            })
            .collect::<Vec<_>>();
        let histogram = event_types(&events);
        assert_eq!(histogram["PushEvent"], 2);
        assert_eq!(histogram["WatchEvent"], 1);
    }
}
