use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether a platform is a competitive-programming judge or a social network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Competitive,
    Social,
}

/// Every external platform the aggregator knows how to talk to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    Codeforces,
    CodeChef,
    AtCoder,
    Spoj,
    GitHub,
    LinkedIn,
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    /// The competitive platforms, in the order they are refreshed.
    pub const COMPETITIVE: [Platform; 5] = [
        Platform::LeetCode,
        Platform::Codeforces,
        Platform::CodeChef,
        Platform::AtCoder,
        Platform::Spoj,
    ];

    /// The social platforms, in the order they are refreshed.
    pub const SOCIAL: [Platform; 5] = [
        Platform::GitHub,
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
    ];

    pub fn kind(self) -> PlatformKind {
        match self {
            Platform::LeetCode
            | Platform::Codeforces
            | Platform::CodeChef
            | Platform::AtCoder
            | Platform::Spoj => PlatformKind::Competitive,
            Platform::GitHub
            | Platform::LinkedIn
            | Platform::Twitter
            | Platform::Facebook
            | Platform::Instagram => PlatformKind::Social,
        }
    }

    /// Public, user-facing profile page for `username`.
    pub fn profile_url(self, username: &str) -> String {
        match self {
            Platform::LeetCode => format!("https://leetcode.com/u/{username}/"),
            Platform::Codeforces => format!("https://codeforces.com/profile/{username}"),
            Platform::CodeChef => format!("https://www.codechef.com/users/{username}"),
            Platform::AtCoder => format!("https://atcoder.jp/users/{username}"),
            Platform::Spoj => format!("https://www.spoj.com/users/{username}/"),
            Platform::GitHub => format!("https://github.com/{username}"),
            Platform::LinkedIn => format!("https://www.linkedin.com/in/{username}/"),
            Platform::Twitter => format!("https://x.com/{username}"),
            Platform::Facebook => format!("https://www.facebook.com/{username}"),
            Platform::Instagram => format!("https://www.instagram.com/{username}/"),
        }
    }
}

/// User-supplied profile links keyed by platform. A missing key is the same as an empty link.
pub type ProfileLinks = BTreeMap<Platform, String>;
