use tracing::debug;
use url::Url;

use crate::model::Platform;

/// Derive a platform username from a user-supplied profile URL.
///
/// The username is the last non-empty path segment. Links that do not parse as absolute
/// URLs, or that have no path, give `None`.
pub fn extract_username(platform: Platform, url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(%platform, url, %err, "profile link is not a valid url");
            return None;
        }
    };

    parsed
        .path()
        .trim_end_matches('/')
        .split('/')
        .rfind(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Username extraction for social links. Social platforms follow the same path rule.
pub fn extract_social_username_from_url(platform: Platform, url: &str) -> Option<String> {
    extract_username(platform, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_username() {
        assert_eq!(
            extract_username(Platform::LeetCode, "https://leetcode.com/alice/"),
            Some("alice".to_string())
        );
        assert_eq!(
            extract_username(Platform::LeetCode, "https://leetcode.com/u/alice"),
            Some("alice".to_string())
        );
        assert_eq!(
            extract_username(Platform::Codeforces, "https://codeforces.com/profile/tourist///"),
            Some("tourist".to_string())
        );
        assert_eq!(
            extract_username(Platform::AtCoder, "https://atcoder.jp/users/chokudai?lang=en"),
            Some("chokudai".to_string())
        );
        assert_eq!(
            extract_username(Platform::GitHub, "  https://github.com/octocat#readme "),
            Some("octocat".to_string())
        );
    }

    #[test]
    fn test_extract_username_rejects_unusable_links() {
        let links = [
            "",
            "   ",
            "leetcode.com/alice",
            "alice",
            "https://",
            "https://leetcode.com",
            "https://leetcode.com/",
            "https://leetcode.com///",
            "://missing-scheme/alice",
            "http://[::1/alice",
        ];
        for platform in Platform::COMPETITIVE.iter().chain(Platform::SOCIAL.iter()) {
            for link in links {
                assert_eq!(
                    extract_username(*platform, link),
                    None,
                    "{platform}: {link:?}"
                );
            }
        }
    }

    #[test]
    fn test_extract_social_username() {
        assert_eq!(
            extract_social_username_from_url(
                Platform::LinkedIn,
                "https://www.linkedin.com/in/jane-doe/"
            ),
            Some("jane-doe".to_string())
        );
    }
}
