//! Platforms whose public pages cannot be read without a logged-in session.

use tracing::debug;

use crate::model::{Platform, PlatformStats, Summary, UnavailableSummary};

/// A successful placeholder result: a message for the UI and no counters.
pub(crate) fn stub(platform: Platform, username: &str) -> PlatformStats {
    debug!(%platform, username, "returning placeholder stats");
    PlatformStats {
        summary: Summary::Unavailable(UnavailableSummary {
            message: format!(
                "{platform} statistics need an authenticated session or a headless browser"
            ),
            followers: None,
            following: None,
            posts: None,
        }),
        more_info: None,
        profile_url: platform.profile_url(username),
    }
}
