//! Refresh a handful of profile links and print the combined result as JSON.
//!
//! Set `GITHUB_TOKEN` to include GitHub; without it that platform comes back as failed.

use profile_stats::{Platform, ProfileLinks, StatsClient, StatsConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = StatsClient::with_config(StatsConfig::from_env())?;

    let links = ProfileLinks::from([
        (Platform::LeetCode, "https://leetcode.com/u/neal_wu/".to_string()),
        (Platform::Codeforces, "https://codeforces.com/profile/tourist".to_string()),
        (Platform::AtCoder, "https://atcoder.jp/users/chokudai".to_string()),
        (Platform::Spoj, "https://www.spoj.com/users/xilinx/".to_string()),
        (Platform::GitHub, "https://github.com/torvalds".to_string()),
        (Platform::Twitter, "https://x.com/rustlang".to_string()),
    ]);

    let competitive = client.fetch_all_competitive_stats(&links).await;
    let social = client.fetch_all_social_stats(&links).await;

    for (platform, result) in competitive.0.iter().chain(social.0.iter()) {
        eprintln!("{:<12} {}", platform.as_ref(), result.fetch_status);
    }
    println!("{}", serde_json::to_string_pretty(&competitive)?);
    println!("{}", serde_json::to_string_pretty(&social)?);
    Ok(())
}
