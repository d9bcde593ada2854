//! Command-line configuration for the `profile-app` binary.

use std::time::Duration;

use clap::Parser;
use profile_core::QueryOptions;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Parser)]
#[command(name = "profile-app", about = "Fetch and display the public user profile")]
pub struct Config {
    /// Base URL of the profile API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds a fetched profile counts as fresh.
    #[arg(long, default_value_t = 0)]
    pub stale_time_secs: u64,

    /// Request timeout in seconds. No timeout when omitted.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::default().stale_time(Duration::from_secs(self.stale_time_secs))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["profile-app"]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.query_options(), QueryOptions::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn explicit_flags() {
        let config = Config::try_parse_from([
            "profile-app",
            "--base-url",
            "http://api.test",
            "--stale-time-secs",
            "30",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.query_options().stale_time, Duration::from_secs(30));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_non_numeric_stale_time() {
        assert!(Config::try_parse_from(["profile-app", "--stale-time-secs", "soon"]).is_err());
    }
}
