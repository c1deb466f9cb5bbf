use std::time::Duration;

use anyhow::{Context as _, bail};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_INQUIRY_TOOL: &str = "hcitool";

/// Process-wide configuration, sourced from the environment once at startup
/// and passed explicitly to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the attendance API, e.g. `http://tracker.local:3000`.
    pub api_base_url: String,
    /// Identifier of the physical location this poller instance observes.
    pub room_id: u32,
    /// Delay between polling cycles.
    pub poll_interval: Duration,
    /// Upper bound on a single device-name inquiry.
    pub probe_timeout: Duration,
    /// Device-inquiry command, invoked as `<tool> name <address>`.
    pub inquiry_tool: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let Some(api_base_url) = lookup("API_BASE_URL") else {
            bail!("API_BASE_URL is not set");
        };
        let room_id = lookup("ROOM_ID")
            .context("ROOM_ID is not set")?
            .parse()
            .context("ROOM_ID is not an integer")?;

        let poll_interval_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(value) => value
                .parse()
                .context("POLL_INTERVAL_SECS is not an integer")?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };
        let probe_timeout_secs = match lookup("PROBE_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .context("PROBE_TIMEOUT_SECS is not an integer")?,
            None => DEFAULT_PROBE_TIMEOUT_SECS,
        };

        Ok(AppConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            room_id,
            poll_interval: Duration::from_secs(poll_interval_secs),
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            inquiry_tool: lookup("INQUIRY_TOOL")
                .unwrap_or_else(|| DEFAULT_INQUIRY_TOOL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_required_values() {
        let config = AppConfig::from_lookup(vars(&[
            ("API_BASE_URL", "http://localhost:3000"),
            ("ROOM_ID", "7"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.room_id, 7);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.inquiry_tool, "hcitool");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(vars(&[
            ("API_BASE_URL", "http://localhost:3000/"),
            ("ROOM_ID", "7"),
            ("POLL_INTERVAL_SECS", "5"),
            ("PROBE_TIMEOUT_SECS", "2"),
            ("INQUIRY_TOOL", "/usr/local/bin/hcitool"),
        ]))
        .unwrap();
        // Trailing slash is stripped so endpoint paths join cleanly.
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.inquiry_tool, "/usr/local/bin/hcitool");
    }

    #[test]
    fn test_missing_base_url() {
        assert!(AppConfig::from_lookup(vars(&[("ROOM_ID", "7")])).is_err());
    }

    #[test]
    fn test_bad_room_id() {
        let result = AppConfig::from_lookup(vars(&[
            ("API_BASE_URL", "http://localhost:3000"),
            ("ROOM_ID", "lounge"),
        ]));
        assert!(result.is_err());
    }
}
