//! Server configuration
//!
//! Read once from the environment at startup and handed to the components
//! that need it; nothing below `main` looks at environment variables.

use std::path::PathBuf;
use std::time::Duration;

use backhook_core::{RenderProfile, SplitPolicy};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Default sink address; requests may override it
    pub sink_url: Option<String>,

    /// Interface to bind (e.g., "0.0.0.0")
    pub bind_host: String,

    pub port: u16,

    /// Archived logs older than this many days are swept
    pub log_retention_days: u64,

    /// Directory holding archived reports, also served under `/logs`
    pub logs_dir: PathBuf,

    /// How often the retention sweep runs
    pub sweep_interval: Duration,

    pub render_profile: RenderProfile,

    pub split_policy: SplitPolicy,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DISCORD_WEBHOOK_URL (optional)
    /// - BIND_ADDR (optional, default: 0.0.0.0)
    /// - PORT (optional, default: 80)
    /// - LOG_RETENTION_DAYS (optional, default: 3)
    /// - LOGS_DIR (optional, default: logs)
    /// - RETENTION_SWEEP_INTERVAL (optional, seconds, default: 86400)
    /// - RENDER_PROFILE (optional, detailed|table|compact, default: detailed)
    /// - REPORT_SPLIT (optional, double|single, default: double)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let sink_url = lookup("DISCORD_WEBHOOK_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let bind_host = lookup("BIND_ADDR").unwrap_or(defaults.bind_host);

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let log_retention_days = lookup("LOG_RETENTION_DAYS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.log_retention_days);

        let logs_dir = lookup("LOGS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.logs_dir);

        let sweep_interval = lookup("RETENTION_SWEEP_INTERVAL")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);

        let render_profile = match lookup("RENDER_PROFILE") {
            Some(name) => RenderProfile::from_name(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown RENDER_PROFILE '{}'", name))?,
            None => defaults.render_profile,
        };

        let split_policy = match lookup("REPORT_SPLIT") {
            Some(name) => SplitPolicy::from_name(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown REPORT_SPLIT '{}'", name))?,
            None => defaults.split_policy,
        };

        Ok(Self {
            sink_url,
            bind_host,
            port,
            log_retention_days,
            logs_dir,
            sweep_interval,
            render_profile,
            split_policy,
        })
    }

    /// Retention period as a duration
    pub fn log_retention(&self) -> Duration {
        Duration::from_secs(self.log_retention_days.saturating_mul(SECONDS_PER_DAY))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.sink_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("DISCORD_WEBHOOK_URL must start with http:// or https://");
            }
        }

        if self.bind_host.is_empty() {
            anyhow::bail!("bind_host cannot be empty");
        }

        if self.sweep_interval.as_secs() == 0 {
            anyhow::bail!("sweep_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sink_url: None,
            bind_host: "0.0.0.0".to_string(),
            port: 80,
            log_retention_days: 3,
            logs_dir: PathBuf::from("logs"),
            sweep_interval: Duration::from_secs(SECONDS_PER_DAY),
            render_profile: RenderProfile::default(),
            split_policy: SplitPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert!(config.sink_url.is_none());
        assert_eq!(config.port, 80);
        assert_eq!(config.log_retention_days, 3);
        assert_eq!(config.log_retention(), Duration::from_secs(3 * 86_400));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.sweep_interval, Duration::from_secs(86_400));
        assert_eq!(config.render_profile, RenderProfile::detailed());
        assert_eq!(config.split_policy.pattern(), r"\s{2,}");
        assert_eq!(config.bind_addr(), "0.0.0.0:80");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_values_from_environment() {
        let config = from_pairs(&[
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("PORT", "8080"),
            ("LOG_RETENTION_DAYS", "7"),
            ("LOGS_DIR", "/var/lib/backhook/logs"),
            ("RETENTION_SWEEP_INTERVAL", "3600"),
            ("RENDER_PROFILE", "compact"),
            ("REPORT_SPLIT", "single"),
        ])
        .unwrap();

        assert_eq!(
            config.sink_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_retention_days, 7);
        assert_eq!(config.logs_dir, PathBuf::from("/var/lib/backhook/logs"));
        assert_eq!(config.sweep_interval, Duration::from_secs(3600));
        assert_eq!(config.render_profile, RenderProfile::compact());
        assert_eq!(config.split_policy.pattern(), r"\s+");
    }

    #[test]
    fn test_unparseable_numbers_fall_back_to_defaults() {
        let config = from_pairs(&[("PORT", "eighty"), ("LOG_RETENTION_DAYS", "-1")]).unwrap();
        assert_eq!(config.port, 80);
        assert_eq!(config.log_retention_days, 3);
    }

    #[test]
    fn test_blank_sink_is_unset() {
        let config = from_pairs(&[("DISCORD_WEBHOOK_URL", "  ")]).unwrap();
        assert!(config.sink_url.is_none());
    }

    #[test]
    fn test_unknown_names_are_errors() {
        assert!(from_pairs(&[("RENDER_PROFILE", "fancy")]).is_err());
        assert!(from_pairs(&[("REPORT_SPLIT", "tabs")]).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.sink_url = Some("not-a-url".to_string());
        assert!(config.validate().is_err());

        config.sink_url = Some("https://discord.com/api/webhooks/1/abc".to_string());
        assert!(config.validate().is_ok());

        config.sweep_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
