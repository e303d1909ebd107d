use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub port: u16,
    pub poll_interval_secs: u64,
    pub freshness_tick_secs: u64,
    pub http_timeout_secs: u64,
}

impl DashboardConfig {
    /// Load config from a specific .env file, or the default `.env` if None.
    pub fn from_env_file(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                dotenvy::from_filename(p).with_context(|| format!("Load config file {p}"))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::build_from(|key| std::env::var(key).ok())
    }

    /// Builds from any key lookup; the process environment in production.
    pub fn build_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cfg = Self {
            backend_url: value(&lookup, "BACKEND_URL", "http://127.0.0.1:5000"),
            port: parse(&lookup, "DASHBOARD_PORT", "3000")?,
            poll_interval_secs: parse(&lookup, "POLL_INTERVAL_SECS", "5")?,
            freshness_tick_secs: parse(&lookup, "FRESHNESS_TICK_SECS", "1")?,
            http_timeout_secs: parse(&lookup, "HTTP_TIMEOUT_SECS", "10")?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            bail!("BACKEND_URL must not be empty");
        }
        if self.poll_interval_secs == 0 {
            bail!("POLL_INTERVAL_SECS must be greater than 0");
        }
        if self.freshness_tick_secs == 0 {
            bail!("FRESHNESS_TICK_SECS must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn freshness_tick(&self) -> Duration {
        Duration::from_secs(self.freshness_tick_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn value(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let val = value(lookup, key, default);
    val.parse::<T>()
        .with_context(|| format!("Invalid value for {key}: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Result<DashboardConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::build_from(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = from_map(&[]).unwrap();
        assert_eq!(cfg.backend_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.poll_interval(), Duration::from_secs(5));
        assert_eq!(cfg.freshness_tick(), Duration::from_secs(1));
        assert_eq!(cfg.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn overrides_and_blank_values() {
        let cfg = from_map(&[
            ("BACKEND_URL", "https://bot.example.com"),
            ("DASHBOARD_PORT", "8088"),
            ("POLL_INTERVAL_SECS", " "),
        ])
        .unwrap();
        assert_eq!(cfg.backend_url, "https://bot.example.com");
        assert_eq!(cfg.port, 8088);
        assert_eq!(cfg.poll_interval_secs, 5);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = from_map(&[("DASHBOARD_PORT", "70000")]).unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_PORT"));
        assert!(from_map(&[("POLL_INTERVAL_SECS", "0")]).is_err());
        assert!(from_map(&[("FRESHNESS_TICK_SECS", "fast")]).is_err());
    }
}
