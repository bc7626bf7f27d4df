use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub role: Option<String>,
    pub log_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = non_empty("DASHBOARD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        validate_api_url(&api_url)?;

        let timeout_secs = match non_empty("DASHBOARD_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid DASHBOARD_TIMEOUT_SECS {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("DASHBOARD_TIMEOUT_SECS must be at least 1"));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            role: non_empty("DASHBOARD_ROLE"),
            log_filter: non_empty("LOG_FILTER"),
            otlp_endpoint: non_empty("OTLP_ENDPOINT"),
        })
    }

    /// Command-line flags take precedence over the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, role: Option<String>) -> Result<Self> {
        if let Some(api_url) = api_url {
            validate_api_url(&api_url)?;
            self.api_url = api_url;
        }
        if role.is_some() {
            self.role = role;
        }
        Ok(self)
    }
}

fn validate_api_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("invalid dashboard API url {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("dashboard API url must be http or https, got {raw:?}"));
    }
    Ok(())
}
