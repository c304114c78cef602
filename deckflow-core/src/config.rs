// File: deckflow-core/src/config.rs

use std::time::Duration;

use deckflow_common::models::ExtractionConfig;
use tracing::debug;
use url::Url;

use crate::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Runtime settings for a deckflow session.
#[derive(Debug, Clone)]
pub struct DeckflowConfig {
    /// Base URL of the extraction/generation backend.
    pub api_url: Url,
    /// Optional bearer token sent with every backend request.
    pub api_token: Option<String>,
    /// Upper bound on the liveness probe run before each extraction.
    pub probe_timeout: Duration,
    /// Delay between job status queries.
    pub poll_interval: Duration,
    /// Per-request timeout for the extraction and generation calls.
    pub request_timeout: Duration,
    pub extraction: ExtractionConfig,
}

impl Default for DeckflowConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            api_token: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            extraction: ExtractionConfig::default(),
        }
    }
}

impl DeckflowConfig {
    /// Defaults overridden by `DECKFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("DECKFLOW_API_URL") {
            config.api_url = parse_url(&raw)?;
        }
        if let Some(token) = lookup("DECKFLOW_API_TOKEN") {
            let token = token.trim().to_string();
            config.api_token = if token.is_empty() { None } else { Some(token) };
        }
        if let Some(raw) = lookup("DECKFLOW_PROBE_TIMEOUT_SECS") {
            config.probe_timeout = parse_secs("DECKFLOW_PROBE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("DECKFLOW_POLL_INTERVAL_SECS") {
            config.poll_interval = parse_secs("DECKFLOW_POLL_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("DECKFLOW_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("DECKFLOW_REQUEST_TIMEOUT_SECS", &raw)?;
        }

        debug!(
            "Loaded config: api_url={}, probe_timeout={:?}, poll_interval={:?}",
            config.api_url, config.probe_timeout, config.poll_interval
        );
        Ok(config)
    }
}

pub fn parse_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "API URL must use http or https, got '{}'",
            other
        ))),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, Error> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number of seconds, got '{}'", key, raw)))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::Config(format!("{} must be positive, got '{}'", key, raw)));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::Config(format!("{} is out of range, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = DeckflowConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(config.api_token.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = DeckflowConfig::from_lookup(lookup_from(&[
            ("DECKFLOW_API_URL", "https://decks.example.com/base/"),
            ("DECKFLOW_API_TOKEN", "secret"),
            ("DECKFLOW_POLL_INTERVAL_SECS", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://decks.example.com/base/");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn bad_values_are_config_errors() {
        let err = DeckflowConfig::from_lookup(lookup_from(&[("DECKFLOW_PROBE_TIMEOUT_SECS", "-1")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = DeckflowConfig::from_lookup(lookup_from(&[("DECKFLOW_API_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn huge_durations_are_config_errors() {
        let err = DeckflowConfig::from_lookup(lookup_from(&[("DECKFLOW_POLL_INTERVAL_SECS", "1e30")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
