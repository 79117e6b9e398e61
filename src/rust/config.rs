use std::env;
use std::time::Duration;

use log::warn;

pub const BASE_URL_ENV: &str = "SDG_API_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "SDG_API_TIMEOUT_SECS";
pub const RETRAIN_TIMEOUT_ENV: &str = "SDG_RETRAIN_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Where the remote service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Timeout for predict calls
    pub request_timeout: Duration,
    /// Timeout for retrain calls, which run a full training pass server-side
    pub retrain_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            retrain_timeout: Duration::from_secs(600),
        }
    }
}

impl ServiceConfig {
    /// Reads the configuration from the environment, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var(BASE_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
            request_timeout: secs_from_env(REQUEST_TIMEOUT_ENV).unwrap_or(defaults.request_timeout),
            retrain_timeout: secs_from_env(RETRAIN_TIMEOUT_ENV).unwrap_or(defaults.retrain_timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retrain_timeout(mut self, timeout: Duration) -> Self {
        self.retrain_timeout = timeout;
        self
    }

    pub fn predict_url(&self) -> String {
        self.endpoint("predict")
    }

    pub fn retrain_url(&self) -> String {
        self.endpoint("retrain")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn secs_from_env(var: &str) -> Option<Duration> {
    let raw = env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring {}={:?}, expected a positive number of seconds", var, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_ignore_trailing_slash() {
        let config = ServiceConfig::default().with_base_url("http://example.org/api/");
        assert_eq!(config.predict_url(), "http://example.org/api/predict");
        assert_eq!(config.retrain_url(), "http://example.org/api/retrain");
    }

    #[test]
    fn test_from_env() {
        // Everything env-related lives in one test to avoid races between tests
        env::set_var(BASE_URL_ENV, "http://models.internal:8080");
        env::set_var(REQUEST_TIMEOUT_ENV, "5");
        env::set_var(RETRAIN_TIMEOUT_ENV, "not-a-number");
        let config = ServiceConfig::from_env();
        assert_eq!(config.base_url, "http://models.internal:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.retrain_timeout, ServiceConfig::default().retrain_timeout);

        env::remove_var(BASE_URL_ENV);
        env::remove_var(REQUEST_TIMEOUT_ENV);
        env::remove_var(RETRAIN_TIMEOUT_ENV);
        assert_eq!(ServiceConfig::from_env(), ServiceConfig::default());
    }
}
