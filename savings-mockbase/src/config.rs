//! Configuration for the backend provider
//!
//! Environment variables mirror the ones the app is deployed with:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `USE_MOCK_DATA` | `mock_mode` | `false` |
//! | `MOCK_API_DELAY_MIN` | `delay_min_ms` | `300` |
//! | `MOCK_API_DELAY_MAX` | `delay_max_ms` | `800` |
//! | `MOCK_ERROR_RATE` | `error_rate` | `0.0` |
//! | `MOCK_ENABLE_LOGGING` | `enable_logging` | `true` |
//! | `SUPABASE_URL` | `remote_url` | unset |
//! | `SUPABASE_ANON_KEY` | `remote_anon_key` | unset |

use url::Url;

use crate::error::{MockbaseError, Result};

pub const DEFAULT_DELAY_MIN_MS: u64 = 300;
pub const DEFAULT_DELAY_MAX_MS: u64 = 800;

/// Backend configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Use the in-process mock instead of the remote backend
    pub mock_mode: bool,

    /// Lower bound of the simulated latency, milliseconds (inclusive)
    pub delay_min_ms: u64,

    /// Upper bound of the simulated latency, milliseconds (inclusive)
    pub delay_max_ms: u64,

    /// Fault injection rate. Accepted and validated, not consulted.
    pub error_rate: f64,

    /// Emit per-operation diagnostics
    pub enable_logging: bool,

    /// Remote backend URL (remote mode only)
    pub remote_url: Option<String>,

    /// Remote backend anonymous key (remote mode only)
    pub remote_anon_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            delay_min_ms: DEFAULT_DELAY_MIN_MS,
            delay_max_ms: DEFAULT_DELAY_MAX_MS,
            error_rate: 0.0,
            enable_logging: true,
            remote_url: None,
            remote_anon_key: None,
        }
    }
}

impl BackendConfig {
    /// Mock-mode config with the default latency window
    pub fn mock() -> Self {
        Self {
            mock_mode: true,
            ..Self::default()
        }
    }

    /// Remote-mode config pointing at `url`
    pub fn remote(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            mock_mode: false,
            remote_url: Some(url.into()),
            remote_anon_key: Some(anon_key.into()),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            mock_mode: lookup("USE_MOCK_DATA").is_some_and(|v| v.trim() == "true"),
            delay_min_ms: parse_u64("MOCK_API_DELAY_MIN", defaults.delay_min_ms),
            delay_max_ms: parse_u64("MOCK_API_DELAY_MAX", defaults.delay_max_ms),
            error_rate: lookup("MOCK_ERROR_RATE")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(defaults.error_rate),
            enable_logging: lookup("MOCK_ENABLE_LOGGING")
                .map(|v| v.trim() != "false")
                .unwrap_or(defaults.enable_logging),
            remote_url: lookup("SUPABASE_URL").filter(|v| !v.is_empty()),
            remote_anon_key: lookup("SUPABASE_ANON_KEY").filter(|v| !v.is_empty()),
        }
    }

    /// Override the latency window
    pub fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay_min_ms = min_ms;
        self.delay_max_ms = max_ms;
        self
    }

    /// Disable simulated latency entirely
    pub fn without_delay(self) -> Self {
        self.with_delay(0, 0)
    }

    /// Override the (inert) error rate
    pub fn with_error_rate(mut self, rate: f64) -> Self {
        self.error_rate = rate;
        self
    }

    /// Toggle per-operation diagnostics
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Check internal consistency before the provider is built
    pub fn validate(&self) -> Result<()> {
        if self.delay_min_ms > self.delay_max_ms {
            return Err(MockbaseError::Config(format!(
                "delay_min_ms ({}) exceeds delay_max_ms ({})",
                self.delay_min_ms, self.delay_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(MockbaseError::Config(format!(
                "error_rate must be within [0, 1], got {}",
                self.error_rate
            )));
        }
        if !self.mock_mode {
            self.remote_endpoint()?;
        }
        Ok(())
    }

    /// Parsed remote URL and anon key, or a config error naming what is missing
    pub fn remote_endpoint(&self) -> Result<(Url, &str)> {
        let (Some(url), Some(key)) = (self.remote_url.as_deref(), self.remote_anon_key.as_deref())
        else {
            return Err(MockbaseError::Config(
                "Missing SUPABASE_URL or SUPABASE_ANON_KEY".into(),
            ));
        };
        Ok((Url::parse(url)?, key))
    }
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
    fn test_default_config() {
        let cfg = BackendConfig::default();
        assert!(!cfg.mock_mode);
        assert_eq!(cfg.delay_min_ms, 300);
        assert_eq!(cfg.delay_max_ms, 800);
        assert_eq!(cfg.error_rate, 0.0);
        assert!(cfg.enable_logging);
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = BackendConfig::mock()
            .with_delay(10, 20)
            .with_error_rate(0.25)
            .with_logging(false);

        assert!(cfg.mock_mode);
        assert_eq!((cfg.delay_min_ms, cfg.delay_max_ms), (10, 20));
        assert_eq!(cfg.error_rate, 0.25);
        assert!(!cfg.enable_logging);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let cfg = BackendConfig::from_lookup(lookup_from(&[
            ("USE_MOCK_DATA", "true"),
            ("MOCK_API_DELAY_MIN", "5"),
            ("MOCK_API_DELAY_MAX", "not-a-number"),
            ("MOCK_ERROR_RATE", "0.1"),
        ]));

        assert!(cfg.mock_mode);
        assert_eq!(cfg.delay_min_ms, 5);
        assert_eq!(cfg.delay_max_ms, DEFAULT_DELAY_MAX_MS);
        assert_eq!(cfg.error_rate, 0.1);
        assert!(cfg.enable_logging);
    }

    #[test]
    fn test_mock_flag_requires_exact_true() {
        let cfg = BackendConfig::from_lookup(lookup_from(&[("USE_MOCK_DATA", "1")]));
        assert!(!cfg.mock_mode);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let cfg = BackendConfig::mock().with_delay(50, 10);
        assert!(matches!(cfg.validate(), Err(MockbaseError::Config(_))));
    }

    #[test]
    fn test_remote_mode_requires_endpoint() {
        assert!(BackendConfig::default().validate().is_err());
        assert!(BackendConfig::remote("not a url", "key").validate().is_err());

        let cfg = BackendConfig::remote("https://abc.supabase.co", "anon");
        let (url, key) = cfg.remote_endpoint().unwrap();
        assert_eq!(url.host_str(), Some("abc.supabase.co"));
        assert_eq!(key, "anon");
    }
}
