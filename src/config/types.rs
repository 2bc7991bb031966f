use serde::{Deserialize, Serialize};

use crate::domain::session::{Currency, Locale};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Connection settings for the booking REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_second: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout(),
            rate_limit_per_second: default_rate_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_offer_ttl")]
    pub offer_ttl_secs: u64,
    #[serde(default = "default_services_ttl")]
    pub services_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            offer_ttl_secs: default_offer_ttl(),
            services_ttl_secs: default_services_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    /// Artificial delay before the simulated gateway answers.
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub default_currency: Currency,
    #[serde(default)]
    pub default_locale: Locale,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".into()
}

fn default_user_agent() -> String {
    concat!("mcp-hotel-booking/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout() -> u64 {
    15
}

fn default_rate_limit() -> f64 {
    5.0
}

fn default_max_entries() -> usize {
    500
}

fn default_offer_ttl() -> u64 {
    300
}

fn default_services_ttl() -> u64 {
    900
}

fn default_simulated_delay() -> u64 {
    1500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert!((config.api.rate_limit_per_second - 5.0).abs() < f64::EPSILON);
        assert!(config.api.user_agent.starts_with("mcp-hotel-booking/"));
        assert_eq!(config.payment.simulated_delay_ms, 1500);
    }

    #[test]
    fn cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.offer_ttl_secs, 300);
        assert_eq!(config.services_ttl_secs, 900);
    }

    #[test]
    fn session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.default_currency, Currency::Eur);
        assert_eq!(config.default_locale, Locale::Fr);
    }

    #[test]
    fn config_serde_roundtrip() {
        let original = Config::default();
        let yaml = serde_yml::to_string(&original).unwrap();
        let restored: Config = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(restored.api.base_url, original.api.base_url);
        assert_eq!(restored.cache.max_entries, original.cache.max_entries);
        assert_eq!(
            restored.session.default_currency,
            original.session.default_currency
        );
    }

    #[test]
    fn config_deserialize_with_overrides() {
        let yaml = "payment:\n  simulated_delay_ms: 0\nsession:\n  default_currency: usd";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.payment.simulated_delay_ms, 0);
        assert_eq!(config.session.default_currency, Currency::Usd);
        // Other fields get defaults
        assert_eq!(config.api.request_timeout_secs, 15);
        assert_eq!(config.cache.offer_ttl_secs, 300);
    }
}
