use std::time::Duration;

use axum::http::HeaderValue;
use services::services::locale_registry::DEFAULT_RETRY_INTERVAL;
use thiserror::Error;
use utils::locale::LocaleCode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub fallback_locale: LocaleCode,
    pub locale_retry: Duration,
    /// Empty means any origin.
    pub cors_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => 3001,
        };

        let fallback_locale = match get("FALLBACK_LOCALE") {
            Some(raw) => LocaleCode::normalize(&raw).ok_or(ConfigError::Invalid {
                key: "FALLBACK_LOCALE",
                value: raw,
            })?,
            None => LocaleCode::normalize("en").ok_or(ConfigError::Invalid {
                key: "FALLBACK_LOCALE",
                value: "en".to_string(),
            })?,
        };

        let locale_retry = match get("LOCALE_RETRY_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "LOCALE_RETRY_SECS",
                    value: raw,
                })?,
            None => DEFAULT_RETRY_INTERVAL,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(|origin| {
                        HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                            key: "CORS_ORIGINS",
                            value: origin.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://content.db?mode=rwc".to_string()),
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            fallback_locale,
            locale_retry,
            cors_origins,
        })
    }
}
