//! Process-wide cache of the supported locales and the default locale.
//!
//! The registry is created once at startup and shared behind an `Arc`. It is
//! filled lazily from a [`SettingsSource`] and never surfaces load errors:
//! when the store cannot be read it serves the built-in fallback locale and
//! tries the store again once the retry interval has passed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use db::models::{content::JsonList, site_setting::SiteSetting};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use tracing::{debug, info, warn};
use ts_rs::TS;
use utils::locale::{FallbackChain, LocaleCode};

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Settings exactly as stored, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLocaleSettings {
    /// JSON array text, or a comma separated list in older rows.
    pub supported: Option<String>,
    pub default: Option<String>,
}

/// Where the registry reads its settings from.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn load(&self) -> Result<RawLocaleSettings, SettingsError>;
}

/// Reads the `site_settings` table.
#[derive(Clone)]
pub struct SqliteSettingsSource {
    pool: SqlitePool,
}

impl SqliteSettingsSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsSource for SqliteSettingsSource {
    async fn load(&self) -> Result<RawLocaleSettings, SettingsError> {
        let values = SiteSetting::find_values(
            &self.pool,
            &[SiteSetting::SUPPORTED_LOCALES, SiteSetting::DEFAULT_LOCALE],
        )
        .await?;

        let mut raw = RawLocaleSettings::default();
        for (key, value) in values {
            match key.as_str() {
                SiteSetting::SUPPORTED_LOCALES => raw.supported = Some(value),
                SiteSetting::DEFAULT_LOCALE => raw.default = Some(value),
                _ => {}
            }
        }
        Ok(raw)
    }
}

/// Immutable view of the registry, handed out per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct LocaleSettings {
    /// Normalized, duplicate-free, never empty.
    pub supported: Vec<LocaleCode>,
    /// Always a member of `supported`.
    pub default: LocaleCode,
    /// `true` while the built-in fallback stands in for the settings store.
    pub is_fallback: bool,
}

impl LocaleSettings {
    fn fallback(locale: &LocaleCode) -> Self {
        Self {
            supported: vec![locale.clone()],
            default: locale.clone(),
            is_fallback: true,
        }
    }

    /// Normalize stored settings. Invalid entries are dropped, an empty list
    /// degrades to `[fallback]`, and a default outside the supported set is
    /// replaced by the first supported locale.
    fn sanitize(raw: &RawLocaleSettings, fallback: &LocaleCode) -> Self {
        let entries = raw
            .supported
            .as_deref()
            .map(JsonList::parse_lenient)
            .unwrap_or_default();

        let mut supported: Vec<LocaleCode> = Vec::with_capacity(entries.as_slice().len());
        for entry in entries.as_slice() {
            match LocaleCode::normalize(entry) {
                Some(code) if !supported.contains(&code) => supported.push(code),
                Some(_) => {}
                None => debug!(entry = %entry, "Dropping invalid supported locale"),
            }
        }
        if supported.is_empty() {
            warn!(fallback = %fallback, "No valid supported locales configured, using fallback");
            supported.push(fallback.clone());
        }

        let configured = raw.default.as_deref().and_then(LocaleCode::normalize);
        let default = match configured {
            Some(code) if supported.contains(&code) => code,
            _ => {
                if let Some(configured) = raw.default.as_deref() {
                    debug!(configured, "Default locale is not supported, using first supported");
                }
                supported[0].clone()
            }
        };

        Self {
            supported,
            default,
            is_fallback: false,
        }
    }
}

struct Loaded {
    settings: Arc<LocaleSettings>,
    /// Set when the fallback was installed after a failed load, or when the
    /// settings were invalidated. Readers keep seeing `settings` until the
    /// next load replaces them.
    retry_after: Option<Instant>,
}

impl Loaded {
    fn is_fresh(&self) -> bool {
        self.retry_after
            .is_none_or(|retry_after| Instant::now() < retry_after)
    }
}

pub struct LocaleRegistry {
    source: Arc<dyn SettingsSource>,
    fallback: LocaleCode,
    retry_interval: Duration,
    state: RwLock<Option<Loaded>>,
    load_lock: Mutex<()>,
}

impl LocaleRegistry {
    pub fn new(
        source: Arc<dyn SettingsSource>,
        fallback: LocaleCode,
        retry_interval: Duration,
    ) -> Self {
        Self {
            source,
            fallback,
            retry_interval,
            state: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Load the settings unless they are already cached.
    ///
    /// Concurrent callers wait on the first load instead of issuing their
    /// own. A failed load installs the fallback until the retry interval has
    /// passed.
    pub async fn ensure_loaded(&self) {
        if self.is_fresh().await {
            return;
        }

        let _guard = self.load_lock.lock().await;
        if self.is_fresh().await {
            return;
        }

        let loaded = match self.source.load().await {
            Ok(raw) => {
                let settings = LocaleSettings::sanitize(&raw, &self.fallback);
                info!(
                    supported = ?settings.supported,
                    default = %settings.default,
                    "Locale settings loaded"
                );
                Loaded {
                    settings: Arc::new(settings),
                    retry_after: None,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = %self.fallback,
                    retry_in = ?self.retry_interval,
                    "Failed to load locale settings, using fallback"
                );
                Loaded {
                    settings: Arc::new(LocaleSettings::fallback(&self.fallback)),
                    retry_after: Some(Instant::now() + self.retry_interval),
                }
            }
        };
        *self.state.write().await = Some(loaded);
    }

    async fn is_fresh(&self) -> bool {
        self.state.read().await.as_ref().is_some_and(Loaded::is_fresh)
    }

    /// Mark the cached settings stale; the next [`Self::ensure_loaded`]
    /// reloads. Until then readers keep the previous settings.
    pub async fn invalidate(&self) {
        if let Some(loaded) = self.state.write().await.as_mut() {
            loaded.retry_after = Some(Instant::now());
        }
        debug!("Locale settings invalidated");
    }

    pub fn normalize(raw: &str) -> Option<LocaleCode> {
        LocaleCode::normalize(raw)
    }

    /// Current settings, or the fallback when nothing is loaded yet.
    pub async fn snapshot(&self) -> Arc<LocaleSettings> {
        match self.state.read().await.as_ref() {
            Some(loaded) => Arc::clone(&loaded.settings),
            None => Arc::new(LocaleSettings::fallback(&self.fallback)),
        }
    }

    pub async fn is_supported(&self, code: &LocaleCode) -> bool {
        self.snapshot().await.supported.contains(code)
    }

    pub async fn current_default(&self) -> LocaleCode {
        self.snapshot().await.default.clone()
    }

    pub async fn resolve(
        &self,
        requested: Option<&str>,
        record_default: Option<&str>,
    ) -> FallbackChain {
        let settings = self.snapshot().await;
        FallbackChain::resolve(
            &settings.supported,
            requested,
            record_default,
            &settings.default,
        )
    }
}
