use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

use super::errors::WallpaperStateError;
use super::types::{DailyImageCache, WallpaperSettings};

/// Storage key of the settings record.
pub const SETTINGS_KEY: &str = "wallpaper_settings";
/// Storage key of the single-slot daily image cache.
pub const DAILY_IMAGE_KEY: &str = "wallpaper_daily_image";

/// Persistence seam for the wallpaper module's two records.
///
/// Loading is forgiving: an absent or unreadable settings record yields the
/// documented defaults and an absent or unreadable cache record yields
/// `None`, in both cases with a log line rather than an error. Only backend
/// failures (the store itself erroring) are reported to the caller.
#[async_trait]
pub trait WallpaperStateProvider: Send + Sync {
    async fn load_settings(&self) -> Result<WallpaperSettings, WallpaperStateError>;
    async fn save_settings(&self, settings: &WallpaperSettings)
        -> Result<(), WallpaperStateError>;
    async fn load_daily_cache(&self) -> Result<Option<DailyImageCache>, WallpaperStateError>;
    async fn save_daily_cache(&self, cache: &DailyImageCache) -> Result<(), WallpaperStateError>;
}

/// A [`WallpaperStateProvider`] that JSON-encodes records into a
/// [`KeyValueStore`] under fixed keys.
pub struct KeyValueStateProvider {
    store: Arc<dyn KeyValueStore>,
    settings_key: String,
    cache_key: String,
}

impl KeyValueStateProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(store, SETTINGS_KEY, DAILY_IMAGE_KEY)
    }

    pub fn with_keys(
        store: Arc<dyn KeyValueStore>,
        settings_key: impl Into<String>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            settings_key: settings_key.into(),
            cache_key: cache_key.into(),
        }
    }
}

#[async_trait]
impl WallpaperStateProvider for KeyValueStateProvider {
    async fn load_settings(&self) -> Result<WallpaperSettings, WallpaperStateError> {
        let raw = self
            .store
            .get(&self.settings_key)
            .await
            .map_err(|e| {
                WallpaperStateError::persistence(
                    "load",
                    format!("failed to read key '{}'", self.settings_key),
                    Some(e),
                )
            })?;

        match raw {
            Some(raw) => match serde_json::from_str::<WallpaperSettings>(&raw) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    warn!(
                        "Unreadable wallpaper settings record under '{}', using defaults: {}",
                        self.settings_key, e
                    );
                    Ok(WallpaperSettings::default())
                }
            },
            None => {
                debug!(
                    "No wallpaper settings record under '{}', using defaults",
                    self.settings_key
                );
                Ok(WallpaperSettings::default())
            }
        }
    }

    async fn save_settings(
        &self,
        settings: &WallpaperSettings,
    ) -> Result<(), WallpaperStateError> {
        let raw = serde_json::to_string(settings).map_err(|e| {
            WallpaperStateError::Serialization {
                record: self.settings_key.clone(),
                source: e,
            }
        })?;
        self.store.set(&self.settings_key, &raw).await.map_err(|e| {
            WallpaperStateError::persistence(
                "save",
                format!("failed to write key '{}'", self.settings_key),
                Some(e),
            )
        })
    }

    async fn load_daily_cache(&self) -> Result<Option<DailyImageCache>, WallpaperStateError> {
        let raw = self.store.get(&self.cache_key).await.map_err(|e| {
            WallpaperStateError::persistence(
                "load",
                format!("failed to read key '{}'", self.cache_key),
                Some(e),
            )
        })?;

        match raw {
            Some(raw) => match serde_json::from_str::<DailyImageCache>(&raw) {
                Ok(cache) => Ok(Some(cache)),
                Err(e) => {
                    warn!(
                        "Unreadable daily image cache under '{}', ignoring it: {}",
                        self.cache_key, e
                    );
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save_daily_cache(&self, cache: &DailyImageCache) -> Result<(), WallpaperStateError> {
        let raw = serde_json::to_string(cache).map_err(|e| WallpaperStateError::Serialization {
            record: self.cache_key.clone(),
            source: e,
        })?;
        self.store.set(&self.cache_key, &raw).await.map_err(|e| {
            WallpaperStateError::persistence(
                "save",
                format!("failed to write key '{}'", self.cache_key),
                Some(e),
            )
        })
    }
}
