use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rand::Rng;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, warn};

use super::assets;
use super::events::{RemoteImageUpdatedEvent, WallpaperSettingsChangedEvent};
use super::fetch_iface::RemoteImageFetcher;
use super::persistence_iface::WallpaperStateProvider;
use super::resolver::WallpaperState;
use super::types::{
    DailyImageCache, DownloadRequest, MediaKind, RemoteImageInfo, WallpaperSettings,
    WallpaperSource, WallpaperStyle,
};

/// Placeholder title shown when the bundled fallback stands in for the
/// remote daily image.
pub const FALLBACK_IMAGE_TITLE: &str = "Default wallpaper";
/// Attribution used when the fetch capability is unavailable.
pub const FALLBACK_IMAGE_ATTRIBUTION: &str = "Bundled image";
/// Attribution used after a failed fetch with no cached image to fall back on.
pub const FALLBACK_IMAGE_ATTRIBUTION_FETCH_FAILED: &str =
    "Daily image unavailable, showing bundled default";

// --- WallpaperService Trait ---

/// Wallpaper selection and configuration service for one page session.
///
/// Mutators update the in-memory state and write the whole settings record
/// through to persistence immediately. None of the methods surface
/// persistence or fetch failures; those are logged and absorbed, and the
/// state always stays renderable. Callers serialize mutator invocations
/// themselves: each mutator reads and rewrites the whole record, so
/// concurrent calls are last-writer-wins.
#[async_trait]
pub trait WallpaperService: Send + Sync {
    /// Loads persisted settings (defaults when absent), applies the
    /// first-run migration, and prepares session state. For the `bing`
    /// source any cached daily image is adopted immediately and a
    /// refresh-if-stale fetch is started in the background without blocking
    /// the caller.
    async fn initialize(&self);

    /// A snapshot of the current state for pure derivation by the caller.
    async fn state(&self) -> WallpaperState;
    async fn settings(&self) -> WallpaperSettings;
    async fn effective_url(&self) -> Option<String>;
    async fn media_kind(&self) -> MediaKind;
    async fn style(&self) -> Option<WallpaperStyle>;
    async fn remote_image(&self) -> Option<RemoteImageInfo>;
    async fn current_local_index(&self) -> usize;

    /// Whether a daily image fetch is in flight.
    fn is_loading(&self) -> bool;

    /// Refreshes the remote daily image.
    ///
    /// Without `force_refresh`, a cache entry from today's local calendar
    /// date satisfies the call without touching the network. When the fetch
    /// capability is absent the bundled fallback is adopted silently. A
    /// failed fetch falls back to the most recent cache entry regardless of
    /// its date, then to the bundled fallback. There is no retry.
    async fn fetch_remote_daily_image(&self, force_refresh: bool);

    async fn set_source(&self, source: WallpaperSource);
    async fn set_url(&self, url: String);
    async fn set_local_image(&self, data_url: String);
    async fn add_local_images(&self, data_urls: Vec<String>);
    async fn set_local_images(&self, data_urls: Vec<String>);
    async fn remove_local_image(&self, index: usize);
    async fn set_default_index(&self, index: usize);
    async fn set_dynamic_index(&self, index: usize);
    async fn select_bing_source(&self);
    async fn set_blur(&self, blur: bool);
    async fn set_blur_amount(&self, amount: f64);
    async fn set_brightness(&self, brightness: f64);

    /// Picks a new random local index different from the current one. No-op
    /// unless more than one local image exists.
    async fn refresh_random_local(&self);

    /// Restores every setting to its documented default and clears the
    /// runtime state.
    async fn reset(&self);

    /// A download request for the current remote daily image, named with
    /// today's date. `None` when no remote image is loaded. The UI shell
    /// performs the actual browser download.
    async fn remote_image_download_request(&self) -> Option<DownloadRequest>;

    fn subscribe_to_settings_changes(&self)
        -> broadcast::Receiver<WallpaperSettingsChangedEvent>;
    fn subscribe_to_remote_image_updates(&self) -> broadcast::Receiver<RemoteImageUpdatedEvent>;
}

// --- DefaultWallpaperService Implementation ---

#[derive(Clone)]
pub struct DefaultWallpaperService {
    state: Arc<RwLock<WallpaperState>>,
    loading: Arc<AtomicBool>,
    provider: Arc<dyn WallpaperStateProvider>,
    fetcher: Option<Arc<dyn RemoteImageFetcher>>,
    settings_event_sender: broadcast::Sender<WallpaperSettingsChangedEvent>,
    remote_image_event_sender: broadcast::Sender<RemoteImageUpdatedEvent>,
}

/// Sets the shared loading flag on creation and clears it on drop, so the
/// flag cannot stay set on any exit path of a fetch.
struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    fn engage(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl DefaultWallpaperService {
    /// Creates a service over a persistence provider and an optional
    /// remote-fetch capability. Passing `None` for the fetcher declares the
    /// runtime context unprivileged; the decision is made once here, not
    /// re-detected later.
    pub fn new(
        provider: Arc<dyn WallpaperStateProvider>,
        fetcher: Option<Arc<dyn RemoteImageFetcher>>,
        broadcast_capacity: usize,
    ) -> Self {
        let (settings_event_sender, _) = broadcast::channel(broadcast_capacity);
        let (remote_image_event_sender, _) = broadcast::channel(broadcast_capacity);
        Self {
            state: Arc::new(RwLock::new(WallpaperState::default())),
            loading: Arc::new(AtomicBool::new(false)),
            provider,
            fetcher,
            settings_event_sender,
            remote_image_event_sender,
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn builtin_fallback_image(attribution: &str) -> RemoteImageInfo {
        RemoteImageInfo {
            url: assets::default_wallpaper().to_string(),
            title: FALLBACK_IMAGE_TITLE.to_string(),
            copyright: attribution.to_string(),
        }
    }

    /// Persists the whole settings record and notifies subscribers. A failed
    /// write is logged; the in-memory state keeps the change.
    async fn persist_settings(&self) {
        let settings = self.state.read().await.settings.clone();
        if let Err(e) = self.provider.save_settings(&settings).await {
            error!("Failed to persist wallpaper settings: {}", e);
        }
        if self
            .settings_event_sender
            .send(WallpaperSettingsChangedEvent::new(settings))
            .is_err()
        {
            debug!("No subscribers for settings change event");
        }
    }

    async fn adopt_remote_image(&self, image: RemoteImageInfo) {
        self.state.write().await.remote_image = Some(image.clone());
        if self
            .remote_image_event_sender
            .send(RemoteImageUpdatedEvent::new(image))
            .is_err()
        {
            debug!("No subscribers for remote image update event");
        }
    }

    /// Stale-is-better-than-nothing: adopt the most recent cache entry
    /// regardless of its date, or the bundled fallback when none is usable.
    async fn adopt_stale_cache_or_fallback(&self) {
        match self.provider.load_daily_cache().await {
            Ok(Some(cache)) if !cache.data.url.is_empty() => {
                debug!("Using expired daily image cache as fallback");
                self.adopt_remote_image(cache.data).await;
            }
            Ok(_) => {
                self.adopt_remote_image(Self::builtin_fallback_image(
                    FALLBACK_IMAGE_ATTRIBUTION_FETCH_FAILED,
                ))
                .await;
            }
            Err(e) => {
                warn!("Failed to read daily image cache: {}", e);
                self.adopt_remote_image(Self::builtin_fallback_image(
                    FALLBACK_IMAGE_ATTRIBUTION_FETCH_FAILED,
                ))
                .await;
            }
        }
    }
}

#[async_trait]
impl WallpaperService for DefaultWallpaperService {
    async fn initialize(&self) {
        let mut settings = match self.provider.load_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load wallpaper settings, using defaults: {}", e);
                WallpaperSettings::default()
            }
        };

        // First-run heuristic: a stored "default" source with no trace of
        // customization means the user never configured anything, so those
        // sessions start on the first bundled video. A user who explicitly
        // picked "default" before ever setting a URL or upload is
        // indistinguishable from a first run here.
        if settings.source == WallpaperSource::Default && !settings.has_custom_media() {
            settings.source = WallpaperSource::Dynamic;
            settings.dynamic_index = 0;
            if let Err(e) = self.provider.save_settings(&settings).await {
                error!("Failed to persist first-run wallpaper migration: {}", e);
            }
        }

        let source = settings.source;
        let local_count = settings.local_images.len();
        {
            let mut state = self.state.write().await;
            state.settings = settings;
            if source == WallpaperSource::Local && local_count > 0 {
                state.current_local_index = rand::thread_rng().gen_range(0..local_count);
            }
        }

        if source == WallpaperSource::Bing {
            // Any cached image paints immediately, whatever its date; the
            // background refresh replaces it if it is stale.
            match self.provider.load_daily_cache().await {
                Ok(Some(cache)) if !cache.data.url.is_empty() => {
                    self.adopt_remote_image(cache.data).await;
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to read daily image cache: {}", e),
            }
            let service = self.clone();
            tokio::spawn(async move {
                service.fetch_remote_daily_image(false).await;
            });
        }
    }

    async fn state(&self) -> WallpaperState {
        self.state.read().await.clone()
    }

    async fn settings(&self) -> WallpaperSettings {
        self.state.read().await.settings.clone()
    }

    async fn effective_url(&self) -> Option<String> {
        self.state.read().await.effective_url().map(str::to_string)
    }

    async fn media_kind(&self) -> MediaKind {
        self.state.read().await.media_kind()
    }

    async fn style(&self) -> Option<WallpaperStyle> {
        self.state.read().await.style()
    }

    async fn remote_image(&self) -> Option<RemoteImageInfo> {
        self.state.read().await.remote_image.clone()
    }

    async fn current_local_index(&self) -> usize {
        self.state.read().await.current_local_index
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn fetch_remote_daily_image(&self, force_refresh: bool) {
        let _loading = LoadingGuard::engage(self.loading.clone());
        let today = Self::today();

        if !force_refresh {
            match self.provider.load_daily_cache().await {
                Ok(Some(cache)) if cache.date == today && !cache.data.url.is_empty() => {
                    debug!("Using cached daily image for {}", today);
                    self.adopt_remote_image(cache.data).await;
                    return;
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to read daily image cache: {}", e),
            }
        }

        let Some(fetcher) = self.fetcher.clone() else {
            debug!("Remote image fetch capability unavailable, using bundled fallback");
            self.adopt_remote_image(Self::builtin_fallback_image(FALLBACK_IMAGE_ATTRIBUTION))
                .await;
            return;
        };

        match fetcher.fetch_remote_image().await {
            Ok(response) => {
                if let Some(image) = response.usable_image() {
                    let image = image.clone();
                    self.adopt_remote_image(image.clone()).await;
                    let cache = DailyImageCache {
                        date: today,
                        data: image,
                    };
                    if let Err(e) = self.provider.save_daily_cache(&cache).await {
                        warn!("Failed to persist daily image cache: {}", e);
                    } else {
                        debug!("Daily image fetched and cached for {}", today);
                    }
                } else {
                    warn!(
                        "Remote image fetch unsuccessful: {}",
                        response.error.as_deref().unwrap_or("no image in response")
                    );
                    self.adopt_stale_cache_or_fallback().await;
                }
            }
            Err(e) => {
                error!("Remote image fetch failed: {}", e);
                self.adopt_stale_cache_or_fallback().await;
            }
        }
    }

    async fn set_source(&self, source: WallpaperSource) {
        self.state.write().await.settings.source = source;
        if source == WallpaperSource::Bing {
            self.fetch_remote_daily_image(false).await;
        }
        self.persist_settings().await;
    }

    async fn set_url(&self, url: String) {
        {
            let mut state = self.state.write().await;
            state.settings.url = Some(url);
            state.settings.source = WallpaperSource::Url;
        }
        self.persist_settings().await;
    }

    async fn set_local_image(&self, data_url: String) {
        {
            let mut state = self.state.write().await;
            state.settings.local_data = Some(data_url);
            state.settings.source = WallpaperSource::Local;
        }
        self.persist_settings().await;
    }

    async fn add_local_images(&self, data_urls: Vec<String>) {
        {
            let mut state = self.state.write().await;
            state.settings.local_images.extend(data_urls);
            state.settings.source = WallpaperSource::Local;
            let count = state.settings.local_images.len();
            if count > 0 {
                state.current_local_index = rand::thread_rng().gen_range(0..count);
            }
        }
        self.persist_settings().await;
    }

    async fn set_local_images(&self, data_urls: Vec<String>) {
        {
            let mut state = self.state.write().await;
            state.settings.local_images = data_urls;
            state.settings.source = WallpaperSource::Local;
            let count = state.settings.local_images.len();
            state.current_local_index = if count > 0 {
                rand::thread_rng().gen_range(0..count)
            } else {
                0
            };
        }
        self.persist_settings().await;
    }

    async fn remove_local_image(&self, index: usize) {
        {
            let mut state = self.state.write().await;
            if index < state.settings.local_images.len() {
                state.settings.local_images.remove(index);
            }
            if state.settings.local_images.is_empty() {
                state.settings.source = WallpaperSource::Default;
                state.current_local_index = 0;
            } else if state.current_local_index >= state.settings.local_images.len() {
                state.current_local_index = 0;
            }
        }
        self.persist_settings().await;
    }

    async fn set_default_index(&self, index: usize) {
        {
            let mut state = self.state.write().await;
            state.settings.default_index = index;
            state.settings.source = WallpaperSource::Default;
        }
        self.persist_settings().await;
    }

    async fn set_dynamic_index(&self, index: usize) {
        {
            let mut state = self.state.write().await;
            state.settings.dynamic_index = index;
            state.settings.source = WallpaperSource::Dynamic;
        }
        self.persist_settings().await;
    }

    async fn select_bing_source(&self) {
        self.state.write().await.settings.source = WallpaperSource::Bing;
        self.fetch_remote_daily_image(false).await;
        self.persist_settings().await;
    }

    async fn set_blur(&self, blur: bool) {
        self.state.write().await.settings.blur = blur;
        self.persist_settings().await;
    }

    async fn set_blur_amount(&self, amount: f64) {
        self.state.write().await.settings.blur_amount = amount;
        self.persist_settings().await;
    }

    async fn set_brightness(&self, brightness: f64) {
        self.state.write().await.settings.brightness = brightness;
        self.persist_settings().await;
    }

    async fn refresh_random_local(&self) {
        let mut state = self.state.write().await;
        let count = state.settings.local_images.len();
        if count > 1 {
            let mut rng = rand::thread_rng();
            let mut next = rng.gen_range(0..count);
            while next == state.current_local_index {
                next = rng.gen_range(0..count);
            }
            state.current_local_index = next;
        }
    }

    async fn reset(&self) {
        {
            let mut state = self.state.write().await;
            state.settings = WallpaperSettings::default();
            state.current_local_index = 0;
            state.remote_image = None;
        }
        self.persist_settings().await;
    }

    async fn remote_image_download_request(&self) -> Option<DownloadRequest> {
        let state = self.state.read().await;
        state
            .remote_image
            .as_ref()
            .filter(|image| !image.url.is_empty())
            .map(|image| DownloadRequest {
                url: image.url.clone(),
                filename: format!("daily-wallpaper-{}.jpg", Self::today()),
            })
    }

    fn subscribe_to_settings_changes(
        &self,
    ) -> broadcast::Receiver<WallpaperSettingsChangedEvent> {
        self.settings_event_sender.subscribe()
    }

    fn subscribe_to_remote_image_updates(&self) -> broadcast::Receiver<RemoteImageUpdatedEvent> {
        self.remote_image_event_sender.subscribe()
    }
}
