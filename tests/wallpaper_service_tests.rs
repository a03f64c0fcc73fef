//! End-to-end tests of the wallpaper service over an in-memory store,
//! exercising persistence across service instances the way separate page
//! sessions would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local};

use tabula_wallpaper::wallpaper::persistence_iface::KeyValueStateProvider;
use tabula_wallpaper::{
    DailyImageCache, DefaultWallpaperService, InMemoryKeyValueStore, RemoteImageFetcher,
    RemoteImageInfo, RemoteImageResponse, WallpaperService, WallpaperSource, WallpaperStateError,
    WallpaperStateProvider,
};

struct CountingFetcher {
    calls: AtomicUsize,
    response: RemoteImageResponse,
}

impl CountingFetcher {
    fn succeeding(url: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: RemoteImageResponse {
                success: true,
                data: Some(RemoteImageInfo {
                    url: url.to_string(),
                    title: "Daily".to_string(),
                    copyright: "Someone".to_string(),
                }),
                error: None,
            },
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteImageFetcher for CountingFetcher {
    async fn fetch_remote_image(&self) -> Result<RemoteImageResponse, WallpaperStateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

struct FailingFetcher;

#[async_trait]
impl RemoteImageFetcher for FailingFetcher {
    async fn fetch_remote_image(&self) -> Result<RemoteImageResponse, WallpaperStateError> {
        Err(WallpaperStateError::fetch("transport unavailable"))
    }
}

fn service_over(
    store: Arc<InMemoryKeyValueStore>,
    fetcher: Option<Arc<dyn RemoteImageFetcher>>,
) -> DefaultWallpaperService {
    DefaultWallpaperService::new(Arc::new(KeyValueStateProvider::new(store)), fetcher, 8)
}

#[tokio::test]
async fn test_first_run_migration_is_persisted_for_later_sessions() {
    let store = Arc::new(InMemoryKeyValueStore::new());

    let first_session = service_over(store.clone(), None);
    first_session.initialize().await;
    assert_eq!(
        first_session.settings().await.source,
        WallpaperSource::Dynamic
    );

    let second_session = service_over(store, None);
    second_session.initialize().await;
    assert_eq!(
        second_session.settings().await.source,
        WallpaperSource::Dynamic
    );
}

#[tokio::test]
async fn test_settings_mutations_survive_a_new_session() {
    let store = Arc::new(InMemoryKeyValueStore::new());

    let session = service_over(store.clone(), None);
    session.initialize().await;
    session
        .set_url("https://example.com/background.jpg".to_string())
        .await;
    session.set_blur_amount(12.0).await;

    let later = service_over(store, None);
    later.initialize().await;
    let settings = later.settings().await;
    assert_eq!(settings.source, WallpaperSource::Url);
    assert_eq!(
        settings.url.as_deref(),
        Some("https://example.com/background.jpg")
    );
    assert_eq!(settings.blur_amount, 12.0);
}

#[tokio::test]
async fn test_daily_image_is_fetched_once_per_day_across_sessions() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let fetcher = Arc::new(CountingFetcher::succeeding("https://example.com/daily.jpg"));

    let session = service_over(store.clone(), Some(fetcher.clone()));
    session.select_bing_source().await;
    assert_eq!(fetcher.call_count(), 1);

    // Same day, same session: served from the cache.
    session.fetch_remote_daily_image(false).await;
    assert_eq!(fetcher.call_count(), 1);

    // Same day, new session over the same store: still served from the cache.
    let later = service_over(store, Some(fetcher.clone()));
    later.fetch_remote_daily_image(false).await;
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(
        later.remote_image().await.map(|image| image.url),
        Some("https://example.com/daily.jpg".to_string())
    );

    // A forced refresh always goes out.
    later.fetch_remote_daily_image(true).await;
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_failed_fetch_falls_back_to_stale_cache() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let provider = KeyValueStateProvider::new(store.clone());
    let stale = DailyImageCache {
        date: Local::now().date_naive() - Duration::days(1),
        data: RemoteImageInfo {
            url: "https://example.com/yesterday.jpg".to_string(),
            title: "Yesterday".to_string(),
            copyright: "Someone".to_string(),
        },
    };
    provider.save_daily_cache(&stale).await.unwrap();

    let session = service_over(store, Some(Arc::new(FailingFetcher)));
    session.fetch_remote_daily_image(false).await;

    assert_eq!(
        session.remote_image().await.map(|image| image.url),
        Some("https://example.com/yesterday.jpg".to_string())
    );
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_reset_returns_later_sessions_to_first_run_behavior() {
    let store = Arc::new(InMemoryKeyValueStore::new());

    let session = service_over(store.clone(), None);
    session.initialize().await;
    session.set_local_images(vec!["data:image/png;base64,x".to_string()]).await;
    session.set_brightness(55.0).await;
    session.reset().await;

    // The reset record carries no customization, so the next session's
    // first-run heuristic applies again.
    let later = service_over(store, None);
    later.initialize().await;
    let settings = later.settings().await;
    assert_eq!(settings.source, WallpaperSource::Dynamic);
    assert_eq!(settings.brightness, 100.0);
}
