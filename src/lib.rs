//! Wallpaper domain service for the Tabula new-tab page.
//!
//! This crate tracks which wallpaper source is active (bundled static image,
//! bundled video, user uploads, a remote URL, or the once-daily external
//! image), persists user preferences through an injected key-value store, and
//! derives the rendering parameters the UI needs (effective media URL, media
//! kind, blur/brightness style).
//!
//! The service is constructed once per page session and passed down to UI
//! consumers; there is no process-wide singleton. The two external seams are
//! explicit: persistence behind [`wallpaper::WallpaperStateProvider`] and the
//! privileged remote-image fetch behind an optional
//! [`wallpaper::RemoteImageFetcher`]. Hosts without the privileged background
//! context simply construct the service without a fetcher and the daily image
//! degrades to a bundled fallback.

pub mod storage;
pub mod wallpaper;

pub use storage::{InMemoryKeyValueStore, KeyValueStore, StorageError};
pub use wallpaper::{
    DailyImageCache, DefaultWallpaperService, DownloadRequest, KeyValueStateProvider, MediaKind,
    RemoteImageFetcher, RemoteImageInfo, RemoteImageRequest, RemoteImageResponse,
    RemoteImageUpdatedEvent, WallpaperService, WallpaperSettings, WallpaperSettingsChangedEvent,
    WallpaperSource, WallpaperState, WallpaperStateError, WallpaperStateProvider, WallpaperStyle,
};
