// Wallpaper selection and configuration for the new-tab page.

pub mod assets;
pub mod errors;
pub mod events;
pub mod fetch_iface;
pub mod persistence_iface;
pub mod resolver;
pub mod service;
pub mod types;

pub use self::errors::WallpaperStateError;
pub use self::events::{RemoteImageUpdatedEvent, WallpaperSettingsChangedEvent};
pub use self::fetch_iface::{
    RemoteImageFetcher, RemoteImageRequest, RemoteImageResponse, FETCH_REMOTE_IMAGE_REQUEST,
};
pub use self::persistence_iface::{
    KeyValueStateProvider, WallpaperStateProvider, DAILY_IMAGE_KEY, SETTINGS_KEY,
};
pub use self::resolver::WallpaperState;
pub use self::service::{DefaultWallpaperService, WallpaperService};
pub use self::types::{
    DailyImageCache, DownloadRequest, MediaKind, RemoteImageInfo, WallpaperSettings,
    WallpaperSource, WallpaperStyle,
};
