//! Pure resolution of rendering parameters from wallpaper state.
//!
//! [`WallpaperState`] is a cloneable snapshot of everything the renderer
//! needs: the persisted settings plus the runtime-only remote image and the
//! session's random local index. The derivations on it are pure functions of
//! the snapshot, recomputed on demand by callers; there is no dependency
//! tracking behind them.

use super::assets;
use super::types::{MediaKind, RemoteImageInfo, WallpaperSettings, WallpaperSource, WallpaperStyle};

/// Snapshot of the wallpaper state for one page session.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperState {
    pub settings: WallpaperSettings,
    /// Most recently adopted remote daily image. Runtime-only.
    pub remote_image: Option<RemoteImageInfo>,
    /// Randomly chosen index into `settings.local_images` for this session.
    /// Runtime-only.
    pub current_local_index: usize,
}

impl Default for WallpaperState {
    fn default() -> Self {
        Self {
            settings: WallpaperSettings::default(),
            remote_image: None,
            current_local_index: 0,
        }
    }
}

impl WallpaperState {
    /// The media string the `local` source currently points at: the randomly
    /// selected upload, or the legacy single payload when no uploads exist.
    fn current_local_media(&self) -> Option<&str> {
        if !self.settings.local_images.is_empty() {
            self.settings
                .local_images
                .get(self.current_local_index)
                .map(String::as_str)
        } else {
            self.settings.local_data.as_deref()
        }
    }

    /// The single media reference selected for rendering.
    ///
    /// | source  | result |
    /// |---------|--------|
    /// | local   | selected upload, else legacy payload |
    /// | url     | the `url` field verbatim |
    /// | bing    | cached remote image URL, else first bundled static image |
    /// | dynamic | bundled video at `dynamic_index`, else first entry |
    /// | default | bundled static image at `default_index`, else first entry |
    pub fn effective_url(&self) -> Option<&str> {
        match self.settings.source {
            WallpaperSource::Local => self.current_local_media(),
            WallpaperSource::Url => self.settings.url.as_deref(),
            WallpaperSource::Bing => Some(
                self.remote_image
                    .as_ref()
                    .filter(|image| !image.url.is_empty())
                    .map_or_else(|| assets::default_wallpaper(), |image| image.url.as_str()),
            ),
            WallpaperSource::Dynamic => {
                Some(assets::dynamic_wallpaper_at(self.settings.dynamic_index))
            }
            WallpaperSource::Default => {
                Some(assets::static_wallpaper_at(self.settings.default_index))
            }
        }
    }

    /// Whether the effective media renders in a video element.
    pub fn media_kind(&self) -> MediaKind {
        let is_video = match self.settings.source {
            WallpaperSource::Dynamic => true,
            WallpaperSource::Local => self
                .current_local_media()
                .map_or(false, assets::is_video_url),
            WallpaperSource::Url => self
                .settings
                .url
                .as_deref()
                .map_or(false, assets::is_video_url),
            _ => false,
        };
        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    /// Style parameters for the background layer, or `None` when there is no
    /// effective URL to render.
    pub fn style(&self) -> Option<WallpaperStyle> {
        let url = self.effective_url().filter(|u| !u.is_empty())?;
        Some(WallpaperStyle {
            background_image: format!("url({url})"),
            background_size: "cover".to_string(),
            background_position: "center".to_string(),
            filter: if self.settings.blur {
                format!("blur({}px)", self.settings.blur_amount)
            } else {
                "none".to_string()
            },
            opacity: self.settings.brightness / 100.0,
        })
    }
}
