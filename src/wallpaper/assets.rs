//! Bundled wallpaper asset lists.
//!
//! Two fixed ordered sequences ship with the application: static images and
//! videos, plus a thumbnail list indexed identically to the video list that
//! doubles as the static fallback when a video cannot render. Lookups fall
//! back to the first entry rather than failing on an out-of-range index.

/// Bundled static image paths, in presentation order.
pub const STATIC_WALLPAPERS: [&str; 15] = [
    "/wallpaper/static/1.jpg",
    "/wallpaper/static/2.jpg",
    "/wallpaper/static/3.jpg",
    "/wallpaper/static/4.jpg",
    "/wallpaper/static/5.jpg",
    "/wallpaper/static/6.jpg",
    "/wallpaper/static/7.jpg",
    "/wallpaper/static/8.jpg",
    "/wallpaper/static/9.jpg",
    "/wallpaper/static/10.jpg",
    "/wallpaper/static/11.jpg",
    "/wallpaper/static/12.jpg",
    "/wallpaper/static/13.jpg",
    "/wallpaper/static/14.jpg",
    "/wallpaper/static/15.jpg",
];

/// Bundled video paths.
pub const DYNAMIC_WALLPAPERS: [&str; 3] = [
    "/wallpaper/dynamic/drifting-nebula.mp4",
    "/wallpaper/dynamic/rainy-window.mp4",
    "/wallpaper/dynamic/forest-stream.mp4",
];

/// Still thumbnails for the videos, same order as [`DYNAMIC_WALLPAPERS`].
pub const DYNAMIC_WALLPAPER_THUMBNAILS: [&str; 3] = [
    "/wallpaper/dynamic/drifting-nebula_thumb.jpg",
    "/wallpaper/dynamic/rainy-window_thumb.jpg",
    "/wallpaper/dynamic/forest-stream_thumb.jpg",
];

const VIDEO_EXTENSIONS: [&str; 6] = [".mp4", ".webm", ".ogg", ".mov", ".avi", ".mkv"];

/// The first bundled static image, used as the fallback of last resort.
pub fn default_wallpaper() -> &'static str {
    STATIC_WALLPAPERS[0]
}

/// Static image at `index`, or the first entry when out of range.
pub fn static_wallpaper_at(index: usize) -> &'static str {
    STATIC_WALLPAPERS
        .get(index)
        .copied()
        .unwrap_or(STATIC_WALLPAPERS[0])
}

/// Video at `index`, or the first entry when out of range.
pub fn dynamic_wallpaper_at(index: usize) -> &'static str {
    DYNAMIC_WALLPAPERS
        .get(index)
        .copied()
        .unwrap_or(DYNAMIC_WALLPAPERS[0])
}

/// Still fallback for the video at `index`.
pub fn dynamic_fallback(index: usize) -> &'static str {
    DYNAMIC_WALLPAPER_THUMBNAILS
        .get(index)
        .copied()
        .unwrap_or(DYNAMIC_WALLPAPER_THUMBNAILS[0])
}

/// Whether a URL or data payload refers to a video.
///
/// True for `data:video/` payloads and for URLs containing one of the known
/// video extensions. The extension match is a case-insensitive substring
/// check, not a strict suffix check, so query strings after the extension
/// still classify correctly.
pub fn is_video_url(url: &str) -> bool {
    if url.starts_with("data:video/") {
        return true;
    }
    let lower = url.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}
