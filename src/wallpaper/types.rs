use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Active wallpaper source kind.
///
/// Persisted as a lowercase string under the legacy `type` field. Unrecognized
/// stored values decode to [`WallpaperSource::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperSource {
    /// A bundled static image, selected by `default_index`.
    Default,
    /// A bundled video, selected by `dynamic_index`.
    Dynamic,
    /// User-uploaded media (data URLs).
    Local,
    /// A user-supplied remote URL.
    Url,
    /// The once-daily external image.
    Bing,
}

impl Default for WallpaperSource {
    fn default() -> Self {
        WallpaperSource::Default
    }
}

impl WallpaperSource {
    /// Parses a persisted source string, mapping unknown values to `Default`.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "dynamic" => WallpaperSource::Dynamic,
            "local" => WallpaperSource::Local,
            "url" => WallpaperSource::Url,
            "bing" => WallpaperSource::Bing,
            _ => WallpaperSource::Default,
        }
    }
}

/// The persisted wallpaper settings record.
///
/// Serialized with the new-tab page's historical field names (`type`,
/// `localData`, `localImages`, ...), so records written by earlier releases
/// keep decoding. Deserialization is lenient at this boundary: absent or null
/// `localImages` becomes an empty list, absent or negative indices become 0,
/// and an unknown `type` becomes `default`. The in-memory shape is canonical
/// and is not re-checked at access sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperSettings {
    #[serde(rename = "type", default, deserialize_with = "de::source_or_default")]
    pub source: WallpaperSource,
    /// User-supplied remote image/video URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Legacy single local-media payload (data URL).
    #[serde(default)]
    pub local_data: Option<String>,
    /// User-uploaded media payloads (data URLs), in upload order.
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub local_images: Vec<String>,
    /// Index into the bundled static-image list.
    #[serde(default, deserialize_with = "de::index_or_zero")]
    pub default_index: usize,
    /// Index into the bundled video list.
    #[serde(default, deserialize_with = "de::index_or_zero")]
    pub dynamic_index: usize,
    #[serde(default = "de::default_blur")]
    pub blur: bool,
    /// Blur radius in pixels.
    #[serde(default = "de::default_blur_amount")]
    pub blur_amount: f64,
    /// Opacity percentage (0-100) applied to the background.
    #[serde(default = "de::default_brightness")]
    pub brightness: f64,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            source: WallpaperSource::Default,
            url: None,
            local_data: None,
            local_images: Vec::new(),
            default_index: 0,
            dynamic_index: 0,
            blur: true,
            blur_amount: 30.0,
            brightness: 100.0,
        }
    }
}

impl WallpaperSettings {
    /// Whether the record carries any trace of prior customization.
    ///
    /// Used by the first-run heuristic: a stored `default` source with no
    /// custom media is taken to mean "never configured" rather than "user
    /// explicitly chose default". An empty-string URL or payload does not
    /// count as customization.
    pub fn has_custom_media(&self) -> bool {
        self.url.as_deref().map_or(false, |u| !u.is_empty())
            || self.local_data.as_deref().map_or(false, |d| !d.is_empty())
            || !self.local_images.is_empty()
    }
}

/// Metadata of a fetched remote daily image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageInfo {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub copyright: String,
}

/// Single-slot persisted cache of the most recent daily image.
///
/// `date` serializes as `YYYY-MM-DD` (local calendar date of the fetch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyImageCache {
    pub date: NaiveDate,
    pub data: RemoteImageInfo,
}

/// Classification of the effective media, used to pick the rendering element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

/// Derived style parameters for the background layer.
///
/// Serializes with camelCase keys so the UI layer can apply it directly as an
/// inline style object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperStyle {
    pub background_image: String,
    pub background_size: String,
    pub background_position: String,
    pub filter: String,
    pub opacity: f64,
}

/// A browser-level download the UI shell should perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub filename: String,
}

mod de {
    use serde::{Deserialize, Deserializer};

    use super::WallpaperSource;

    pub(super) fn default_blur() -> bool {
        true
    }

    pub(super) fn default_blur_amount() -> f64 {
        30.0
    }

    pub(super) fn default_brightness() -> f64 {
        100.0
    }

    pub(super) fn source_or_default<'de, D>(deserializer: D) -> Result<WallpaperSource, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(WallpaperSource::parse_lenient)
            .unwrap_or_default())
    }

    pub(super) fn index_or_zero<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.map_or(0, |value| value.max(0) as usize))
    }

    pub(super) fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = WallpaperSettings::default();
        assert_eq!(settings.source, WallpaperSource::Default);
        assert_eq!(settings.url, None);
        assert_eq!(settings.local_data, None);
        assert!(settings.local_images.is_empty());
        assert_eq!(settings.default_index, 0);
        assert_eq!(settings.dynamic_index, 0);
        assert!(settings.blur);
        assert_eq!(settings.blur_amount, 30.0);
        assert_eq!(settings.brightness, 100.0);
    }

    #[test]
    fn test_deserialize_empty_record_yields_defaults() {
        let settings: WallpaperSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, WallpaperSettings::default());
    }

    #[test]
    fn test_deserialize_legacy_record_with_nulls() {
        let raw = r#"{
            "type": "local",
            "url": null,
            "localData": "data:image/png;base64,xyz",
            "localImages": null,
            "defaultIndex": -3,
            "dynamicIndex": 2
        }"#;
        let settings: WallpaperSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.source, WallpaperSource::Local);
        assert_eq!(settings.local_data.as_deref(), Some("data:image/png;base64,xyz"));
        assert!(settings.local_images.is_empty());
        assert_eq!(settings.default_index, 0);
        assert_eq!(settings.dynamic_index, 2);
        assert!(settings.blur);
    }

    #[test]
    fn test_deserialize_unknown_source_falls_back_to_default() {
        let settings: WallpaperSettings =
            serde_json::from_str(r#"{"type": "slideshow"}"#).unwrap();
        assert_eq!(settings.source, WallpaperSource::Default);
    }

    #[test]
    fn test_serialize_uses_historical_field_names() {
        let mut settings = WallpaperSettings::default();
        settings.source = WallpaperSource::Bing;
        settings.local_images = vec!["a".to_string()];
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""type":"bing""#));
        assert!(json.contains(r#""localImages":["a"]"#));
        assert!(json.contains(r#""blurAmount":30.0"#));
    }

    #[test]
    fn test_has_custom_media_ignores_empty_strings() {
        let mut settings = WallpaperSettings::default();
        assert!(!settings.has_custom_media());
        settings.url = Some(String::new());
        assert!(!settings.has_custom_media());
        settings.url = Some("https://example.com/pic.jpg".to_string());
        assert!(settings.has_custom_media());
    }

    #[test]
    fn test_daily_cache_date_serializes_as_plain_date() {
        let cache = DailyImageCache {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            data: RemoteImageInfo {
                url: "https://example.com/daily.jpg".to_string(),
                title: "Title".to_string(),
                copyright: "Someone".to_string(),
            },
        };
        let json = serde_json::to_string(&cache).unwrap();
        assert!(json.contains(r#""date":"2024-03-09""#));
        let back: DailyImageCache = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cache);
    }
}
