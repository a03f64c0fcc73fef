use serde::{Deserialize, Serialize};

use super::types::{RemoteImageInfo, WallpaperSettings};

/// Broadcast after a mutator has applied and persisted a settings change.
///
/// Carries the full settings snapshot; consumers re-derive whatever they
/// render from it. Nothing is recomputed automatically on their behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallpaperSettingsChangedEvent {
    pub settings: WallpaperSettings,
}

impl WallpaperSettingsChangedEvent {
    pub fn new(settings: WallpaperSettings) -> Self {
        Self { settings }
    }
}

/// Broadcast when the current remote daily image changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageUpdatedEvent {
    pub image: RemoteImageInfo,
}

impl RemoteImageUpdatedEvent {
    pub fn new(image: RemoteImageInfo) -> Self {
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallpaper::types::WallpaperSource;

    #[test]
    fn test_settings_changed_event_serialization() {
        let mut settings = WallpaperSettings::default();
        settings.source = WallpaperSource::Url;
        settings.url = Some("https://example.com/bg.jpg".to_string());
        let event = WallpaperSettingsChangedEvent::new(settings.clone());

        let serialized = serde_json::to_string(&event).unwrap();
        assert!(serialized.contains(r#""type":"url""#));

        let deserialized: WallpaperSettingsChangedEvent =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.settings, settings);
    }

    #[test]
    fn test_remote_image_updated_event_serialization() {
        let event = RemoteImageUpdatedEvent::new(RemoteImageInfo {
            url: "https://example.com/daily.jpg".to_string(),
            title: "Morning".to_string(),
            copyright: "Photographer".to_string(),
        });

        let serialized = serde_json::to_string(&event).unwrap();
        let deserialized: RemoteImageUpdatedEvent = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, event);
    }
}
