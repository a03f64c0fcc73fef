//! Remote-fetch capability seam.
//!
//! The daily image is fetched by the extension's privileged background
//! context; page contexts reach it through a cross-context message. This
//! module defines the message envelope, the response shape, and the
//! [`RemoteImageFetcher`] trait an adapter over that transport implements.
//!
//! The capability is optional by design: a plain web page hosting the
//! new-tab UI has no background context. Hosts decide at construction time
//! whether to supply a fetcher; the service degrades gracefully without one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::WallpaperStateError;
use super::types::RemoteImageInfo;

/// Wire name of the remote-image fetch operation.
pub const FETCH_REMOTE_IMAGE_REQUEST: &str = "FETCH_REMOTE_IMAGE";

/// The cross-context message a fetch adapter puts on the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageRequest {
    #[serde(rename = "type")]
    pub message_type: String,
}

impl RemoteImageRequest {
    pub fn new() -> Self {
        Self {
            message_type: FETCH_REMOTE_IMAGE_REQUEST.to_string(),
        }
    }
}

impl Default for RemoteImageRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Response envelope returned by the background context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<RemoteImageInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RemoteImageResponse {
    /// The carried image, if the response is successful and the image has a
    /// usable URL.
    pub fn usable_image(&self) -> Option<&RemoteImageInfo> {
        if !self.success {
            return None;
        }
        self.data.as_ref().filter(|image| !image.url.is_empty())
    }
}

/// Capability to request the remote daily image.
#[async_trait]
pub trait RemoteImageFetcher: Send + Sync {
    /// Sends a [`RemoteImageRequest`] over the transport and returns the
    /// decoded response. Transport-level failures surface as
    /// [`WallpaperStateError::Fetch`].
    async fn fetch_remote_image(&self) -> Result<RemoteImageResponse, WallpaperStateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_wire_shape() {
        let request = RemoteImageRequest::new();
        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(serialized, r#"{"type":"FETCH_REMOTE_IMAGE"}"#);
    }

    #[test]
    fn test_response_tolerates_absent_fields() {
        let response: RemoteImageResponse =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.data, None);
        assert_eq!(response.error, None);
        assert!(response.usable_image().is_none());
    }

    #[test]
    fn test_usable_image_requires_success_and_url() {
        let image = RemoteImageInfo {
            url: String::new(),
            title: "t".to_string(),
            copyright: "c".to_string(),
        };
        let response = RemoteImageResponse {
            success: true,
            data: Some(image.clone()),
            error: None,
        };
        assert!(response.usable_image().is_none());

        let response = RemoteImageResponse {
            success: true,
            data: Some(RemoteImageInfo {
                url: "https://example.com/daily.jpg".to_string(),
                ..image
            }),
            error: None,
        };
        assert!(response.usable_image().is_some());
    }
}
