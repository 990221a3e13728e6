//! Cloudinary API response types
//!
//! Data structures for deserializing Cloudinary REST responses. Fields the
//! connector must check for presence are `Option` so a missing field surfaces
//! as a malformed response instead of a generic parse failure.

use bridge_traits::media::RemoteAsset;
use serde::{Deserialize, Serialize};

/// Cloudinary resource as returned by list and upload
///
/// See: https://cloudinary.com/documentation/admin_api#get_resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudinaryResource {
    pub public_id: Option<String>,

    /// HTTPS delivery URL
    pub secure_url: Option<String>,

    pub format: Option<String>,

    /// Stored size in bytes
    pub bytes: Option<u64>,

    pub width: Option<u32>,

    pub height: Option<u32>,

    /// Creation time (RFC 3339)
    pub created_at: Option<String>,
}

impl CloudinaryResource {
    /// Converts into a `RemoteAsset`, or `None` when the identity fields are
    /// missing or empty.
    pub fn into_asset(self) -> Option<RemoteAsset> {
        let public_id = self.public_id.filter(|id| !id.is_empty())?;
        let url = self.secure_url.filter(|url| !url.is_empty())?;

        Some(RemoteAsset {
            public_id,
            url,
            format: self.format,
            bytes: self.bytes,
            width: self.width,
            height: self.height,
            created_at: self.created_at,
        })
    }
}

/// `GET resources/image/upload` response
#[derive(Debug, Deserialize)]
pub struct ResourcesListResponse {
    /// Absent on malformed responses
    pub resources: Option<Vec<CloudinaryResource>>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// `POST image/destroy` request body
#[derive(Debug, Serialize)]
pub struct DestroyRequest<'a> {
    pub public_id: &'a str,
}

/// `POST image/destroy` response
#[derive(Debug, Deserialize)]
pub struct DestroyResponse {
    /// "ok", "not found", or another failure marker
    pub result: Option<String>,
}

/// Error envelope: `{ "error": { "message": "..." } }`
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

impl ApiErrorBody {
    /// Extracts the store's message from a raw error body, if present.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .map(|b| b.error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_resources_list_response() {
        let json = r#"{
            "resources": [
                {
                    "asset_id": "3515c6000a548515f1134043f9785c2f",
                    "public_id": "Home/sample",
                    "format": "jpg",
                    "resource_type": "image",
                    "type": "upload",
                    "created_at": "2024-05-01T10:00:00Z",
                    "bytes": 120253,
                    "width": 864,
                    "height": 576,
                    "url": "http://res.cloudinary.com/demo/image/upload/v1/Home/sample.jpg",
                    "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/Home/sample.jpg"
                }
            ],
            "next_cursor": "8edbc61040178db60b0973ca9494bf3a"
        }"#;

        let response: ResourcesListResponse = serde_json::from_str(json).unwrap();
        let resources = response.resources.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(
            response.next_cursor.as_deref(),
            Some("8edbc61040178db60b0973ca9494bf3a")
        );

        let asset = resources[0].clone().into_asset().unwrap();
        assert_eq!(asset.public_id, "Home/sample");
        assert!(asset.url.starts_with("https://"));
        assert_eq!(asset.width, Some(864));
        assert_eq!(asset.bytes, Some(120253));
    }

    #[test]
    fn test_missing_resources_field_is_detectable() {
        let response: ResourcesListResponse =
            serde_json::from_str(r#"{"rate_limit_allowed": 500}"#).unwrap();
        assert!(response.resources.is_none());
    }

    #[test]
    fn test_resource_without_identity_is_rejected() {
        let resource = CloudinaryResource {
            public_id: Some("a".to_string()),
            ..Default::default()
        };
        assert!(resource.into_asset().is_none());
    }

    #[test]
    fn test_api_error_message() {
        let body = br#"{"error":{"message":"Upload preset not found"}}"#;
        assert_eq!(
            ApiErrorBody::message_from(body).as_deref(),
            Some("Upload preset not found")
        );
        assert_eq!(ApiErrorBody::message_from(b"<html>"), None);
    }

    #[test]
    fn test_destroy_request_shape() {
        let json = serde_json::to_string(&DestroyRequest { public_id: "Home/a" }).unwrap();
        assert_eq!(json, r#"{"public_id":"Home/a"}"#);
    }
}
