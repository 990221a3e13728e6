//! Cloudinary API connector implementation
//!
//! Implements the `MediaStore` trait for the Cloudinary REST API.

use async_trait::async_trait;
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::media::{MediaStore, MediaStoreResult, RemoteAsset};
use bridge_traits::multipart::MultipartForm;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use core_runtime::config::{MediaStoreConfig, MAX_LIST_LIMIT};
use core_runtime::logging::strip_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{CloudinaryError, Result};
use crate::types::{
    ApiErrorBody, CloudinaryResource, DestroyRequest, DestroyResponse, ResourcesListResponse,
};

const LIST_PATH: &str = "resources/image/upload";
const UPLOAD_PATH: &str = "image/upload";
const DESTROY_PATH: &str = "image/destroy";

const FILE_URI_SCHEME: &str = "file://";

/// Image extensions accepted for upload, with the part content type sent for each.
const SUPPORTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// Cloudinary API connector
///
/// Implements `MediaStore` against the Cloudinary REST API.
///
/// # Features
///
/// - Listing through the Admin API with Basic auth (`api_key:api_secret`)
/// - Unsigned preset uploads, sent exactly once
/// - Deletion through `destroy`, with its `result` field classified
/// - Optional folder scoping for both uploads and listings
///
/// # Example
///
/// ```ignore
/// use provider_cloudinary::CloudinaryConnector;
/// use bridge_traits::media::MediaStore;
///
/// let connector = CloudinaryConnector::new(http_client, file_system, config);
/// let assets = connector.list(100).await?;
/// ```
pub struct CloudinaryConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Reads the picked file for upload
    file_system: Arc<dyn FileSystemAccess>,

    /// Credentials and endpoint
    config: MediaStoreConfig,
}

impl CloudinaryConnector {
    /// Create a new Cloudinary connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `file_system` - File access used to read images before upload
    /// * `config` - Validated media store configuration
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        file_system: Arc<dyn FileSystemAccess>,
        config: MediaStoreConfig,
    ) -> Self {
        Self {
            http_client,
            file_system,
            config,
        }
    }

    pub fn config(&self) -> &MediaStoreConfig {
        &self.config
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .basic_auth(&self.config.api_key, &self.config.api_secret)
            .header("Accept", "application/json")
            .timeout(self.config.request_timeout)
    }

    fn list_url(&self, limit: u32) -> String {
        let mut url = format!(
            "{}?type=upload&max_results={}",
            self.config.endpoint(LIST_PATH),
            limit
        );

        if let Some(folder) = self.config.folder_name() {
            let prefix = format!("{}/", folder);
            url.push_str(&format!("&prefix={}", urlencoding::encode(&prefix)));
        }

        url
    }

    /// Map a non-2xx response to the provider error for its status.
    ///
    /// A 404 here means the endpoint itself is unknown (e.g. a wrong cloud
    /// name), so it is reported as a rejection. Callers addressing a single
    /// asset check for 404 first.
    fn classify_status(response: &HttpResponse) -> CloudinaryError {
        let message = ApiErrorBody::message_from(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        match response.status {
            401 | 403 => CloudinaryError::AuthenticationFailed(message),
            400 => CloudinaryError::InvalidInput(message),
            status => CloudinaryError::ApiError {
                status_code: status,
                message,
            },
        }
    }

    fn ensure_success(response: &HttpResponse) -> Result<()> {
        if response.is_success() {
            Ok(())
        } else {
            warn!(status = response.status, "Cloudinary request failed");
            Err(Self::classify_status(response))
        }
    }

    /// Turn a picker URI (plain path or `file://` URI) into a local path.
    fn resolve_local_path(local_uri: &str) -> Result<PathBuf> {
        let raw = match local_uri.strip_prefix(FILE_URI_SCHEME) {
            Some(rest) => urlencoding::decode(rest)
                .map_err(|_| {
                    CloudinaryError::InvalidInput("File URI is not valid UTF-8".to_string())
                })?
                .into_owned(),
            None => local_uri.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(CloudinaryError::InvalidInput(
                "No local file was given".to_string(),
            ));
        }

        Ok(PathBuf::from(raw))
    }

    /// Content type for a supported image extension (case-insensitive).
    fn image_content_type(path: &Path) -> Result<&'static str> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        SUPPORTED_IMAGE_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, content_type)| *content_type)
            .ok_or_else(|| {
                CloudinaryError::InvalidInput(format!(
                    "Unsupported image type '{}'",
                    extension
                ))
            })
    }

    /// Read the picked image, rejecting missing, empty or non-image files.
    async fn read_image(&self, path: &Path) -> Result<(String, &'static str, Bytes)> {
        let content_type = Self::image_content_type(path)?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| CloudinaryError::InvalidInput("File has no name".to_string()))?;

        // File access failures are input errors
        let unreadable = |e: BridgeError| {
            CloudinaryError::InvalidInput(format!("Cannot read {}: {}", file_name, e))
        };

        if !self.file_system.exists(path).await.map_err(unreadable)? {
            return Err(CloudinaryError::InvalidInput(format!(
                "File not found: {}",
                file_name
            )));
        }

        let metadata = self.file_system.metadata(path).await.map_err(unreadable)?;
        if metadata.is_directory {
            return Err(CloudinaryError::InvalidInput(format!(
                "Not a file: {}",
                file_name
            )));
        }

        let data = self
            .file_system
            .read_file(path)
            .await
            .map_err(unreadable)?;
        if data.is_empty() {
            return Err(CloudinaryError::InvalidInput(format!(
                "File is empty: {}",
                file_name
            )));
        }

        Ok((file_name, content_type, data))
    }

    async fn list_resources(&self, limit: u32) -> Result<Vec<RemoteAsset>> {
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(CloudinaryError::InvalidInput(format!(
                "List limit must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }

        let request = self.authorized(HttpRequest::new(HttpMethod::Get, self.list_url(limit)));
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        Self::ensure_success(&response)?;

        let list_response: ResourcesListResponse = serde_json::from_slice(&response.body)
            .map_err(|e| {
                CloudinaryError::ParseError(format!("Failed to parse resources list: {}", e))
            })?;

        let resources = list_response.resources.ok_or_else(|| {
            CloudinaryError::ParseError("Response has no 'resources' field".to_string())
        })?;

        let total = resources.len();
        let assets: Vec<RemoteAsset> = resources
            .into_iter()
            .filter_map(CloudinaryResource::into_asset)
            .collect();

        if assets.len() < total {
            warn!(
                skipped = total - assets.len(),
                "Skipped resources without public_id or secure_url"
            );
        }

        if list_response.next_cursor.is_some() {
            debug!("More resources available beyond the requested limit");
        }

        Ok(assets)
    }

    async fn upload_file(&self, local_uri: &str) -> Result<RemoteAsset> {
        let path = Self::resolve_local_path(local_uri)?;
        let (file_name, content_type, data) = self.read_image(&path).await?;
        let size = data.len();

        let mut form = MultipartForm::new()
            .file("file", file_name, content_type, data)
            .text("upload_preset", self.config.upload_preset.clone());

        if let Some(folder) = self.config.folder_name() {
            form = form.text("folder", folder);
        }

        // Unsigned upload: the preset authorizes it, no credentials are sent.
        let request = HttpRequest::new(HttpMethod::Post, self.config.endpoint(UPLOAD_PATH))
            .header("Accept", "application/json")
            .timeout(self.config.request_timeout)
            .multipart(form);

        debug!(size, content_type, "Sending upload");

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await?;

        Self::ensure_success(&response)?;

        let resource: CloudinaryResource = serde_json::from_slice(&response.body).map_err(|e| {
            CloudinaryError::ParseError(format!("Failed to parse upload response: {}", e))
        })?;

        resource.into_asset().ok_or_else(|| {
            CloudinaryError::ParseError(
                "Upload response is missing public_id or secure_url".to_string(),
            )
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        if public_id.trim().is_empty() {
            return Err(CloudinaryError::InvalidInput(
                "public_id cannot be empty".to_string(),
            ));
        }

        let request = self
            .authorized(HttpRequest::new(
                HttpMethod::Post,
                self.config.endpoint(DESTROY_PATH),
            ))
            .json(&DestroyRequest { public_id })?;

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        if response.status == 404 {
            return Err(CloudinaryError::NotFound(public_id.to_string()));
        }
        Self::ensure_success(&response)?;

        let destroy: DestroyResponse = serde_json::from_slice(&response.body).map_err(|e| {
            CloudinaryError::ParseError(format!("Failed to parse destroy response: {}", e))
        })?;

        match destroy.result.as_deref() {
            Some("ok") => Ok(()),
            Some("not found") => Err(CloudinaryError::NotFound(public_id.to_string())),
            Some(other) => Err(CloudinaryError::DestroyRejected {
                status: response.status,
                result: other.to_string(),
            }),
            None => Err(CloudinaryError::ParseError(
                "Destroy response has no 'result' field".to_string(),
            )),
        }
    }
}

#[async_trait]
impl MediaStore for CloudinaryConnector {
    #[instrument(skip(self), fields(cloud = %self.config.cloud_name))]
    async fn list(&self, limit: u32) -> MediaStoreResult<Vec<RemoteAsset>> {
        info!("Listing images from Cloudinary");

        let assets = self.list_resources(limit).await?;

        info!(count = assets.len(), "Listed images from Cloudinary");
        Ok(assets)
    }

    #[instrument(skip(self, local_uri), fields(file = %strip_path(local_uri)))]
    async fn upload(&self, local_uri: &str) -> MediaStoreResult<RemoteAsset> {
        info!("Uploading image to Cloudinary");

        let asset = self.upload_file(local_uri).await?;

        info!(public_id = %asset.public_id, "Uploaded image");
        Ok(asset)
    }

    #[instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> MediaStoreResult<()> {
        info!("Deleting image from Cloudinary");

        self.destroy(public_id).await?;

        info!("Deleted image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::media::MediaStoreError;
    use bridge_traits::storage::FileMetadata;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn execute_with_retry(&self, request: HttpRequest, policy: RetryPolicy) -> BridgeResult<HttpResponse>;
        }
    }

    mock! {
        FileSystem {}

        #[async_trait]
        impl FileSystemAccess for FileSystem {
            async fn exists(&self, path: &Path) -> BridgeResult<bool>;
            async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata>;
            async fn read_file(&self, path: &Path) -> BridgeResult<Bytes>;
        }
    }

    const BASIC_KEY_SECRET: &str = "Basic a2V5OnNlY3JldA==";

    fn config() -> MediaStoreConfig {
        MediaStoreConfig::new("demo", "key", "secret", "unsigned_preset")
            .with_api_base_url("https://api.test/v1_1")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn connector(
        http: MockHttpClient,
        fs: MockFileSystem,
        config: MediaStoreConfig,
    ) -> CloudinaryConnector {
        CloudinaryConnector::new(Arc::new(http), Arc::new(fs), config)
    }

    fn readable_file(contents: &'static [u8]) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(move |_| {
            Ok(FileMetadata {
                size: contents.len() as u64,
                created_at: None,
                modified_at: None,
                is_directory: false,
            })
        });
        fs.expect_read_file()
            .returning(move |_| Ok(Bytes::from_static(contents)));
        fs
    }

    #[tokio::test]
    async fn test_list_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|req, policy| {
                assert_eq!(req.method, HttpMethod::Get);
                assert_eq!(
                    req.url,
                    "https://api.test/v1_1/demo/resources/image/upload?type=upload&max_results=10"
                );
                assert_eq!(
                    req.headers.get("Authorization").map(String::as_str),
                    Some(BASIC_KEY_SECRET)
                );
                assert!(policy.max_attempts > 1);

                Ok(response(
                    200,
                    r#"{
                        "resources": [
                            {"public_id": "Home/b", "secure_url": "https://res.test/b.jpg", "format": "jpg"},
                            {"public_id": "Home/a", "secure_url": "https://res.test/a.png"}
                        ]
                    }"#,
                ))
            });

        let connector = connector(mock_http, MockFileSystem::new(), config());
        let assets = connector.list(10).await.unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].public_id, "Home/b");
        assert_eq!(assets[0].format.as_deref(), Some("jpg"));
        assert_eq!(assets[1].url, "https://res.test/a.png");
    }

    #[tokio::test]
    async fn test_list_scoped_to_folder() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|req, _| {
                assert!(req.url.ends_with("&prefix=Home%2F"));
                Ok(response(200, r#"{"resources": []}"#))
            });

        let connector = connector(mock_http, MockFileSystem::new(), config().with_folder("Home"));
        assert!(connector.list(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_resources_is_malformed() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|_, _| Ok(response(200, r#"{"next_cursor": "abc"}"#)));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        let result = connector.list(10).await;

        assert!(matches!(result, Err(MediaStoreError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_list_non_json_body_is_malformed() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(200, "<html>gateway</html>")));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        assert!(matches!(
            connector.list(10).await,
            Err(MediaStoreError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_incomplete_resources() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute_with_retry().returning(|_, _| {
            Ok(response(
                200,
                r#"{"resources": [{"public_id": "x"}, {"public_id": "y", "secure_url": "https://res.test/y.jpg"}]}"#,
            ))
        });

        let connector = connector(mock_http, MockFileSystem::new(), config());
        let assets = connector.list(10).await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].public_id, "y");
    }

    #[tokio::test]
    async fn test_list_rejects_out_of_range_limit() {
        // No HTTP expectation: a request would panic the mock.
        let connector = connector(MockHttpClient::new(), MockFileSystem::new(), config());

        for limit in [0, 501] {
            assert!(matches!(
                connector.list(limit).await,
                Err(MediaStoreError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_list_status_mapping() {
        let cases: [(u16, &str, &str); 5] = [
            (401, r#"{"error":{"message":"Invalid api_key"}}"#, "auth"),
            (403, "", "auth"),
            // Unknown cloud name: the endpoint, not an asset, is missing
            (404, "", "remote_rejected"),
            (420, r#"{"error":{"message":"Rate Limit Exceeded"}}"#, "remote_rejected"),
            (500, "", "remote_rejected"),
        ];

        for (status, body, kind) in cases {
            let mut mock_http = MockHttpClient::new();
            mock_http
                .expect_execute_with_retry()
                .returning(move |_, _| Ok(response(status, body)));

            let connector = connector(mock_http, MockFileSystem::new(), config());
            let error = connector.list(10).await.unwrap_err();
            assert_eq!(error.kind(), kind, "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_remote_rejected_carries_store_message() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute_with_retry().returning(|_, _| {
            Ok(response(420, r#"{"error":{"message":"Rate Limit Exceeded"}}"#))
        });

        let connector = connector(mock_http, MockFileSystem::new(), config());
        assert_eq!(
            connector.list(10).await.unwrap_err(),
            MediaStoreError::RemoteRejected {
                status: 420,
                message: "Rate Limit Exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_network() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Err(BridgeError::Network("Request timed out".to_string())));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        let error = connector.list(10).await.unwrap_err();
        assert!(matches!(error, MediaStoreError::Network(_)));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_upload_success_sends_multipart_once() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|req, policy| {
                assert_eq!(policy.max_attempts, 1);
                assert_eq!(req.method, HttpMethod::Post);
                assert_eq!(req.url, "https://api.test/v1_1/demo/image/upload");
                assert!(!req.headers.contains_key("Authorization"));
                assert!(req
                    .headers
                    .get("Content-Type")
                    .unwrap()
                    .starts_with("multipart/form-data; boundary="));

                let body = String::from_utf8_lossy(req.body.as_ref().unwrap()).to_string();
                assert!(body.contains("name=\"file\"; filename=\"cat.png\""));
                assert!(body.contains("Content-Type: image/png"));
                assert!(body.contains("name=\"upload_preset\"\r\n\r\nunsigned_preset"));
                assert!(body.contains("name=\"folder\"\r\n\r\nHome"));
                assert!(!body.contains("secret"));

                Ok(response(
                    200,
                    r#"{"public_id": "Home/cat_x1", "secure_url": "https://res.test/Home/cat_x1.png", "width": 10, "height": 20}"#,
                ))
            });

        let connector = connector(mock_http, readable_file(b"\x89PNG"), config().with_folder("Home"));
        let asset = connector.upload("/home/jane/cat.png").await.unwrap();

        assert_eq!(asset.public_id, "Home/cat_x1");
        assert_eq!(asset.url, "https://res.test/Home/cat_x1.png");
        assert_eq!(asset.height, Some(20));
    }

    #[tokio::test]
    async fn test_upload_accepts_file_uri() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .withf(|path| path.to_str() == Some("/tmp/my photo.JPG"))
            .returning(|_| Ok(true));
        fs.expect_metadata().returning(|_| {
            Ok(FileMetadata {
                size: 4,
                created_at: None,
                modified_at: None,
                is_directory: false,
            })
        });
        fs.expect_read_file()
            .returning(|_| Ok(Bytes::from_static(b"jpeg")));

        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute_with_retry().returning(|req, _| {
            let body = String::from_utf8_lossy(req.body.as_ref().unwrap()).to_string();
            assert!(body.contains("Content-Type: image/jpeg"));
            Ok(response(
                200,
                r#"{"public_id": "p", "secure_url": "https://res.test/p.jpg"}"#,
            ))
        });

        let connector = connector(mock_http, fs, config());
        assert!(connector.upload("file:///tmp/my%20photo.JPG").await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let connector = connector(MockHttpClient::new(), MockFileSystem::new(), config());
        let result = connector.upload("/tmp/notes.txt").await;
        assert!(matches!(result, Err(MediaStoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_missing_file() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists().returning(|_| Ok(false));

        let connector = connector(MockHttpClient::new(), fs, config());
        let result = connector.upload("/tmp/gone.jpg").await;
        assert!(matches!(result, Err(MediaStoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let connector = connector(MockHttpClient::new(), readable_file(b""), config());
        let result = connector.upload("/tmp/empty.jpg").await;
        assert!(matches!(result, Err(MediaStoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_unreadable_file_is_validation() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_metadata().returning(|_| {
            Ok(FileMetadata {
                size: 10,
                created_at: None,
                modified_at: None,
                is_directory: false,
            })
        });
        fs.expect_read_file().returning(|_| {
            Err(BridgeError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Permission denied",
            )))
        });

        // No HTTP expectation: nothing may be sent for an unreadable file
        let connector = connector(MockHttpClient::new(), fs, config());
        let error = connector.upload("/tmp/locked.jpg").await.unwrap_err();

        assert_eq!(error.kind(), "validation");
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn test_upload_file_check_failure_is_validation() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .returning(|_| Err(BridgeError::NotAvailable("fs".to_string())));

        let connector = connector(MockHttpClient::new(), fs, config());
        assert!(matches!(
            connector.upload("/tmp/a.png").await,
            Err(MediaStoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_unknown_endpoint_is_rejected() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(404, "")));

        let connector = connector(mock_http, readable_file(b"png"), config());
        assert!(matches!(
            connector.upload("/tmp/a.png").await,
            Err(MediaStoreError::RemoteRejected { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_rejected_input_is_validation() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute_with_retry().returning(|_, _| {
            Ok(response(400, r#"{"error":{"message":"Upload preset must be whitelisted"}}"#))
        });

        let connector = connector(mock_http, readable_file(b"gif"), config());
        assert_eq!(
            connector.upload("/tmp/a.gif").await.unwrap_err(),
            MediaStoreError::Validation("Upload preset must be whitelisted".to_string())
        );
    }

    #[tokio::test]
    async fn test_upload_response_without_url_is_malformed() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(200, r#"{"public_id": "p"}"#)));

        let connector = connector(mock_http, readable_file(b"webp"), config());
        assert!(matches!(
            connector.upload("/tmp/a.webp").await,
            Err(MediaStoreError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|req, _| {
                assert_eq!(req.method, HttpMethod::Post);
                assert_eq!(req.url, "https://api.test/v1_1/demo/image/destroy");
                assert_eq!(
                    req.headers.get("Authorization").map(String::as_str),
                    Some(BASIC_KEY_SECRET)
                );
                assert_eq!(
                    req.body.as_deref(),
                    Some(br#"{"public_id":"Home/a"}"#.as_slice())
                );
                Ok(response(200, r#"{"result": "ok"}"#))
            });

        let connector = connector(mock_http, MockFileSystem::new(), config());
        assert!(connector.delete("Home/a").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_result_not_found() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(200, r#"{"result": "not found"}"#)));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        assert_eq!(
            connector.delete("Home/a").await.unwrap_err(),
            MediaStoreError::NotFound("Home/a".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_other_result_is_rejected() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(202, r#"{"result": "error"}"#)));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        let error = connector.delete("Home/a").await.unwrap_err();
        assert_eq!(
            error,
            MediaStoreError::RemoteRejected {
                status: 202,
                message: "destroy result: error".to_string()
            }
        );
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn test_delete_http_404_is_not_found() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .returning(|_, _| Ok(response(404, "")));

        let connector = connector(mock_http, MockFileSystem::new(), config());
        assert!(matches!(
            connector.delete("Home/a").await,
            Err(MediaStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_id() {
        let connector = connector(MockHttpClient::new(), MockFileSystem::new(), config());
        assert!(matches!(
            connector.delete(" ").await,
            Err(MediaStoreError::Validation(_))
        ));
    }

    #[test]
    fn test_image_content_types() {
        assert_eq!(
            CloudinaryConnector::image_content_type(Path::new("a.HEIC")).unwrap(),
            "image/heic"
        );
        assert_eq!(
            CloudinaryConnector::image_content_type(Path::new("a.tif")).unwrap(),
            "image/tiff"
        );
        assert!(CloudinaryConnector::image_content_type(Path::new("noext")).is_err());
    }
}
