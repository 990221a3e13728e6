//! Error types for the Cloudinary provider

use bridge_traits::media::MediaStoreError;
use thiserror::Error;

/// Cloudinary provider errors
#[derive(Error, Debug)]
pub enum CloudinaryError {
    /// Credentials missing, wrong, or lacking permission
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API refused the input (bad parameter, unsupported file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The addressed resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API request returned an unclassified error status
    #[error("Cloudinary API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// `destroy` answered 2xx with a result other than "ok" or "not found".
    /// `status` is the HTTP status of that response.
    #[error("Destroy rejected with result '{result}' (status {status})")]
    DestroyRejected { status: u16, result: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error (transport, file access)
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Cloudinary operations
pub type Result<T> = std::result::Result<T, CloudinaryError>;

impl From<CloudinaryError> for MediaStoreError {
    fn from(error: CloudinaryError) -> Self {
        match error {
            CloudinaryError::AuthenticationFailed(msg) => MediaStoreError::Auth(msg),
            CloudinaryError::InvalidInput(msg) => MediaStoreError::Validation(msg),
            CloudinaryError::NotFound(msg) => MediaStoreError::NotFound(msg),
            CloudinaryError::ApiError {
                status_code,
                message,
            } => MediaStoreError::RemoteRejected {
                status: status_code,
                message,
            },
            CloudinaryError::DestroyRejected { status, result } => {
                MediaStoreError::RemoteRejected {
                    status,
                    message: format!("destroy result: {}", result),
                }
            }
            CloudinaryError::ParseError(msg) => MediaStoreError::MalformedResponse(msg),
            CloudinaryError::BridgeError(e) => e.into(),
        }
    }
}
