//! Media host abstraction for storing uploaded images.

use async_trait::async_trait;
use thiserror::Error;

/// An image received from a client, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A durable reference to an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

/// Media host failures.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host unreachable: {0}")]
    Transport(String),

    #[error("media host rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

impl MediaError {
    /// Transport failures and 5xx/429 responses are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            MediaError::Transport(_) => true,
            MediaError::Rejected { status, .. } => *status >= 500 || *status == 429,
            MediaError::InvalidResponse(_) => false,
        }
    }
}

/// External service storing images and returning durable URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::media::CloudinaryMediaHost`] - Cloudinary signed upload API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Uploads an image and returns its public URL.
    async fn upload(&self, upload: &MediaUpload) -> Result<StoredMedia, MediaError>;

    /// Deletes a previously uploaded asset.
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(MediaError::Transport("timeout".into()).is_transient());
        assert!(
            MediaError::Rejected {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            MediaError::Rejected {
                status: 429,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !MediaError::Rejected {
                status: 401,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!MediaError::InvalidResponse("no url".into()).is_transient());
    }

    #[test]
    fn test_is_image() {
        let upload = MediaUpload {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(upload.is_image());
        assert_eq!(upload.len(), 3);
    }
}
