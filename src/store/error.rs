use thiserror::Error;

/// Errors raised while re-hosting a generated image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The time-limited source URL could not be fetched.
    #[error("image download failed: {0}")]
    Download(String),

    /// The downloaded bytes could not be decoded or re-encoded.
    #[error("image re-encode failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The storage backend rejected the upload.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Underlying network failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        let err = UploadError::Backend("bucket unavailable".into());
        assert_eq!(err.to_string(), "storage backend error: bucket unavailable");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UploadError>();
    }
}
