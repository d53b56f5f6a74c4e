use thiserror::Error;

use crate::generator::GenerationError;
use crate::manipulate::TransformError;
use crate::notify::NotifyError;
use crate::store::UploadError;

/// Any failure a job can hit between receipt and its terminal state.
///
/// Collaborator errors pass through transparently: the requester sees the
/// underlying error's own message, not a wrapper around it.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_displays_transparently() {
        let err = BotError::from(GenerationError::Provider("quota exceeded".into()));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn upload_error_displays_transparently() {
        let err = BotError::from(UploadError::Backend("bucket unavailable".into()));
        assert_eq!(err.to_string(), "storage backend error: bucket unavailable");
    }
}
