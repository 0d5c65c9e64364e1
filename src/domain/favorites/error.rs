use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesServiceError {
    #[error("{0} is required")]
    MissingCredential(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("upstream auth failed: {0}")]
    UpstreamAuth(String),
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for FavoritesServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::MissingCredential(name) => FavoritesServiceError::MissingCredential(name),
            AppError::BadRequest(msg) => FavoritesServiceError::Invalid(msg),
            AppError::UpstreamAuth(msg) => FavoritesServiceError::UpstreamAuth(msg),
            AppError::UpstreamFetch(msg) => FavoritesServiceError::UpstreamFetch(msg),
            other => FavoritesServiceError::Other(anyhow::anyhow!(other.to_string())),
        }
    }
}

impl From<FavoritesServiceError> for AppError {
    fn from(err: FavoritesServiceError) -> Self {
        match err {
            FavoritesServiceError::MissingCredential(name) => AppError::MissingCredential(name),
            FavoritesServiceError::Invalid(msg) => AppError::BadRequest(msg),
            FavoritesServiceError::UpstreamAuth(msg) => AppError::UpstreamAuth(msg),
            FavoritesServiceError::UpstreamFetch(msg) => AppError::UpstreamFetch(msg),
            FavoritesServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
