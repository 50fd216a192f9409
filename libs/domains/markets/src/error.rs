use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use bakery_store::{ErrorKind, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Market not found: {0}")]
    NotFound(Uuid),

    #[error("Market with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type MarketResult<T> = Result<T, MarketError>;

/// Convert MarketError to AppError for standardized error responses
impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::NotFound(id) => AppError::NotFound(format!("Market {} not found", id)),
            MarketError::DuplicateName(name) => {
                AppError::Conflict(format!("Market with name '{}' already exists", name))
            }
            MarketError::Validation(msg) => AppError::BadRequest(msg),
            MarketError::Store(e) => store_error_to_app_error(e),
        }
    }
}

pub(crate) fn store_error_to_app_error(e: StoreError) -> AppError {
    match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(e.to_string()),
        ErrorKind::DuplicatedEntry => AppError::Conflict(e.to_string()),
        ErrorKind::InvalidInput => AppError::BadRequest(e.to_string()),
        ErrorKind::InvalidPaging => AppError::InvalidPaging(e.to_string()),
        ErrorKind::TransactionInProgress | ErrorKind::NoActiveTransaction | ErrorKind::Backend => {
            AppError::StorageError(e.to_string())
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
