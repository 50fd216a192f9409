use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use bakery_store::{ErrorKind, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Product named '{0}' already exists in this market")]
    DuplicateName(String),

    #[error("Unknown market: {0}")]
    MarketNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::DuplicateName(name) => AppError::Conflict(format!(
                "Product named '{}' already exists in this market",
                name
            )),
            ProductError::MarketNotFound(id) => {
                AppError::BadRequest(format!("Market {} does not exist", id))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Store(e) => match e.kind() {
                ErrorKind::NotFound => AppError::NotFound(e.to_string()),
                ErrorKind::DuplicatedEntry => AppError::Conflict(e.to_string()),
                ErrorKind::InvalidInput => AppError::BadRequest(e.to_string()),
                ErrorKind::InvalidPaging => AppError::InvalidPaging(e.to_string()),
                ErrorKind::TransactionInProgress
                | ErrorKind::NoActiveTransaction
                | ErrorKind::Backend => AppError::StorageError(e.to_string()),
            },
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
