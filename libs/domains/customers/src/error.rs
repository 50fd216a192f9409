use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use bakery_store::{ErrorKind, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    #[error("Customer with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Unknown market: {0}")]
    UnknownMarket(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CustomerResult<T> = Result<T, CustomerError>;

/// Convert CustomerError to AppError for standardized error responses
impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(id) => {
                AppError::NotFound(format!("Customer {} not found", id))
            }
            CustomerError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Customer with email '{}' already exists", email))
            }
            CustomerError::UnknownMarket(id) => {
                AppError::BadRequest(format!("Market {} does not exist", id))
            }
            CustomerError::Validation(msg) => AppError::BadRequest(msg),
            CustomerError::Store(e) => match e.kind() {
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

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
