use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fx_feed::FxFeedError;
use paydesk_engine::{AuthApiError, CatalogError, PaymentOrderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request conflicts with the current state of the ledger. {0}")]
    Conflict(String),
    #[error("Authentication error. {0}")]
    AuthenticationError(String),
    #[error("The exchange-rate service is unavailable. {0}")]
    UpstreamError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<PaymentOrderError> for ServerError {
    fn from(e: PaymentOrderError) -> Self {
        match e {
            PaymentOrderError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            PaymentOrderError::InvalidTransition { .. } => Self::Conflict(e.to_string()),
            PaymentOrderError::IntegrityViolation(_) => Self::Conflict(e.to_string()),
            PaymentOrderError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::DuplicateEntry(_) => Self::Conflict(e.to_string()),
            CatalogError::EntryInUse(_) => Self::Conflict(e.to_string()),
            CatalogError::EntryNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DuplicateEmail(_) => Self::Conflict(e.to_string()),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<FxFeedError> for ServerError {
    fn from(e: FxFeedError) -> Self {
        Self::UpstreamError(e.to_string())
    }
}
