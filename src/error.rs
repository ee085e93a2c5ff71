use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use thiserror::Error;

pub type RestResult<T> = Result<T, RestError>;

/// Request-level errors. Upload failures never appear here: a failed photo
/// upload downgrades to a warning and the operation continues without the
/// photo.
#[derive(Debug, Error)]
pub enum RestError {
    /// A required field is missing or malformed; checked before any I/O
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed")]
    Unauthorized(#[source] anyhow::Error),

    /// Lookup miss; a normal outcome, distinct from a transport failure
    #[error("No record found")]
    NotFound,

    /// The record store could not be reached; blocks the operation before
    /// an identifier is generated
    #[error("Record store unreachable")]
    Connectivity(#[source] sqlx::Error),

    /// The store rejected a mutation (e.g. a constraint violation)
    #[error("Record store rejected the operation")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Full detail (constraint names included) goes to the log; the
        // response body carries only the Display form
        match self {
            Self::Validation(_) | Self::NotFound => {
                tracing::info!(error.cause_chain = ?self, "Request rejected")
            }
            _ => tracing::error!(error.cause_chain = ?self, "Request failed"),
        }
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
