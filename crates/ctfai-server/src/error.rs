//! Error to HTTP response mapping

use ctfai_domain::error::{Error, ErrorKind};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind name (`InvalidRequest`, `NotFound`, ...)
    pub error: String,
    /// Human readable detail
    pub message: String,
}

impl ErrorBody {
    /// Create a body
    pub fn new<E: Into<String>, M: Into<String>>(error: E, message: M) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> Status {
    match kind {
        ErrorKind::InvalidRequest | ErrorKind::InvalidConfig => Status::BadRequest,
        ErrorKind::Forbidden => Status::Forbidden,
        ErrorKind::NotFound => Status::NotFound,
        ErrorKind::ProviderDisabled => Status::Conflict,
        ErrorKind::NoProviderAvailable => Status::ServiceUnavailable,
        ErrorKind::Timeout => Status::GatewayTimeout,
        ErrorKind::MalformedResponse | ErrorKind::ProviderError | ErrorKind::Cancelled => {
            Status::BadGateway
        }
        ErrorKind::Internal => Status::InternalServerError,
    }
}

/// Domain error returned from a route
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

/// Result type of route handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.code >= 500 {
            warn!(uri = %request.uri(), error_kind = %kind, error = %self.0, "Request failed");
        } else {
            debug!(uri = %request.uri(), error_kind = %kind, error = %self.0, "Request rejected");
        }
        (status, Json(ErrorBody::new(kind.as_str(), self.0.to_string()))).respond_to(request)
    }
}

/// Unwrap a JSON body, turning parse failures into `InvalidRequest`
pub fn json_body<T>(
    body: std::result::Result<Json<T>, rocket::serde::json::Error<'_>>,
) -> ApiResult<T> {
    body.map(Json::into_inner)
        .map_err(|e| ApiError(Error::invalid_request(format!("invalid JSON body: {e}"))))
}
