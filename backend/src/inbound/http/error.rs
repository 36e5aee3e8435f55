//! HTTP adapter mapping for member directory errors.
//!
//! Purpose: keep [`MemberError`] HTTP-agnostic while giving every endpoint
//! one JSON error schema and a stable status mapping. Store failures are
//! logged in full and answered with a generic message.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{MemberError, MemberField};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, MemberError>;

/// Message returned in place of store failure details.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal error occurred while processing your request";

/// Stable machine-readable error identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A field or request payload failed validation.
    ValidationError,
    /// Email or phone already registered.
    Conflict,
    /// No member matched the identifier.
    NotFound,
    /// Unexpected server-side failure.
    InternalError,
}

/// JSON error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    #[schema(example = "conflict")]
    pub code: ErrorCode,
    /// Human-readable description.
    #[schema(example = "Member with email 'john@example.com' already exists")]
    pub message: String,
    /// Offending field, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<MemberField>,
}

impl ErrorBody {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: message.into(),
            field: None,
        }
    }
}

fn code_for(error: &MemberError) -> ErrorCode {
    match error {
        MemberError::InvalidField { .. } => ErrorCode::ValidationError,
        MemberError::AlreadyExists { .. } => ErrorCode::Conflict,
        MemberError::NotFound { .. } => ErrorCode::NotFound,
        MemberError::Store { .. } => ErrorCode::InternalError,
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<&MemberError> for ErrorBody {
    fn from(error: &MemberError) -> Self {
        let code = code_for(error);
        if code == ErrorCode::InternalError {
            return Self {
                code,
                message: INTERNAL_ERROR_MESSAGE.to_owned(),
                field: None,
            };
        }
        Self {
            code,
            message: error.to_string(),
            field: error.field(),
        }
    }
}

impl ResponseError for MemberError {
    fn status_code(&self) -> StatusCode {
        status_for(code_for(self))
    }

    fn error_response(&self) -> HttpResponse {
        if let MemberError::Store { operation, detail } = self {
            let trace_id = TraceId::current().map(|id| id.to_string());
            error!(
                operation = *operation,
                detail = detail.as_str(),
                trace_id = trace_id.as_deref(),
                "member store failure"
            );
        }
        HttpResponse::build(self.status_code()).json(ErrorBody::from(self))
    }
}

fn bad_request(message: String) -> actix_web::Error {
    actix_web::error::InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ErrorBody::validation(message)),
    )
    .into()
}

/// Render malformed JSON bodies with the shared error schema.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("invalid request body: {err}"))
}

/// Render malformed query strings with the shared error schema.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("invalid query parameters: {err}"))
}
