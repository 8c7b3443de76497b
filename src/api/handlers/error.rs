//! Error responses shared by all handlers.
//!
//! Every failure is a JSON body with an `error` code, optionally a
//! human-readable `detail`, and for unrecognized provider output the raw
//! `output`.

use crate::{credentials::CredentialError, generation::GenerationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Raw provider output; present only for `unexpected_output_shape`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub output: Option<Value>,
}

impl ErrorBody {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            detail: None,
            output: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    Credential(CredentialError),
    Generation(GenerationError),
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        Self::Credential(err)
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            Self::InvalidRequest(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("invalid_request").with_detail(detail),
            ),
            Self::Credential(err) => match err {
                CredentialError::Validation(_) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("invalid_request").with_detail(err.to_string()),
                ),
                CredentialError::Conflict => (
                    StatusCode::CONFLICT,
                    ErrorBody::new("email_already_registered"),
                ),
                CredentialError::Authentication => (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody::new("invalid_credentials").with_detail(err.to_string()),
                ),
                CredentialError::Internal(err) => {
                    error!("credential operation failed: {err:#}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::new("internal_error"),
                    )
                }
            },
            Self::Generation(err) => match err {
                GenerationError::MissingPrompt => {
                    (StatusCode::BAD_REQUEST, ErrorBody::new("missing_prompt"))
                }
                GenerationError::UnexpectedOutputShape { output } => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        output: Some(output),
                        ..ErrorBody::new("unexpected_output_shape")
                    },
                ),
                GenerationError::Failed(err) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("generation_failed").with_detail(format!("{err:#}")),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
