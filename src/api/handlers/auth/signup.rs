use super::types::{CredentialsRequest, SessionResponse};
use crate::{
    api::handlers::{ApiError, ErrorBody},
    credentials::Credentials,
};
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = CredentialsRequest,
    responses (
        (status = 200, description = "Account created", body = SessionResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(credentials, payload))]
pub async fn signup(
    credentials: Extension<Arc<Credentials>>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::InvalidRequest("Missing payload".to_string()));
    };

    let session = credentials.signup(request.email.as_deref(), request.password.as_deref())?;

    info!(user_id = %session.user_id, "account created");

    Ok(Json(session.into()))
}
