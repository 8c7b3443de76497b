use super::types::{CredentialsRequest, SessionResponse};
use crate::{
    api::handlers::{ApiError, ErrorBody},
    credentials::Credentials,
};
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses (
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(credentials, payload))]
pub async fn login(
    credentials: Extension<Arc<Credentials>>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::InvalidRequest("Missing payload".to_string()));
    };

    let session = credentials.login(request.email.as_deref(), request.password.as_deref())?;

    debug!(user_id = %session.user_id, "login");

    Ok(Json(session.into()))
}
