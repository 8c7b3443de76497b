//! Request/response types for auth endpoints.

use crate::credentials::Session;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Both fields are optional on the wire so a missing one is reported as a
/// validation error rather than a JSON rejection.
#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub token: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            token: session.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use serde_json::json;

    #[test]
    fn session_response_uses_camel_case() -> Result<()> {
        let response = SessionResponse::from(Session {
            user_id: "u1".to_string(),
            token: "t1".to_string(),
        });
        let value = serde_json::to_value(&response)?;
        let user_id = value
            .get("userId")
            .and_then(serde_json::Value::as_str)
            .context("missing userId")?;
        assert_eq!(user_id, "u1");
        Ok(())
    }

    #[test]
    fn credentials_request_tolerates_missing_fields() -> Result<()> {
        let request: CredentialsRequest = serde_json::from_value(json!({ "email": "a@b.c" }))?;
        assert_eq!(request.email.as_deref(), Some("a@b.c"));
        assert!(request.password.is_none());
        Ok(())
    }

    #[test]
    fn debug_hides_password() {
        let request = CredentialsRequest {
            email: Some("a@b.c".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
