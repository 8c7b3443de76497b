use super::handlers::{self, auth, generate, health};
use crate::generation::{GenerationRequest, GenerationResult};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "postermint", description = "Event poster generation proxy"),
    paths(
        health::health,
        auth::signup::signup,
        auth::login::login,
        generate::generate_poster,
    ),
    components(schemas(
        health::Health,
        auth::types::CredentialsRequest,
        auth::types::SessionResponse,
        handlers::ErrorBody,
        GenerationRequest,
        GenerationResult,
    )),
    tags(
        (name = "auth", description = "Account signup and login"),
        (name = "generation", description = "Poster and logo generation"),
        (name = "health", description = "Liveness"),
    )
)]
struct ApiDoc;

/// The `OpenAPI` document served at `/openapi.json`.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
