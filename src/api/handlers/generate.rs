use crate::{
    api::handlers::{ApiError, ErrorBody},
    generation::{GenerationRequest, GenerationResult, Generator},
};
use axum::{
    body::Bytes,
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[utoipa::path(
    post,
    path = "/generateposter",
    request_body = GenerationRequest,
    responses (
        (status = 200, description = "Image generated", body = GenerationResult),
        (status = 400, description = "Malformed body, or no prompt and no fields to build one from", body = ErrorBody),
        (status = 413, description = "Body larger than the request limit"),
        (status = 502, description = "Provider output had no recognizable image URL", body = ErrorBody),
        (status = 500, description = "Provider call failed", body = ErrorBody),
    ),
    tag = "generation"
)]
// Oversized bodies are rejected with 413 by the `Bytes` extractor before this runs.
#[instrument(skip(generator, headers, body))]
pub async fn generate_poster(
    generator: Extension<Arc<Generator>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GenerationResult>, ApiError> {
    let request = parse_request(&headers, &body)?;

    let result = generator.generate(&request).await?;

    info!(href = %result.href, "poster generated");

    Ok(Json(result))
}

/// An empty body is an empty request; anything else must be a JSON object.
fn parse_request(headers: &HeaderMap, body: &Bytes) -> Result<GenerationRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerationRequest::default());
    }

    if !is_json(headers) {
        return Err(ApiError::InvalidRequest(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    Json::<GenerationRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| {
            debug!("rejected generation body: {}", rejection.body_text());
            ApiError::InvalidRequest(rejection.body_text())
        })
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| {
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn json_content_types_are_recognized() {
        assert!(is_json(&headers(Some("application/json"))));
        assert!(is_json(&headers(Some("Application/JSON; charset=utf-8"))));
        assert!(is_json(&headers(Some("application/vnd.api+json"))));
        assert!(!is_json(&headers(Some("text/plain"))));
        assert!(!is_json(&headers(None)));
    }

    #[test]
    fn blank_body_is_an_empty_request() {
        let request = parse_request(&headers(None), &Bytes::from_static(b" \n"));
        assert!(matches!(request, Ok(r) if r.prompt.is_none() && r.event_name.is_none()));
    }

    #[test]
    fn body_without_json_content_type_is_rejected() {
        let request = parse_request(
            &headers(Some("text/plain")),
            &Bytes::from_static(br#"{"prompt":"jazz"}"#),
        );
        assert!(matches!(request, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn mistyped_field_is_rejected() {
        let request = parse_request(
            &headers(Some("application/json")),
            &Bytes::from_static(br#"{"prompt":"jazz night poster","date":20261019}"#),
        );
        assert!(matches!(request, Err(ApiError::InvalidRequest(_))));
    }
}
