//! Integration tests for the postermint HTTP service.
//!
//! This suite runs the real router on an ephemeral port with a
//! `ReplicateProvider` pointed at a local stand-in for the predictions API,
//! then drives it over HTTP with `reqwest`.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use postermint::{
    api,
    credentials::{Credentials, HasherKind},
    generation::{Generator, ModelRef, ReplicateProvider},
};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ProviderState {
    inputs: Arc<Mutex<Vec<Value>>>,
    output: Arc<Mutex<Value>>,
}

async fn predictions(
    State(state): State<ProviderState>,
    Path((_owner, _name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if let Ok(mut inputs) = state.inputs.lock() {
        inputs.push(body["input"].clone());
    }
    let output = state
        .output
        .lock()
        .map(|output| output.clone())
        .unwrap_or(Value::Null);
    Json(json!({ "id": "p1", "status": "succeeded", "output": output }))
}

async fn serve(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(base)
}

struct TestContext {
    base: String,
    provider: ProviderState,
    client: reqwest::Client,
}

impl TestContext {
    async fn new(hasher: HasherKind) -> Result<Self> {
        let provider = ProviderState::default();
        let provider_base = serve(
            Router::new()
                .route("/v1/models/:owner/:name/predictions", post(predictions))
                .with_state(provider.clone()),
        )
        .await?;

        let model: ModelRef = "ideogram-ai/ideogram-v3-turbo".parse()?;
        let replicate = ReplicateProvider::new(&provider_base, SecretString::from("r8_test"))?;
        let generator = Arc::new(Generator::new(Arc::new(replicate), model));
        let credentials = Arc::new(Credentials::in_memory(hasher.build()));

        let base = serve(api::router(credentials, generator)).await?;

        Ok(Self {
            base,
            provider,
            client: reqwest::Client::new(),
        })
    }

    fn set_output(&self, output: Value) {
        if let Ok(mut current) = self.provider.output.lock() {
            *current = output;
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(format!("{}{path}", self.base))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.json().await?))
    }
}

#[tokio::test]
async fn generates_poster_through_provider() -> Result<()> {
    let ctx = TestContext::new(HasherKind::Sha256).await?;
    ctx.set_output(json!([{ "url": "https://replicate.delivery/out-0.png" }]));

    let (status, body) = ctx
        .post(
            "/generateposter",
            &json!({
                "generationType": "logo",
                "eventName": "Gala",
                "theme": "",
                "location": "Hall A",
                "date": "",
                "eventType": "",
                "extraPrompt": "",
                "aspect_ratio": "1:1",
            }),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "href": "https://replicate.delivery/out-0.png" }));

    let inputs = ctx.provider.inputs.lock().map(|i| i.clone()).unwrap_or_default();
    assert_eq!(
        inputs,
        vec![json!({
            "prompt": "Logo design for Gala, Location: Hall A, clear readable text, modern typography, high contrast, professional composition",
            "aspect_ratio": "1:1",
        })]
    );
    Ok(())
}

#[tokio::test]
async fn unexpected_provider_output_is_bad_gateway() -> Result<()> {
    let ctx = TestContext::new(HasherKind::Sha256).await?;
    ctx.set_output(json!({ "files": [] }));

    let (status, body) = ctx
        .post("/generateposter", &json!({ "prompt": "a jazz night poster" }))
        .await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "unexpected_output_shape");
    assert_eq!(body["output"], json!({ "files": [] }));
    Ok(())
}

#[tokio::test]
async fn missing_prompt_skips_provider() -> Result<()> {
    let ctx = TestContext::new(HasherKind::Sha256).await?;

    let (status, body) = ctx.post("/generateposter", &json!({})).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing_prompt" }));
    assert!(ctx
        .provider
        .inputs
        .lock()
        .map(|i| i.is_empty())
        .unwrap_or(false));
    Ok(())
}

#[tokio::test]
async fn signup_and_login_with_argon2() -> Result<()> {
    let ctx = TestContext::new(HasherKind::Argon2).await?;
    let creds = json!({ "email": "ada@example.com", "password": "correct horse" });

    let (status, signup) = ctx.post("/auth/signup", &creds).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.post("/auth/signup", &creds).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, login) = ctx.post("/auth/login", &creds).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["userId"], signup["userId"]);

    let (status, body) = ctx
        .post(
            "/auth/login",
            &json!({ "email": "ada@example.com", "password": "battery staple" }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    Ok(())
}
