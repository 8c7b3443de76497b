//! Image-generation provider client.

use crate::APP_USER_AGENT;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fmt, str::FromStr, time::Duration};
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Input forwarded to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderInput {
    pub prompt: String,
    pub aspect_ratio: String,
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Run the model to completion and return its raw output.
    ///
    /// # Errors
    /// Returns an error on transport failures, non-success responses, or a
    /// failed prediction.
    async fn run(&self, model: &ModelRef, input: &ProviderInput) -> Result<Value>;
}

/// `owner/name` with an optional `:version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl FromStr for ModelRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let re = Regex::new(r"^([\w.-]+)/([\w.-]+)(?::([0-9a-fA-F]+))?$")?;
        let captures = re
            .captures(s.trim())
            .ok_or_else(|| anyhow!("invalid model reference: {s}"))?;
        Ok(Self {
            owner: captures[1].to_string(),
            name: captures[2].to_string(),
            version: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: Option<String>,
    status: PredictionStatus,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    urls: Option<PredictionUrls>,
}

/// Replicate predictions API.
///
/// Requests ask the API to hold the connection (`Prefer: wait`); predictions
/// still running when it answers are polled until they reach a terminal
/// state. No timeout is applied.
pub struct ReplicateProvider {
    client: Client,
    api_url: Url,
    token: SecretString,
    poll_interval: Duration,
}

impl ReplicateProvider {
    /// # Errors
    /// Returns an error if the API URL is invalid or the HTTP client cannot be built.
    pub fn new(api_url: &str, token: SecretString) -> Result<Self> {
        let mut api_url =
            Url::parse(api_url).with_context(|| format!("Invalid provider API URL: {api_url}"))?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url,
            token,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn create_request(&self, model: &ModelRef, input: &ProviderInput) -> Result<(Url, Value)> {
        match &model.version {
            Some(version) => Ok((
                self.api_url.join("v1/predictions")?,
                json!({ "version": version, "input": input }),
            )),
            None => Ok((
                self.api_url
                    .join(&format!("v1/models/{}/{}/predictions", model.owner, model.name))?,
                json!({ "input": input }),
            )),
        }
    }

    async fn decode(response: Response) -> Result<Prediction> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("provider returned {status}: {body}");
        }
        response
            .json::<Prediction>()
            .await
            .context("failed to decode provider prediction")
    }
}

impl fmt::Debug for ReplicateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicateProvider")
            .field("api_url", &self.api_url.as_str())
            .field("token", &"***")
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[async_trait]
impl ImageProvider for ReplicateProvider {
    #[instrument(skip(self, model, input), fields(model = %model))]
    async fn run(&self, model: &ModelRef, input: &ProviderInput) -> Result<Value> {
        let (endpoint, body) = self.create_request(model, input)?;

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(self.token.expose_secret())
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .context("failed to reach provider")?;
        let mut prediction = Self::decode(response).await?;

        loop {
            debug!(id = ?prediction.id, status = ?prediction.status, "prediction");
            match prediction.status {
                PredictionStatus::Succeeded => return Ok(prediction.output),
                PredictionStatus::Failed | PredictionStatus::Canceled => {
                    bail!(
                        "prediction {:?}: {}",
                        prediction.status,
                        match &prediction.error {
                            Value::String(message) => message.clone(),
                            Value::Null => "no error reported".to_string(),
                            other => other.to_string(),
                        }
                    );
                }
                PredictionStatus::Unknown => bail!("prediction returned an unknown status"),
                PredictionStatus::Starting | PredictionStatus::Processing => {
                    let poll_url = prediction
                        .urls
                        .and_then(|urls| urls.get)
                        .context("running prediction has no poll URL")?;
                    tokio::time::sleep(self.poll_interval).await;
                    let response = self
                        .client
                        .get(&poll_url)
                        .bearer_auth(self.token.expose_secret())
                        .send()
                        .await
                        .context("failed to poll provider")?;
                    prediction = Self::decode(response).await?;
                }
            }
        }
    }
}
