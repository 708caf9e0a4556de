//! HTTP client for the language-model `generate` endpoint.

use std::time::Duration;

use facesync_common::config::DialogueSettings;
use facesync_common::error::{FacesyncError, FacesyncResult};
use serde::{Deserialize, Serialize};

use crate::persona::build_prompt;

/// Canned reply for front ends that speak something when generation fails.
pub const FALLBACK_REPLY: &str = "Sorry, I had trouble generating a response. Please try again.";

/// Request body for a non-streaming generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// The part of the endpoint's reply we read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl GenerateResponse {
    /// The trimmed reply text, or a `Dialogue` error when it is missing or
    /// blank.
    pub fn into_reply(self) -> FacesyncResult<String> {
        match self.response.as_deref().map(str::trim) {
            Some(reply) if !reply.is_empty() => Ok(reply.to_string()),
            _ => Err(FacesyncError::dialogue("model returned an empty response")),
        }
    }
}

/// Generates persona replies from a local model server.
pub struct DialogueClient {
    api_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl DialogueClient {
    pub fn new(settings: &DialogueSettings) -> FacesyncResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| FacesyncError::dialogue(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            http_client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Model used when a request does not override it.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request body that [`generate`](Self::generate) would send.
    pub fn request_for(&self, user_text: &str, model_override: Option<&str>) -> GenerateRequest {
        let model = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.model);

        GenerateRequest {
            model: model.to_string(),
            prompt: build_prompt(user_text),
            stream: false,
        }
    }

    /// Generate a reply to `user_text`.
    ///
    /// Transport failures, non-success statuses, unparsable bodies and empty
    /// replies are all reported as [`FacesyncError::Dialogue`].
    pub async fn generate(
        &self,
        user_text: &str,
        model_override: Option<&str>,
    ) -> FacesyncResult<String> {
        let request = self.request_for(user_text, model_override);
        tracing::info!(model = %request.model, url = %self.api_url, "Generating reply");
        tracing::debug!(prompt = user_text, "User prompt");

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to reach language model");
                FacesyncError::dialogue(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "Language model returned an error");
            return Err(FacesyncError::dialogue(format!("HTTP {status}: {body}")));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse language model response");
            FacesyncError::dialogue(format!("unparsable response: {e}"))
        })?;

        let reply = body.into_reply()?;
        tracing::info!(chars = reply.chars().count(), "Reply received");
        Ok(reply)
    }
}
