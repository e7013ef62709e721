use serde::{Deserialize, Serialize};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::LlmConfig;
use crate::error::{Result, AppError};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Generation parameters; unset fields are left to the endpoint's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for OpenAI-compatible chat-completion and embedding endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build LLM client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends `messages` to `{api_base}/chat/completions` and returns the first choice's text.
    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<String> {
        let body = ChatRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let res = self.post("chat/completions").json(&body).send().await?;
        let res = check_status(res).await?;

        let parsed: ChatResponse = res.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::MalformedResponse("response has no message content".to_string()))?;

        debug!(chars = reply.len(), "chat completion received");
        Ok(reply)
    }

    /// Embeds `input` with the configured embeddings model and returns the first vector.
    #[instrument(skip(self, input))]
    pub async fn embedding(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingRequest {
            model: &self.config.embeddings_model,
            input,
        };

        let res = self.post("embeddings").json(&body).send().await?;
        let res = check_status(res).await?;

        let parsed: EmbeddingResponse = res.json().await?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| AppError::MalformedResponse("response has no embedding data".to_string()))?;

        debug!(dimensions = vector.len(), "embedding received");
        Ok(vector)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.api_base, path);
        let mut request = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("api-key", &self.config.api_key);

        // Azure deployments pin the API version per request
        if let Some(version) = &self.config.api_version {
            request = request.query(&[("api-version", version)]);
        }

        request
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = res
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    warn!(%status, "model endpoint rejected request");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Authentication(message)),
        _ => Err(AppError::Upstream { status: status.as_u16(), message }),
    }
}
