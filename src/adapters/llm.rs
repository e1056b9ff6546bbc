//! OpenAI 相容的 chat completions 用戶端，指向本機的模型伺服器。

use crate::core::prompt::build_prompt;
use crate::domain::ports::ModelClient;
use crate::utils::error::{ModelError, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub persona: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> std::result::Result<String, ModelError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Malformed("no choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| ModelError::Malformed("choice has no message content".to_string()))
    }
}

pub struct ChatCompletionClient {
    client: Client,
    settings: ModelSettings,
}

impl ChatCompletionClient {
    pub fn new(settings: ModelSettings) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // 每次呼叫各自建立連線，不保留閒置連線
        let client = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ModelError::from)?;

        Ok(Self { client, settings })
    }
}

#[async_trait]
impl ModelClient for ChatCompletionClient {
    async fn complete(
        &self,
        provision: &str,
        clause: &str,
    ) -> std::result::Result<String, ModelError> {
        let prompt = build_prompt(&self.settings.persona, provision, clause);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::debug!("POST {} (model {})", self.settings.endpoint, self.settings.model);

        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Model response: {}", body);

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ModelError::Malformed(e.to_string()))?;
        parsed.into_content()
    }
}
