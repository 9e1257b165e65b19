use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Text-embedding service seam.
///
/// One request per text; failures are surfaced to the caller, never retried
/// here.
#[allow(async_fn_in_trait)]
pub trait EmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Text-generation service seam
#[allow(async_fn_in_trait)]
pub trait GenerationService {
    /// One generation request; the model's text is returned verbatim
    async fn generate(&self, system: &str, user: &str) -> Result<String>;

    /// Same, but the service is constrained to emit a single JSON object
    async fn generate_structured(&self, system: &str, user: &str) -> Result<String>;
}

/// Configuration for the OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub embeddings_url: String,
    pub chat_url: String,
    pub embedding_model: String,
    pub chat_model: String,
}

impl LlmConfig {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")?;
        let embeddings_url =
            env::var("OPENAI_EMBEDDINGS_URL").unwrap_or_else(|_| DEFAULT_EMBEDDINGS_URL.into());
        let chat_url = env::var("OPENAI_CHAT_URL").unwrap_or_else(|_| DEFAULT_CHAT_URL.into());
        let embedding_model =
            env::var("OPENAI_EMBEDDING_MODEL").unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.into());
        let chat_model = env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into());

        Ok(LlmConfig {
            api_key,
            embeddings_url,
            chat_url,
            embedding_model,
            chat_model,
        })
    }
}

/// Client for an OpenAI-compatible embeddings + chat-completions API
#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::new();
        LlmClient { config, client }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn chat(&self, system: &str, user: &str, json_output: bool) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.config.chat_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Chat request failed: {} {}",
                status,
                error_text
            ));
        }

        let response_data: ChatResponse = response.json().await?;

        response_data
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("No response generated"))
    }
}

impl EmbeddingService for LlmClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(&self.config.embeddings_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Embedding request failed: {} {}",
                status,
                error_text
            ));
        }

        let response_data: EmbeddingResponse = response.json().await?;

        response_data
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow::anyhow!("No embedding returned"))
    }
}

impl GenerationService for LlmClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user, false).await
    }

    async fn generate_structured(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user, true).await
    }
}

// Wire types for the OpenAI-compatible API

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}
