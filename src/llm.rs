use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SummarizationError;
use crate::keys::KeyPool;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A single chat-completion call. `None` fields fall back to the client's defaults.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// One user turn holding `prompt`.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub tokens_used: Option<u64>,
    pub finish_reason: Option<String>,
}

/// Anything that can answer a chat-completion request.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, SummarizationError>;
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

/// GROQ's OpenAI-compatible chat endpoint, one pool key per call.
pub struct GroqClient {
    http: Client,
    keys: Arc<KeyPool>,
    api_base: String,
    default_model: String,
}

impl GroqClient {
    pub fn new(keys: Arc<KeyPool>, api_base: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            keys,
            api_base: api_base.into(),
            default_model: default_model.into(),
        }
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, SummarizationError> {
        let api_key = self.keys.next_key()?;
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let body = CompletionBody {
            model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        debug!(model, messages = request.messages.len(), "sending chat completion");
        let res = self
            .http
            .post(format!("{}/chat/completions", self.api_base.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(SummarizationError::Llm(format!("provider returned {}: {}", status, detail)));
        }

        let json: serde_json::Value = res.json().await?;
        parse_completion(&json, model)
    }
}

fn parse_completion(json: &serde_json::Value, requested_model: &str) -> Result<ChatCompletion, SummarizationError> {
    let choice = &json["choices"][0];
    let content = choice["message"]["content"]
        .as_str()
        .ok_or_else(|| SummarizationError::InvalidLlmResponse("missing choices[0].message.content".to_string()))?
        .to_string();

    Ok(ChatCompletion {
        content,
        model: json["model"].as_str().unwrap_or(requested_model).to_string(),
        tokens_used: json["usage"]["total_tokens"].as_u64(),
        finish_reason: choice["finish_reason"].as_str().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_openai_style_completion() {
        let body = json!({
            "model": "llama3-8b-8192",
            "choices": [{"message": {"role": "assistant", "content": "The court held..."}, "finish_reason": "stop"}],
            "usage": {"total_tokens": 42}
        });
        let completion = parse_completion(&body, "fallback").unwrap();
        assert_eq!(completion.content, "The court held...");
        assert_eq!(completion.tokens_used, Some(42));
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn rejects_body_without_content() {
        let body = json!({"choices": []});
        assert!(matches!(
            parse_completion(&body, "m"),
            Err(SummarizationError::InvalidLlmResponse(_))
        ));
    }

    #[tokio::test]
    async fn empty_pool_fails_before_any_request() {
        let client = GroqClient::new(Arc::new(KeyPool::default()), "http://127.0.0.1:1", "m");
        let err = client.complete(ChatRequest::prompt("hi")).await.unwrap_err();
        assert!(matches!(err, SummarizationError::NoApiKeys));
    }
}
