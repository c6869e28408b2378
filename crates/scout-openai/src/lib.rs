//! OpenAI adapter (chat completions).
//!
//! Implements [`Analyst`] on top of the `chat/completions` endpoint; used for
//! summaries, tweet digests and the tokenomics review.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use scout_core::{
    config::Config,
    errors::Error,
    ports::{Analyst, CompletionRequest},
    Result,
};

const SERVICE: &str = "openai";

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("openai http client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.credentials().openai_api_key(),
            cfg.openai_model.clone(),
            cfg.openai_base_url.clone(),
            cfg.http_timeout,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Analyst for OpenAiClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = req.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &req.prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        };

        tracing::debug!(model = %self.model, prompt_chars = req.prompt.len(), "openai completion");

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::api(SERVICE, format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::api(
                SERVICE,
                format!(
                    "completion failed: {status} {}",
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| Error::api(SERVICE, format!("json error: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::api(SERVICE, "completion returned empty text"));
        }

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(url: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test", "gpt-4o-mini", url, Duration::from_secs(5)).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: Some("be brief".to_string()),
            prompt: "summarize this".to_string(),
            max_tokens: 200,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 200,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "summarize this"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  Short summary. "}}]}"#)
            .create_async()
            .await;

        let text = client(&server.url()).complete(request()).await.unwrap();
        assert_eq!(text, "Short summary.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_errors_carry_status_and_body_preview() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete(request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("openai error: completion failed: 429"));
        assert!(msg.contains("Rate limit reached"));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn empty_choices_are_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("empty text"));
    }

    #[test]
    fn trims_trailing_slash() {
        let c = client("http://localhost:1234/v1/");
        assert_eq!(c.base_url, "http://localhost:1234/v1");
        assert_eq!(c.model(), "gpt-4o-mini");
    }
}
