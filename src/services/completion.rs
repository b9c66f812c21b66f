//! Generative completion collaborator.
//!
//! A successful HTTP round trip whose body lacks extractable text is treated
//! the same as a transport failure: the caller fails the whole request.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Free-form completion text for `prompt`. Errors when the service is
    /// unreachable or the response carries no text content.
    async fn generate_content(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for the completion service.
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: Client,
    base_url: String,
}

impl HttpCompletionService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/agent/chat", self.base_url);
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let body: ChatResponse = response.json().await?;

        match body.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(anyhow!("completion response carried no text content")),
        }
    }
}
