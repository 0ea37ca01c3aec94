use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, CompletionClient};
use crate::errors::EditorError;
use crate::wire::CompletionRequest;

pub const API_KEY_VARS: &[&str] = &["OPENAI_API_KEY"];
const DEFAULT_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions backend. The system instruction, when present,
/// becomes a leading system message.
pub struct OpenAIClient {
    api_key: Option<String>,
    api_base: String,
    client: Client,
}

impl OpenAIClient {
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, EditorError> {
        Ok(Self {
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            client: http_client(timeout_secs)?,
        })
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String, EditorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EditorError::credential_missing(API_KEY_VARS))?;

        let mut messages = Vec::new();
        if let Some(sys) = &req.system_instruction {
            messages.push(json!({ "role": "system", "content": sys }));
        }
        messages.push(json!({ "role": "user", "content": req.prompt }));

        let body = json!({
            "model": req.model,
            "messages": messages,
            "temperature": req.temperature,
        });

        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        if debug {
            eprintln!("debug[openai]: HTTP POST {} body:\n{}", url, serde_json::to_string_pretty(&body).unwrap_or_default());
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::service(format!("openai request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| EditorError::service(format!("openai read body failed: {e}")))?;

        if debug {
            eprintln!("debug[openai]: raw status: {}", status);
            eprintln!("debug[openai]: raw response:\n{}", &text);
        }

        if !status.is_success() {
            return Err(EditorError::service(format!("OpenAI API error ({}): {}", status, text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| EditorError::service(format!("failed to parse OpenAI response: {e}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
