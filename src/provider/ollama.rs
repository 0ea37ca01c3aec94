use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, CompletionClient};
use crate::errors::EditorError;
use crate::wire::CompletionRequest;

const DEFAULT_URL: &str = "http://localhost:11434";

/// Local Ollama server; needs no credential.
pub struct OllamaClient {
    url: String,
    client: Client,
}

impl OllamaClient {
    pub fn new(url: Option<String>, timeout_secs: Option<u64>) -> Result<Self, EditorError> {
        Ok(Self {
            url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            client: http_client(timeout_secs)?,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    #[serde(default)]
    content: String,
}

fn to_messages(req: &CompletionRequest) -> Vec<Msg<'_>> {
    let mut out = Vec::with_capacity(2);
    if let Some(sys) = &req.system_instruction {
        out.push(Msg { role: "system", content: sys });
    }
    out.push(Msg { role: "user", content: &req.prompt });
    out
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String, EditorError> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &req.model,
            messages: to_messages(req),
            stream: false,
            options: OllamaOptions { temperature: req.temperature },
        };

        if debug {
            eprintln!("debug[ollama]: POST {}", url);
        }

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::service(format!("ollama request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| EditorError::service(format!("ollama read body failed: {e}")))?;

        if debug {
            eprintln!("debug[ollama]: raw body:\n{}\n", text);
        }

        if !status.is_success() {
            return Err(EditorError::service(format!("Ollama error ({}): {}", status, text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| EditorError::service(format!("failed to parse Ollama response: {e}")))?;
        Ok(parsed.message.content)
    }
}
