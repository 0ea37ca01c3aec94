//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, CompletionClient};
use crate::errors::EditorError;
use crate::wire::CompletionRequest;

pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    api_key: Option<String>,
    api_base: String,
    client: Client,
}

impl GeminiClient {
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

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize, Default)]
struct PartOut {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn response_text(resp: GenerateResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String, EditorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EditorError::credential_missing(API_KEY_VARS))?;

        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts: vec![PartIn { text: &req.prompt }] }],
            system_instruction: req
                .system_instruction
                .as_deref()
                .map(|s| SystemInstruction { parts: vec![PartIn { text: s }] }),
            generation_config: GenerationConfig { temperature: req.temperature },
        };

        let url = self.endpoint(&req.model);
        if debug {
            eprintln!("debug[gemini]: POST {}", url);
        }

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::service(format!("gemini request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| EditorError::service(format!("gemini read body failed: {e}")))?;

        if debug {
            eprintln!("debug[gemini]: raw status: {}", status);
            eprintln!("debug[gemini]: raw response:\n{}", &text);
        }

        if !status.is_success() {
            return Err(EditorError::service(format!("Gemini API error ({}): {}", status, text)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| EditorError::service(format!("failed to parse Gemini response: {e}")))?;

        Ok(response_text(parsed))
    }
}
