use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::EditorError;
use crate::wire::CompletionRequest;

pub mod gemini;
pub mod ollama;
pub mod openai;

/// One prompt in, raw model text out. No retries, no streaming.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String, EditorError>;
}

pub type DynClient = Box<dyn CompletionClient + Send + Sync>;

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String, EditorError> {
        (**self).complete(req, debug).await
    }
}

/// First non-empty value among the given environment variables.
pub fn credential_from_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| std::env::var(n).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

pub(crate) fn http_client(timeout_secs: Option<u64>) -> Result<Client, EditorError> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| EditorError::service(format!("failed to build HTTP client: {e}")))
}

pub fn make_client(cfg: &Config) -> Result<DynClient, EditorError> {
    let base = cfg.api_base.clone();
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::GeminiClient::new(
            credential_from_env(gemini::API_KEY_VARS),
            base,
            cfg.timeout_secs,
        )?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIClient::new(
            credential_from_env(openai::API_KEY_VARS),
            base,
            cfg.timeout_secs,
        )?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::OllamaClient::new(base, cfg.timeout_secs)?)),
    }
}
