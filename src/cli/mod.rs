use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "spec-scribe", version, about = "Draft and refine HTML documents that cite compliance with a specification")]
pub struct Args {
    /// File holding the specification / style guide text.
    #[arg(long)]
    pub spec: Option<String>,

    /// Optional reference example whose tone and structure should be mimicked.
    #[arg(long)]
    pub example: Option<String>,

    /// Topic for the first draft; runs one generation before the shell starts.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Run a compliance analysis after the initial generation.
    #[arg(long, default_value_t = false)]
    pub analyze: bool,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Where `/save` writes the document.
    #[arg(long)]
    pub out: Option<String>,

    #[arg(long)]
    pub config: Option<String>,

    /// Answer yes to confirmation prompts.
    #[arg(long, default_value_t = false)]
    pub yes: bool,

    /// Exit after the initial generation instead of opening the shell.
    #[arg(long, default_value_t = false)]
    pub no_interactive: bool,

    /// Disable the spinner shown while a request is in flight.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
