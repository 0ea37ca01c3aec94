use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub api_base: Option<String>,
    /// Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
    pub draft_temperature: f32,
    pub refine_temperature: f32,
    pub analysis_temperature: f32,
    pub output_path: String,
    pub artifacts_root: String,
    pub save_request: bool,
    pub save_response: bool,
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: "gemini-3-flash-preview".into(),
            api_base: None,
            timeout_secs: None,
            draft_temperature: 0.2,
            refine_temperature: 0.2,
            analysis_temperature: 0.1,
            output_path: "generated-content.html".into(),
            artifacts_root: ".".into(),
            save_request: false,
            save_response: false,
            progress: true,
        }
    }
}

impl Config {
    /// A file that picks a provider without naming a model gets that
    /// provider's default model.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let table: toml::Table =
            toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))?;
        let names_model = table.contains_key("model");
        let mut cfg: Self = table
            .try_into()
            .with_context(|| format!("invalid config file {}", path.display()))?;
        if !names_model {
            cfg.model = default_model(cfg.provider).to_string();
        }
        Ok(cfg)
    }

    /// Defaults, then the optional TOML file, then command-line flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_toml_file(Path::new(p))?,
            None => Self::default(),
        };

        if let Some(kind) = args.provider {
            if kind != cfg.provider && args.model.is_none() {
                cfg.model = default_model(kind).to_string();
            }
            cfg.provider = kind;
        }
        if let Some(m) = &args.model {
            cfg.model = m.clone();
        }
        if args.api_base.is_some() {
            cfg.api_base = args.api_base.clone();
        }
        if args.timeout_secs.is_some() {
            cfg.timeout_secs = args.timeout_secs;
        }
        if let Some(out) = &args.out {
            cfg.output_path = out.clone();
        }
        cfg.save_request |= args.save_request;
        cfg.save_response |= args.save_response;
        cfg.progress &= !args.no_progress;
        Ok(cfg)
    }
}

pub fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "gemini-3-flash-preview",
        ProviderKind::OpenAI => "gpt-4.1-mini",
        ProviderKind::Ollama => "llama3.1",
    }
}
