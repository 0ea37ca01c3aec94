use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::EditorError;
use crate::log;
use crate::normalize::normalize;
use crate::prompt;
use crate::provider::CompletionClient;
use crate::session::{Outcome, Session};
use crate::wire::{CompletionRecord, CompletionRequest, GenerationRequest, Task, Tx};

const NO_SUGGESTIONS: &str = "No suggestions available.";

/// Map a session request onto the prompt, model and sampling parameters
/// for its task.
pub fn completion_request(req: &GenerationRequest, cfg: &Config) -> CompletionRequest {
    let example = req.example_text.as_deref();
    let content = req.current_content.as_deref().unwrap_or_default();
    let (prompt, system_instruction, temperature) = match req.task {
        Task::Draft => (
            prompt::draft_prompt(&req.specification_text, &req.topic_or_instruction, example),
            Some(prompt::system_instruction().to_string()),
            cfg.draft_temperature,
        ),
        Task::Refine => (
            prompt::refine_prompt(&req.specification_text, content, &req.topic_or_instruction, example),
            Some(prompt::system_instruction().to_string()),
            cfg.refine_temperature,
        ),
        Task::Analyze => (
            prompt::analysis_prompt(&req.specification_text, content),
            None,
            cfg.analysis_temperature,
        ),
    };
    CompletionRequest { model: cfg.model.clone(), prompt, system_instruction, temperature }
}

/// Drives a [`Session`] against a completion backend.
pub struct Editor<C: CompletionClient> {
    session: Session,
    client: C,
    cfg: Config,
    tx: Uuid,
    seq: u32,
    debug: bool,
}

impl<C: CompletionClient> Editor<C> {
    pub fn new(client: C, cfg: Config, debug: bool) -> Self {
        Self { session: Session::new(), client, cfg, tx: Uuid::new_v4(), seq: 0, debug }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn transaction(&self) -> Uuid {
        self.tx
    }

    /// Generate a draft, or refine the document once one exists.
    pub async fn generate(&mut self) -> Outcome {
        let Some(pending) = self.session.begin_generate() else {
            return Outcome::Skipped;
        };
        let result = self.run(&pending.request).await;
        self.session.finish(pending.ticket, result)
    }

    pub async fn analyze(&mut self) -> Outcome {
        let Some(pending) = self.session.begin_analyze() else {
            return Outcome::Skipped;
        };
        let result = self.run(&pending.request).await;
        self.session.finish(pending.ticket, result)
    }

    async fn run(&mut self, req: &GenerationRequest) -> Result<String, EditorError> {
        let completion = completion_request(req, &self.cfg);
        let started = Instant::now();
        let raw = self.client.complete(&completion, self.debug).await;

        if let Err(e) = &raw {
            if self.debug {
                eprintln!("debug[{}]: {}", req.task.stage(), e);
            }
        }

        let result = raw.map(|text| match req.task {
            Task::Draft | Task::Refine => normalize(&text),
            Task::Analyze if text.trim().is_empty() => NO_SUGGESTIONS.to_string(),
            Task::Analyze => text,
        });

        self.record(req.task, &completion, &result, started.elapsed().as_millis());
        result
    }

    fn record(
        &mut self,
        task: Task,
        completion: &CompletionRequest,
        result: &Result<String, EditorError>,
        elapsed_ms: u128,
    ) {
        if !(self.cfg.save_request || self.cfg.save_response || self.debug) {
            return;
        }
        self.seq += 1;
        let stage = format!("{}-{}", task.stage(), self.seq);
        let record = CompletionRecord {
            transaction: Tx { id: self.tx, timestamp: Utc::now() },
            task,
            elapsed_ms,
            text: result.as_ref().ok().cloned(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };

        match log::save_stage(
            Path::new(&self.cfg.artifacts_root),
            self.tx,
            &stage,
            completion,
            &record,
            self.cfg.save_request,
            self.cfg.save_response,
        ) {
            Ok(saved) if self.debug => {
                if let Err(e) = log::print_debug(&stage, &saved, completion, &record) {
                    eprintln!("warning: could not print {stage} debug output: {e:#}");
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("warning: could not save {stage} artifacts: {e:#}"),
        }
    }
}
