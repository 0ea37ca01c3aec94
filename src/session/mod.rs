//! Per-run editing session and the transitions that mutate it.
//!
//! The session is the only writer of the document. A request is dispatched
//! with [`Session::begin_generate`] or [`Session::begin_analyze`], which hand
//! back a [`PendingRequest`]; its result is applied with [`Session::finish`].
//! Every dispatch carries the session epoch, and `reset` bumps the epoch, so a
//! response that arrives after a reset is dropped instead of clobbering the
//! fresh session.

use serde::{Deserialize, Serialize};

use crate::errors::EditorError;
use crate::wire::{GenerationRequest, Task};

pub const PLACEHOLDER_CONTENT: &str = "<h2>Welcome to Spec Scribe</h2><p><strong>Step 1:</strong> Load your Guidelines / Specification text.<br><strong>Step 2:</strong> Enter a topic to generate a draft.<br><strong>Step 3:</strong> Once generated, edit the document yourself or give instructions to refine it.</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Draft,
    Refine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Generating,
    Updating,
    Analyzing,
    Success,
    Error,
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Status::Generating | Status::Updating | Status::Analyzing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: GenerationRequest,
}

/// What `finish` did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Guard refused to dispatch; nothing was sent.
    Skipped,
    Applied,
    Failed(String),
    /// The session was reset while the request was in flight.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub specification_text: String,
    pub example_text: String,
    pub user_prompt: String,
    document_content: String,
    mode: Mode,
    status: Status,
    last_error: Option<String>,
    suggestions: Option<String>,
    last_task: Option<Task>,
    epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            specification_text: String::new(),
            example_text: String::new(),
            user_prompt: String::new(),
            document_content: PLACEHOLDER_CONTENT.to_string(),
            mode: Mode::Draft,
            status: Status::Idle,
            last_error: None,
            suggestions: None,
            last_task: None,
            epoch: 0,
        }
    }

    pub fn document(&self) -> &str {
        &self.document_content
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn suggestions(&self) -> Option<&str> {
        self.suggestions.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    /// True once a draft has been generated; refinement and analysis unlock.
    pub fn has_content(&self) -> bool {
        self.mode == Mode::Refine
    }

    pub fn can_generate(&self) -> bool {
        !self.is_busy()
            && !self.specification_text.trim().is_empty()
            && !self.user_prompt.trim().is_empty()
    }

    pub fn can_analyze(&self) -> bool {
        !self.is_busy()
            && self.has_content()
            && !self.specification_text.trim().is_empty()
            && !self.document_content.trim().is_empty()
    }

    /// Whether there is anything for `reset` to clear.
    pub fn can_reset(&self) -> bool {
        !self.is_busy()
            && (self.has_content()
                || !self.user_prompt.trim().is_empty()
                || !self.example_text.trim().is_empty()
                || !self.specification_text.trim().is_empty())
    }

    pub fn set_specification(&mut self, text: impl Into<String>) {
        self.specification_text = text.into();
    }

    pub fn set_example(&mut self, text: impl Into<String>) {
        self.example_text = text.into();
    }

    pub fn set_user_prompt(&mut self, text: impl Into<String>) {
        self.user_prompt = text.into();
    }

    /// Manual edit coming from the editing surface. Ignored while a request
    /// is in flight since the surface is disabled then.
    pub fn edit_document(&mut self, html: impl Into<String>) -> bool {
        if self.is_busy() {
            return false;
        }
        self.document_content = html.into();
        true
    }

    fn example(&self) -> Option<String> {
        if self.example_text.trim().is_empty() {
            None
        } else {
            Some(self.example_text.clone())
        }
    }

    fn dispatch(&mut self, task: Task, request: GenerationRequest) -> PendingRequest {
        self.status = match task {
            Task::Draft => Status::Generating,
            Task::Refine => Status::Updating,
            Task::Analyze => Status::Analyzing,
        };
        self.last_error = None;
        self.suggestions = None;
        PendingRequest { ticket: Ticket { epoch: self.epoch, task }, request }
    }

    /// Draft in Draft mode, full-document refinement in Refine mode.
    pub fn begin_generate(&mut self) -> Option<PendingRequest> {
        if !self.can_generate() {
            return None;
        }
        let (task, current_content) = match self.mode {
            Mode::Draft => (Task::Draft, None),
            Mode::Refine => (Task::Refine, Some(self.document_content.clone())),
        };
        let request = GenerationRequest {
            task,
            specification_text: self.specification_text.clone(),
            example_text: self.example(),
            topic_or_instruction: self.user_prompt.clone(),
            current_content,
        };
        Some(self.dispatch(task, request))
    }

    pub fn begin_analyze(&mut self) -> Option<PendingRequest> {
        if !self.can_analyze() {
            return None;
        }
        let request = GenerationRequest {
            task: Task::Analyze,
            specification_text: self.specification_text.clone(),
            example_text: None,
            topic_or_instruction: String::new(),
            current_content: Some(self.document_content.clone()),
        };
        Some(self.dispatch(Task::Analyze, request))
    }

    /// Apply the result of a dispatched request. Success replaces state
    /// wholesale; failure touches only status and `last_error`.
    pub fn finish(&mut self, ticket: Ticket, result: Result<String, EditorError>) -> Outcome {
        if ticket.epoch != self.epoch {
            return Outcome::Stale;
        }
        match result {
            Ok(text) => {
                match ticket.task {
                    Task::Draft | Task::Refine => {
                        self.document_content = text;
                        self.mode = Mode::Refine;
                        self.user_prompt.clear();
                    }
                    Task::Analyze => self.suggestions = Some(text),
                }
                self.status = Status::Success;
                self.last_task = Some(ticket.task);
                Outcome::Applied
            }
            Err(e) => {
                let msg = match e {
                    EditorError::CredentialMissing(m) => m,
                    other => format!("{} {}", ticket.task.failure_message(), other),
                };
                self.status = Status::Error;
                self.last_error = Some(msg.clone());
                Outcome::Failed(msg)
            }
        }
    }

    /// Start over with the placeholder document. The specification survives.
    /// Does nothing unless the caller obtained confirmation.
    pub fn reset(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.document_content = PLACEHOLDER_CONTENT.to_string();
        self.mode = Mode::Draft;
        self.status = Status::Idle;
        self.user_prompt.clear();
        self.example_text.clear();
        self.last_error = None;
        self.suggestions = None;
        self.last_task = None;
        self.epoch += 1;
        true
    }

    /// Banner text for the success panel, if one should be shown.
    pub fn status_message(&self) -> Option<&'static str> {
        match (self.status, self.last_task) {
            (Status::Success, Some(Task::Draft)) => Some("Draft created successfully!"),
            (Status::Success, Some(Task::Refine)) => Some("Content updated successfully!"),
            (Status::Success, Some(Task::Analyze)) => Some("Analysis complete."),
            (Status::Generating, _) | (Status::Updating, _) => Some("Processing..."),
            (Status::Analyzing, _) => Some("Analyzing..."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Session {
        let mut s = Session::new();
        s.set_specification("Use formal tone");
        s.set_user_prompt("Q1 report");
        s
    }

    fn drafted() -> Session {
        let mut s = ready();
        let p = s.begin_generate().unwrap();
        assert_eq!(s.finish(p.ticket, Ok("<h1>Q1</h1>".into())), Outcome::Applied);
        s
    }

    #[test]
    fn starts_idle_in_draft_mode_with_placeholder() {
        let s = Session::new();
        assert_eq!(s.mode(), Mode::Draft);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.document(), PLACEHOLDER_CONTENT);
        assert!(!s.has_content());
    }

    #[test]
    fn blank_specification_is_a_no_op() {
        let mut s = Session::new();
        s.set_user_prompt("Q1 report");
        s.set_specification("   ");
        assert!(s.begin_generate().is_none());
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn first_draft_switches_to_refine() {
        let mut s = ready();
        let p = s.begin_generate().unwrap();
        assert_eq!(s.status(), Status::Generating);
        assert_eq!(p.request.task, Task::Draft);
        assert!(p.request.current_content.is_none());
        assert_eq!(p.request.topic_or_instruction, "Q1 report");

        s.finish(p.ticket, Ok("<h1>Q1</h1>".into()));
        assert_eq!(s.mode(), Mode::Refine);
        assert_eq!(s.status(), Status::Success);
        assert!(s.user_prompt.is_empty());
        assert_eq!(s.document(), "<h1>Q1</h1>");
        assert_eq!(s.status_message(), Some("Draft created successfully!"));
    }

    #[test]
    fn refine_sends_current_document() {
        let mut s = drafted();
        s.set_user_prompt("add a table");
        let p = s.begin_generate().unwrap();
        assert_eq!(s.status(), Status::Updating);
        assert_eq!(p.request.task, Task::Refine);
        assert_eq!(p.request.current_content.as_deref(), Some("<h1>Q1</h1>"));

        s.finish(p.ticket, Ok("<h1>Q1</h1><table></table>".into()));
        assert_eq!(s.mode(), Mode::Refine);
        assert_eq!(s.document(), "<h1>Q1</h1><table></table>");
        assert_eq!(s.status_message(), Some("Content updated successfully!"));
    }

    #[test]
    fn one_request_at_a_time() {
        let mut s = drafted();
        s.set_user_prompt("shorter");
        let _pending = s.begin_generate().unwrap();
        s.set_user_prompt("again");
        assert!(s.begin_generate().is_none());
        assert!(s.begin_analyze().is_none());
        assert!(!s.edit_document("<p>typed</p>"));
    }

    #[test]
    fn failure_keeps_document() {
        let mut s = drafted();
        s.set_user_prompt("rewrite");
        let p = s.begin_generate().unwrap();
        let out = s.finish(p.ticket, Err(EditorError::service("HTTP 500")));
        assert!(matches!(out, Outcome::Failed(_)));
        assert_eq!(s.status(), Status::Error);
        assert_eq!(s.document(), "<h1>Q1</h1>");
        assert!(s.last_error().unwrap().starts_with("Failed to update content."));
        assert_eq!(s.user_prompt, "rewrite");
        assert_eq!(s.mode(), Mode::Refine);
    }

    #[test]
    fn failed_first_draft_stays_in_draft_mode() {
        let mut s = ready();
        let p = s.begin_generate().unwrap();
        s.finish(p.ticket, Err(EditorError::credential_missing(&["API_KEY"])));
        assert_eq!(s.mode(), Mode::Draft);
        assert_eq!(s.document(), PLACEHOLDER_CONTENT);
        assert!(s.last_error().unwrap().starts_with("API key missing"));
    }

    #[test]
    fn analyze_requires_refine_mode() {
        let mut s = ready();
        assert!(s.begin_analyze().is_none());
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn analysis_sets_suggestions_only() {
        let mut s = drafted();
        let p = s.begin_analyze().unwrap();
        assert_eq!(s.status(), Status::Analyzing);
        assert_eq!(p.request.current_content.as_deref(), Some("<h1>Q1</h1>"));
        s.finish(p.ticket, Ok("- cite section 2".into()));
        assert_eq!(s.suggestions(), Some("- cite section 2"));
        assert_eq!(s.document(), "<h1>Q1</h1>");

        let p = s.begin_analyze().unwrap();
        s.finish(p.ticket, Err(EditorError::service("down")));
        assert_eq!(s.status(), Status::Error);
        assert!(s.last_error().unwrap().starts_with("Failed to analyze content."));
        // cleared at dispatch, so a failed check leaves none behind
        assert!(s.suggestions().is_none());
        assert_eq!(s.document(), "<h1>Q1</h1>");
    }

    #[test]
    fn generating_clears_stale_suggestions() {
        let mut s = drafted();
        let p = s.begin_analyze().unwrap();
        s.finish(p.ticket, Ok("- fix heading".into()));

        s.set_user_prompt("fix heading");
        let p = s.begin_generate().unwrap();
        assert!(s.suggestions().is_none());
        s.finish(p.ticket, Ok("<h1>Fixed</h1>".into()));
        assert!(s.suggestions().is_none());
    }

    #[test]
    fn reset_offered_whenever_there_is_input() {
        let mut s = Session::new();
        assert!(!s.can_reset());
        s.set_user_prompt("Q1 report");
        assert!(s.can_reset());

        let mut s = drafted();
        s.set_specification("");
        assert!(s.can_reset());
        s.set_user_prompt("shorter");
        s.set_specification("spec");
        let _pending = s.begin_generate().unwrap();
        assert!(!s.can_reset());
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut s = drafted();
        assert!(!s.reset(false));
        assert_eq!(s.mode(), Mode::Refine);
        assert_eq!(s.document(), "<h1>Q1</h1>");
    }

    #[test]
    fn reset_restores_placeholder_but_keeps_specification() {
        let mut s = drafted();
        s.set_example("An example");
        let p = s.begin_analyze().unwrap();
        s.finish(p.ticket, Ok("- ok".into()));

        assert!(s.reset(true));
        assert_eq!(s.document(), PLACEHOLDER_CONTENT);
        assert_eq!(s.mode(), Mode::Draft);
        assert_eq!(s.status(), Status::Idle);
        assert!(s.suggestions().is_none());
        assert!(s.last_error().is_none());
        assert!(s.example_text.is_empty());
        assert_eq!(s.specification_text, "Use formal tone");
    }

    #[test]
    fn response_after_reset_is_discarded() {
        let mut s = drafted();
        s.set_user_prompt("expand");
        let p = s.begin_generate().unwrap();
        s.reset(true);

        assert_eq!(s.finish(p.ticket, Ok("<h1>late</h1>".into())), Outcome::Stale);
        assert_eq!(s.document(), PLACEHOLDER_CONTENT);
        assert_eq!(s.mode(), Mode::Draft);
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn example_only_when_non_blank() {
        let mut s = ready();
        s.set_example("  ");
        assert!(s.begin_generate().unwrap().request.example_text.is_none());

        let mut s = ready();
        s.set_example("Dear team,");
        assert_eq!(
            s.begin_generate().unwrap().request.example_text.as_deref(),
            Some("Dear team,")
        );
    }

    #[test]
    fn manual_edits_are_kept() {
        let mut s = drafted();
        assert!(s.edit_document("<h1>Edited</h1>"));
        let p = s.begin_analyze().unwrap();
        assert_eq!(p.request.current_content.as_deref(), Some("<h1>Edited</h1>"));
    }
}
