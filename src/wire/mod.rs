use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ========================================
/// Request/Response shapes for one completion round trip
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Draft,
    Refine,
    Analyze,
}

impl Task {
    pub fn stage(&self) -> &'static str {
        match self {
            Task::Draft => "draft",
            Task::Refine => "refine",
            Task::Analyze => "analyze",
        }
    }

    /// Prefix used for the human-readable failure message.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Task::Draft => "Failed to generate draft.",
            Task::Refine => "Failed to update content.",
            Task::Analyze => "Failed to analyze content.",
        }
    }
}

/// Inputs captured from the session when a request is dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub task: Task,
    pub specification_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_text: Option<String>,
    /// Topic for drafts, instruction for refinements, empty for analysis.
    pub topic_or_instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_content: Option<String>,
}

/// What a backend actually receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Saved alongside each request as the response artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub transaction: Tx,
    pub task: Task,
    pub elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
