use thiserror::Error;

/// Failure kinds surfaced by a completion backend.
///
/// Callers only ever see one of these; transport and parse failures are
/// folded into `Service` at the client boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("{0}")] CredentialMissing(String),
    #[error("service error: {0}")] Service(String),
}

impl EditorError {
    pub fn credential_missing(env_names: &[&str]) -> Self {
        EditorError::CredentialMissing(format!(
            "API key missing. Set {} before generating.",
            env_names.join(" or ")
        ))
    }

    pub fn service(msg: impl Into<String>) -> Self {
        EditorError::Service(msg.into())
    }
}
