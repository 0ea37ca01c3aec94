use crate::wire::{CompletionRecord, CompletionRequest};
use fs_err as fs;
use serde_json::to_string_pretty;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

pub fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".spec-scribe").join("tx").join(tx.to_string())
}

/// Write `<stage>.request.json` / `<stage>.response.json` under the
/// transaction directory. Nothing is created when both flags are off.
pub fn save_stage(
    root: &Path,
    tx: Uuid,
    stage: &str,
    req: &CompletionRequest,
    record: &CompletionRecord,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    let mut request_path = None;
    let mut response_path = None;

    if !save_request && !save_response {
        return Ok(SavedPaths { dir, request: None, response: None });
    }
    fs::create_dir_all(&dir)?;

    if save_request {
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(req)?)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join(format!("{stage}.response.json"));
        fs::write(&p, to_string_pretty(record)?)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

/// One-line outcome of a stage: task, latency, and either the size of the
/// returned text or the error.
pub fn summary_line(stage: &str, record: &CompletionRecord) -> String {
    let task = record.task.stage();
    let ms = record.elapsed_ms;
    match (&record.text, &record.error) {
        (_, Some(err)) => format!("debug[{stage}]: {task} failed after {ms} ms: {err}"),
        (Some(text), None) => {
            format!("debug[{stage}]: {task} ok in {ms} ms, {} chars", text.chars().count())
        }
        (None, None) => format!("debug[{stage}]: {task} returned nothing after {ms} ms"),
    }
}

pub fn render_json_debug(stage: &str, req: &CompletionRequest, record: &CompletionRecord) -> anyhow::Result<String> {
    Ok(format!(
        "===== DEBUG [{stage}]: REQUEST JSON =====\n{}\n\n===== DEBUG [{stage}]: RESPONSE JSON =====\n{}\n",
        to_string_pretty(req)?,
        to_string_pretty(record)?
    ))
}

/// Summary, artifact locations and the full request/response JSON on stderr.
pub fn print_debug(
    stage: &str,
    saved: &SavedPaths,
    req: &CompletionRequest,
    record: &CompletionRecord,
) -> anyhow::Result<()> {
    let json = render_json_debug(stage, req, record)?;
    let mut err = std::io::stderr().lock();
    writeln!(err, "{}", summary_line(stage, record))?;
    for (kind, path) in [("request", &saved.request), ("response", &saved.response)] {
        if let Some(p) = path {
            writeln!(err, "debug[{stage}]: {kind} saved at {}", p.display())?;
        }
    }
    writeln!(err, "\n{json}")?;
    err.flush()?;
    Ok(())
}
