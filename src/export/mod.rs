use anyhow::{Context, Result};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const HTML_MIME: &str = "text/html";

/// Write the document to `path`, creating parent directories as needed.
/// Only `text/html` is supported; a missing extension gets `.html`.
pub fn download_as_file(text: &str, path: &Path, mime: &str) -> Result<PathBuf> {
    anyhow::ensure!(mime == HTML_MIME, "unsupported export type: {mime}");
    let mut target = path.to_path_buf();
    if target.extension().is_none() {
        target.set_extension("html");
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, text).with_context(|| format!("failed to export {}", target.display()))?;
    Ok(target)
}

/// Copy target for a terminal: the raw HTML, undecorated, on `out`.
pub fn copy_to(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
