use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::session::{Mode, Session, Status};

pub fn header(session: &Session) -> String {
    let (title, subtitle) = match session.mode() {
        Mode::Draft => ("Drafting Control", "Define rules and topic to start."),
        Mode::Refine => ("Refine & Edit", "Modify the content while keeping it compliant."),
    };
    format!("{}\n{}", title.bold(), subtitle.dimmed())
}

/// Error, suggestion and success panels for the current session state.
pub fn panels(session: &Session) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(s) = session.suggestions() {
        out.push(format!("{}\n{}", "AI Suggestions".magenta().bold(), indent(s, 2)));
    }

    match session.status() {
        Status::Error => {
            if let Some(e) = session.last_error() {
                out.push(format!("{} {}", "[ERROR]".red().bold(), e));
            }
        }
        Status::Success if session.suggestions().is_none() => {
            if let Some(m) = session.status_message() {
                out.push(format!("{} {}", "[OK]".green().bold(), m));
            }
        }
        _ => {}
    }
    out
}

pub fn show_state(session: &Session) {
    println!("\n{}", header(session));
    for p in panels(session) {
        println!("{}", p);
    }
    println!();
}

pub fn show_status(session: &Session) {
    let spec = if session.specification_text.trim().is_empty() {
        "(none)".red().to_string()
    } else {
        format!("{} chars", session.specification_text.chars().count())
    };
    let example = if session.example_text.trim().is_empty() {
        "(none)".to_string()
    } else {
        format!("{} chars", session.example_text.chars().count())
    };
    println!(
        "  {}: {:?}   {}: {:?}   {}: {}   {}: {}   {}: {}B",
        "Mode".bold(), session.mode(),
        "Status".bold(), session.status(),
        "Spec".bold(), spec,
        "Example".bold(), example,
        "Document".bold(), session.document().len()
    );
}

pub fn show_document(html: &str) {
    println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━ Document ━━━━━━━━━━━━━━━━━━━━━━━━".bold());
    println!("{}", html);
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bold());
}

pub fn show_help(session: &Session) {
    let action = match session.mode() {
        Mode::Draft => "Generate Draft",
        Mode::Refine => "Update Content",
    };
    println!("{}", "Commands".bold());
    println!("  <text>                 {} with <text> as the topic/instruction", action);
    println!("  /spec <path>           load the specification from a file");
    println!("  /spec-text <text>      set the specification inline");
    println!("  /example <path>        load a reference example (style template)");
    println!("  /example-clear         drop the reference example");
    if session.has_content() {
        println!("  /analyze               check compliance and get suggestions");
    }
    println!("  /show                  print the document");
    println!("  /load <path>           replace the document with an edited file");
    println!("  /copy                  print the raw HTML for copying");
    println!("  /save [path]           download the document as HTML");
    println!("  /reset                 start a new draft");
    println!("  /status  /help  /quit");
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

pub fn spinner(message: &'static str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}
