//! Interactive terminal front end. Reads one command per line and forwards
//! it to the editor; the session itself is never touched directly here
//! except through its setters.

use anyhow::{Context, Result};
use colored::Colorize;
use fs_err as fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::export;
use crate::provider::CompletionClient;
use crate::session::{Mode, Outcome};
use crate::ux;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: run Generate/Update with it as the topic or instruction.
    Generate(String),
    Spec(PathBuf),
    SpecText(String),
    Example(PathBuf),
    ExampleClear,
    Analyze,
    Show,
    Load(PathBuf),
    Copy,
    Save(Option<PathBuf>),
    Reset,
    Status,
    Help,
    Quit,
    Empty,
    MissingArgument(&'static str),
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Generate(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };
    let path_arg = |cmd: &'static str, f: fn(PathBuf) -> Command| {
        if arg.is_empty() {
            Command::MissingArgument(cmd)
        } else {
            f(PathBuf::from(arg))
        }
    };

    match name.to_lowercase().as_str() {
        "spec" => path_arg("/spec", Command::Spec),
        "spec-text" if arg.is_empty() => Command::MissingArgument("/spec-text"),
        "spec-text" => Command::SpecText(arg.to_string()),
        "example" => path_arg("/example", Command::Example),
        "example-clear" => Command::ExampleClear,
        "analyze" | "check" => Command::Analyze,
        "show" => Command::Show,
        "load" => path_arg("/load", Command::Load),
        "copy" => Command::Copy,
        "save" | "download" => Command::Save((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "reset" => Command::Reset,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}

pub struct Shell<C: CompletionClient> {
    editor: Editor<C>,
    assume_yes: bool,
}

impl<C: CompletionClient> Shell<C> {
    pub fn new(editor: Editor<C>, assume_yes: bool) -> Self {
        Self { editor, assume_yes }
    }

    pub fn editor(&self) -> &Editor<C> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor<C> {
        &mut self.editor
    }

    pub async fn generate(&mut self) -> Outcome {
        let busy = match self.editor.session().mode() {
            Mode::Draft => "Generating draft...",
            Mode::Refine => "Updating content...",
        };
        let pb = ux::spinner(busy, self.editor.config().progress && self.editor.session().can_generate());
        let out = self.editor.generate().await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        out
    }

    pub async fn analyze(&mut self) -> Outcome {
        let pb = ux::spinner("Analyzing...", self.editor.config().progress && self.editor.session().can_analyze());
        let out = self.editor.analyze().await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        out
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.editor.config().output_path));
        export::download_as_file(self.editor.session().document(), &target, export::HTML_MIME)
    }

    /// Handle one command. Returns `false` when the shell should exit.
    pub async fn handle(&mut self, cmd: Command) -> Result<bool> {
        match cmd {
            Command::Empty => {}
            Command::Generate(text) => {
                self.editor.session_mut().set_user_prompt(text);
                if self.editor.session().specification_text.trim().is_empty() {
                    println!("{}", "Load a specification first (/spec <path>).".yellow());
                    return Ok(true);
                }
                self.generate().await;
                ux::show_state(self.editor.session());
            }
            Command::Spec(path) => {
                let text = read_text(&path)?;
                println!("specification loaded: {} ({} chars)", path.display(), text.chars().count());
                self.editor.session_mut().set_specification(text);
            }
            Command::SpecText(text) => self.editor.session_mut().set_specification(text),
            Command::Example(path) => {
                let text = read_text(&path)?;
                println!("reference example loaded: {}", path.display());
                self.editor.session_mut().set_example(text);
            }
            Command::ExampleClear => self.editor.session_mut().set_example(""),
            Command::Analyze => {
                if !self.editor.session().has_content() {
                    println!("{}", "Generate a draft before checking compliance.".yellow());
                    return Ok(true);
                }
                self.analyze().await;
                ux::show_state(self.editor.session());
            }
            Command::Show => ux::show_document(self.editor.session().document()),
            Command::Load(path) => {
                let html = read_text(&path)?;
                if self.editor.session_mut().edit_document(html) {
                    println!("document replaced from {}", path.display());
                }
            }
            Command::Copy => export::copy_to(&mut io::stdout(), self.editor.session().document())?,
            Command::Save(path) => {
                let written = self.save(path.as_deref())?;
                println!("saved {}", written.display());
            }
            Command::Reset => {
                if !self.editor.session().can_reset() {
                    println!("nothing to reset");
                    return Ok(true);
                }
                let confirmed = self.assume_yes
                    || ux::confirm("Are you sure? This will clear the editor and start a new draft.");
                if self.editor.session_mut().reset(confirmed) {
                    ux::show_state(self.editor.session());
                }
            }
            Command::Status => ux::show_status(self.editor.session()),
            Command::Help => ux::show_help(self.editor.session()),
            Command::Quit => return Ok(false),
            Command::MissingArgument(name) => println!("{} needs an argument", name),
            Command::Unknown(name) => println!("unknown command /{} (try /help)", name),
        }
        Ok(true)
    }

    pub async fn run(&mut self) -> Result<()> {
        ux::show_state(self.editor.session());
        ux::show_help(self.editor.session());
        let stdin = io::stdin();
        loop {
            let marker = match self.editor.session().mode() {
                Mode::Draft => "draft",
                Mode::Refine => "refine",
            };
            print!("{}> ", marker.cyan());
            io::stdout().flush().ok();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            match self.handle(parse(&line)).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => println!("{} {:#}", "[ERROR]".red().bold(), e),
            }
        }
        Ok(())
    }
}
