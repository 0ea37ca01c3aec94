use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use fs_err as fs;

use spec_scribe::{cli, config, editor, provider, session::Outcome, shell, ux};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let cfg = config::Config::resolve(&args)?;

    if args.debug {
        println!("debug: flag enabled");
        println!("debug: provider={:?} model={}", cfg.provider, cfg.model);
    }

    let client = provider::make_client(&cfg)?;
    let ed = editor::Editor::new(client, cfg, args.debug);
    if args.debug {
        println!("debug: session transaction {}", ed.transaction());
    }
    let mut sh = shell::Shell::new(ed, args.yes);

    if let Some(p) = &args.spec {
        let text = fs::read_to_string(p).with_context(|| format!("could not read specification {p}"))?;
        sh.editor_mut().session_mut().set_specification(text);
    }
    if let Some(p) = &args.example {
        let text = fs::read_to_string(p).with_context(|| format!("could not read example {p}"))?;
        sh.editor_mut().session_mut().set_example(text);
    }

    if let Some(topic) = &args.prompt {
        sh.editor_mut().session_mut().set_user_prompt(topic.clone());
        if sh.generate().await == Outcome::Skipped {
            println!("{}", "Nothing generated: a specification (--spec) and a non-empty --prompt are required.".yellow());
        }
        if args.analyze {
            sh.analyze().await;
        }
        ux::show_state(sh.editor().session());
    }

    if args.no_interactive {
        if sh.editor().session().has_content() {
            let written = sh.save(None)?;
            println!("saved {}", written.display());
        }
        if sh.editor().session().last_error().is_some() {
            std::process::exit(1);
        }
        return Ok(());
    }

    sh.run().await
}
