use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spec_scribe::config::Config;
use spec_scribe::editor::Editor;
use spec_scribe::errors::EditorError;
use spec_scribe::provider::gemini::GeminiClient;
use spec_scribe::provider::CompletionClient;
use spec_scribe::session::{Mode, Outcome, Status, PLACEHOLDER_CONTENT};
use spec_scribe::wire::CompletionRequest;

/// Replays canned results and remembers what it was asked.
#[derive(Clone, Default)]
struct Scripted {
    replies: Arc<Mutex<VecDeque<Result<String, EditorError>>>>,
    seen: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Scripted {
    fn with(replies: Vec<Result<String, EditorError>>) -> Self {
        Self { replies: Arc::new(Mutex::new(replies.into())), seen: Arc::default() }
    }

    fn calls(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for Scripted {
    async fn complete(&self, req: &CompletionRequest, _debug: bool) -> Result<String, EditorError> {
        self.seen.lock().unwrap().push(req.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EditorError::service("no scripted reply")))
    }
}

fn editor(client: Scripted) -> Editor<Scripted> {
    let cfg = Config { progress: false, ..Config::default() };
    Editor::new(client, cfg, false)
}

#[tokio::test]
async fn empty_specification_issues_no_request() {
    let client = Scripted::with(vec![]);
    let mut ed = editor(client.clone());
    ed.session_mut().set_user_prompt("Q1 report");

    assert_eq!(ed.generate().await, Outcome::Skipped);
    assert_eq!(ed.session().status(), Status::Idle);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn first_generation_moves_to_refine() {
    let client = Scripted::with(vec![Ok("```html\n<h1>Q1 report</h1>\n```".into())]);
    let mut ed = editor(client.clone());
    ed.session_mut().set_specification("Use formal tone");
    ed.session_mut().set_user_prompt("Q1 report");

    assert_eq!(ed.generate().await, Outcome::Applied);
    let s = ed.session();
    assert_eq!(s.mode(), Mode::Refine);
    assert_eq!(s.status(), Status::Success);
    assert!(s.user_prompt.is_empty());
    assert_eq!(s.document(), "<h1>Q1 report</h1>");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("Use formal tone"));
    assert!(calls[0].prompt.contains("Q1 report"));
    assert!(calls[0].system_instruction.is_some());
    assert_eq!(calls[0].temperature, 0.2);
}

#[tokio::test]
async fn refine_then_analyze_then_reset() {
    let client = Scripted::with(vec![
        Ok("<h1>Draft</h1>".into()),
        Ok("<h1>Draft</h1><p>Summary</p>".into()),
        Ok("```\n- Add a citation to the summary\n```".into()),
    ]);
    let mut ed = editor(client.clone());
    ed.session_mut().set_specification("Sections need citations");
    ed.session_mut().set_user_prompt("Status update");
    ed.generate().await;

    ed.session_mut().set_user_prompt("Add a summary");
    assert_eq!(ed.generate().await, Outcome::Applied);
    assert_eq!(ed.session().document(), "<h1>Draft</h1><p>Summary</p>");

    assert_eq!(ed.analyze().await, Outcome::Applied);
    // analysis text is passed through untouched
    assert_eq!(ed.session().suggestions(), Some("```\n- Add a citation to the summary\n```"));
    assert_eq!(ed.session().document(), "<h1>Draft</h1><p>Summary</p>");

    let calls = client.calls();
    assert!(calls[1].prompt.contains("<h1>Draft</h1>"));
    assert!(calls[1].prompt.contains("Add a summary"));
    assert!(calls[2].system_instruction.is_none());
    assert_eq!(calls[2].temperature, 0.1);

    assert!(ed.session_mut().reset(true));
    let s = ed.session();
    assert_eq!(s.document(), PLACEHOLDER_CONTENT);
    assert_eq!(s.mode(), Mode::Draft);
    assert!(s.suggestions().is_none());
    assert!(s.last_error().is_none());
}

#[tokio::test]
async fn analyze_in_draft_mode_is_a_no_op() {
    let client = Scripted::with(vec![]);
    let mut ed = editor(client.clone());
    ed.session_mut().set_specification("spec");

    assert_eq!(ed.analyze().await, Outcome::Skipped);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn service_failure_keeps_document() {
    let client = Scripted::with(vec![
        Ok("<p>v1</p>".into()),
        Err(EditorError::service("connection reset")),
    ]);
    let mut ed = editor(client);
    ed.session_mut().set_specification("spec");
    ed.session_mut().set_user_prompt("topic");
    ed.generate().await;

    ed.session_mut().set_user_prompt("rewrite it");
    let out = ed.generate().await;
    assert!(matches!(out, Outcome::Failed(_)));
    let s = ed.session();
    assert_eq!(s.status(), Status::Error);
    assert!(!s.last_error().unwrap().is_empty());
    assert_eq!(s.document(), "<p>v1</p>");
    assert_eq!(s.mode(), Mode::Refine);
}

#[tokio::test]
async fn empty_analysis_gets_fallback_text() {
    let client = Scripted::with(vec![Ok("<p>v1</p>".into()), Ok("   ".into())]);
    let mut ed = editor(client);
    ed.session_mut().set_specification("spec");
    ed.session_mut().set_user_prompt("topic");
    ed.generate().await;
    ed.analyze().await;
    assert_eq!(ed.session().suggestions(), Some("No suggestions available."));
}

#[tokio::test]
async fn missing_credential_surfaces_in_session() {
    let client = GeminiClient::new(None, Some("http://127.0.0.1:9".into()), None).unwrap();
    let mut ed = Editor::new(client, Config::default(), false);
    ed.session_mut().set_specification("spec");
    ed.session_mut().set_user_prompt("topic");

    ed.generate().await;
    assert_eq!(ed.session().status(), Status::Error);
    assert!(ed.session().last_error().unwrap().contains("API key missing"));
    assert_eq!(ed.session().document(), PLACEHOLDER_CONTENT);
}

#[tokio::test]
async fn gemini_round_trip_with_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "```html\n<h2>Plan</h2>\n```" }] } }]
        })))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let cfg = Config {
        artifacts_root: root.path().to_string_lossy().to_string(),
        save_request: true,
        save_response: true,
        progress: false,
        ..Config::default()
    };
    let client = GeminiClient::new(Some("key".into()), Some(server.uri()), None).unwrap();
    let mut ed = Editor::new(client, cfg, false);
    ed.session_mut().set_specification("Plans need a heading");
    ed.session_mut().set_user_prompt("Project plan");

    assert_eq!(ed.generate().await, Outcome::Applied);
    assert_eq!(ed.session().document(), "<h2>Plan</h2>");

    let dir = spec_scribe::log::tx_dir(root.path(), ed.transaction());
    assert!(dir.join("draft-1.request.json").exists());
    let response = std::fs::read_to_string(dir.join("draft-1.response.json")).unwrap();
    assert!(response.contains("<h2>Plan</h2>"));
}

#[tokio::test]
async fn shell_commands_drive_the_session() {
    use spec_scribe::shell::{parse, Shell};

    let client = Scripted::with(vec![Ok("<h1>Memo</h1>".into())]);
    let mut sh = Shell::new(editor(client), true);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("memo.html");

    assert!(sh.handle(parse("/spec-text Memos start with a heading")).await.unwrap());
    assert!(sh.handle(parse("Team memo")).await.unwrap());
    assert_eq!(sh.editor().session().document(), "<h1>Memo</h1>");

    let save = format!("/save {}", target.display());
    assert!(sh.handle(parse(&save)).await.unwrap());
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "<h1>Memo</h1>");

    assert!(sh.handle(parse("/reset")).await.unwrap());
    assert_eq!(sh.editor().session().mode(), Mode::Draft);
    assert_eq!(sh.editor().session().specification_text, "Memos start with a heading");

    assert!(!sh.handle(parse("/quit")).await.unwrap());
}
