use regex::Regex;
use std::sync::OnceLock;

fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\A\s*```(?:html)?[ \t]*(?:\r?\n\s*|\z)").expect("static regex"))
}

fn closing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```\s*\z").expect("static regex"))
}

/// Strip markdown code fences wrapped around generated HTML.
///
/// Only a fence at the very start and one at the very end are considered;
/// fences inside the document are left alone, and so is an opening fence
/// tagged with a language other than HTML. Stripping repeats until the
/// text stops changing so the result is always a fixed point.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let stripped = strip_once(&text);
        if stripped == text {
            return text;
        }
        text = stripped;
    }
}

fn strip_once(text: &str) -> String {
    let head = opening_fence().replace(text, "");
    closing_fence().replace(&head, "").into_owned()
}
