//! Prompt construction for the three editor tasks.
//!
//! Builders never validate their inputs; callers trim-check before calling.

const SYSTEM_INSTRUCTION: &str = r#"You are an expert technical writer and editor. Your goal is to produce or modify HTML content for a WYSIWYG editor.
You must strictly adhere to a provided "Specification Text".

CITATION RULE (MANDATORY):
- You must prove compliance with the Specification.
- Append a reference note to every major section header or key specific data field.
- Format: <small class="spec-ref">[Ref: "Section Name"]</small>
- DO NOT INVENT PAGE NUMBERS. Only cite the Section Name or Paragraph Topic found in the "Specification Text".
- If the spec text doesn't have headers, cite the key phrase, e.g., [Ref: "Formatting Rules"].

HTML OUTPUT RULES:
- Output raw HTML only. No markdown fences.
- Use <table> for data.
- Use <figure class="image"> for placeholders."#;

const CITATION_POLICY: &str = r#"**Citation Policy:**
- Every major section and every key data field must carry an inline citation: <small class="spec-ref">[Ref: "Section Name"]</small>
- The cited name must be a section title or paragraph topic that appears in the "Specification".
- Never cite page numbers."#;

/// Heading of the optional style-template block.
pub const EXAMPLE_HEADING: &str = "**Reference Example";
/// Heading of the specification block.
pub const SPECIFICATION_HEADING: &str = "**Specification (Source of Truth):**";

/// System instruction sent with draft and refine requests.
pub fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION
}

pub fn citation_policy() -> &'static str {
    CITATION_POLICY
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|x| !x.trim().is_empty())
}

fn push_example(prompt: &mut String, example: &str, guidance: &str) {
    prompt.push_str(&format!(
        "\n{EXAMPLE_HEADING}:**\n{guidance}\n---\n{example}\n---\n"
    ));
}

fn push_specification(prompt: &mut String, specification: &str) {
    prompt.push_str(&format!("\n{SPECIFICATION_HEADING}\n{specification}\n"));
}

/// New document from a topic.
pub fn draft_prompt(specification: &str, topic: &str, example: Option<&str>) -> String {
    let mut prompt = String::from(
        "**TASK**: Generate a new HTML document based on the \"Topic\" following the \"Specification\" guidelines.\n",
    );

    if let Some(ex) = non_blank(example) {
        push_example(
            &mut prompt,
            ex,
            "Use the following text as a concrete example of the desired tone, structure, and formatting.\n\
             Mimic the style of this example, but replace the content with the new \"Topic\" information.",
        );
    }

    push_specification(&mut prompt, specification);
    prompt.push_str(&format!("\n**Topic / User Request:**\n{topic}\n"));
    prompt.push('\n');
    prompt.push_str(CITATION_POLICY);
    prompt
}

/// Full rewrite of `current_content` according to `instruction`.
pub fn refine_prompt(
    specification: &str,
    current_content: &str,
    instruction: &str,
    example: Option<&str>,
) -> String {
    let mut prompt = String::from(
        "**TASK**: Update the \"Current Content\" based on the \"User Instruction\".\n\
         Ensure the updated content STILL complies with the \"Specification\".\n",
    );

    if let Some(ex) = non_blank(example) {
        push_example(
            &mut prompt,
            ex,
            "If the user instruction asks to match the style, refer to this text:",
        );
    }

    push_specification(&mut prompt, specification);
    prompt.push_str(&format!(
        "\n**Current HTML Content (Context):**\n{current_content}\n\
         \n**User Instruction (What to change):**\n{instruction}\n\
         \n**Constraint:**\n\
         - Return the FULLY updated HTML document. Do not return just the changed part.\n\
         - Maintain existing citations if valid, or add new ones if adding new sections.\n"
    ));
    prompt.push('\n');
    prompt.push_str(CITATION_POLICY);
    prompt
}

/// Compliance audit. The answer is plain text, never HTML.
pub fn analysis_prompt(specification: &str, current_content: &str) -> String {
    let mut prompt = String::from(
        "**TASK**: Analyze the \"Current Content\" against the \"Specification\".\n\
         Identify areas where the content might not fully comply with the specification or could be improved.\n",
    );
    push_specification(&mut prompt, specification);
    prompt.push_str(&format!(
        "\n**Current HTML Content:**\n{current_content}\n\
         \n**Output Requirements:**\n\
         1. **Language Detection**: Identify the primary language of the \"Current HTML Content\".\n\
         2. **Response Language**: You MUST generate the suggestions in the SAME language as the \"Current HTML Content\".\n\
         3. **Format**: Provide a concise list (bullet points) of 3-5 specific suggestions.\n\
         4. **Content**: Focus on formatting, missing sections, tone, or specific data requirements from the spec.\n\
         5. **No Code**: Do NOT generate HTML code. Just return plain text advice.\n\
         6. **Success Message**: If the content looks good, return a message confirming compliance in the detected language.\n\
         7. **Citations**: Check that the content follows the policy below and flag sections or data fields without a valid marker.\n"
    ));
    prompt.push('\n');
    prompt.push_str(CITATION_POLICY);
    prompt
}
