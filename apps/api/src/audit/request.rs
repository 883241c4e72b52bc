//! Request Builder — turns (filenames, document text) into one schema-constrained
//! generation request.
//!
//! Pure: no I/O, no errors. Empty inputs produce a degenerate but valid prompt.

use serde_json::Value;

use crate::audit::prompts::{
    AUDIT_PROMPT_TEMPLATE, DOCUMENT_TEXT_PLACEHOLDER, FILENAMES_PLACEHOLDER,
};
use crate::audit::schema::RESPONSE_SCHEMA;

/// Maximum number of document characters forwarded to the model.
/// Anything past this is dropped; the head of the bundle wins.
pub const MAX_DOCUMENT_CHARS: usize = 150_000;

/// One generation request: the filled prompt plus the constant response schema.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub schema: &'static Value,
}

/// Builds the audit request for a document bundle.
pub fn build(filenames: &str, text: &str) -> GenerationRequest {
    let document_text = truncate_chars(text, MAX_DOCUMENT_CHARS);
    GenerationRequest {
        prompt: render_prompt(filenames, document_text),
        schema: &RESPONSE_SCHEMA,
    }
}

/// Returns the first `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Fills the template in one left-to-right pass so placeholders inside the
/// substituted values are never expanded.
fn render_prompt(filenames: &str, document_text: &str) -> String {
    let mut prompt = String::with_capacity(
        AUDIT_PROMPT_TEMPLATE.len() + filenames.len() + document_text.len(),
    );
    let mut rest = AUDIT_PROMPT_TEMPLATE;

    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(FILENAMES_PLACEHOLDER) {
            prompt.push_str(filenames);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(DOCUMENT_TEXT_PLACEHOLDER) {
            prompt.push_str(document_text);
            rest = after;
        } else {
            prompt.push('{');
            rest = &tail[1..];
        }
    }
    prompt.push_str(rest);
    prompt
}
