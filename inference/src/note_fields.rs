use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::client::{CompletionRequest, TextCompletion};
use crate::extractor::{ActionItemExtractor, strip_code_fence};
use crate::outcome::Outcome;
use crate::{EXTRACTION_TEMPERATURE, InferenceResult};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_STATUS: &str = "open";
/// No inferred draft carries more action items than this.
pub const MAX_ACTION_ITEMS: usize = 7;
const FALLBACK_TITLE_CHARS: usize = 60;

const SYSTEM_PROMPT: &str = "You extract structured note fields from a free-form description. \
                             Return strictly valid JSON with keys: title (short phrase), status \
                             (one of: open, in_progress, done), date (ISO8601), action_items \
                             (array of 3-7 short strings).";

/// Note fields inferred from a description.
///
/// `date` is passed through as text and may be empty; turning it into a
/// timestamp is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub status: String,
    pub date: String,
    pub action_items: Vec<String>
}

/// Infers a whole note from a description.
pub struct NoteFieldInferrer {
    client: Arc<dyn TextCompletion>,
    extractor: ActionItemExtractor
}

impl NoteFieldInferrer {
    pub fn new(client: Arc<dyn TextCompletion>) -> Self {
        let extractor = ActionItemExtractor::new(client.clone());
        Self { client, extractor }
    }

    /// Asks the model for a full draft.
    ///
    /// When the reply is not a JSON object the draft is rebuilt from the
    /// description and a second call to the action-item extractor. Provider
    /// failures from either call propagate.
    pub async fn infer(&self, description: &str) -> InferenceResult<Outcome<NoteDraft>> {
        info!(desc_len = description.len(), "Generating full note fields");

        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("Description:\n{description}\n\nReturn only JSON, no markdown wrapper."),
            temperature: EXTRACTION_TEMPERATURE
        };

        let content = self.client.complete(&request).await.map_err(|e| {
            error!(error = %e, "Note field completion failed");
            e
        })?;

        if let Some(draft) = parse_note_draft(&content) {
            return Ok(Outcome::Parsed(draft));
        }

        debug!("Model response not strict JSON; falling back to minimal fields");
        let mut action_items = self.extractor.extract(description).await?.into_inner();
        action_items.truncate(MAX_ACTION_ITEMS);
        Ok(Outcome::Degraded(NoteDraft {
            title: fallback_title(description),
            status: DEFAULT_STATUS.to_string(),
            date: String::new(),
            action_items
        }))
    }
}

/// Coerces a model reply into a draft. `None` when the reply is not a JSON
/// object.
pub fn parse_note_draft(content: &str) -> Option<NoteDraft> {
    let content = if content.trim().is_empty() { "{}" } else { content };
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(strip_code_fence(content)) else {
        return None;
    };

    let text = |key: &str| fields.get(key).and_then(coerce_text);

    let action_items = match fields.get("action_items") {
        Some(Value::Array(items)) => items.iter().take(MAX_ACTION_ITEMS).map(stringify).collect(),
        _ => Vec::new()
    };

    Some(NoteDraft {
        title: text("title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        status: text("status").unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        date: text("date").unwrap_or_default(),
        action_items
    })
}

/// First sentence (or line) of the description, at most 60 characters.
pub fn fallback_title(description: &str) -> String {
    let title: String = first_sentence(description.trim())
        .chars()
        .take(FALLBACK_TITLE_CHARS)
        .collect();
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let at_boundary = match ch {
            '\n' => true,
            '.' | '!' | '?' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            _ => false
        };
        if at_boundary {
            return &text[..idx];
        }
    }
    text
}

// Empty and zero-like values count as absent.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(stringify(other))
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string()
    }
}
