use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::{CompletionRequest, TextCompletion};
use crate::outcome::Outcome;
use crate::{EXTRACTION_TEMPERATURE, InferenceResult};

/// Cap applied when action items are recovered line by line.
pub const MAX_FALLBACK_ITEMS: usize = 7;

const SYSTEM_PROMPT: &str = "You are an assistant that extracts concise, actionable action \
                             items from a meeting or note description. Return 3-7 bullet \
                             points. Each item should be a short imperative sentence.";

/// Turns a free-text description into short imperative action items.
#[derive(Clone)]
pub struct ActionItemExtractor {
    client: Arc<dyn TextCompletion>
}

impl ActionItemExtractor {
    pub fn new(client: Arc<dyn TextCompletion>) -> Self {
        Self { client }
    }

    /// Asks the model for action items. Provider failures propagate.
    pub async fn extract(&self, description: &str) -> InferenceResult<Outcome<Vec<String>>> {
        info!(desc_len = description.len(), "Generating action items");

        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Description:\n{description}\n\nExtract only the action items as a JSON array \
                 of strings."
            ),
            temperature: EXTRACTION_TEMPERATURE
        };

        let content = self.client.complete(&request).await.map_err(|e| {
            error!(error = %e, "Action item completion failed");
            e
        })?;

        let items = parse_action_items(&content);
        debug!(
            count = items.value().len(),
            outcome = items.label(),
            "Parsed action items"
        );
        Ok(items)
    }
}

/// Parses model output into action items.
///
/// A JSON array of strings is returned verbatim. Anything else is split into
/// lines, stripped of bullet markers and capped at [`MAX_FALLBACK_ITEMS`].
pub fn parse_action_items(content: &str) -> Outcome<Vec<String>> {
    let content = if content.trim().is_empty() { "[]" } else { content };

    if let Ok(items) = serde_json::from_str::<Vec<String>>(strip_code_fence(content)) {
        return Outcome::Parsed(items);
    }
    debug!("Model response was not a JSON array; falling back to line split");

    let items = content
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .take(MAX_FALLBACK_ITEMS)
        .map(str::to_string)
        .collect();
    Outcome::Degraded(items)
}

/// Removes one surrounding markdown code fence, including its language tag.
pub(crate) fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return content;
    };

    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim().contains(char::is_whitespace) => body,
        _ => inner
    }
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim().trim_start_matches(['-', '*', '•']).trim_start();
    strip_numbering(line).trim()
}

// "1. Do x" / "2) Do y"; "3.5 hours" is left alone.
fn strip_numbering(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(['.', ')']) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCompletion;
    use errors::InferenceError;

    #[test]
    fn test_json_array_is_returned_verbatim() {
        let items = parse_action_items(r#"["Draft roadmap", "Assign owners"]"#);
        assert_eq!(
            items,
            Outcome::Parsed(vec!["Draft roadmap".to_string(), "Assign owners".to_string()])
        );
    }

    #[test]
    fn test_json_array_is_not_truncated() {
        let content = serde_json::to_string(&(1..=9).map(|i| format!("Item {i}")).collect::<Vec<_>>())
            .unwrap();
        let items = parse_action_items(&content);
        assert!(!items.is_degraded());
        assert_eq!(items.value().len(), 9);
    }

    #[test]
    fn test_empty_array_is_empty_list() {
        assert_eq!(parse_action_items("[]"), Outcome::Parsed(Vec::new()));
    }

    #[test]
    fn test_empty_content_is_empty_list() {
        assert_eq!(parse_action_items(""), Outcome::Parsed(Vec::new()));
        assert_eq!(parse_action_items("  \n"), Outcome::Parsed(Vec::new()));
    }

    #[test]
    fn test_fenced_json_array() {
        let items = parse_action_items("```json\n[\"Ship it\"]\n```");
        assert_eq!(items, Outcome::Parsed(vec!["Ship it".to_string()]));
    }

    #[test]
    fn test_bullet_lines_fallback() {
        let content = "Here you go:\n- Send summary\n* Create tickets\n\n• Book room\n  -  Email Bob  ";
        let items = parse_action_items(content);
        assert_eq!(
            items,
            Outcome::Degraded(vec![
                "Here you go:".to_string(),
                "Send summary".to_string(),
                "Create tickets".to_string(),
                "Book room".to_string(),
                "Email Bob".to_string(),
            ])
        );
    }

    #[test]
    fn test_numbered_lines_fallback() {
        let items = parse_action_items("1. Draft plan\n2) Review plan\n3.5 hours of review");
        assert_eq!(
            items.into_inner(),
            vec!["Draft plan", "Review plan", "3.5 hours of review"]
        );
    }

    #[test]
    fn test_fallback_caps_at_seven_non_empty_items() {
        let content = (1..=12).map(|i| format!("- Step {i}\n\n")).collect::<String>();
        let items = parse_action_items(&content);
        assert!(items.is_degraded());
        let items = items.into_inner();
        assert_eq!(items.len(), MAX_FALLBACK_ITEMS);
        assert_eq!(items[0], "Step 1");
        assert!(items.iter().all(|item| !item.trim().is_empty()));
    }

    #[test]
    fn test_array_of_non_strings_falls_back_to_lines() {
        let items = parse_action_items("[1, 2, 3]");
        assert_eq!(items, Outcome::Degraded(vec!["[1, 2, 3]".to_string()]));
    }

    #[tokio::test]
    async fn test_extract_sends_description_at_low_temperature() {
        let mock = Arc::new(MockCompletion::new().respond(r#"["Plan sprint"]"#));
        let extractor = ActionItemExtractor::new(mock.clone());

        let items = extractor.extract("Plan next sprint").await.unwrap();
        assert_eq!(items.into_inner(), vec!["Plan sprint"]);

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user.contains("Plan next sprint"));
        assert!(calls[0].system.contains("3-7 bullet points"));
        assert!((calls[0].temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_extract_propagates_upstream_failure() {
        let mock = Arc::new(MockCompletion::new().fail(InferenceError::call_failed("down")));
        let extractor = ActionItemExtractor::new(mock);

        let err = extractor.extract("anything").await.unwrap_err();
        assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
    }
}
