//! Raw model output to validated perspectives.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use stratagem_core::error::{Result, StratagemError};
use stratagem_core::perspective::{BatchPolicy, Perspective, validate_batch};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("code fence pattern is valid")
});

/// Removes a surrounding Markdown code fence (```` ```json ... ``` ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|c| c.get(2)) {
        Some(body) if !body.as_str().trim().is_empty() => body.as_str().trim(),
        _ => trimmed,
    }
}

/// Parses the text payload returned by a generation endpoint.
///
/// # Errors
///
/// - `Parse`: not valid JSON after fence stripping
/// - `SchemaViolation`: valid JSON of the wrong shape
pub fn parse_perspectives(text: &str, policy: BatchPolicy) -> Result<Vec<Perspective>> {
    let payload: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| StratagemError::parse(format!("response is not valid JSON: {e}")))?;
    validate_batch(payload, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = r#"[{"perspective_id": 1, "title": "t", "layer1_strategy": "s", "layer2_tactics": "ta", "layer3_actions": "a"}]"#;

    #[test]
    fn strips_json_fence() {
        let fenced = format!("```json\n{ONE}\n```");
        assert_eq!(strip_code_fence(&fenced), ONE);
    }

    #[test]
    fn strips_bare_fence_and_surrounding_whitespace() {
        let fenced = format!("  \n```\n{ONE}\n```  \n");
        assert_eq!(strip_code_fence(&fenced), ONE);
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fence(&format!(" {ONE} ")), ONE);
    }

    #[test]
    fn parses_fenced_payload() {
        let fenced = format!("```json\n{ONE}\n```");
        let perspectives = parse_perspectives(&fenced, BatchPolicy::exact(1)).unwrap();
        assert_eq!(perspectives[0].tactics, "ta");
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_perspectives("Here are your ideas: 1. ...", BatchPolicy::default())
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn wrong_shape_is_schema_violation() {
        let err = parse_perspectives(r#"{"perspectives": []}"#, BatchPolicy::default()).unwrap_err();
        assert!(err.is_schema_violation());
    }
}
