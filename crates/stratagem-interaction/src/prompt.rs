//! Instruction prompt and structured output schema for perspective generation.

use serde_json::{Value, json};

/// Builds the fixed instruction prompt for `topic`.
pub fn build_prompt(topic: &str, count: usize) -> String {
    format!(
        "You are an expert consultant in business strategy and innovation. \
         For the following topic: \"{topic}\", generate exactly {count} unique strategic perspectives.\n\
         Make sure the perspectives are diverse and creative, and that they cover a wide range of \
         possibilities including marketing, operations, technology, finance and human resources.\n\
         Number them with perspective_id from 1 to {count}. Return only the JSON array, with no \
         introductory text."
    )
}

/// Gemini `responseSchema` describing the perspective array.
pub fn response_schema(count: usize) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "perspective_id": {
                    "type": "INTEGER",
                    "description": format!("Numeric id of the perspective, from 1 to {count}.")
                },
                "title": {
                    "type": "STRING",
                    "description": "A concise, creative title for the perspective."
                },
                "layer1_strategy": {
                    "type": "STRING",
                    "description": "A high-level strategic vision. The \"what\" and the \"why\"."
                },
                "layer2_tactics": {
                    "type": "STRING",
                    "description": "Specific tactics to implement the strategy. The \"how\"."
                },
                "layer3_actions": {
                    "type": "STRING",
                    "description": "Three concrete, actionable steps to execute the tactics. The to-do list."
                }
            },
            "required": [
                "perspective_id",
                "title",
                "layer1_strategy",
                "layer2_tactics",
                "layer3_actions"
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratagem_core::perspective::REQUIRED_FIELDS;

    #[test]
    fn prompt_embeds_topic_and_count() {
        let prompt = build_prompt("launch a coffee brand", 50);
        assert!(prompt.contains("\"launch a coffee brand\""));
        assert!(prompt.contains("exactly 50"));
        for area in ["marketing", "operations", "technology", "finance", "human resources"] {
            assert!(prompt.contains(area), "prompt should mention {area}");
        }
    }

    #[test]
    fn schema_requires_every_validated_field() {
        let schema = response_schema(50);
        let required: Vec<&str> = schema["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let wire: Vec<&str> = REQUIRED_FIELDS.iter().map(|(w, _)| *w).collect();
        assert_eq!(required, wire);
        assert_eq!(schema["items"]["properties"]["perspective_id"]["type"], "INTEGER");
    }
}
