//! Whole-batch validation of a generated perspective payload.
//!
//! Every element is checked. A single malformed element rejects the batch; nothing is
//! repaired or dropped.

use super::model::{DEFAULT_PERSPECTIVE_COUNT, Perspective};
use crate::error::{Result, StratagemError};
use serde_json::Value;
use std::collections::HashSet;

/// Required fields as `(wire name, accepted alias)`.
pub const REQUIRED_FIELDS: [(&str, &str); 5] = [
    ("perspective_id", "id"),
    ("title", "title"),
    ("layer1_strategy", "strategy"),
    ("layer2_tactics", "tactics"),
    ("layer3_actions", "actions"),
];

/// Acceptance rules for a generated batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Exact batch length required. Ids must also fall in `1..=expected_count`.
    /// `None` accepts any length, including an empty batch.
    pub expected_count: Option<usize>,
}

impl BatchPolicy {
    pub fn exact(count: usize) -> Self {
        Self {
            expected_count: Some(count),
        }
    }

    pub fn any_length() -> Self {
        Self {
            expected_count: None,
        }
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self::exact(DEFAULT_PERSPECTIVE_COUNT)
    }
}

/// Validates a parsed payload and converts it into perspectives.
pub fn validate_batch(payload: Value, policy: BatchPolicy) -> Result<Vec<Perspective>> {
    let items = match &payload {
        Value::Array(items) => items,
        other => {
            return Err(StratagemError::schema_violation(format!(
                "expected a JSON array of perspectives, got {}",
                json_kind(other)
            )));
        }
    };

    if let Some(expected) = policy.expected_count
        && items.len() != expected
    {
        return Err(StratagemError::schema_violation(format!(
            "expected {expected} perspectives, got {}",
            items.len()
        )));
    }

    let mut seen_ids = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = check_item(index, item)?;

        if id == 0 || policy.expected_count.is_some_and(|max| id > max as u64) {
            return Err(StratagemError::schema_violation(format!(
                "perspective {index}: id {id} is out of range"
            )));
        }
        if !seen_ids.insert(id) {
            return Err(StratagemError::schema_violation(format!(
                "perspective {index}: duplicate id {id}"
            )));
        }
    }

    serde_json::from_value(payload).map_err(|e| StratagemError::schema_violation(e.to_string()))
}

/// Checks one element and returns its id.
fn check_item(index: usize, item: &Value) -> Result<u64> {
    let object = item.as_object().ok_or_else(|| {
        StratagemError::schema_violation(format!(
            "perspective {index}: expected an object, got {}",
            json_kind(item)
        ))
    })?;

    let field = |wire: &str, alias: &str| object.get(wire).or_else(|| object.get(alias));

    let mut id = None;
    for (wire, alias) in REQUIRED_FIELDS {
        let value = field(wire, alias).ok_or_else(|| {
            StratagemError::schema_violation(format!(
                "perspective {index}: missing required field '{wire}'"
            ))
        })?;

        if wire == "perspective_id" {
            id = Some(value.as_u64().ok_or_else(|| {
                StratagemError::schema_violation(format!(
                    "perspective {index}: '{wire}' must be a positive integer"
                ))
            })?);
        } else if !value.is_string() {
            return Err(StratagemError::schema_violation(format!(
                "perspective {index}: '{wire}' must be a string"
            )));
        }
    }

    id.ok_or_else(|| StratagemError::internal("perspective id check skipped"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: u64) -> Value {
        json!({
            "perspective_id": id,
            "title": format!("Idea {id}"),
            "layer1_strategy": "strategy",
            "layer2_tactics": "tactics",
            "layer3_actions": "actions",
        })
    }

    fn batch(count: u64) -> Value {
        Value::Array((1..=count).map(item).collect())
    }

    #[test]
    fn accepts_full_batch() {
        let perspectives = validate_batch(batch(50), BatchPolicy::default()).unwrap();
        assert_eq!(perspectives.len(), 50);
        assert_eq!(perspectives[0].id, 1);
        assert_eq!(perspectives[49].title, "Idea 50");
    }

    #[test]
    fn rejects_non_array() {
        let err = validate_batch(json!({"error": "nope"}), BatchPolicy::default()).unwrap_err();
        assert!(err.is_schema_violation());
        assert!(err.to_string().contains("got object"));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = validate_batch(batch(49), BatchPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("expected 50 perspectives, got 49"));
    }

    #[test]
    fn rejects_batch_when_a_later_element_is_malformed() {
        let mut value = batch(50);
        value[37]
            .as_object_mut()
            .unwrap()
            .remove("layer2_tactics");

        let err = validate_batch(value, BatchPolicy::default()).unwrap_err();
        assert!(err.is_schema_violation());
        assert!(err.to_string().contains("perspective 37"));
        assert!(err.to_string().contains("layer2_tactics"));
    }

    #[test]
    fn rejects_wrong_field_type() {
        let mut value = batch(3);
        value[1]["title"] = json!(42);
        let err = validate_batch(value, BatchPolicy::exact(3)).unwrap_err();
        assert!(err.to_string().contains("'title' must be a string"));

        let mut value = batch(3);
        value[2]["perspective_id"] = json!("3");
        let err = validate_batch(value, BatchPolicy::exact(3)).unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_ids() {
        let value = Value::Array(vec![item(1), item(1), item(3)]);
        let err = validate_batch(value, BatchPolicy::exact(3)).unwrap_err();
        assert!(err.to_string().contains("duplicate id 1"));

        let value = Value::Array(vec![item(1), item(2), item(4)]);
        let err = validate_batch(value, BatchPolicy::exact(3)).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let value = Value::Array(vec![item(0)]);
        let err = validate_batch(value, BatchPolicy::any_length()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn any_length_policy_accepts_empty_batch() {
        let perspectives = validate_batch(json!([]), BatchPolicy::any_length()).unwrap();
        assert!(perspectives.is_empty());

        let err = validate_batch(json!([]), BatchPolicy::default()).unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn accepts_short_field_aliases() {
        let value = json!([{
            "id": 1,
            "title": "t",
            "strategy": "s",
            "tactics": "t",
            "actions": "a",
        }]);
        let perspectives = validate_batch(value, BatchPolicy::exact(1)).unwrap();
        assert_eq!(perspectives[0].strategy, "s");
    }
}
