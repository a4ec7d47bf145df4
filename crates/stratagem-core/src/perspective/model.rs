use serde::{Deserialize, Serialize};

/// Number of perspectives requested per generation.
pub const DEFAULT_PERSPECTIVE_COUNT: usize = 50;

/// One structured strategic suggestion.
///
/// Serialized with the field names used on the wire and in stored reports
/// (`perspective_id`, `layer1_strategy`, ...). The short names are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    /// Unique within one batch, in `1..=count`. Used as list key.
    #[serde(rename = "perspective_id", alias = "id")]
    pub id: u32,
    pub title: String,
    /// High-level rationale: the "what" and "why".
    #[serde(rename = "layer1_strategy", alias = "strategy")]
    pub strategy: String,
    /// How the strategy is implemented.
    #[serde(rename = "layer2_tactics", alias = "tactics")]
    pub tactics: String,
    /// Concrete action steps.
    #[serde(rename = "layer3_actions", alias = "actions")]
    pub actions: String,
}

impl Perspective {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        strategy: impl Into<String>,
        tactics: impl Into<String>,
        actions: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            strategy: strategy.into(),
            tactics: tactics.into(),
            actions: actions.into(),
        }
    }
}
