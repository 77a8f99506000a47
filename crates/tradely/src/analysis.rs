//! Analysis payload returned by the backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used when neither the caller nor the payload names a ticker
pub const DEFAULT_LABEL: &str = "stock";

/// Fields that may carry the narrative text, in lookup order
const NARRATIVE_KEYS: [&str; 3] = ["deepthinking_response", "narrativeText", "narrative"];

/// Full analysis object for one ticker.
///
/// The backend shape is open-ended, so the payload is kept as an
/// insertion-ordered JSON object. Exports serialize it whole; the reveal
/// engine only reads the narrative field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    fields: Map<String, Value>,
}

impl AnalysisResult {
    /// Wrap a backend payload. Bare strings become the narrative, anything
    /// else that is not an object yields an empty result.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            Value::String(text) => Self::from_text(None, text),
            _ => Self::default(),
        }
    }

    /// Build the `{label, narrativeText}` object used when only text exists
    pub fn from_text(label: Option<&str>, text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(
            "label".to_string(),
            Value::String(label.unwrap_or(DEFAULT_LABEL).to_string()),
        );
        fields.insert("narrativeText".to_string(), Value::String(text.into()));
        Self { fields }
    }

    /// The identifying `symbol` field, if present and non-empty
    pub fn symbol(&self) -> Option<&str> {
        self.non_empty_str("symbol")
    }

    /// Ticker label: `symbol`, then `label`, then [`DEFAULT_LABEL`]
    pub fn label(&self) -> &str {
        self.symbol()
            .or_else(|| self.non_empty_str("label"))
            .unwrap_or(DEFAULT_LABEL)
    }

    /// Narrative text exactly as received, if any narrative field holds
    /// more than whitespace
    pub fn narrative(&self) -> Option<&str> {
        NARRATIVE_KEYS.iter().find_map(|key| {
            self.fields
                .get(*key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
        })
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The whole object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether the payload carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_payload() {
        let result = AnalysisResult::from_value(json!({
            "symbol": "AAPL",
            "analysis": "",
            "llm_response": "short",
            "deepthinking_response": "Apple is a strong buy. Recommendation: Buy.",
        }));

        assert_eq!(result.symbol(), Some("AAPL"));
        assert_eq!(result.label(), "AAPL");
        assert_eq!(
            result.narrative(),
            Some("Apple is a strong buy. Recommendation: Buy.")
        );
    }

    #[test]
    fn test_from_text_defaults_label() {
        let result = AnalysisResult::from_text(None, "Hold.");
        assert_eq!(result.symbol(), None);
        assert_eq!(result.label(), "stock");
        assert_eq!(result.narrative(), Some("Hold."));

        let keys: Vec<&str> = result.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["label", "narrativeText"]);
    }

    #[test]
    fn test_malformed_narrative_is_absent() {
        let result = AnalysisResult::from_value(json!({
            "symbol": "MSFT",
            "deepthinking_response": 42,
        }));
        assert_eq!(result.narrative(), None);

        let result = AnalysisResult::from_value(json!({"narrativeText": "   "}));
        assert_eq!(result.narrative(), None);

        let result = AnalysisResult::from_value(json!([1, 2, 3]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_narrative_keeps_surrounding_whitespace() {
        let result = AnalysisResult::from_value(json!({
            "symbol": " AMD ",
            "narrativeText": "\n  Margins widen.\n",
        }));
        assert_eq!(result.narrative(), Some("\n  Margins widen.\n"));
        assert_eq!(result.symbol(), Some("AMD"));
    }
}
