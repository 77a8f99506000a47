//! Splitting analysis text into revealable units

use serde::{Deserialize, Serialize};

/// Sentence boundary inside a line; the period stays with its sentence
const SENTENCE_DELIMITER: &str = ". ";

/// Keyword that marks a unit for distinguished rendering
const HIGHLIGHT_KEYWORD: &str = "recommendation";

/// One disclosed piece of the analysis narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedUnit {
    pub text: String,
    pub highlighted: bool,
}

impl RevealedUnit {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let highlighted = is_highlighted(&text);
        Self { text, highlighted }
    }
}

/// Whether a unit gets distinguished rendering. Depends on content only.
pub fn is_highlighted(unit: &str) -> bool {
    unit.to_lowercase().contains(HIGHLIGHT_KEYWORD)
}

/// Split narrative text into ordered units.
///
/// Every non-blank line is cut at `". "` boundaries. Lines without a
/// sentence boundary stay whole, which is what structured (bulleted or
/// tabular) analyses need.
pub fn split_units(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    for line in text.lines() {
        let mut rest = line;
        while let Some(pos) = rest.find(SENTENCE_DELIMITER) {
            let (sentence, tail) = rest.split_at(pos + 1);
            push_unit(&mut units, sentence);
            rest = &tail[1..];
        }
        push_unit(&mut units, rest);
    }
    units
}

fn push_unit(units: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        units.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keep_period() {
        let units = split_units("Buy now. Hold steady. Sell later.");
        assert_eq!(units, ["Buy now.", "Hold steady.", "Sell later."]);
    }

    #[test]
    fn test_split_falls_back_to_lines() {
        let text = "Summary\n- Revenue up 12%\n\n- Margin stable\r\nRecommendation: Buy";
        let units = split_units(text);
        assert_eq!(
            units,
            ["Summary", "- Revenue up 12%", "- Margin stable", "Recommendation: Buy"]
        );
    }

    #[test]
    fn test_split_mixed_lines_and_sentences() {
        let units = split_units("Outlook. Strong demand.\nRisks. Supply chain");
        assert_eq!(units, ["Outlook.", "Strong demand.", "Risks.", "Supply chain"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_units("").is_empty());
        assert!(split_units("  \n\n ").is_empty());
    }

    #[test]
    fn test_split_ignores_decimal_points() {
        let units = split_units("EPS rose to 5.25 this quarter. P/E is 30.5");
        assert_eq!(units, ["EPS rose to 5.25 this quarter.", "P/E is 30.5"]);
    }

    #[test]
    fn test_highlight_is_case_insensitive() {
        assert!(is_highlighted("Recommendation: Buy"));
        assert!(is_highlighted("our RECOMMENDATION stands"));
        assert!(!is_highlighted("Hold steady."));
        assert!(RevealedUnit::new("Final recommendation: hold").highlighted);
        assert!(!RevealedUnit::new("Buy now.").highlighted);
    }
}
