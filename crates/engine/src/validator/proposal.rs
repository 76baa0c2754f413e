//! Proposal parsing.
//!
//! Oracle answers are tried against a structured JSON strategy first and a
//! line-oriented strategy second. Both drop invalid entries one by one and
//! never fail; an answer with nothing usable yields an empty list.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Upper bound on candidates accepted from one proposal answer.
pub const MAX_PROPOSALS: usize = 5;

/// Minimum length of a line considered by the arithmetic line strategy.
const MIN_LINE_LEN: usize = 5;

/// A schema entry of the `steps` array.
pub trait ProposalStep: DeserializeOwned {
    /// Whether a deserialized entry is acceptable.
    fn is_valid(&self) -> bool;
}

/// One arithmetic move: `expression` evaluates to `result`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArithmeticStep {
    pub expression: String,
    pub result: f64,
}

impl ProposalStep for ArithmeticStep {
    fn is_valid(&self) -> bool {
        !self.expression.trim().is_empty() && self.result.is_finite()
    }
}

/// One proposed paragraph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParagraphStep {
    pub content: String,
}

impl ProposalStep for ParagraphStep {
    fn is_valid(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Structured strategy: the outermost `{ ... }` span parsed as
/// `{"steps": [...]}`, each entry validated on its own.
pub fn parse_structured<T: ProposalStep>(text: &str) -> Vec<T> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) else {
        return Vec::new();
    };
    let Some(entries) = value.get("steps").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<T>(entry.clone()).ok())
        .filter(ProposalStep::is_valid)
        .take(MAX_PROPOSALS)
        .collect()
}

/// Line strategy for arithmetic: `<expression> = <value>` lines.
pub fn parse_arithmetic_lines(text: &str) -> Vec<ArithmeticStep> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.contains('=') && line.chars().count() > MIN_LINE_LEN)
        .take(MAX_PROPOSALS)
        .filter_map(|line| {
            let (expression, value) = line.split_once('=')?;
            let step = ArithmeticStep {
                expression: expression.trim().to_string(),
                result: value.trim().parse::<f64>().ok()?,
            };
            step.is_valid().then_some(step)
        })
        .collect()
}

fn paragraph_prefix() -> Option<&'static Regex> {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    PREFIX
        .get_or_init(|| Regex::new(r"(?i)^paragraph\s+\d+\s*:\s*").ok())
        .as_ref()
}

/// Line strategy for prose: blank-line separated blocks.
pub fn parse_paragraph_blocks(text: &str) -> Vec<ParagraphStep> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if blocks.last().is_some_and(|block| !block.is_empty()) {
                blocks.push(Vec::new());
            }
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
        .into_iter()
        .map(|block| block.join("\n"))
        .filter(|block| !block.starts_with('{') && !block.starts_with('['))
        .map(|block| match paragraph_prefix() {
            Some(prefix) => prefix.replace(&block, "").trim().to_string(),
            None => block,
        })
        .map(|content| ParagraphStep { content })
        .filter(ProposalStep::is_valid)
        .take(MAX_PROPOSALS)
        .collect()
}

pub fn parse_arithmetic_steps(text: &str) -> Vec<ArithmeticStep> {
    let steps = parse_structured(text);
    if !steps.is_empty() {
        return steps;
    }
    parse_arithmetic_lines(text)
}

pub fn parse_paragraph_steps(text: &str) -> Vec<ParagraphStep> {
    let steps = parse_structured(text);
    if !steps.is_empty() {
        return steps;
    }
    parse_paragraph_blocks(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_arithmetic() {
        let text = r#"Here you go:
{"steps":[{"expression":"13 - 9","result":4},{"expression":"10 - 4","result":6}]}"#;
        let steps = parse_arithmetic_steps(text);
        assert_eq!(
            steps,
            vec![
                ArithmeticStep {
                    expression: "13 - 9".into(),
                    result: 4.0
                },
                ArithmeticStep {
                    expression: "10 - 4".into(),
                    result: 6.0
                },
            ]
        );
    }

    #[test]
    fn test_structured_drops_invalid_entries_individually() {
        let text = r#"{"steps":[
            {"expression":"","result":4},
            {"expression":"4 * 6","result":"24"},
            {"result":3},
            {"expression":"4 + 6","result":10}
        ]}"#;
        let steps: Vec<ArithmeticStep> = parse_structured(text);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].expression, "4 + 6");
    }

    #[test]
    fn test_structured_truncates_to_five() {
        let entries: Vec<String> = (1..=8)
            .map(|i| format!(r#"{{"expression":"{i} + 1","result":{}}}"#, i + 1))
            .collect();
        let text = format!(r#"{{"steps":[{}]}}"#, entries.join(","));
        let steps = parse_arithmetic_steps(&text);
        assert_eq!(steps.len(), MAX_PROPOSALS);
        assert_eq!(steps[4].expression, "5 + 1");
    }

    #[test]
    fn test_line_fallback() {
        let text = "Options:\n4 + 6 = 10\n13 - 9 = 4\nx = y\n10 * 13 = oops\n9 / 3 = 3";
        let steps = parse_arithmetic_steps(text);
        assert_eq!(
            steps.iter().map(|s| s.result).collect::<Vec<_>>(),
            vec![10.0, 4.0, 3.0]
        );
        assert_eq!(steps[1].expression, "13 - 9");
    }

    #[test]
    fn test_line_fallback_considers_only_first_five_lines() {
        let text = (1..=7)
            .map(|i| format!("{i} + 0 = {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_arithmetic_lines(&text).len(), 5);
    }

    #[test]
    fn test_malformed_is_empty_not_error() {
        assert!(parse_arithmetic_steps("").is_empty());
        assert!(parse_arithmetic_steps("I cannot help with that.").is_empty());
        assert!(parse_arithmetic_steps("{\"steps\": not json").is_empty());
        assert!(parse_paragraph_steps("   ").is_empty());
    }

    #[test]
    fn test_structured_paragraphs() {
        let text = r#"{"steps":[{"content":"The ship drifted."},{"content":"  "},{"content":"Dawn broke."}]}"#;
        let steps = parse_paragraph_steps(text);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].content, "Dawn broke.");
    }

    #[test]
    fn test_paragraph_block_fallback() {
        let text = "Paragraph 1: The ship drifted.\nIt was quiet.\n\n\nparagraph 2:Dawn broke.\n\n[not json]";
        let steps = parse_paragraph_steps(text);
        assert_eq!(
            steps,
            vec![
                ParagraphStep {
                    content: "The ship drifted.\nIt was quiet.".into()
                },
                ParagraphStep {
                    content: "Dawn broke.".into()
                },
            ]
        );
    }
}
