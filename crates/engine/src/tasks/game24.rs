//! Arithmetic "reach 24" task.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use oracle::{AskParams, Oracle};
use regex::Regex;
use tot_core::{SearchState, Verdict};
use tracing::debug;

use crate::adapter::{Candidate, TaskAdapter};
use crate::error::Result;
use crate::prompts;
use crate::validator::{parse_arithmetic_steps, parse_verdict};

pub const TARGET: f64 = 24.0;
const EPSILON: f64 = 1e-6;

const PROPOSE_PARAMS: AskParams = AskParams::new(0.9, 180);
const EVALUATE_PARAMS: AskParams = AskParams::new(0.2, 20);

/// Render a number the way it appears in prompts and labels.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn literal_pattern() -> Option<&'static Regex> {
    static LITERAL: OnceLock<Option<Regex>> = OnceLock::new();
    LITERAL
        .get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").ok())
        .as_ref()
}

fn is_sign_position(before: &str) -> bool {
    match before.trim_end().chars().last() {
        None => true,
        Some(c) => matches!(c, '(' | '+' | '-' | '*' | '/' | '×' | '÷' | '='),
    }
}

/// Ascending multiset of the numbers still in play.
#[derive(Debug, Clone, PartialEq)]
pub struct Numbers(Vec<f64>);

impl Numbers {
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_target(&self) -> bool {
        matches!(self.0.as_slice(), [n] if (n - TARGET).abs() < EPSILON)
    }

    /// Remove one instance of every numeric literal of `expression` that is
    /// still present, then add `result`. Literals with no match are ignored.
    ///
    /// A `-` directly before a literal is a sign when it opens the expression
    /// or follows `(` or another operator; a signed literal falls back to its
    /// magnitude when the negative value is not in play.
    pub fn apply(&self, expression: &str, result: f64) -> Self {
        let mut remaining = self.0.clone();

        if let Some(pattern) = literal_pattern() {
            for literal in pattern.find_iter(expression) {
                let text = literal.as_str();
                let (signed, magnitude) = match text.strip_prefix('-') {
                    Some(digits) if is_sign_position(&expression[..literal.start()]) => {
                        (true, digits)
                    }
                    Some(digits) => (false, digits),
                    None => (false, text),
                };
                let Ok(value) = magnitude.parse::<f64>() else {
                    continue;
                };

                let position = |wanted: f64| {
                    remaining.iter().position(|n| (n - wanted).abs() < EPSILON)
                };
                let found = signed
                    .then(|| position(-value))
                    .flatten()
                    .or_else(|| position(value));
                if let Some(idx) = found {
                    remaining.remove(idx);
                }
            }
        }

        remaining.push(result);
        Self::new(remaining)
    }

    /// Formatted numbers joined by `separator`, e.g. `4, 9, 10, 13`.
    pub fn joined(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(|n| format_number(*n))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

pub struct Game24Adapter {
    oracle: Arc<dyn Oracle>,
}

impl Game24Adapter {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl TaskAdapter for Game24Adapter {
    type Content = Numbers;
    type Key = usize;

    fn name(&self) -> &'static str {
        "game24"
    }

    fn root_label(&self, content: &Numbers) -> String {
        content.joined(" ")
    }

    fn is_goal(&self, state: &SearchState<Numbers>) -> bool {
        state.content.is_target()
    }

    fn is_expandable(&self, state: &SearchState<Numbers>) -> bool {
        state.content.len() > 1
    }

    async fn propose(&self, state: &SearchState<Numbers>) -> Result<Vec<Candidate<Numbers>>> {
        let prompt = prompts::game24_propose(&state.content.joined(", "));
        let answer = self.oracle.ask(&prompt, PROPOSE_PARAMS).await?;

        let candidates: Vec<_> = parse_arithmetic_steps(&answer)
            .into_iter()
            .map(|step| {
                let expression = step.expression.trim();
                let text = format!("{} = {}", expression, format_number(step.result));
                Candidate {
                    label: text.clone(),
                    step: text,
                    content: state.content.apply(expression, step.result),
                }
            })
            .collect();

        debug!(
            node_id = state.id,
            candidates = candidates.len(),
            "Parsed arithmetic proposals"
        );
        Ok(candidates)
    }

    async fn evaluate(&self, state: &SearchState<Numbers>) -> Result<Verdict> {
        if state.content.len() == 1 {
            return Ok(if state.content.is_target() {
                Verdict::Sure
            } else {
                Verdict::Impossible
            });
        }

        let prompt = prompts::game24_evaluate(&state.content.joined(", "));
        let answer = self.oracle.ask(&prompt, EVALUATE_PARAMS).await?;
        Ok(parse_verdict(&answer))
    }

    fn progress_key(&self, state: &SearchState<Numbers>) -> usize {
        state.content.len()
    }

    fn render_partial(&self, state: &SearchState<Numbers>) -> String {
        format!(
            "{}\n\n(best partial → {})",
            self.render_solution(state),
            state.content.joined(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle::ScriptedOracle;

    fn numbers(values: &[f64]) -> Numbers {
        Numbers::new(values.to_vec())
    }

    #[test]
    fn test_numbers_sorted() {
        assert_eq!(numbers(&[13.0, 4.0, 10.0, 9.0]).as_slice(), &[4.0, 9.0, 10.0, 13.0]);
    }

    #[test]
    fn test_apply_multiset_difference() {
        let start = numbers(&[4.0, 9.0, 10.0, 13.0]);
        assert_eq!(start.apply("13 - 9", 4.0).as_slice(), &[4.0, 4.0, 10.0]);

        let dup = numbers(&[4.0, 4.0, 10.0]);
        assert_eq!(dup.apply("10 - 4", 6.0).as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn test_apply_ignores_unmatched_literals() {
        let start = numbers(&[4.0, 6.0]);
        // 7 is not in play, 4 appears once but is mentioned twice
        assert_eq!(start.apply("(4 + 7) * 4", 44.0).as_slice(), &[6.0, 44.0]);
    }

    #[test]
    fn test_apply_treats_minus_as_operator() {
        let start = numbers(&[1.0, 5.0, 5.0, 5.0]);
        assert_eq!(start.apply("5-1", 4.0).as_slice(), &[4.0, 5.0, 5.0]);
    }

    #[test]
    fn test_apply_consumes_negative_operand() {
        let start = Numbers::new(vec![-5.0, 10.0, 13.0]);
        assert_eq!(start.apply("-5 + 10", 5.0).as_slice(), &[5.0, 13.0]);

        let start = Numbers::new(vec![-5.0, 5.0, 10.0]);
        assert_eq!(start.apply("-5 + 10", 5.0).as_slice(), &[5.0, 5.0]);

        let start = Numbers::new(vec![-2.0, 12.0]);
        assert_eq!(start.apply("12 * (-2)", -24.0).as_slice(), &[-24.0]);
        assert_eq!(start.apply("12 - -2", 14.0).as_slice(), &[14.0]);
    }

    #[test]
    fn test_apply_signed_literal_falls_back_to_magnitude() {
        let start = Numbers::new(vec![3.0, 4.0, 8.0]);
        assert_eq!(start.apply("-3 + 8", 5.0).as_slice(), &[4.0, 5.0]);
    }

    #[test]
    fn test_apply_decimal_literals() {
        let start = numbers(&[2.5, 4.0, 8.0]);
        assert_eq!(start.apply("2.5 * 4", 10.0).as_slice(), &[8.0, 10.0]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(24.0), "24");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(numbers(&[4.0, 9.0]).joined(", "), "4, 9");
    }

    #[test]
    fn test_goal_requires_single_24() {
        let adapter = Game24Adapter::new(Arc::new(ScriptedOracle::queue(Vec::<String>::new())));
        assert!(adapter.is_goal(&SearchState::root(0, numbers(&[24.0]))));
        assert!(adapter.is_goal(&SearchState::root(0, numbers(&[24.000_000_1]))));
        assert!(!adapter.is_goal(&SearchState::root(0, numbers(&[24.0, 1.0]))));
        assert!(!adapter.is_goal(&SearchState::root(0, numbers(&[23.0]))));
        assert!(!adapter.is_expandable(&SearchState::root(0, numbers(&[23.0]))));
    }

    #[tokio::test]
    async fn test_propose_builds_candidates() {
        let oracle = Arc::new(ScriptedOracle::queue([
            r#"{"steps":[{"expression":"13 - 9","result":4},{"expression":"4 * 10","result":40}]}"#,
        ]));
        let adapter = Game24Adapter::new(oracle.clone());
        let root = SearchState::root(0, numbers(&[4.0, 9.0, 10.0, 13.0]));

        let candidates = adapter.propose(&root).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "13 - 9 = 4");
        assert_eq!(candidates[0].content.as_slice(), &[4.0, 4.0, 10.0]);
        assert_eq!(candidates[1].content.as_slice(), &[9.0, 13.0, 40.0]);
        assert!(oracle.prompts()[0].contains("Current numbers: [4, 9, 10, 13]"));
    }

    #[tokio::test]
    async fn test_evaluate_single_number_is_local() {
        let oracle = Arc::new(ScriptedOracle::queue(Vec::<String>::new()));
        let adapter = Game24Adapter::new(oracle.clone());

        let win = SearchState::root(0, numbers(&[24.0]));
        let lose = SearchState::root(1, numbers(&[25.0]));
        assert_eq!(adapter.evaluate(&win).await.unwrap(), Verdict::Sure);
        assert_eq!(adapter.evaluate(&lose).await.unwrap(), Verdict::Impossible);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_asks_oracle() {
        let oracle = Arc::new(ScriptedOracle::queue(["Maybe, hard to say"]));
        let adapter = Game24Adapter::new(oracle);
        let state = SearchState::root(0, numbers(&[4.0, 6.0]));
        assert_eq!(adapter.evaluate(&state).await.unwrap(), Verdict::Maybe);
    }

    #[test]
    fn test_render_partial() {
        let adapter = Game24Adapter::new(Arc::new(ScriptedOracle::queue(Vec::<String>::new())));
        let root = SearchState::root(0, numbers(&[4.0, 9.0, 10.0, 13.0]));
        let child = root.derive(1, "13 - 9 = 4", numbers(&[4.0, 4.0, 10.0]));
        assert_eq!(
            adapter.render_partial(&child),
            "13 - 9 = 4\n\n(best partial → 4, 4, 10)"
        );
    }
}
