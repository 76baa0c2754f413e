//! Validation of raw oracle answers.

pub mod proposal;
pub mod verdict;

pub use proposal::{
    parse_arithmetic_steps, parse_paragraph_steps, ArithmeticStep, ParagraphStep, MAX_PROPOSALS,
};
pub use verdict::{parse_verdict, DEFAULT_VERDICT};
