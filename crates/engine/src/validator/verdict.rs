use tot_core::Verdict;

/// Verdict assumed when the oracle's answer names none.
pub const DEFAULT_VERDICT: Verdict = Verdict::Maybe;

const NEGATIONS: [&str; 3] = ["not", "no", "never"];

/// Parse a free-form evaluation answer into a verdict.
///
/// The first token decides when it is exactly a verdict word. Otherwise a
/// `sure` word anywhere wins over an `impossible` word, ignoring words
/// directly preceded by a negation. Anything else is [`DEFAULT_VERDICT`].
pub fn parse_verdict(raw: &str) -> Verdict {
    let text = raw.trim().to_lowercase();

    if let Some(verdict) = text.split_whitespace().next().and_then(Verdict::parse) {
        return verdict;
    }

    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    let affirmed = |target: &str| {
        words.iter().enumerate().any(|(i, word)| {
            *word == target && !(i > 0 && NEGATIONS.contains(&words[i - 1]))
        })
    };

    if affirmed("sure") {
        Verdict::Sure
    } else if affirmed("impossible") {
        Verdict::Impossible
    } else {
        DEFAULT_VERDICT
    }
}
