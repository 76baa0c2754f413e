//! Prompt templates sent to the oracle.

/// Arithmetic proposal prompt; `numbers` is the comma-separated current set.
pub fn game24_propose(numbers: &str) -> String {
    format!(
        r#"Current numbers: [{numbers}]

Propose up to 5 next steps toward reaching 24. Each step must use at least two numbers from the current set with + - * / and produce a single result.

Respond with JSON only, in this exact format (no markdown, no extra text):
{{"steps":[{{"expression":"4 * 6","result":24}},{{"expression":"24 - 5","result":19}}, ...]}}

Rules:
- "expression": arithmetic using only the current numbers and + - * /
- "result": the numeric result (number type)
- Use at most 5 steps
"#
    )
}

pub fn game24_evaluate(numbers: &str) -> String {
    format!(
        r#"Numbers left: {numbers}

How likely are we to reach exactly 24 from here?

Answer with one word only:

sure       (almost certain we can reach 24 soon)
maybe      (possible, but uncertain)
impossible (clearly cannot reach 24)

Reply with exactly one word: sure, maybe, or impossible.
"#
    )
}

fn numbered_seeds(seeds: &[String]) -> String {
    seeds
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}

fn story_so_far(paragraphs: &[String]) -> String {
    if paragraphs.is_empty() {
        return "(none yet)".to_string();
    }
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, p)| format!("Paragraph {}:\n{}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn creative_propose(seeds: &[String], paragraphs: &[String]) -> String {
    format!(
        r#"Seed sentences (use as inspiration or theme):
{seeds}

Story so far:
{story}

Propose up to 5 possible next paragraphs. Each paragraph should be 2-4 sentences and continue the story coherently.

Respond with JSON only (no markdown):
{{"steps":[{{"content":"Your first proposed paragraph here."}},{{"content":"Second option."}}, ...]}}

Use at most 5 steps.
"#,
        seeds = numbered_seeds(seeds),
        story = story_so_far(paragraphs),
    )
}

pub fn creative_evaluate(seeds: &[String], paragraphs: &[String]) -> String {
    format!(
        r#"Seed sentences:
{seeds}

Story so far:
{story}

How likely is this to become a coherent, complete creative piece?

Reply with exactly one word: sure, maybe, or impossible.
"#,
        seeds = numbered_seeds(seeds),
        story = story_so_far(paragraphs),
    )
}
