//! Prompt templates for the roundtable rounds
//!
//! Transcripts are rendered as `[name]: "text"` entries separated by a blank
//! line. The instructions that follow each transcript refer to that layout,
//! so it must not change.

use crate::deliberation::value_objects::RoundResponse;

/// Templates for generating the prompts of rounds 2, 2.5 and 3
pub struct PromptTemplate;

impl PromptTemplate {
    /// Render labeled responses as a transcript
    pub fn transcript(responses: &[(String, String)]) -> String {
        responses
            .iter()
            .map(|(name, text)| format!("[{}]: \"{}\"", name, text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// `(name, text)` pairs of the successful responses, in order
    pub fn entries(responses: &[RoundResponse]) -> Vec<(String, String)> {
        responses
            .iter()
            .filter(|r| r.is_success())
            .map(|r| (r.name.clone(), r.text.clone()))
            .collect()
    }

    /// User prompt for cross-examination (Round 2)
    ///
    /// `other_responses` must not contain the invoking model's own answer.
    pub fn cross_exam_prompt(question: &str, other_responses: &[(String, String)]) -> String {
        format!(
            r#"You are participating in an AI roundtable discussion. Here is the original question:
"{}"

Here are the responses from other AI participants:

{}

Now, please:
1. Identify the strongest points from each response
2. Point out any errors, gaps, or disagreements you see
3. Provide your improved, revised answer incorporating the best insights from all responses"#,
            question,
            Self::transcript(other_responses)
        )
    }

    /// User prompt for the debate round (Round 2.5)
    pub fn debate_prompt(
        question: &str,
        round1: &[(String, String)],
        round2: &[(String, String)],
    ) -> String {
        format!(
            r#"You are in the debate round of an AI roundtable discussion. The group has not yet reached consensus.

Original question: "{}"

Round 1 responses:
{}

Round 2 cross-examination responses:
{}

Focus on the remaining disagreements. Argue for your position with evidence and reasoning. Be concise but thorough. If you've changed your mind based on others' arguments, explain why."#,
            question,
            Self::transcript(round1),
            Self::transcript(round2)
        )
    }

    /// User prompt for synthesis (Round 3)
    ///
    /// The debate section is appended only when `round2_5` is non-empty.
    pub fn synthesis_prompt(
        question: &str,
        round1: &[(String, String)],
        round2: &[(String, String)],
        round2_5: &[(String, String)],
    ) -> String {
        let debate_section = if round2_5.is_empty() {
            String::new()
        } else {
            format!("\n\nDebate round responses:\n{}", Self::transcript(round2_5))
        };

        format!(
            r#"You are the final synthesizer in an AI roundtable. Multiple AI models have independently answered the same question, then cross-examined each other. Your job is to merge ALL of their perspectives into one cohesive, unified answer — not to pick a winner.

Original question: "{}"

Round 1 independent responses:
{}

Round 2 cross-examination responses:
{}{}

Produce a single, well-structured answer that:
- Weaves together insights and perspectives from EVERY participant — do not ignore or discard any model's contribution
- Where models agree, present the shared conclusion confidently
- Where models disagree, present the different viewpoints fairly and explain the trade-offs rather than just picking one
- Integrates unique points that only one model raised — these are often the most valuable additions
- Flags genuine uncertainties honestly
- Reads as one coherent, complete answer (not a list of "Model A said X, Model B said Y")
- Is clear, thorough, and directly answers the user's question"#,
            question,
            Self::transcript(round1),
            Self::transcript(round2),
            debate_section
        )
    }
}
