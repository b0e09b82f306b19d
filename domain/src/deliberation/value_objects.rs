//! Deliberation value objects - per-model responses and the run result.

use super::entities::Round;
use super::mode::{DeliberationMode, RoundCount};
use crate::core::model::{Model, ModelRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token counts reported by the transport, when it surfaces them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
}

impl TokenUsage {
    pub fn new(input_tokens: Option<u32>, output_tokens: Option<u32>) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input_tokens.is_none() && self.output_tokens.is_none()
    }
}

/// One model's output within one round.
///
/// Once `is_complete` is set the response is terminal: the mutators return
/// `false` and leave it unchanged. While streaming, text only grows by append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResponse {
    pub model: ModelRef,
    /// Display name, used as the transcript label
    pub name: String,
    pub color: String,
    pub text: String,
    pub is_streaming: bool,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
}

impl RoundResponse {
    /// An empty, still-streaming response for a model.
    pub fn pending(model: &Model) -> Self {
        Self {
            model: model.reference.clone(),
            name: model.name.clone(),
            color: model.color.clone(),
            text: String::new(),
            is_streaming: true,
            is_complete: false,
            error: None,
            input_tokens: None,
            output_tokens: None,
        }
    }

    /// Append a streamed chunk.
    pub fn append(&mut self, chunk: &str) -> bool {
        if self.is_complete {
            return false;
        }
        self.text.push_str(chunk);
        true
    }

    /// Settle successfully with the final text.
    pub fn complete(&mut self, text: String, usage: TokenUsage) -> bool {
        if self.is_complete {
            return false;
        }
        self.text = text;
        self.is_streaming = false;
        self.is_complete = true;
        self.input_tokens = usage.input_tokens;
        self.output_tokens = usage.output_tokens;
        true
    }

    /// Settle with an error. Text streamed so far is kept.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.is_complete {
            return false;
        }
        self.error = Some(error.into());
        self.is_streaming = false;
        self.is_complete = true;
        true
    }

    pub fn is_success(&self) -> bool {
        self.is_complete && self.error.is_none()
    }

    pub fn usage(&self) -> TokenUsage {
        TokenUsage::new(self.input_tokens, self.output_tokens)
    }
}

/// Result of one deliberation run.
///
/// Transient: built during the run and handed to the caller at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub id: Uuid,
    pub prompt: String,
    pub mode: DeliberationMode,
    pub rounds: RoundCount,
    pub started_at: DateTime<Utc>,
    pub round1: Vec<RoundResponse>,
    pub round2: Vec<RoundResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round2_5: Option<Vec<RoundResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<RoundResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesizer: Option<ModelRef>,
}

impl DeliberationResult {
    pub fn new(prompt: impl Into<String>, mode: DeliberationMode, rounds: RoundCount) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            mode,
            rounds,
            started_at: Utc::now(),
            round1: Vec::new(),
            round2: Vec::new(),
            round2_5: None,
            final_answer: None,
            synthesizer: None,
        }
    }

    /// Responses of a round, in participant order.
    pub fn round(&self, round: Round) -> &[RoundResponse] {
        match round {
            Round::Independent => &self.round1,
            Round::CrossExamination => &self.round2,
            Round::Debate => self.round2_5.as_deref().unwrap_or(&[]),
            Round::Synthesis => self.final_answer.as_slice(),
        }
    }

    /// Text of the final answer, if synthesis succeeded.
    pub fn final_text(&self) -> Option<&str> {
        self.final_answer
            .as_ref()
            .filter(|r| r.is_success())
            .map(|r| r.text.as_str())
    }

    /// Sum of every reported token count across all rounds.
    pub fn total_usage(&self) -> TokenUsage {
        let all = [Round::Independent, Round::CrossExamination, Round::Debate, Round::Synthesis]
            .into_iter()
            .flat_map(|round| self.round(round).iter());

        let mut total = TokenUsage::default();
        for response in all {
            if let Some(n) = response.input_tokens {
                *total.input_tokens.get_or_insert(0) += n;
            }
            if let Some(n) = response.output_tokens {
                *total.output_tokens.get_or_insert(0) += n;
            }
        }
        total
    }
}
