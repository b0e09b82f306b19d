//! Progress events emitted by a deliberation run.
//!
//! Per-model events are strictly ordered (`Token`* then exactly one of
//! `RoundComplete` / `RoundError`); nothing is guaranteed across models of the
//! same round. A consumer may see `RoundError` for a model that never
//! produced a token.

use super::entities::{DeliberationStatus, Round};
use super::value_objects::{DeliberationResult, TokenUsage};
use crate::core::model::ModelRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliberationEvent {
    StatusChanged {
        status: DeliberationStatus,
    },
    RoundStart {
        round: Round,
        models: Vec<ModelRef>,
    },
    Token {
        round: Round,
        model: ModelRef,
        chunk: String,
    },
    RoundComplete {
        round: Round,
        model: ModelRef,
        text: String,
        usage: TokenUsage,
    },
    RoundError {
        round: Round,
        model: ModelRef,
        error: String,
    },
    /// All calls of a round have settled.
    RoundFinished {
        round: Round,
        succeeded: usize,
        failed: usize,
    },
    Complete {
        result: Box<DeliberationResult>,
    },
    Error {
        message: String,
    },
}

impl DeliberationEvent {
    /// Whether this event ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliberationEvent::Complete { .. } | DeliberationEvent::Error { .. }
        )
    }

    /// Round this event belongs to, if any.
    pub fn round(&self) -> Option<Round> {
        match self {
            DeliberationEvent::RoundStart { round, .. }
            | DeliberationEvent::Token { round, .. }
            | DeliberationEvent::RoundComplete { round, .. }
            | DeliberationEvent::RoundError { round, .. }
            | DeliberationEvent::RoundFinished { round, .. } => Some(*round),
            _ => None,
        }
    }

    /// Short type name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            DeliberationEvent::StatusChanged { .. } => "status_changed",
            DeliberationEvent::RoundStart { .. } => "round_start",
            DeliberationEvent::Token { .. } => "token",
            DeliberationEvent::RoundComplete { .. } => "round_complete",
            DeliberationEvent::RoundError { .. } => "round_error",
            DeliberationEvent::RoundFinished { .. } => "round_finished",
            DeliberationEvent::Complete { .. } => "complete",
            DeliberationEvent::Error { .. } => "error",
        }
    }
}
