//! Deliberation domain entities

use super::mode::{DeliberationMode, RoundCount, SynthesizerChoice};
use super::settings::{GenerationOverrides, GenerationSettings};
use crate::core::model::{Model, ModelRef};
use crate::core::question::Question;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Round of a deliberation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Round {
    /// Round 1 - every model answers independently
    #[serde(rename = "round1")]
    Independent,
    /// Round 2 - models revise after reading their peers
    #[serde(rename = "round2")]
    CrossExamination,
    /// Round 2.5 - debate over remaining disagreements
    #[serde(rename = "round2.5")]
    Debate,
    /// Round 3 - one model merges every transcript
    #[serde(rename = "round3")]
    Synthesis,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Independent => "round1",
            Round::CrossExamination => "round2",
            Round::Debate => "round2.5",
            Round::Synthesis => "round3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Round::Independent => "Round 1: Independent Answers",
            Round::CrossExamination => "Round 2: Cross-Examination",
            Round::Debate => "Round 2.5: Debate",
            Round::Synthesis => "Round 3: Synthesis",
        }
    }

    /// Status the run is in while this round executes.
    pub fn status(&self) -> DeliberationStatus {
        match self {
            Round::Independent => DeliberationStatus::Round1,
            Round::CrossExamination => DeliberationStatus::Round2,
            Round::Debate => DeliberationStatus::Round2_5,
            Round::Synthesis => DeliberationStatus::Round3,
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lifecycle state of a deliberation run.
///
/// `idle → round1 → round2? → round2.5? → round3 → complete`, with `error`
/// reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliberationStatus {
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "round1")]
    Round1,
    #[serde(rename = "round2")]
    Round2,
    #[serde(rename = "round2.5")]
    Round2_5,
    #[serde(rename = "round3")]
    Round3,
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "error")]
    Error,
}

impl DeliberationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationStatus::Idle => "idle",
            DeliberationStatus::Round1 => "round1",
            DeliberationStatus::Round2 => "round2",
            DeliberationStatus::Round2_5 => "round2.5",
            DeliberationStatus::Round3 => "round3",
            DeliberationStatus::Complete => "complete",
            DeliberationStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliberationStatus::Complete | DeliberationStatus::Error
        )
    }
}

impl std::fmt::Display for DeliberationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The full input to one deliberation run (Entity)
#[derive(Debug, Clone)]
pub struct DeliberationConfig {
    /// The user's question
    pub question: Question,
    /// Participants, in order. At least two are required to run.
    pub models: Vec<Model>,
    /// Requested round count
    pub rounds: RoundCount,
    pub mode: DeliberationMode,
    pub synthesizer: SynthesizerChoice,
    /// Per-model generation settings; absent models use the defaults
    pub model_settings: HashMap<ModelRef, GenerationOverrides>,
}

impl DeliberationConfig {
    pub fn new(question: Question, models: Vec<Model>) -> Self {
        Self {
            question,
            models,
            rounds: RoundCount::default(),
            mode: DeliberationMode::default(),
            synthesizer: SynthesizerChoice::default(),
            model_settings: HashMap::new(),
        }
    }

    pub fn with_mode(mut self, mode: DeliberationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rounds(mut self, rounds: RoundCount) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: SynthesizerChoice) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Set the generation overrides of one model.
    pub fn with_settings(mut self, model: ModelRef, overrides: GenerationOverrides) -> Self {
        self.model_settings.insert(model, overrides);
        self
    }

    /// Resolved generation settings for a model (defaults when absent).
    pub fn settings_for(&self, model: &ModelRef) -> GenerationSettings {
        self.model_settings
            .get(model)
            .map(GenerationOverrides::resolve)
            .unwrap_or_default()
    }

    /// First model reference listed more than once, if any.
    pub fn find_duplicate(&self) -> Option<&ModelRef> {
        let mut seen = HashSet::new();
        self.models
            .iter()
            .map(|m| &m.reference)
            .find(|r| !seen.insert(*r))
    }
}
