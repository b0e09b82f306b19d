//! Domain layer for ai-roundtable
//!
//! This crate contains the core types of a roundtable deliberation.
//! It has no dependencies on transport, configuration files or terminal output.
//!
//! # Core Concepts
//!
//! ## Roundtable
//!
//! One question is posed to several independently configured models, which then
//! deliberate over a fixed sequence of rounds:
//!
//! - **Round 1**: independent answers from every model
//! - **Round 2**: cross-examination of the other participants' answers
//! - **Round 2.5**: optional debate over remaining disagreements
//! - **Round 3**: a single synthesizer merges every transcript into one answer
//!
//! ## Modes
//!
//! - **Standard**: Rounds 1, 2 and 3
//! - **Quick**: Round 1 straight into synthesis
//! - **Debate**: Standard plus the debate round

pub mod catalog;
pub mod config;
pub mod core;
pub mod deliberation;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use catalog::{CatalogEntry, CatalogModel, CatalogProvider, ModelCatalog};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    model::{ApiKey, Model, ModelRef},
    question::Question,
};
pub use deliberation::{
    entities::{DeliberationConfig, DeliberationStatus, Round},
    event::DeliberationEvent,
    mode::{DeliberationMode, RoundCount, SynthesizerChoice},
    settings::{GenerationOverrides, GenerationSettings, SynthesisParams},
    synthesizer::select_synthesizer,
    value_objects::{DeliberationResult, RoundResponse, TokenUsage},
};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Message, Role},
    stream::StreamEvent,
};
