//! Prompt domain
//!
//! Templates for the prompts sent to models in the later roundtable rounds.

mod template;

pub use template::PromptTemplate;
