//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: a configured participant (identity, display metadata, credentials)
//! - [`model::ModelRef`]: the composite `(provider, model)` identity
//! - [`question::Question`]: a validated prompt to pose to the roundtable
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;
