//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid model reference '{0}': expected 'provider:model'")]
    InvalidModelRef(String),

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_ref_display() {
        let error = DomainError::InvalidModelRef("gpt-4o".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid model reference 'gpt-4o': expected 'provider:model'"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let error = DomainError::InvalidValue {
            field: "mode",
            value: "fast".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid mode: 'fast'");
    }
}
