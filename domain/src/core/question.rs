//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The prompt posed to the roundtable (Value Object)
///
/// Every model receives this text verbatim in Round 1, and every later
/// round restates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a question, rejecting empty or whitespace-only prompts.
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyPrompt)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for Question {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::try_new("What is Rust?").unwrap();
        assert_eq!(q.content(), "What is Rust?");
        assert_eq!(q.to_string(), "What is Rust?");
    }

    #[test]
    fn test_question_keeps_surrounding_whitespace() {
        let q: Question = "  spaced  ".parse().unwrap();
        assert_eq!(q.into_content(), "  spaced  ");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert_eq!(Question::try_new(""), Err(DomainError::EmptyPrompt));
        assert_eq!(Question::try_new(" \n\t "), Err(DomainError::EmptyPrompt));
    }
}
