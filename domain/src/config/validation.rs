//! Structured configuration issues.
//!
//! Configuration sources (TOML files, environment, CLI flags) are validated
//! into a list of [`ConfigIssue`] values instead of failing on the first
//! problem, so every issue can be reported at once.
//!
//! # Examples
//!
//! ```
//! use roundtable_domain::config::{ConfigIssue, Severity};
//!
//! let issues = vec![ConfigIssue::warning_out_of_range("settings.temperature", "3.5", "0", "2")];
//! assert!(!ConfigIssue::has_errors(&issues));
//! assert_eq!(issues[0].severity, Severity::Warning);
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A model reference is empty or not of the form `provider:model`.
    InvalidModelRef { field: String, value: String },
    /// Fewer than two participants are configured.
    TooFewModels { count: usize },
    /// The same participant is listed twice.
    DuplicateModel { model: String },
    /// A value is outside its accepted range and will be clamped.
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// An enum-like value could not be parsed; the default is used.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A participant is not in the model catalog; fallback metadata is used.
    UnknownModel { model: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Warning for a numeric value that will be clamped into `[min, max]`.
    pub fn warning_out_of_range(
        field: impl Into<String>,
        value: impl Into<String>,
        min: impl Into<String>,
        max: impl Into<String>,
    ) -> Self {
        let (field, value, min, max) = (field.into(), value.into(), min.into(), max.into());
        let message = format!(
            "{}: {} is outside [{}, {}] and will be clamped",
            field, value, min, max
        );
        Self::warning(
            ConfigIssueCode::OutOfRange {
                field,
                value,
                min,
                max,
            },
            message,
        )
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
