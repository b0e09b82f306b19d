//! Participant configuration from TOML (`[models]` section)

use roundtable_domain::{ConfigIssue, ConfigIssueCode, ModelCatalog, ModelRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Roundtable participants
///
/// # Example
///
/// ```toml
/// [models]
/// participants = ["openai:gpt-4o", "anthropic:claude-sonnet-4-20250514", "google:gemini-2.0-flash"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub participants: Vec<String>,
}

impl FileModelsConfig {
    /// Parse participant references, collecting issues for invalid entries.
    ///
    /// Invalid references are dropped from the returned list. Duplicates are
    /// reported as errors but kept, so the count check sees what was written.
    pub fn parse_participants(&self) -> (Vec<ModelRef>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut refs = Vec::new();
        let mut seen = HashSet::new();

        for raw in &self.participants {
            match raw.parse::<ModelRef>() {
                Ok(reference) => {
                    if !seen.insert(reference.clone()) {
                        issues.push(ConfigIssue::error(
                            ConfigIssueCode::DuplicateModel {
                                model: reference.to_string(),
                            },
                            format!("models.participants: duplicate model '{}'", reference),
                        ));
                    }
                    refs.push(reference);
                }
                Err(_) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidModelRef {
                        field: "models.participants".to_string(),
                        value: raw.clone(),
                    },
                    format!(
                        "models.participants: '{}' is not of the form provider:model",
                        raw
                    ),
                )),
            }
        }

        (refs, issues)
    }

    /// Warn about participants the catalog does not know.
    pub fn unknown_models(&self, catalog: &ModelCatalog) -> Vec<ConfigIssue> {
        self.parse_participants()
            .0
            .into_iter()
            .filter(|r| catalog.lookup_ref(r).is_none())
            .map(|r| {
                ConfigIssue::warning(
                    ConfigIssueCode::UnknownModel {
                        model: r.to_string(),
                    },
                    format!(
                        "models.participants: '{}' is not in the model catalog, using fallback metadata",
                        r
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Severity;

    fn models(participants: &[&str]) -> FileModelsConfig {
        FileModelsConfig {
            participants: participants.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_participants() {
        let (refs, issues) = models(&["openai:gpt-4o", " anthropic : claude-3-5-haiku-20241022 "])
            .parse_participants();
        assert!(issues.is_empty());
        assert_eq!(
            refs,
            vec![
                ModelRef::new("openai", "gpt-4o"),
                ModelRef::new("anthropic", "claude-3-5-haiku-20241022"),
            ]
        );
    }

    #[test]
    fn test_invalid_refs_are_errors() {
        let (refs, issues) = models(&["openai:gpt-4o", "", "gpt-4o"]).parse_participants();
        assert_eq!(refs.len(), 1);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert!(matches!(
            &issues[1].code,
            ConfigIssueCode::InvalidModelRef { value, .. } if value == "gpt-4o"
        ));
    }

    #[test]
    fn test_duplicate_is_error() {
        let (refs, issues) = models(&["openai:gpt-4o", "openai:gpt-4o"]).parse_participants();
        assert_eq!(refs.len(), 2);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::DuplicateModel { model } if model == "openai:gpt-4o"
        ));
    }

    #[test]
    fn test_unknown_models_warn() {
        let catalog = ModelCatalog::builtin();
        let issues = models(&["openai:gpt-4o", "local:llama-3"]).unknown_models(&catalog);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::UnknownModel { model } if model == "local:llama-3"
        ));
    }
}
