//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod deliberation;
mod execution;
mod gateway;
mod models;
mod output;
mod providers;
mod settings;

pub use deliberation::FileDeliberationConfig;
pub use execution::FileExecutionConfig;
pub use gateway::FileGatewayConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use settings::{FileSettingsConfig, parse_settings};

use roundtable_application::MIN_PARTICIPANTS;
use roundtable_domain::{ConfigIssue, ConfigIssueCode, ModelCatalog};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round sequence and synthesizer choice
    pub deliberation: FileDeliberationConfig,
    /// Participants
    pub models: FileModelsConfig,
    /// Per-model generation settings keyed by `provider:model`
    pub settings: FileSettingsConfig,
    /// Call timeout and synthesis parameters
    pub execution: FileExecutionConfig,
    /// Chat gateway endpoint
    pub gateway: FileGatewayConfig,
    /// API key sources keyed by provider id
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors: invalid or duplicate participant references, a participant
    /// list with fewer than two entries, settings keyed by something other
    /// than a model reference. Everything else is a warning and falls back
    /// to a default or a clamped value.
    ///
    /// An empty participant list is not an issue here; participants may
    /// still come from the command line.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Participants
        let (participants, participant_issues) = self.models.parse_participants();
        issues.extend(participant_issues);
        if !self.models.participants.is_empty() && participants.len() < MIN_PARTICIPANTS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewModels {
                    count: participants.len(),
                },
                format!(
                    "models.participants: at least {} models are required, found {}",
                    MIN_PARTICIPANTS,
                    participants.len()
                ),
            ));
        }
        issues.extend(self.models.unknown_models(&ModelCatalog::builtin()));

        // 2. Enum parse validation
        issues.extend(self.deliberation.parse_rounds().1);
        issues.extend(self.deliberation.parse_mode().1);
        issues.extend(self.deliberation.parse_synthesizer().1);

        // 3. Numeric ranges
        issues.extend(parse_settings(&self.settings).1);
        issues.extend(self.execution.to_execution_params().1);

        issues
    }
}
