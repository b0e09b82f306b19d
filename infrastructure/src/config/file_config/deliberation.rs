//! Deliberation configuration from TOML (`[deliberation]` section)

use roundtable_domain::{
    ConfigIssue, ConfigIssueCode, DeliberationMode, RoundCount, SynthesizerChoice,
};
use serde::{Deserialize, Serialize};

/// Raw deliberation configuration
///
/// # Example
///
/// ```toml
/// [deliberation]
/// rounds = 3
/// mode = "debate"              # standard | quick | debate
/// synthesizer = "anthropic"    # auto | <provider> | <provider>:<model>
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    pub rounds: u8,
    pub mode: String,
    pub synthesizer: String,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            rounds: RoundCount::default().get(),
            mode: DeliberationMode::default().as_str().to_string(),
            synthesizer: "auto".to_string(),
        }
    }
}

impl FileDeliberationConfig {
    /// Parse `rounds`, falling back to 3.
    pub fn parse_rounds(&self) -> (RoundCount, Vec<ConfigIssue>) {
        match RoundCount::try_from(self.rounds) {
            Ok(rounds) => (rounds, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "deliberation.rounds".to_string(),
                        value: self.rounds.to_string(),
                        valid_values: vec!["2".to_string(), "3".to_string()],
                    },
                    format!(
                        "deliberation.rounds: unsupported value {}, falling back to {}",
                        self.rounds,
                        RoundCount::default()
                    ),
                );
                (RoundCount::default(), vec![issue])
            }
        }
    }

    /// Parse `mode`, falling back to `standard`.
    ///
    /// Accepts: "standard", "std", "quick", "q", "debate", "d"
    pub fn parse_mode(&self) -> (DeliberationMode, Vec<ConfigIssue>) {
        match self.mode.parse::<DeliberationMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "deliberation.mode".to_string(),
                        value: self.mode.clone(),
                        valid_values: DeliberationMode::VALID_VALUES
                            .iter()
                            .map(|v| v.to_string())
                            .collect(),
                    },
                    format!(
                        "deliberation.mode: unknown value '{}', falling back to '{}'",
                        self.mode,
                        DeliberationMode::default()
                    ),
                );
                (DeliberationMode::default(), vec![issue])
            }
        }
    }

    /// Parse `synthesizer`, falling back to automatic selection.
    pub fn parse_synthesizer(&self) -> (SynthesizerChoice, Vec<ConfigIssue>) {
        match self.synthesizer.parse::<SynthesizerChoice>() {
            Ok(choice) => (choice, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "deliberation.synthesizer".to_string(),
                        value: self.synthesizer.clone(),
                        valid_values: vec![
                            "auto".to_string(),
                            "<provider>".to_string(),
                            "<provider>:<model>".to_string(),
                        ],
                    },
                    format!(
                        "deliberation.synthesizer: invalid value '{}', falling back to 'auto'",
                        self.synthesizer
                    ),
                );
                (SynthesizerChoice::Auto, vec![issue])
            }
        }
    }
}
