//! Execution configuration from TOML (`[execution]` section)

use roundtable_application::ExecutionParams;
use roundtable_domain::SynthesisParams;
use roundtable_domain::deliberation::settings::{MAX_TOKENS_RANGE, TEMPERATURE_RANGE};
use roundtable_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution limits
///
/// # Example
///
/// ```toml
/// [execution]
/// call_timeout_secs = 60     # 0 disables the per-call timeout
/// synthesis_temperature = 0.5
/// synthesis_max_tokens = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub call_timeout_secs: u64,
    pub synthesis_temperature: f32,
    pub synthesis_max_tokens: u32,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let synthesis = SynthesisParams::default();
        Self {
            call_timeout_secs: 120,
            synthesis_temperature: synthesis.temperature,
            synthesis_max_tokens: synthesis.max_tokens,
        }
    }
}

impl FileExecutionConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }

    /// Convert to [`ExecutionParams`], clamping synthesis values into range.
    pub fn to_execution_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let mut temperature = self.synthesis_temperature;
        if !TEMPERATURE_RANGE.contains(&temperature) {
            issues.push(ConfigIssue::warning_out_of_range(
                "execution.synthesis_temperature",
                temperature.to_string(),
                TEMPERATURE_RANGE.start().to_string(),
                TEMPERATURE_RANGE.end().to_string(),
            ));
            temperature = if temperature.is_nan() {
                SynthesisParams::default().temperature
            } else {
                temperature.clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end())
            };
        }

        let mut max_tokens = self.synthesis_max_tokens;
        if !MAX_TOKENS_RANGE.contains(&max_tokens) {
            issues.push(ConfigIssue::warning_out_of_range(
                "execution.synthesis_max_tokens",
                max_tokens.to_string(),
                MAX_TOKENS_RANGE.start().to_string(),
                MAX_TOKENS_RANGE.end().to_string(),
            ));
            max_tokens = max_tokens.clamp(*MAX_TOKENS_RANGE.start(), *MAX_TOKENS_RANGE.end());
        }

        let params = ExecutionParams::default()
            .with_call_timeout(self.call_timeout())
            .with_synthesis(SynthesisParams {
                temperature,
                max_tokens,
            });
        (params, issues)
    }
}
