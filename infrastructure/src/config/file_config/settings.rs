//! Per-model generation settings from TOML (`[settings."provider:model"]` tables)

use roundtable_domain::deliberation::settings::{MAX_TOKENS_RANGE, TEMPERATURE_RANGE};
use roundtable_domain::{ConfigIssue, ConfigIssueCode, GenerationOverrides, ModelRef};
use std::collections::HashMap;

/// Raw per-model settings table
///
/// # Example
///
/// ```toml
/// [settings."openai:gpt-4o"]
/// temperature = 0.3
/// max_tokens = 4096
/// system_prompt = "Answer like a careful reviewer."
/// ```
pub type FileSettingsConfig = HashMap<String, GenerationOverrides>;

/// Parse the settings tables into overrides keyed by model reference.
///
/// Out-of-range numbers are kept (they are clamped at resolution time) but
/// reported as warnings. Tables whose key is not a model reference are
/// dropped with an error.
pub fn parse_settings(
    settings: &FileSettingsConfig,
) -> (HashMap<ModelRef, GenerationOverrides>, Vec<ConfigIssue>) {
    let mut issues = Vec::new();
    let mut parsed = HashMap::new();

    // Stable issue order regardless of map iteration
    let mut keys: Vec<&String> = settings.keys().collect();
    keys.sort();

    for key in keys {
        let overrides = &settings[key];
        let reference = match key.parse::<ModelRef>() {
            Ok(r) => r,
            Err(_) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidModelRef {
                        field: "settings".to_string(),
                        value: key.clone(),
                    },
                    format!("settings.\"{}\": key is not of the form provider:model", key),
                ));
                continue;
            }
        };

        if let Some(t) = overrides.temperature
            && !TEMPERATURE_RANGE.contains(&t)
        {
            issues.push(ConfigIssue::warning_out_of_range(
                format!("settings.\"{}\".temperature", key),
                t.to_string(),
                TEMPERATURE_RANGE.start().to_string(),
                TEMPERATURE_RANGE.end().to_string(),
            ));
        }
        if let Some(m) = overrides.max_tokens
            && !MAX_TOKENS_RANGE.contains(&m)
        {
            issues.push(ConfigIssue::warning_out_of_range(
                format!("settings.\"{}\".max_tokens", key),
                m.to_string(),
                MAX_TOKENS_RANGE.start().to_string(),
                MAX_TOKENS_RANGE.end().to_string(),
            ));
        }

        parsed.insert(reference, overrides.clone());
    }

    (parsed, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Severity;

    #[test]
    fn test_parse_settings_from_toml() {
        let toml_str = r#"
["openai:gpt-4o"]
temperature = 0.3
system_prompt = "Be brief."

["anthropic:claude-sonnet-4-20250514"]
max_tokens = 4096
"#;
        let settings: FileSettingsConfig = toml::from_str(toml_str).unwrap();
        let (parsed, issues) = parse_settings(&settings);
        assert!(issues.is_empty());

        let gpt = &parsed[&ModelRef::new("openai", "gpt-4o")];
        assert_eq!(gpt.temperature, Some(0.3));
        assert_eq!(gpt.max_tokens, None);
        assert_eq!(gpt.system_prompt.as_deref(), Some("Be brief."));

        let claude = &parsed[&ModelRef::new("anthropic", "claude-sonnet-4-20250514")];
        assert_eq!(claude.resolve().max_tokens, 4096);
        assert_eq!(claude.resolve().temperature, 0.7);
    }

    #[test]
    fn test_out_of_range_values_warn() {
        let mut settings = FileSettingsConfig::new();
        settings.insert(
            "openai:gpt-4o".to_string(),
            GenerationOverrides::default()
                .with_temperature(3.5)
                .with_max_tokens(100),
        );

        let (parsed, issues) = parse_settings(&settings);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        // Kept as written; clamping happens on resolve
        let resolved = parsed[&ModelRef::new("openai", "gpt-4o")].resolve();
        assert_eq!(resolved.temperature, 2.0);
        assert_eq!(resolved.max_tokens, 256);
    }

    #[test]
    fn test_invalid_key_is_error() {
        let mut settings = FileSettingsConfig::new();
        settings.insert("gpt-4o".to_string(), GenerationOverrides::default());

        let (parsed, issues) = parse_settings(&settings);
        assert!(parsed.is_empty());
        assert!(ConfigIssue::has_errors(&issues));
    }
}
