//! Generation settings.
//!
//! [`GenerationSettings`] is the fully resolved per-model request shape;
//! [`GenerationOverrides`] is what callers supply. Overrides are merged into
//! the defaults field by field, and numeric values are clamped into their
//! accepted ranges.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 256..=8192;

/// Resolved settings for one model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
}

impl Default for GenerationSettings {
    /// 0.7 temperature, 2048 max tokens, no system prompt
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
        }
    }
}

impl GenerationSettings {
    /// Apply overrides field by field, then clamp.
    pub fn merged(&self, overrides: &GenerationOverrides) -> Self {
        Self {
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            system_prompt: overrides
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
        }
        .clamped()
    }

    /// Clamp temperature into [0, 2] and max tokens into [256, 8192].
    pub fn clamped(mut self) -> Self {
        self.temperature = if self.temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            self.temperature
                .clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end())
        };
        self.max_tokens = self
            .max_tokens
            .clamp(*MAX_TOKENS_RANGE.start(), *MAX_TOKENS_RANGE.end());
        self
    }

    /// The system prompt, if set and non-blank.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

/// Caller-supplied per-model settings; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOverrides {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl GenerationOverrides {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Resolve against the documented defaults.
    pub fn resolve(&self) -> GenerationSettings {
        GenerationSettings::default().merged(self)
    }
}

/// Request parameters of the synthesis call.
///
/// Applied to the synthesizer unconditionally, replacing its per-model
/// temperature and max tokens for that one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 2048);
        assert!(settings.system_prompt().is_none());
    }

    #[test]
    fn test_merge_is_field_by_field() {
        let overrides = GenerationOverrides::default().with_max_tokens(1024);
        let settings = overrides.resolve();
        assert_eq!(settings.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(settings.max_tokens, 1024);

        let overrides = GenerationOverrides::default()
            .with_temperature(1.2)
            .with_system_prompt("Be terse.");
        let settings = overrides.resolve();
        assert_eq!(settings.temperature, 1.2);
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(settings.system_prompt(), Some("Be terse."));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = GenerationOverrides::default()
            .with_temperature(3.5)
            .with_max_tokens(10)
            .resolve();
        assert_eq!(settings.temperature, 2.0);
        assert_eq!(settings.max_tokens, 256);

        let settings = GenerationOverrides::default()
            .with_temperature(-1.0)
            .with_max_tokens(100_000)
            .resolve();
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 8192);
    }

    #[test]
    fn test_blank_system_prompt_is_ignored() {
        let settings = GenerationOverrides::default()
            .with_system_prompt("   ")
            .resolve();
        assert!(settings.system_prompt().is_none());
    }

    #[test]
    fn test_synthesis_params_default() {
        let params = SynthesisParams::default();
        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_tokens, 4096);
    }
}
