//! Provider credentials from TOML (`[providers.<id>]` tables)

use roundtable_domain::ApiKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Credentials for one provider.
///
/// # Example
///
/// ```toml
/// [providers.openai]
/// api_key_env = "MY_OPENAI_KEY"
///
/// [providers.groq]
/// api_key = "gsk_..."   # not recommended, prefer an env var
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the key (default: `<ID>_API_KEY`)
    pub api_key_env: Option<String>,
    /// Direct API key
    pub api_key: Option<String>,
}

impl FileProviderConfig {
    /// Default environment variable for a provider id, e.g. `OPENAI_API_KEY`.
    pub fn default_env_var(provider_id: &str) -> String {
        let id: String = provider_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_API_KEY", id)
    }

    pub fn env_var(&self, provider_id: &str) -> String {
        self.api_key_env
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::default_env_var(provider_id))
    }
}

/// All `[providers.*]` tables keyed by provider id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileProvidersConfig(pub HashMap<String, FileProviderConfig>);

impl FileProvidersConfig {
    /// Resolve the API key for a provider.
    ///
    /// The configured environment variable wins over a direct `api_key`.
    /// Returns `None` when neither yields a non-empty value.
    pub fn resolve_api_key(&self, provider_id: &str) -> Option<ApiKey> {
        self.resolve_api_key_with(provider_id, |name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(
        &self,
        provider_id: &str,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Option<ApiKey> {
        let provider = self.0.get(provider_id).cloned().unwrap_or_default();
        lookup_env(&provider.env_var(provider_id))
            .filter(|v| !v.trim().is_empty())
            .or_else(|| provider.api_key.filter(|v| !v.trim().is_empty()))
            .map(ApiKey::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_default_env_var() {
        assert_eq!(FileProviderConfig::default_env_var("openai"), "OPENAI_API_KEY");
        assert_eq!(FileProviderConfig::default_env_var("x-ai"), "X_AI_API_KEY");
    }

    #[test]
    fn test_resolve_from_default_env() {
        let providers = FileProvidersConfig::default();
        let key = providers
            .resolve_api_key_with("openai", env(&[("OPENAI_API_KEY", "sk-env")]))
            .unwrap();
        assert_eq!(key.expose(), "sk-env");
        assert!(providers.resolve_api_key_with("groq", env(&[])).is_none());
    }

    #[test]
    fn test_custom_env_var_and_direct_key() {
        let toml_str = r#"
[openai]
api_key_env = "MY_OPENAI"

[groq]
api_key = "gsk-direct"
"#;
        let providers: FileProvidersConfig = toml::from_str(toml_str).unwrap();

        let key = providers
            .resolve_api_key_with("openai", env(&[("MY_OPENAI", "sk-custom"), ("OPENAI_API_KEY", "sk-default")]))
            .unwrap();
        assert_eq!(key.expose(), "sk-custom");

        let key = providers.resolve_api_key_with("groq", env(&[])).unwrap();
        assert_eq!(key.expose(), "gsk-direct");

        // Env wins over the direct value
        let key = providers
            .resolve_api_key_with("groq", env(&[("GROQ_API_KEY", "gsk-env")]))
            .unwrap();
        assert_eq!(key.expose(), "gsk-env");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let providers = FileProvidersConfig::default();
        assert!(
            providers
                .resolve_api_key_with("openai", env(&[("OPENAI_API_KEY", "  ")]))
                .is_none()
        );
    }
}
