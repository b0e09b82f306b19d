//! Model identity and participant value objects

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Composite identity of a model: `(provider id, model id)`.
///
/// Providers offer several models, so the provider id alone never identifies
/// a participant. The textual form is `provider:model`; the model part may
/// itself contain `/` or `:` (e.g. `openrouter:openai/gpt-4o`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelRef {
    provider_id: String,
    model_id: String,
}

impl ModelRef {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_id, self.model_id)
    }
}

impl std::str::FromStr for ModelRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidModelRef(s.to_string()))?;
        let (provider, model) = (provider.trim(), model.trim());
        if provider.is_empty() || model.is_empty() {
            return Err(DomainError::InvalidModelRef(s.to_string()));
        }
        Ok(Self::new(provider, model))
    }
}

impl Serialize for ModelRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque provider credential.
///
/// Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the transport request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "ApiKey(<empty>)")
        } else {
            write!(f, "ApiKey(****)")
        }
    }
}

/// A participant in a deliberation run.
///
/// Immutable for the duration of one run; supplied by the caller (usually
/// resolved through the [`ModelCatalog`](crate::catalog::ModelCatalog)).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Composite identity
    pub reference: ModelRef,
    /// Display name, used as the transcript label in prompts
    pub name: String,
    /// Display name of the provider
    pub provider_name: String,
    /// Display color (hex)
    pub color: String,
    /// Capability score (1-10), used for synthesizer auto-selection
    pub capability: u8,
    /// Provider credential
    pub api_key: ApiKey,
}

impl Model {
    pub const DEFAULT_CAPABILITY: u8 = 5;
    pub const DEFAULT_COLOR: &'static str = "#888888";

    /// Create a model with fallback display metadata.
    pub fn new(reference: ModelRef, api_key: ApiKey) -> Self {
        Self {
            name: reference.model_id().to_string(),
            provider_name: reference.provider_id().to_string(),
            color: Self::DEFAULT_COLOR.to_string(),
            capability: Self::DEFAULT_CAPABILITY,
            reference,
            api_key,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the capability score, clamped to 1-10.
    pub fn with_capability(mut self, capability: u8) -> Self {
        self.capability = capability.clamp(1, 10);
        self
    }

    pub fn provider_id(&self) -> &str {
        self.reference.provider_id()
    }

    pub fn model_id(&self) -> &str {
        self.reference.model_id()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ref_roundtrip() {
        let reference: ModelRef = "openai:gpt-4o".parse().unwrap();
        assert_eq!(reference.provider_id(), "openai");
        assert_eq!(reference.model_id(), "gpt-4o");
        assert_eq!(reference.to_string(), "openai:gpt-4o");
    }

    #[test]
    fn test_model_ref_keeps_slashes_in_model_id() {
        let reference: ModelRef = "openrouter:openai/gpt-4o".parse().unwrap();
        assert_eq!(reference.provider_id(), "openrouter");
        assert_eq!(reference.model_id(), "openai/gpt-4o");
    }

    #[test]
    fn test_model_ref_rejects_missing_parts() {
        assert!("gpt-4o".parse::<ModelRef>().is_err());
        assert!(":gpt-4o".parse::<ModelRef>().is_err());
        assert!("openai:".parse::<ModelRef>().is_err());
        assert!("".parse::<ModelRef>().is_err());
    }

    #[test]
    fn test_same_provider_different_models_are_distinct() {
        let a = ModelRef::new("openai", "gpt-4o");
        let b = ModelRef::new("openai", "gpt-4o-mini");
        assert_ne!(a, b);
    }

    #[test]
    fn test_model_ref_serde_as_string() {
        let reference = ModelRef::new("anthropic", "claude-3-5-haiku-20241022");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"anthropic:claude-3-5-haiku-20241022\"");
        let back: ModelRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("sk-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(****)");
        assert_eq!(key.expose(), "sk-secret");

        let model = Model::new(ModelRef::new("openai", "gpt-4o"), key);
        assert!(!format!("{:?}", model).contains("sk-secret"));
    }

    #[test]
    fn test_model_defaults_and_capability_clamp() {
        let model = Model::new(ModelRef::new("groq", "custom"), ApiKey::default());
        assert_eq!(model.name, "custom");
        assert_eq!(model.capability, Model::DEFAULT_CAPABILITY);

        let model = model.with_capability(42);
        assert_eq!(model.capability, 10);
        let model = model.with_capability(0);
        assert_eq!(model.capability, 1);
    }
}
