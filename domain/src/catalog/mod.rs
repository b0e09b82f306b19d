//! Model catalog: read-only lookup of providers and their models.
//!
//! The catalog maps `(provider id, model id)` to display metadata, a
//! capability score and cost-per-token figures. The deliberation engine only
//! uses it for labeling and for the synthesizer's capability comparison.

mod builtin;

use crate::core::model::{ApiKey, Model, ModelRef};

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogModel {
    pub id: &'static str,
    pub name: &'static str,
    /// 1-10, used to auto-select the synthesizer
    pub capability: u8,
    /// USD per 1M input tokens
    pub input_cost_per_1m: f64,
    /// USD per 1M output tokens
    pub output_cost_per_1m: f64,
}

/// A provider and the models it offers
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProvider {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub models: &'static [CatalogModel],
}

/// A flattened `(provider, model)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub provider: &'static CatalogProvider,
    pub model: &'static CatalogModel,
}

impl CatalogEntry {
    pub fn reference(&self) -> ModelRef {
        ModelRef::new(self.provider.id, self.model.id)
    }

    fn searchable_text(&self) -> String {
        format!("{} {}", self.model.name, self.provider.name).to_lowercase()
    }
}

/// Static model registry
#[derive(Debug, Clone, Copy)]
pub struct ModelCatalog {
    providers: &'static [CatalogProvider],
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    /// The built-in provider registry
    pub fn builtin() -> Self {
        Self {
            providers: builtin::PROVIDERS,
        }
    }

    /// A catalog over an explicit provider list
    pub fn from_providers(providers: &'static [CatalogProvider]) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &'static [CatalogProvider] {
        self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&'static CatalogProvider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn lookup(&self, provider_id: &str, model_id: &str) -> Option<CatalogEntry> {
        let provider = self.provider(provider_id)?;
        let model = provider.models.iter().find(|m| m.id == model_id)?;
        Some(CatalogEntry { provider, model })
    }

    pub fn lookup_ref(&self, reference: &ModelRef) -> Option<CatalogEntry> {
        self.lookup(reference.provider_id(), reference.model_id())
    }

    /// Every model of every provider, in registry order
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.providers.iter().flat_map(|provider| {
            provider
                .models
                .iter()
                .map(move |model| CatalogEntry { provider, model })
        })
    }

    /// Case-insensitive search; every whitespace-separated term must match
    /// the model name or provider name. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<CatalogEntry> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        self.entries()
            .filter(|entry| {
                let text = entry.searchable_text();
                terms.iter().all(|term| text.contains(term.as_str()))
            })
            .collect()
    }

    /// Build a participant from catalog metadata.
    ///
    /// Models the catalog does not know still resolve, with the model id as
    /// name, the provider's color when the provider is known, and the default
    /// capability.
    pub fn resolve(&self, reference: &ModelRef, api_key: ApiKey) -> Model {
        let model = Model::new(reference.clone(), api_key);
        if let Some(entry) = self.lookup_ref(reference) {
            return model
                .with_name(entry.model.name)
                .with_provider_name(entry.provider.name)
                .with_color(entry.provider.color)
                .with_capability(entry.model.capability);
        }
        match self.provider(reference.provider_id()) {
            Some(provider) => model
                .with_provider_name(provider.name)
                .with_color(provider.color),
            None => model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_model() {
        let catalog = ModelCatalog::builtin();
        let entry = catalog.lookup("openai", "gpt-4o").unwrap();
        assert_eq!(entry.model.name, "GPT-4o");
        assert_eq!(entry.model.capability, 9);
        assert_eq!(entry.provider.name, "OpenAI");
    }

    #[test]
    fn test_lookup_unknown_model() {
        let catalog = ModelCatalog::builtin();
        assert!(catalog.lookup("openai", "does-not-exist").is_none());
        assert!(catalog.lookup("nobody", "gpt-4o").is_none());
    }

    #[test]
    fn test_builtin_has_ten_providers() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.providers().len(), 10);
        assert!(catalog.entries().all(|e| (1..=10).contains(&e.model.capability)));
    }

    #[test]
    fn test_search_requires_all_terms() {
        let catalog = ModelCatalog::builtin();
        let hits = catalog.search("claude haiku");
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|e| e.model.name.contains("Haiku")));

        assert_eq!(catalog.search("").len(), catalog.entries().count());
        assert!(catalog.search("nonexistent-term-xyz").is_empty());
    }

    #[test]
    fn test_resolve_known_model() {
        let catalog = ModelCatalog::builtin();
        let reference = ModelRef::new("anthropic", "claude-sonnet-4-20250514");
        let model = catalog.resolve(&reference, ApiKey::new("k"));
        assert_eq!(model.name, "Claude Sonnet 4");
        assert_eq!(model.provider_name, "Anthropic");
        assert_eq!(model.color, "#7c3aed");
        assert_eq!(model.capability, 9);
    }

    #[test]
    fn test_resolve_unknown_model_of_known_provider() {
        let catalog = ModelCatalog::builtin();
        let reference = ModelRef::new("groq", "brand-new-model");
        let model = catalog.resolve(&reference, ApiKey::default());
        assert_eq!(model.name, "brand-new-model");
        assert_eq!(model.provider_name, "Groq");
        assert_eq!(model.capability, Model::DEFAULT_CAPABILITY);
    }

    #[test]
    fn test_resolve_unknown_provider() {
        let catalog = ModelCatalog::builtin();
        let reference = ModelRef::new("local", "llama");
        let model = catalog.resolve(&reference, ApiKey::default());
        assert_eq!(model.provider_name, "local");
        assert_eq!(model.color, Model::DEFAULT_COLOR);
    }
}
