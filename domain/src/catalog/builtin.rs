//! Built-in provider registry

use super::{CatalogModel, CatalogProvider};

const fn model(
    id: &'static str,
    name: &'static str,
    capability: u8,
    input_cost_per_1m: f64,
    output_cost_per_1m: f64,
) -> CatalogModel {
    CatalogModel {
        id,
        name,
        capability,
        input_cost_per_1m,
        output_cost_per_1m,
    }
}

pub(super) static PROVIDERS: &[CatalogProvider] = &[
    CatalogProvider {
        id: "openai",
        name: "OpenAI",
        color: "#10a37f",
        models: &[
            model("gpt-4o", "GPT-4o", 9, 2.5, 10.0),
            model("gpt-4o-mini", "GPT-4o Mini", 7, 0.15, 0.6),
            model("gpt-4-turbo", "GPT-4 Turbo", 8, 10.0, 30.0),
            model("o1", "o1", 10, 15.0, 60.0),
            model("o1-mini", "o1 Mini", 8, 3.0, 12.0),
        ],
    },
    CatalogProvider {
        id: "anthropic",
        name: "Anthropic",
        color: "#7c3aed",
        models: &[
            model("claude-sonnet-4-20250514", "Claude Sonnet 4", 9, 3.0, 15.0),
            model("claude-opus-4-0-20250514", "Claude Opus 4", 10, 15.0, 75.0),
            model("claude-3-5-haiku-20241022", "Claude 3.5 Haiku", 7, 0.8, 4.0),
        ],
    },
    CatalogProvider {
        id: "google",
        name: "Google Gemini",
        color: "#4285f4",
        models: &[
            model("gemini-2.0-flash", "Gemini 2.0 Flash", 8, 0.1, 0.4),
            model("gemini-1.5-pro", "Gemini 1.5 Pro", 9, 1.25, 5.0),
            model("gemini-1.5-flash", "Gemini 1.5 Flash", 7, 0.075, 0.3),
        ],
    },
    CatalogProvider {
        id: "mistral",
        name: "Mistral AI",
        color: "#ff7000",
        models: &[
            model("mistral-large-latest", "Mistral Large", 8, 2.0, 6.0),
            model("mistral-medium-latest", "Mistral Medium", 7, 2.7, 8.1),
            model("mistral-small-latest", "Mistral Small", 6, 0.2, 0.6),
            model("open-mixtral-8x22b", "Mixtral 8x22B", 7, 2.0, 6.0),
        ],
    },
    CatalogProvider {
        id: "groq",
        name: "Groq",
        color: "#f55036",
        models: &[
            model("llama-3.3-70b-versatile", "Llama 3.3 70B", 8, 0.59, 0.79),
            model("llama-3.1-70b-versatile", "Llama 3.1 70B", 8, 0.59, 0.79),
            model("llama-3.1-8b-instant", "Llama 3.1 8B", 6, 0.05, 0.08),
            model("llama-3.2-3b-preview", "Llama 3.2 3B", 5, 0.06, 0.06),
            model("llama-3.2-1b-preview", "Llama 3.2 1B", 4, 0.04, 0.04),
            model("gemma2-9b-it", "Gemma 2 9B", 6, 0.2, 0.2),
            model("mixtral-8x7b-32768", "Mixtral 8x7B", 7, 0.24, 0.24),
        ],
    },
    CatalogProvider {
        id: "cohere",
        name: "Cohere",
        color: "#d18ee2",
        models: &[
            model("command-r-plus", "Command R+", 8, 2.5, 10.0),
            model("command-r", "Command R", 7, 0.15, 0.6),
            model("command-light", "Command Light", 5, 0.3, 0.6),
        ],
    },
    CatalogProvider {
        id: "perplexity",
        name: "Perplexity",
        color: "#20808d",
        models: &[
            model("sonar-pro", "Sonar Pro", 8, 3.0, 15.0),
            model("sonar", "Sonar", 7, 1.0, 1.0),
        ],
    },
    CatalogProvider {
        id: "xai",
        name: "xAI (Grok)",
        color: "#a0a0a0",
        models: &[
            model("grok-2", "Grok 2", 8, 2.0, 10.0),
            model("grok-2-mini", "Grok 2 Mini", 6, 0.3, 0.5),
        ],
    },
    CatalogProvider {
        id: "deepseek",
        name: "DeepSeek",
        color: "#4D6BFE",
        models: &[
            model("deepseek-chat", "DeepSeek Chat", 8, 0.14, 0.28),
            model("deepseek-reasoner", "DeepSeek Reasoner", 9, 0.55, 2.19),
        ],
    },
    CatalogProvider {
        id: "openrouter",
        name: "OpenRouter",
        color: "#6366f1",
        models: &[
            model("openai/gpt-4o", "GPT-4o (via OpenRouter)", 9, 2.5, 10.0),
            model(
                "anthropic/claude-sonnet-4-20250514",
                "Claude Sonnet 4 (via OpenRouter)",
                9,
                3.0,
                15.0,
            ),
            model(
                "google/gemini-2.0-flash-001",
                "Gemini 2.0 Flash (via OpenRouter)",
                8,
                0.1,
                0.4,
            ),
            model(
                "meta-llama/llama-3.3-70b-instruct",
                "Llama 3.3 70B (via OpenRouter)",
                8,
                0.4,
                0.4,
            ),
            model("deepseek/deepseek-r1", "DeepSeek R1 (via OpenRouter)", 9, 0.55, 2.19),
        ],
    },
];
