//! Built-in pricing table, dollars per million tokens

use crate::types::{ModelConfig, ModelConfigMap};

struct DefaultPricing {
    model: &'static str,
    input: f64,
    output: f64,
    cache: Option<f64>,
    context_window: u64,
    description: &'static str,
}

static DEFAULT_PRICING: &[DefaultPricing] = &[
    // Anthropic
    DefaultPricing {
        model: "claude-3-5-sonnet-20241022",
        input: 3.0,
        output: 15.0,
        cache: Some(0.3),
        context_window: 200_000,
        description: "Claude 3.5 Sonnet",
    },
    DefaultPricing {
        model: "claude-3-5-haiku-20241022",
        input: 0.8,
        output: 4.0,
        cache: Some(0.08),
        context_window: 200_000,
        description: "Claude 3.5 Haiku",
    },
    DefaultPricing {
        model: "claude-3-7-sonnet-20250219",
        input: 3.0,
        output: 15.0,
        cache: Some(0.3),
        context_window: 200_000,
        description: "Claude 3.7 Sonnet",
    },
    DefaultPricing {
        model: "claude-sonnet-4-20250514",
        input: 3.0,
        output: 15.0,
        cache: Some(0.3),
        context_window: 200_000,
        description: "Claude Sonnet 4",
    },
    DefaultPricing {
        model: "claude-sonnet-4-5-20250929",
        input: 3.0,
        output: 15.0,
        cache: Some(0.3),
        context_window: 200_000,
        description: "Claude Sonnet 4.5",
    },
    DefaultPricing {
        model: "claude-opus-4-20250514",
        input: 15.0,
        output: 75.0,
        cache: Some(1.5),
        context_window: 200_000,
        description: "Claude Opus 4",
    },
    DefaultPricing {
        model: "claude-opus-4-1-20250805",
        input: 15.0,
        output: 75.0,
        cache: Some(1.5),
        context_window: 200_000,
        description: "Claude Opus 4.1",
    },
    DefaultPricing {
        model: "claude-opus-4-5-20251101",
        input: 5.0,
        output: 25.0,
        cache: Some(0.5),
        context_window: 200_000,
        description: "Claude Opus 4.5",
    },
    DefaultPricing {
        model: "claude-haiku-4-5-20251001",
        input: 1.0,
        output: 5.0,
        cache: Some(0.1),
        context_window: 200_000,
        description: "Claude Haiku 4.5",
    },
    // OpenAI
    DefaultPricing {
        model: "gpt-4o",
        input: 2.5,
        output: 10.0,
        cache: Some(1.25),
        context_window: 128_000,
        description: "GPT-4o",
    },
    DefaultPricing {
        model: "gpt-4o-mini",
        input: 0.15,
        output: 0.6,
        cache: Some(0.075),
        context_window: 128_000,
        description: "GPT-4o mini",
    },
    DefaultPricing {
        model: "gpt-4.1",
        input: 2.0,
        output: 8.0,
        cache: Some(0.5),
        context_window: 1_047_576,
        description: "GPT-4.1",
    },
    DefaultPricing {
        model: "gpt-5",
        input: 1.25,
        output: 10.0,
        cache: Some(0.125),
        context_window: 400_000,
        description: "GPT-5",
    },
    DefaultPricing {
        model: "gpt-5-mini",
        input: 0.25,
        output: 2.0,
        cache: Some(0.025),
        context_window: 400_000,
        description: "GPT-5 mini",
    },
    DefaultPricing {
        model: "o3",
        input: 2.0,
        output: 8.0,
        cache: Some(0.5),
        context_window: 200_000,
        description: "OpenAI o3",
    },
    DefaultPricing {
        model: "o4-mini",
        input: 1.1,
        output: 4.4,
        cache: Some(0.275),
        context_window: 200_000,
        description: "OpenAI o4-mini",
    },
    // Google
    DefaultPricing {
        model: "gemini-2.0-flash",
        input: 0.1,
        output: 0.4,
        cache: Some(0.025),
        context_window: 1_048_576,
        description: "Gemini 2.0 Flash",
    },
    DefaultPricing {
        model: "gemini-2.5-pro",
        input: 1.25,
        output: 10.0,
        cache: Some(0.31),
        context_window: 1_048_576,
        description: "Gemini 2.5 Pro",
    },
    DefaultPricing {
        model: "gemini-2.5-flash",
        input: 0.3,
        output: 2.5,
        cache: Some(0.075),
        context_window: 1_048_576,
        description: "Gemini 2.5 Flash",
    },
    // xAI
    DefaultPricing {
        model: "grok-3",
        input: 3.0,
        output: 15.0,
        cache: Some(0.75),
        context_window: 131_072,
        description: "Grok 3",
    },
    DefaultPricing {
        model: "grok-4",
        input: 3.0,
        output: 15.0,
        cache: Some(0.75),
        context_window: 256_000,
        description: "Grok 4",
    },
];

/// Built-in pricing; the lowest-precedence source
pub fn default_model_configs() -> ModelConfigMap {
    DEFAULT_PRICING
        .iter()
        .map(|p| {
            (
                p.model.to_string(),
                ModelConfig {
                    input_cost_per_million: p.input,
                    output_cost_per_million: p.output,
                    cache_cost_per_million: p.cache,
                    context_window: p.context_window,
                    description: p.description.to_string(),
                },
            )
        })
        .collect()
}
