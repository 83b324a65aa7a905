//! Token counts → dollar costs

use tracing::debug;

use super::matcher::ModelMatcher;
use crate::types::{
    normalize_tokens, Message, ModelConfig, ModelConfigMap, TokenUsage, UnknownModels,
    UsageSummary,
};

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

fn tokens_to_cost(tokens: u64, cost_per_million: f64) -> f64 {
    tokens as f64 / TOKENS_PER_MILLION * cost_per_million
}

/// Price tokens with an already matched config
pub fn price_tokens(tokens: &TokenUsage, config: &ModelConfig) -> UsageSummary {
    let mut usage = UsageSummary::tokens_only(tokens);
    usage.input_cost = tokens_to_cost(usage.input_tokens, config.input_cost_per_million);
    usage.output_cost = tokens_to_cost(usage.output_tokens, config.output_cost_per_million);
    usage.cache_cost = tokens_to_cost(usage.cache_tokens, config.cache_cost_per_million());
    usage.total_cost = usage.input_cost + usage.output_cost + usage.cache_cost;
    usage
}

/// Cost calculator bound to one pricing table.
///
/// Builds the fuzzy-match index once and reuses it for every message.
pub struct CostCalculator<'a> {
    matcher: ModelMatcher<'a>,
}

impl<'a> CostCalculator<'a> {
    pub fn new(configs: &'a ModelConfigMap) -> Self {
        Self {
            matcher: ModelMatcher::new(configs),
        }
    }

    /// Unmatched identifiers are recorded in `unknown` and cost nothing.
    /// Blank identifiers also cost nothing but are never recorded, so the
    /// unknown-model notice only lists names that could be resolved.
    pub fn usage_cost(
        &self,
        tokens: &TokenUsage,
        model_id: &str,
        unknown: &mut UnknownModels,
    ) -> UsageSummary {
        if model_id.trim().is_empty() {
            return UsageSummary::tokens_only(tokens);
        }

        match self.matcher.find(model_id) {
            Some(config) => price_tokens(tokens, config),
            None => {
                if unknown.record(model_id) {
                    debug!("Unknown model: {} (cost set to 0)", model_id);
                }
                UsageSummary::tokens_only(tokens)
            }
        }
    }

    pub fn message_cost(&self, message: &Message, unknown: &mut UnknownModels) -> UsageSummary {
        let Some(raw_tokens) = message.tokens.as_ref() else {
            return UsageSummary::default();
        };
        let tokens = normalize_tokens(Some(raw_tokens));

        // Provider-reported cost wins over the pricing table
        if message.cost > 0.0 {
            return self.recorded_cost(&tokens, &message.model_id, message.cost);
        }

        self.usage_cost(&tokens, &message.model_id, unknown)
    }

    /// Spread a recorded total over the three components.
    ///
    /// Shares follow the matched config's own breakdown, or the token mix when
    /// the model is unpriced. Misses here are not recorded as unknown.
    fn recorded_cost(&self, tokens: &TokenUsage, model_id: &str, cost: f64) -> UsageSummary {
        let mut usage = UsageSummary::tokens_only(tokens);
        let priced = self
            .matcher
            .find(model_id)
            .map(|config| price_tokens(tokens, config))
            .filter(|priced| priced.total_cost > 0.0);

        let (input, output, cache, total) = match priced {
            Some(p) => (p.input_cost, p.output_cost, p.cache_cost, p.total_cost),
            None => (
                usage.input_tokens as f64,
                usage.output_tokens as f64,
                usage.cache_tokens as f64,
                usage.total_tokens() as f64,
            ),
        };

        if total > 0.0 {
            usage.input_cost = cost * input / total;
            usage.output_cost = cost * output / total;
            usage.cache_cost = cost - usage.input_cost - usage.output_cost;
        } else {
            usage.input_cost = cost;
        }
        usage.total_cost = cost;
        usage
    }
}

pub fn calculate_usage_cost(
    tokens: &TokenUsage,
    model_id: &str,
    configs: &ModelConfigMap,
    unknown: &mut UnknownModels,
) -> UsageSummary {
    CostCalculator::new(configs).usage_cost(tokens, model_id, unknown)
}

pub fn calculate_message_cost(
    message: &Message,
    configs: &ModelConfigMap,
    unknown: &mut UnknownModels,
) -> UsageSummary {
    CostCalculator::new(configs).message_cost(message, unknown)
}
