//! Unknown-model resolution
//!
//! Gives pricing to identifiers the first aggregation pass could not price,
//! first from local aliases, then from a remote lookup.

use tracing::{debug, warn};

use super::matcher::ModelMatcher;
use super::normalizer::normalize_model_id;
use super::openrouter::{is_author_slug, ModelLookup, OpenRouterClient};
use crate::types::{ModelConfig, ModelConfigMap};

/// Outcome of one resolution run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Input configs plus every resolved identifier
    pub configs: ModelConfigMap,
    /// Entries obtained from the remote lookup (worth caching)
    pub fetched: ModelConfigMap,
}

/// Local pricing for `model_id`: the fuzzy matcher, or a key whose last
/// `/` segment normalizes to the same id (`minimax/minimax-m2.1` serves
/// `minimax-m2-1`).
fn find_local_match<'a>(
    model_id: &str,
    configs: &'a ModelConfigMap,
    matcher: &ModelMatcher<'a>,
) -> Option<(&'a str, &'a ModelConfig)> {
    if let Some(found) = matcher.find_entry(model_id) {
        return Some(found);
    }

    let wanted = normalize_model_id(model_id);
    if wanted.is_empty() {
        return None;
    }
    configs.iter().find_map(|(key, config)| {
        let last_segment = key.rsplit('/').next().unwrap_or(key);
        (normalize_model_id(last_segment) == wanted).then_some((key.as_str(), config))
    })
}

/// Resolve `unknown_ids` against `configs` and `lookup`, one remote request
/// per identifier, sequentially. `configs` is never modified.
pub async fn resolve<L: ModelLookup>(
    unknown_ids: &[String],
    configs: &ModelConfigMap,
    lookup: &L,
) -> Resolution {
    let mut resolution = Resolution {
        configs: configs.clone(),
        fetched: ModelConfigMap::new(),
    };
    if unknown_ids.is_empty() {
        return resolution;
    }

    let matcher = ModelMatcher::new(configs);
    for model_id in unknown_ids {
        if let Some((key, config)) = find_local_match(model_id, configs, &matcher) {
            debug!("Resolved {} locally via {}", model_id, key);
            resolution.configs.insert(model_id.clone(), config.clone());
            continue;
        }

        if !is_author_slug(model_id) {
            debug!("Skipping remote lookup for {} (not author/slug)", model_id);
            continue;
        }

        match lookup.fetch_model(model_id).await {
            Some(config) => {
                debug!("Resolved {} from OpenRouter", model_id);
                resolution.configs.insert(model_id.clone(), config.clone());
                resolution.fetched.insert(model_id.clone(), config);
            }
            None => debug!("No remote pricing for {}", model_id),
        }
    }

    resolution
}

/// New config map with pricing for as many of `unknown_ids` as possible
pub async fn resolve_unknown_models<L: ModelLookup>(
    unknown_ids: &[String],
    configs: &ModelConfigMap,
    lookup: &L,
) -> ModelConfigMap {
    resolve(unknown_ids, configs, lookup).await.configs
}

/// Resolve through OpenRouter; an empty key disables the lookup entirely
pub async fn resolve_unknown_models_from_openrouter(
    unknown_ids: &[String],
    configs: &ModelConfigMap,
    api_key: &str,
) -> ModelConfigMap {
    if unknown_ids.is_empty() || api_key.trim().is_empty() {
        return configs.clone();
    }

    match OpenRouterClient::new(api_key.trim()) {
        Ok(client) => resolve_unknown_models(unknown_ids, configs, &client).await,
        Err(e) => {
            warn!("OpenRouter lookup disabled: {}", e);
            configs.clone()
        }
    }
}
