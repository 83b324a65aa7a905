//! Fuzzy model identifier → pricing lookup

use tracing::debug;

use super::normalizer::{build_candidate_ids, normalize_model_id, strip_provider_prefix};
use crate::types::{ModelConfig, ModelConfigMap};

const GPT_FALLBACK: &str = "gpt-4o";

struct IndexedEntry<'a> {
    key: &'a str,
    normalized: String,
    config: &'a ModelConfig,
}

/// Matches raw model identifiers against a pricing table.
///
/// Lookup order, first hit wins:
/// 1. exact key
/// 2. key with the provider prefix removed
/// 3. normalized candidates against normalized keys (equal, then `candidate-` prefix)
/// 4. `gpt-4o` family fallback for other GPT identifiers
pub struct ModelMatcher<'a> {
    configs: &'a ModelConfigMap,
    index: Vec<IndexedEntry<'a>>,
}

impl<'a> ModelMatcher<'a> {
    pub fn new(configs: &'a ModelConfigMap) -> Self {
        let index = configs
            .iter()
            .map(|(key, config)| IndexedEntry {
                key,
                normalized: normalize_model_id(key),
                config,
            })
            .collect();
        Self { configs, index }
    }

    pub fn find(&self, model_id: &str) -> Option<&'a ModelConfig> {
        self.find_entry(model_id).map(|(_, config)| config)
    }

    /// Like [`find`](Self::find), but also returns the key that matched
    pub fn find_entry(&self, model_id: &str) -> Option<(&'a str, &'a ModelConfig)> {
        if let Some((key, config)) = self.configs.get_key_value(model_id) {
            return Some((key.as_str(), config));
        }

        let base_id = strip_provider_prefix(model_id);
        if let Some((key, config)) = self.configs.get_key_value(base_id) {
            debug!("Using {} pricing for {}", key, model_id);
            return Some((key.as_str(), config));
        }

        for candidate in build_candidate_ids(base_id) {
            if let Some(entry) = self.lookup_indexed(&candidate) {
                debug!("Using {} pricing for {}", entry.key, model_id);
                return Some((entry.key, entry.config));
            }
        }

        if normalize_model_id(base_id).starts_with("gpt-") {
            if let Some(entry) = self.lookup_indexed(GPT_FALLBACK) {
                debug!("Using {} pricing for {} (gpt fallback)", entry.key, model_id);
                return Some((entry.key, entry.config));
            }
        }

        None
    }

    fn lookup_indexed(&self, candidate: &str) -> Option<&IndexedEntry<'a>> {
        let prefix = format!("{}-", candidate);
        self.index
            .iter()
            .find(|entry| entry.normalized == candidate)
            .or_else(|| {
                self.index
                    .iter()
                    .find(|entry| entry.normalized.starts_with(&prefix))
            })
    }
}

/// One-shot lookup; build a [`ModelMatcher`] when matching many identifiers
pub fn find_matching_model<'a>(model_id: &str, configs: &'a ModelConfigMap) -> Option<&'a ModelConfig> {
    ModelMatcher::new(configs).find(model_id)
}
