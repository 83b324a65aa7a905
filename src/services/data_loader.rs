//! Report data pipeline
//!
//! Loads pricing and messages once, aggregates them into sessions, and when
//! some models could not be priced, resolves them and aggregates again.

use std::path::PathBuf;
use tracing::{debug, warn};

use super::config::AppConfig;
use super::openrouter::{ModelLookup, OpenRouterClient};
use super::pricing::load_all_model_configs;
use super::resolver::resolve;
use super::{Aggregator, ModelCacheService};
use crate::parsers::MessageParser;
use crate::types::{ModelConfigMap, OcusageError, Result, Session, UnknownModels};

/// Sessions ready for reporting
#[derive(Debug)]
pub struct LoadResult {
    pub sessions: Vec<Session>,
    /// Models still unpriced after resolution
    pub unknown_models: UnknownModels,
    /// Pricing table the sessions were priced with
    pub configs: ModelConfigMap,
}

pub struct DataLoaderService {
    parser: MessageParser,
    models_path: PathBuf,
    cache: ModelCacheService,
    api_key: Option<String>,
}

impl DataLoaderService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            parser: MessageParser::with_data_dir(config.messages_dir.clone()),
            models_path: config.models_path.clone(),
            cache: ModelCacheService::with_path(config.cache_path.clone()),
            api_key: config.openrouter_api_key.clone(),
        }
    }

    /// Load with OpenRouter resolution when an API key is configured
    pub async fn load(&self) -> Result<LoadResult> {
        let client = match self.api_key.as_deref() {
            Some(key) => match OpenRouterClient::new(key) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("OpenRouter lookup disabled: {}", e);
                    None
                }
            },
            None => None,
        };
        self.load_with(client.as_ref()).await
    }

    /// Two-pass load; `lookup` of `None` disables remote resolution
    pub async fn load_with<L: ModelLookup>(&self, lookup: Option<&L>) -> Result<LoadResult> {
        let messages_dir = self.parser.data_dir();
        if !messages_dir.is_dir() {
            return Err(OcusageError::NotFound(format!(
                "Messages directory not found: {}",
                messages_dir.display()
            )));
        }

        let cached = self.cache.load();
        let configs = load_all_model_configs(&self.models_path, &cached);
        let messages = self.parser.parse_all();
        debug!("Parsed {} messages", messages.len());

        let batch = Aggregator::aggregate_sessions(&messages, &configs);

        let Some(lookup) = lookup.filter(|_| !batch.unknown_models.is_empty()) else {
            return Ok(LoadResult {
                sessions: batch.sessions,
                unknown_models: batch.unknown_models,
                configs,
            });
        };

        debug!("Resolving {} unknown models", batch.unknown_models.len());
        let resolution = resolve(batch.unknown_models.models(), &configs, lookup).await;

        if !resolution.fetched.is_empty() {
            if let Err(e) = self.cache.update(&resolution.fetched) {
                warn!("Failed to update model cache: {}", e);
            }
        }

        let batch = Aggregator::aggregate_sessions(&messages, &resolution.configs);
        Ok(LoadResult {
            sessions: batch.sessions,
            unknown_models: batch.unknown_models,
            configs: resolution.configs,
        })
    }
}
