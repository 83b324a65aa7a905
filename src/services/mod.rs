//! Pricing, aggregation and data loading services

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod cost;
pub mod data_loader;
pub mod defaults;
pub mod matcher;
pub mod normalizer;
pub mod openrouter;
pub mod period;
pub mod pricing;
pub mod resolver;

pub use aggregator::{Aggregator, PeriodUsage};
pub use cache::ModelCacheService;
pub use config::{AppConfig, ConfigOverrides, LogLevel};
pub use cost::{calculate_message_cost, calculate_usage_cost, CostCalculator};
pub use data_loader::{DataLoaderService, LoadResult};
pub use matcher::{find_matching_model, ModelMatcher};
pub use normalizer::normalize_model_id;
pub use openrouter::{ModelLookup, OpenRouterClient};
pub use period::Period;
pub use pricing::load_all_model_configs;
pub use resolver::{resolve_unknown_models, resolve_unknown_models_from_openrouter};
