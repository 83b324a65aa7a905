//! Pricing table loading
//!
//! Merges pricing from three sources, later ones winning on key collision:
//! built-in defaults, a local JSON file or directory of JSON files, and
//! entries previously resolved remotely and cached on disk.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::defaults::default_model_configs;
use crate::types::{ModelConfig, ModelConfigMap, ValidationError};

/// Parse one pricing entry (camelCase or snake_case field names)
pub fn parse_model_config(value: &Value) -> Result<ModelConfig, ValidationError> {
    ModelConfig::from_json(value)
}

/// Valid entries of a pricing object plus the rejected ones with their reason
#[derive(Debug, Default)]
pub struct ParsedConfigs {
    pub configs: ModelConfigMap,
    pub rejected: Vec<(String, ValidationError)>,
}

/// Parse a `{ "<model id>": { ...pricing } }` object, keeping every valid entry
pub fn parse_model_configs(value: &Value) -> Result<ParsedConfigs, ValidationError> {
    let entries = value.as_object().ok_or(ValidationError::NotAnObject)?;
    let mut parsed = ParsedConfigs::default();

    for (model_id, raw) in entries {
        match parse_model_config(raw) {
            Ok(config) => {
                parsed.configs.insert(model_id.clone(), config);
            }
            Err(e) => parsed.rejected.push((model_id.clone(), e)),
        }
    }

    Ok(parsed)
}

/// Load one pricing file. Unreadable or malformed files contribute nothing.
pub fn load_model_configs(path: &Path) -> ModelConfigMap {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Model config not readable at {}: {}", path.display(), e);
            return ModelConfigMap::new();
        }
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse model config at {}: {}", path.display(), e);
            return ModelConfigMap::new();
        }
    };

    match parse_model_configs(&value) {
        Ok(parsed) => {
            for (model_id, e) in &parsed.rejected {
                warn!("Invalid model config for {} in {}: {} (skipped)", model_id, path.display(), e);
            }
            parsed.configs
        }
        Err(e) => {
            warn!("Invalid model config format at {}: {}", path.display(), e);
            ModelConfigMap::new()
        }
    }
}

/// Load every `*.json` file in `dir`, merged in path order (later files win)
pub fn load_model_configs_from_dir(dir: &Path) -> ModelConfigMap {
    let pattern = dir.join("*.json");
    let mut paths: Vec<PathBuf> = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect(),
        Err(e) => {
            warn!("Invalid model config directory {}: {}", dir.display(), e);
            return ModelConfigMap::new();
        }
    };
    paths.sort();

    let mut merged = ModelConfigMap::new();
    for path in paths {
        merged.extend(load_model_configs(&path));
    }
    merged
}

/// Local pricing from a file or a directory; nothing when the path is absent
pub fn load_local_model_configs(path: &Path) -> ModelConfigMap {
    if path.is_dir() {
        load_model_configs_from_dir(path)
    } else if path.is_file() {
        load_model_configs(path)
    } else {
        debug!("No local model config at {}", path.display());
        ModelConfigMap::new()
    }
}

/// Defaults ⊕ local pricing ⊕ cached remote entries
pub fn load_all_model_configs(path: &Path, cached: &ModelConfigMap) -> ModelConfigMap {
    let mut configs = default_model_configs();
    configs.extend(load_local_model_configs(path));
    configs.extend(cached.iter().map(|(k, v)| (k.clone(), v.clone())));
    configs
}
