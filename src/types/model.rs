//! Model pricing records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use super::ValidationError;

/// Pricing for one model identifier, in dollars per million tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub input_cost_per_million: f64,
    pub output_cost_per_million: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_cost_per_million: Option<f64>,
    pub context_window: u64,
    pub description: String,
}

/// Model identifier → pricing
pub type ModelConfigMap = BTreeMap<String, ModelConfig>;

impl ModelConfig {
    /// Effective cache rate; falls back to the input rate when unset
    pub fn cache_cost_per_million(&self) -> f64 {
        self.cache_cost_per_million
            .unwrap_or(self.input_cost_per_million)
    }

    /// Parse one pricing entry, accepting camelCase or snake_case field names.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let record = value.as_object().ok_or(ValidationError::NotAnObject)?;

        let input_cost_per_million =
            number_field(record, &["inputCostPerMillion", "input_cost_per_million"])
                .ok_or(ValidationError::MissingField("inputCostPerMillion"))?;
        let output_cost_per_million =
            number_field(record, &["outputCostPerMillion", "output_cost_per_million"])
                .ok_or(ValidationError::MissingField("outputCostPerMillion"))?;
        let context_window = number_field(record, &["contextWindow", "context_window"])
            .ok_or(ValidationError::MissingField("contextWindow"))?;
        let description = string_field(record, &["description"])
            .ok_or(ValidationError::MissingField("description"))?;

        let cache_keys = ["cacheCostPerMillion", "cache_cost_per_million"];
        let cache_cost_per_million = number_field(record, &cache_keys);
        if cache_cost_per_million.is_none()
            && cache_keys.iter().any(|k| record.get(*k).is_some_and(|v| !v.is_null()))
        {
            warn!("Ignoring unusable cache rate for \"{}\"", description);
        }

        Ok(Self {
            input_cost_per_million,
            output_cost_per_million,
            cache_cost_per_million,
            context_window: context_window as u64,
            description: description.to_string(),
        })
    }
}

/// First finite, non-negative number among `keys`
fn number_field(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn string_field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_str)
}
