//! OpenRouter pricing lookup for model identifiers without local pricing

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::types::{ModelConfig, OcusageError, Result};

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Source of pricing for a single model identifier
#[allow(async_fn_in_trait)]
pub trait ModelLookup {
    /// `None` on any failure; callers treat lookups as best-effort
    async fn fetch_model(&self, model_id: &str) -> Option<ModelConfig>;
}

#[derive(Debug, Deserialize)]
struct EndpointsResponse {
    data: Option<EndpointsData>,
}

#[derive(Debug, Deserialize)]
struct EndpointsData {
    id: Option<String>,
    name: Option<String>,
    context_length: Option<f64>,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    pricing: Option<EndpointPricing>,
}

#[derive(Debug, Deserialize)]
struct EndpointPricing {
    prompt: Option<Price>,
    completion: Option<Price>,
    input_cache_read: Option<Price>,
}

/// OpenRouter sends decimal strings; plain numbers are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Price {
    Text(String),
    Number(f64),
}

impl Price {
    fn per_million(&self) -> f64 {
        let per_token = match self {
            Price::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Price::Number(n) => *n,
        };
        if per_token.is_finite() {
            per_token * TOKENS_PER_MILLION
        } else {
            0.0
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Price::Text(s) if s.trim().is_empty())
    }
}

/// `author/slug`: exactly two non-empty `/`-separated parts
pub fn is_author_slug(model_id: &str) -> bool {
    let mut parts = model_id.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(author), Some(slug), None) if !author.is_empty() && !slug.is_empty()
    )
}

/// Pricing from the first endpoint of a `/models/{id}/endpoints` response
pub fn parse_endpoints_response(body: &str) -> Option<ModelConfig> {
    let response: EndpointsResponse = serde_json::from_str(body).ok()?;
    let data = response.data?;
    let pricing = data.endpoints.into_iter().next()?.pricing?;

    let cache_cost_per_million = pricing
        .input_cache_read
        .filter(|p| !p.is_blank())
        .map(|p| p.per_million());

    Some(ModelConfig {
        input_cost_per_million: pricing.prompt.map(|p| p.per_million()).unwrap_or(0.0),
        output_cost_per_million: pricing.completion.map(|p| p.per_million()).unwrap_or(0.0),
        cache_cost_per_million,
        context_window: data
            .context_length
            .filter(|c| c.is_finite() && *c > 0.0)
            .map(|c| c as u64)
            .unwrap_or(0),
        description: data.name.or(data.id).unwrap_or_default(),
    })
}

/// Async OpenRouter client
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENROUTER_API_URL)
    }

    /// Client against a custom API root (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OcusageError::Pricing(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoints_url(&self, model_id: &str) -> String {
        format!("{}/models/{}/endpoints", self.base_url, model_id)
    }

    async fn fetch_endpoints(&self, model_id: &str) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(self.endpoints_url(model_id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))
    }
}

impl ModelLookup for OpenRouterClient {
    async fn fetch_model(&self, model_id: &str) -> Option<ModelConfig> {
        if !is_author_slug(model_id) {
            return None;
        }

        match self.fetch_endpoints(model_id).await {
            Ok(body) => {
                let config = parse_endpoints_response(&body);
                if config.is_none() {
                    debug!("OpenRouter response for {} had no usable pricing", model_id);
                }
                config
            }
            Err(e) => {
                debug!("OpenRouter lookup for {} failed: {}", model_id, e);
                None
            }
        }
    }
}
