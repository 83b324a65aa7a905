//! Session aggregates

use chrono::{DateTime, Local, TimeZone};
use std::collections::BTreeMap;

use super::{Message, UnknownModels, UsageSummary};

/// Id used for the empty-input sentinel and for sessions without an id
pub const UNKNOWN_SESSION_ID: &str = "unknown";

/// Display value when a session used more than one model
pub const MIXED_MODELS: &str = "mixed";

/// All messages sharing one session id, with their summed usage
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    /// Earliest `time.created` (epoch ms)
    pub start_time: i64,
    /// Latest `time.created` (epoch ms)
    pub end_time: i64,
    /// Per-model breakdown; messages without a model id are left out
    pub models: BTreeMap<String, UsageSummary>,
    pub messages: Vec<Message>,
    pub usage: UsageSummary,
}

impl Session {
    /// Sentinel returned for an empty message list
    pub fn empty() -> Self {
        Self {
            id: UNKNOWN_SESSION_ID.to_string(),
            start_time: 0,
            end_time: 0,
            models: BTreeMap::new(),
            messages: Vec::new(),
            usage: UsageSummary::default(),
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        self.end_time.saturating_sub(self.start_time) as f64 / 60_000.0
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// `""` with no models, the id with one, `"mixed"` otherwise
    pub fn model_display(&self) -> &str {
        let mut names = self.models.keys();
        match (names.next(), names.next()) {
            (None, _) => "",
            (Some(only), None) => only,
            _ => MIXED_MODELS,
        }
    }

    pub fn uses_model(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    pub fn start_local(&self) -> DateTime<Local> {
        local_from_millis(self.start_time)
    }

    pub fn end_local(&self) -> DateTime<Local> {
        local_from_millis(self.end_time)
    }
}

/// Convert epoch milliseconds into local time, clamping out-of-range values to the epoch
pub fn local_from_millis(millis: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct SessionBatch {
    pub sessions: Vec<Session>,
    pub unknown_models: UnknownModels,
}
