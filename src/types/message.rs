//! OpenCode message records

use serde::{Deserialize, Deserializer, Serialize};

use super::PartialTokenUsage;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageTime {
    /// Unix timestamp in milliseconds
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
}

/// A single message file (`msg_*.json`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub role: MessageRole,
    pub time: MessageTime,
    #[serde(rename = "modelID", default, deserialize_with = "null_as_default")]
    pub model_id: String,
    #[serde(rename = "providerID", default, deserialize_with = "null_as_default")]
    pub provider_id: String,
    #[serde(default)]
    pub tokens: Option<PartialTokenUsage>,
    /// Cost reported by the provider, 0 when unknown
    #[serde(default, deserialize_with = "null_as_default")]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
