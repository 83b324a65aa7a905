//! Remote pricing cache
//!
//! Keeps pricing resolved from OpenRouter in a single JSON blob so later
//! runs do not hit the network for the same identifiers.

use crate::types::{ModelConfigMap, OcusageError, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entries expire 24 hours after the blob was first written
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelCacheData {
    /// Epoch ms when the blob was created
    pub timestamp: i64,
    pub models: ModelConfigMap,
}

impl ModelCacheData {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < CACHE_TTL_MS
    }
}

pub struct ModelCacheService {
    path: PathBuf,
}

impl ModelCacheService {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached entries, or an empty map if the cache is missing, corrupt or expired
    pub fn load(&self) -> ModelConfigMap {
        self.load_at(now_ms())
    }

    pub fn load_at(&self, now_ms: i64) -> ModelConfigMap {
        match self.read() {
            Some(data) if data.is_valid_at(now_ms) => data.models,
            Some(_) => {
                debug!("Model cache at {} expired", self.path.display());
                ModelConfigMap::new()
            }
            None => ModelConfigMap::new(),
        }
    }

    /// Replace the cache with `models` and a fresh timestamp
    pub fn save(&self, models: &ModelConfigMap) -> Result<()> {
        self.write(&ModelCacheData {
            timestamp: now_ms(),
            models: models.clone(),
        })
    }

    /// Merge `entries` into the existing blob.
    ///
    /// The blob keeps its timestamp while it is still valid, so merged entries
    /// expire together with the ones already cached.
    pub fn update(&self, entries: &ModelConfigMap) -> Result<()> {
        self.update_at(entries, now_ms())
    }

    pub fn update_at(&self, entries: &ModelConfigMap, now_ms: i64) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut data = match self.read() {
            Some(existing) => {
                let timestamp = if existing.is_valid_at(now_ms) {
                    existing.timestamp
                } else {
                    now_ms
                };
                ModelCacheData {
                    timestamp,
                    models: existing.models,
                }
            }
            None => ModelCacheData {
                timestamp: now_ms,
                models: ModelConfigMap::new(),
            },
        };
        data.models
            .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.write(&data)
    }

    /// Read under a shared lock; problems are logged and yield `None`
    fn read(&self) -> Option<ModelCacheData> {
        if !self.path.exists() {
            return None;
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Failed to open model cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        if let Err(e) = file.lock_shared() {
            warn!("Failed to acquire read lock on model cache: {}", e);
            return None;
        }

        let mut content = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut content);
        let _ = file.unlock();

        if let Err(e) = read {
            warn!("Failed to read model cache {}: {}", self.path.display(), e);
            return None;
        }

        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Model cache is corrupted, ignoring it: {}", e);
                None
            }
        }
    }

    /// Atomic write (temp file + rename) under an exclusive lock
    fn write(&self, data: &ModelCacheData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| OcusageError::Cache(format!("Serialization failed: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)
                .map_err(|e| OcusageError::Cache(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| OcusageError::Cache(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| OcusageError::Cache(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        target
            .lock_exclusive()
            .map_err(|e| OcusageError::Cache(format!("Failed to acquire write lock: {}", e)))?;

        let renamed = fs::rename(&temp_path, &self.path)
            .map_err(|e| OcusageError::Cache(format!("Failed to rename temp file: {}", e)));
        let _ = target.unlock();
        renamed
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
