//! Discovery and parallel parsing of OpenCode message files

mod opencode;

pub use opencode::parse_message_file;

use crate::types::Message;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Message files below the messages directory
pub const MESSAGE_FILE_PATTERN: &str = "**/msg_*.json";

/// Scans a messages directory and decodes every message file in it
pub struct MessageParser {
    data_dir: PathBuf,
}

impl MessageParser {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All files matching the message pattern, in path order
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.data_dir.join(MESSAGE_FILE_PATTERN);
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).filter(|p| p.is_file()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Parse every message file in parallel.
    ///
    /// Invalid files are skipped with a warning. Messages sharing an id are
    /// kept once (first in path order).
    pub fn parse_all(&self) -> Vec<Message> {
        let files = self.collect_files();
        debug!("Found {} message files in {}", files.len(), self.data_dir.display());
        Self::parse_and_dedup(&files)
    }

    fn parse_and_dedup(files: &[PathBuf]) -> Vec<Message> {
        let parsed: Vec<Message> = files
            .par_iter()
            .filter_map(|f| match parse_message_file(f) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("Skipping invalid message file {}: {}", file_label(f), e);
                    None
                }
            })
            .collect();

        let mut seen: HashSet<String> = HashSet::with_capacity(parsed.len());
        parsed
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .collect()
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
