//! Runtime configuration
//!
//! Each setting resolves as CLI flag, then environment variable, then default.

use directories::BaseDirs;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const ENV_MESSAGES_DIR: &str = "OCUSAGE_MESSAGES_DIR";
pub const ENV_MODELS_FILE: &str = "OCUSAGE_MODELS_FILE";
pub const ENV_LOG_LEVEL: &str = "OCUSAGE_LOG_LEVEL";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

const DEFAULT_MESSAGES_DIR: &str = "~/.local/share/opencode/storage/message";
const DEFAULT_MODELS_PATH: &str = "~/.config/ocusage/models";
const DEFAULT_CACHE_PATH: &str = "~/.cache/ocusage/models-cache.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub messages_dir: Option<String>,
    pub models_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub messages_dir: PathBuf,
    pub models_path: PathBuf,
    pub cache_path: PathBuf,
    pub log_level: LogLevel,
    /// `None` when unset or blank
    pub openrouter_api_key: Option<String>,
}

impl AppConfig {
    /// Resolve against the process environment and home directory
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let home = BaseDirs::new().map(|d| d.home_dir().to_path_buf());
        Self::resolve_with(overrides, &env, home.as_deref())
    }

    /// Resolve against an explicit environment (useful for testing)
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: &HashMap<String, String>,
        home: Option<&Path>,
    ) -> Self {
        let env_value = |key: &str| non_blank(env.get(key).map(String::as_str));

        let pick_path = |flag: Option<&str>, key: &str, default: &str| {
            let raw = non_blank(flag).or_else(|| env_value(key)).unwrap_or(default);
            expand_path(raw, home)
        };

        let log_level = match env_value(ENV_LOG_LEVEL) {
            None => LogLevel::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{} (fallback to {})", e, LogLevel::default());
                LogLevel::default()
            }),
        };

        Self {
            messages_dir: pick_path(
                overrides.messages_dir.as_deref(),
                ENV_MESSAGES_DIR,
                DEFAULT_MESSAGES_DIR,
            ),
            models_path: pick_path(
                overrides.models_path.as_deref(),
                ENV_MODELS_FILE,
                DEFAULT_MODELS_PATH,
            ),
            cache_path: expand_path(DEFAULT_CACHE_PATH, home),
            log_level,
            openrouter_api_key: env_value(ENV_OPENROUTER_API_KEY).map(str::to_string),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Expand a leading `~` or `~/` against `home`; other paths are returned as-is
pub fn expand_path(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn home() -> PathBuf {
        PathBuf::from("/home/tester")
    }

    // ========== expand_path ==========

    #[test]
    fn test_expand_tilde() {
        let home = home();
        assert_eq!(expand_path("~", Some(&home)), home);
        assert_eq!(
            expand_path("~/a/b", Some(&home)),
            PathBuf::from("/home/tester/a/b")
        );
    }

    #[test]
    fn test_expand_leaves_other_paths() {
        let home = home();
        assert_eq!(expand_path("/tmp/x", Some(&home)), PathBuf::from("/tmp/x"));
        assert_eq!(expand_path("~other/x", Some(&home)), PathBuf::from("~other/x"));
        assert_eq!(expand_path("~/x", None), PathBuf::from("~/x"));
    }

    // ========== resolve_with ==========

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve_with(&ConfigOverrides::default(), &env(&[]), Some(&home()));

        assert_eq!(
            config.messages_dir,
            PathBuf::from("/home/tester/.local/share/opencode/storage/message")
        );
        assert_eq!(config.models_path, PathBuf::from("/home/tester/.config/ocusage/models"));
        assert_eq!(
            config.cache_path,
            PathBuf::from("/home/tester/.cache/ocusage/models-cache.json")
        );
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_env_overrides_default() {
        let config = AppConfig::resolve_with(
            &ConfigOverrides::default(),
            &env(&[
                (ENV_MESSAGES_DIR, "~/msgs"),
                (ENV_MODELS_FILE, "/etc/models.json"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_OPENROUTER_API_KEY, "sk-or-123"),
            ]),
            Some(&home()),
        );

        assert_eq!(config.messages_dir, PathBuf::from("/home/tester/msgs"));
        assert_eq!(config.models_path, PathBuf::from("/etc/models.json"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.openrouter_api_key.as_deref(), Some("sk-or-123"));
    }

    #[test]
    fn test_flag_overrides_env() {
        let overrides = ConfigOverrides {
            messages_dir: Some(" /data/messages ".into()),
            models_path: Some("".into()),
        };
        let config = AppConfig::resolve_with(
            &overrides,
            &env(&[(ENV_MESSAGES_DIR, "/env/msgs"), (ENV_MODELS_FILE, "/env/models")]),
            Some(&home()),
        );

        assert_eq!(config.messages_dir, PathBuf::from("/data/messages"));
        // blank flag falls through to the environment
        assert_eq!(config.models_path, PathBuf::from("/env/models"));
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = AppConfig::resolve_with(
            &ConfigOverrides::default(),
            &env(&[(ENV_LOG_LEVEL, "verbose")]),
            Some(&home()),
        );
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_blank_api_key_disabled() {
        let config = AppConfig::resolve_with(
            &ConfigOverrides::default(),
            &env(&[(ENV_OPENROUTER_API_KEY, "   ")]),
            Some(&home()),
        );
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("ERROR".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Info.to_string(), "info");
    }
}
