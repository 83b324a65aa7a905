//! OpenCode message file decoding

use crate::types::{Message, OcusageError, Result};
use std::fs;
use std::path::Path;

/// Decode one `msg_*.json` file.
///
/// Rejects files that are not JSON or whose `id`, `sessionID`, `role` or
/// `time.created` are missing or of the wrong type.
pub fn parse_message_file(path: &Path) -> Result<Message> {
    let mut content = fs::read(path)?;
    simd_json::from_slice(&mut content).map_err(|e| OcusageError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture_path(session: &str, filename: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("messages")
            .join(session)
            .join(filename)
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_assistant_fixture() {
        let message = parse_message_file(&fixture_path("ses_alpha", "msg_alpha_002.json")).unwrap();

        assert_eq!(message.id, "msg_alpha_002");
        assert_eq!(message.session_id, "ses_alpha");
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.model_id, "claude-sonnet-4-20250514");
        assert_eq!(message.provider_id, "anthropic");

        let tokens = message.tokens.unwrap();
        assert_eq!(tokens.input, Some(1000));
        assert_eq!(tokens.output, Some(500));
        assert_eq!(tokens.cache.unwrap().read, Some(100));
    }

    #[test]
    fn test_parse_user_fixture() {
        let message = parse_message_file(&fixture_path("ses_alpha", "msg_alpha_001.json")).unwrap();

        assert!(message.is_user());
        assert_eq!(message.model_id, "");
        assert_eq!(message.cost, 0.0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "msg_bad.json", "{ not json");

        assert!(matches!(parse_message_file(&path), Err(OcusageError::Parse(_))));
    }

    #[test]
    fn test_wrong_field_types_rejected() {
        let temp = TempDir::new().unwrap();
        let cases = [
            r#"{"id": 1, "sessionID": "s", "role": "user", "time": {"created": 1}}"#,
            r#"{"id": "m", "sessionID": null, "role": "user", "time": {"created": 1}}"#,
            r#"{"id": "m", "sessionID": "s", "role": "tool", "time": {"created": 1}}"#,
            r#"{"id": "m", "sessionID": "s", "role": "user", "time": {"created": "yesterday"}}"#,
            r#"{"id": "m", "sessionID": "s", "role": "user"}"#,
            r#"[1, 2, 3]"#,
        ];

        for (i, case) in cases.iter().enumerate() {
            let path = write_file(&temp, &format!("msg_{i}.json"), case);
            assert!(parse_message_file(&path).is_err(), "case {i} should fail");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = parse_message_file(&temp.path().join("msg_missing.json"));
        assert!(matches!(result, Err(OcusageError::Io(_))));
    }
}
