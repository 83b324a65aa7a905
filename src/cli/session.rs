//! `session <ID>` command: per-message detail for one session

use anyhow::Result;
use serde::Serialize;

use super::output::{format_cost, format_tokens, round_minutes};
use crate::services::period::{format_date, format_time};
use crate::types::{normalize_tokens, Message, MessageRole, Session, UsageTotals};

/// Token counts shown for an assistant message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageTokens {
    pub input: u64,
    pub output: u64,
    pub cache: u64,
}

/// `None` for user messages; missing counts on assistant messages are zero
pub fn message_tokens(message: &Message) -> Option<MessageTokens> {
    if message.is_user() {
        return None;
    }
    let tokens = normalize_tokens(message.tokens.as_ref());
    Some(MessageTokens {
        input: tokens.input,
        output: tokens.output,
        cache: tokens.cache_total(),
    })
}

/// Messages ordered by creation time (stable for equal timestamps)
pub fn sorted_messages(session: &Session) -> Vec<&Message> {
    let mut messages: Vec<&Message> = session.messages.iter().collect();
    messages.sort_by_key(|m| m.time.created);
    messages
}

#[derive(Debug, Serialize)]
struct MessageEntry {
    index: usize,
    role: MessageRole,
    time: String,
    tokens: Option<MessageTokens>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDetail<'a> {
    id: &'a str,
    date: String,
    start_time: String,
    end_time: String,
    duration_minutes: f64,
    models: Vec<&'a str>,
    messages: Vec<MessageEntry>,
    summary: UsageTotals,
}

#[derive(Debug, Serialize)]
struct SessionReport<'a> {
    session: SessionDetail<'a>,
}

fn token_text(message: &Message) -> String {
    match message_tokens(message) {
        None => "-".to_string(),
        Some(t) => format!(
            "input: {}, output: {}, cache: {}",
            format_tokens(t.input),
            format_tokens(t.output),
            format_tokens(t.cache)
        ),
    }
}

pub fn render_json(session: &Session) -> Result<String> {
    let messages = sorted_messages(session)
        .into_iter()
        .enumerate()
        .map(|(i, m)| MessageEntry {
            index: i + 1,
            role: m.role,
            time: format_time(m.time.created),
            tokens: message_tokens(m),
        })
        .collect();

    let report = SessionReport {
        session: SessionDetail {
            id: &session.id,
            date: format_date(session.start_time),
            start_time: format_time(session.start_time),
            end_time: format_time(session.end_time),
            duration_minutes: round_minutes(session.duration_minutes()),
            models: session.model_names(),
            messages,
            summary: UsageTotals::from_summary(&session.usage, None),
        },
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_text(session: &Session) -> String {
    let model = match session.model_display() {
        "" => "-",
        display => display,
    };

    let mut lines = vec![
        format!("Session: {}", session.id),
        format!("Date: {}", format_date(session.start_time)),
        format!(
            "Time: {} - {} ({} min)",
            format_time(session.start_time),
            format_time(session.end_time),
            round_minutes(session.duration_minutes())
        ),
        format!("Model: {}", model),
        String::new(),
        "Messages:".to_string(),
    ];

    for (i, message) in sorted_messages(session).into_iter().enumerate() {
        lines.push(format!(
            "  {:<4}{:<10}{:<10}{}",
            format!("#{}", i + 1),
            message.role.as_str(),
            format_time(message.time.created),
            token_text(message)
        ));
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("  Input tokens:  {}", format_tokens(session.usage.input_tokens)));
    lines.push(format!("  Output tokens: {}", format_tokens(session.usage.output_tokens)));
    lines.push(format!("  Cache tokens:  {}", format_tokens(session.usage.cache_tokens)));
    lines.push(format!("  Total cost:    {}", format_cost(session.usage.total_cost)));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageTime, PartialCacheTokens, PartialTokenUsage, UsageSummary};
    use serde_json::Value;

    fn message(id: &str, role: MessageRole, created: i64, tokens: Option<PartialTokenUsage>) -> Message {
        Message {
            id: id.to_string(),
            session_id: "ses_detail".to_string(),
            role,
            time: MessageTime {
                created,
                completed: None,
            },
            model_id: String::new(),
            provider_id: String::new(),
            tokens,
            cost: 0.0,
            finish: None,
        }
    }

    fn detail_session() -> Session {
        let tokens = PartialTokenUsage {
            input: Some(1200),
            output: Some(300),
            reasoning: None,
            cache: Some(PartialCacheTokens {
                read: Some(40),
                write: Some(2),
            }),
        };
        let mut session = Session::empty();
        session.id = "ses_detail".to_string();
        session.start_time = 1_000;
        session.end_time = 181_000;
        session.messages = vec![
            message("m3", MessageRole::Assistant, 181_000, None),
            message("m1", MessageRole::User, 1_000, Some(tokens)),
            message("m2", MessageRole::Assistant, 60_000, Some(tokens)),
        ];
        session.models.insert("gpt-4o".into(), UsageSummary::default());
        session.usage = UsageSummary {
            input_tokens: 1200,
            output_tokens: 300,
            cache_tokens: 42,
            total_cost: 0.25,
            ..Default::default()
        };
        session
    }

    // ========== message_tokens ==========

    #[test]
    fn test_user_messages_have_no_tokens() {
        let session = detail_session();
        let user = session.messages.iter().find(|m| m.id == "m1").unwrap();
        assert_eq!(message_tokens(user), None);
    }

    #[test]
    fn test_assistant_tokens_default_to_zero() {
        let session = detail_session();
        let bare = session.messages.iter().find(|m| m.id == "m3").unwrap();
        let full = session.messages.iter().find(|m| m.id == "m2").unwrap();

        assert_eq!(
            message_tokens(bare),
            Some(MessageTokens {
                input: 0,
                output: 0,
                cache: 0
            })
        );
        assert_eq!(message_tokens(full).unwrap().cache, 42);
    }

    // ========== render ==========

    #[test]
    fn test_render_json() {
        let json: Value = serde_json::from_str(&render_json(&detail_session()).unwrap()).unwrap();
        let detail = &json["session"];

        assert_eq!(detail["id"], "ses_detail");
        assert_eq!(detail["durationMinutes"], 3.0);
        assert_eq!(detail["models"], serde_json::json!(["gpt-4o"]));
        assert_eq!(detail["messages"][0]["index"], 1);
        assert_eq!(detail["messages"][0]["role"], "user");
        assert!(detail["messages"][0]["tokens"].is_null());
        assert_eq!(detail["messages"][1]["tokens"]["input"], 1200);
        assert_eq!(detail["summary"]["cacheTokens"], 42);
        assert_eq!(detail["summary"]["costUSD"], 0.25);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&detail_session());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Session: ses_detail");
        assert!(lines[2].ends_with("(3 min)"));
        assert_eq!(lines[3], "Model: gpt-4o");
        assert!(lines[6].starts_with("  #1  user      "));
        assert!(lines[6].ends_with('-'));
        assert!(lines[7].ends_with("input: 1,200, output: 300, cache: 42"));
        assert!(lines[8].ends_with("input: 0, output: 0, cache: 0"));
        assert_eq!(lines.last().copied(), Some("  Total cost:    $0.2500"));
    }
}
