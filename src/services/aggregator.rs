//! Aggregator service for folding priced messages into sessions and reports

use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::cost::CostCalculator;
use crate::types::{
    Message, ModelConfigMap, Session, SessionBatch, UnknownModels, UsageSummary, UsageTotals,
    UNKNOWN_SESSION_ID,
};

/// Usage merged over all sessions that fall into one period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodUsage {
    pub sessions: u64,
    pub usage: UsageSummary,
    pub models: BTreeSet<String>,
}

/// Aggregator for computing usage statistics
pub struct Aggregator;

impl Aggregator {
    /// Build one session from messages that share a session id.
    ///
    /// Takes the group by value so its messages move into the session.
    /// Returns the `"unknown"` sentinel for an empty group.
    pub fn build_session(
        messages: Vec<Message>,
        calculator: &CostCalculator<'_>,
        unknown: &mut UnknownModels,
    ) -> Session {
        let Some(first) = messages.first() else {
            return Session::empty();
        };

        let id = if first.session_id.is_empty() {
            UNKNOWN_SESSION_ID.to_string()
        } else {
            first.session_id.clone()
        };

        let mut start_time = first.time.created;
        let mut end_time = first.time.created;
        let mut usage = UsageSummary::default();
        let mut models: BTreeMap<String, UsageSummary> = BTreeMap::new();

        for message in &messages {
            start_time = start_time.min(message.time.created);
            end_time = end_time.max(message.time.created);

            let cost = calculator.message_cost(message, unknown);
            usage += cost;

            if message.model_id.trim().is_empty() {
                continue;
            }
            *models.entry(message.model_id.clone()).or_default() += cost;
        }

        Session {
            id,
            start_time,
            end_time,
            models,
            messages,
            usage,
        }
    }

    /// Group messages by session id (first-seen order) and price every session.
    pub fn aggregate_sessions(messages: &[Message], configs: &ModelConfigMap) -> SessionBatch {
        let calculator = CostCalculator::new(configs);
        let mut unknown_models = UnknownModels::new();

        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<Message>> = HashMap::new();
        for message in messages {
            let group = groups.entry(message.session_id.as_str()).or_insert_with(|| {
                order.push(message.session_id.as_str());
                Vec::new()
            });
            group.push(message.clone());
        }

        let sessions: Vec<Session> = order
            .into_iter()
            .filter_map(|id| groups.remove(id))
            .map(|group| Self::build_session(group, &calculator, &mut unknown_models))
            .collect();

        SessionBatch {
            sessions,
            unknown_models,
        }
    }

    /// Merge per-model breakdowns across sessions (sorted by model id)
    pub fn by_model(sessions: &[Session]) -> BTreeMap<String, UsageSummary> {
        let mut model_map: BTreeMap<String, UsageSummary> = BTreeMap::new();

        for session in sessions {
            for (model_id, usage) in &session.models {
                *model_map.entry(model_id.clone()).or_default() += *usage;
            }
        }

        model_map
    }

    /// Merge sessions by the key `period_fn` derives from their local start time
    pub fn by_period<F>(sessions: &[Session], period_fn: F) -> BTreeMap<String, PeriodUsage>
    where
        F: Fn(DateTime<Local>) -> String,
    {
        let mut periods: BTreeMap<String, PeriodUsage> = BTreeMap::new();

        for session in sessions {
            let key = period_fn(session.start_local());
            let entry = periods.entry(key).or_default();
            entry.sessions = entry.sessions.saturating_add(1);
            entry.usage += session.usage;
            entry.models.extend(session.models.keys().cloned());
        }

        periods
    }

    /// Grand total over report rows
    pub fn totals<'a, I>(rows: I) -> UsageTotals
    where
        I: IntoIterator<Item = &'a UsageTotals>,
    {
        rows.into_iter().fold(UsageTotals::default(), |mut acc, row| {
            acc.add(row);
            acc
        })
    }
}
