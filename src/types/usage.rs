//! Token and cost usage types

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Cache token counts as recorded on a message (fields may be missing)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PartialCacheTokens {
    #[serde(default)]
    pub read: Option<u64>,
    #[serde(default)]
    pub write: Option<u64>,
}

/// Token counts as recorded on a message (fields may be missing)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PartialTokenUsage {
    #[serde(default)]
    pub input: Option<u64>,
    #[serde(default)]
    pub output: Option<u64>,
    #[serde(default)]
    pub reasoning: Option<u64>,
    #[serde(default)]
    pub cache: Option<PartialCacheTokens>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CacheTokens {
    pub read: u64,
    pub write: u64,
}

/// Fully populated token counts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub reasoning: u64,
    pub cache: CacheTokens,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64, reasoning: u64, read: u64, write: u64) -> Self {
        Self {
            input,
            output,
            reasoning,
            cache: CacheTokens { read, write },
        }
    }

    /// Cache tokens billed at the cache rate (read + write)
    pub fn cache_total(&self) -> u64 {
        self.cache.read.saturating_add(self.cache.write)
    }
}

impl From<&PartialTokenUsage> for TokenUsage {
    fn from(partial: &PartialTokenUsage) -> Self {
        let cache = partial.cache.unwrap_or_default();
        Self {
            input: partial.input.unwrap_or(0),
            output: partial.output.unwrap_or(0),
            reasoning: partial.reasoning.unwrap_or(0),
            cache: CacheTokens {
                read: cache.read.unwrap_or(0),
                write: cache.write.unwrap_or(0),
            },
        }
    }
}

/// Fill every missing token field with zero.
pub fn normalize_tokens(tokens: Option<&PartialTokenUsage>) -> TokenUsage {
    tokens.map(TokenUsage::from).unwrap_or_default()
}

/// Token counts with the cost attributed to each of them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub cache_cost: f64,
    pub total_cost: f64,
}

impl UsageSummary {
    /// Zero-cost summary that still carries the token counts
    pub fn tokens_only(tokens: &TokenUsage) -> Self {
        Self {
            input_tokens: tokens.input,
            output_tokens: tokens.output,
            cache_tokens: tokens.cache_total(),
            ..Self::default()
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_tokens)
    }

    /// Pairwise sum of all fields
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            input_tokens: self.input_tokens.saturating_add(other.input_tokens),
            output_tokens: self.output_tokens.saturating_add(other.output_tokens),
            cache_tokens: self.cache_tokens.saturating_add(other.cache_tokens),
            input_cost: self.input_cost + other.input_cost,
            output_cost: self.output_cost + other.output_cost,
            cache_cost: self.cache_cost + other.cache_cost,
            total_cost: self.total_cost + other.total_cost,
        }
    }
}

impl Add for UsageSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.merge(&rhs)
    }
}

impl AddAssign for UsageSummary {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.merge(&rhs);
    }
}

impl Sum for UsageSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Grand total over report rows (footer line / JSON `totals`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u64>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_tokens: u64,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
}

impl UsageTotals {
    pub fn from_summary(usage: &UsageSummary, sessions: Option<u64>) -> Self {
        Self {
            sessions,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cache_tokens: usage.cache_tokens,
            cost_usd: usage.total_cost,
        }
    }

    pub fn add(&mut self, other: &UsageTotals) {
        self.sessions = match (self.sessions, other.sessions) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
        };
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.cache_tokens = self.cache_tokens.saturating_add(other.cache_tokens);
        self.cost_usd += other.cost_usd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(input: u64, output: u64, cache: u64, costs: (f64, f64, f64)) -> UsageSummary {
        UsageSummary {
            input_tokens: input,
            output_tokens: output,
            cache_tokens: cache,
            input_cost: costs.0,
            output_cost: costs.1,
            cache_cost: costs.2,
            total_cost: costs.0 + costs.1 + costs.2,
        }
    }

    // ========== normalize_tokens tests ==========

    #[test]
    fn test_normalize_none_is_zero() {
        assert_eq!(normalize_tokens(None), TokenUsage::default());
    }

    #[test]
    fn test_normalize_fills_missing_fields() {
        let partial = PartialTokenUsage {
            input: Some(10),
            output: None,
            reasoning: None,
            cache: Some(PartialCacheTokens {
                read: None,
                write: Some(4),
            }),
        };

        let tokens = normalize_tokens(Some(&partial));

        assert_eq!(tokens, TokenUsage::new(10, 0, 0, 0, 4));
        assert_eq!(tokens.cache_total(), 4);
    }

    #[test]
    fn test_partial_tokens_accept_null_fields() {
        let partial: PartialTokenUsage =
            serde_json::from_str(r#"{"input": 5, "output": null}"#).unwrap();
        let tokens = normalize_tokens(Some(&partial));
        assert_eq!(tokens, TokenUsage::new(5, 0, 0, 0, 0));
    }

    // ========== UsageSummary merge tests ==========

    #[test]
    fn test_merge_identity() {
        let a = summary(100, 50, 10, (0.1, 0.2, 0.01));
        assert_eq!(a.merge(&UsageSummary::default()), a);
        assert_eq!(UsageSummary::default().merge(&a), a);
    }

    #[test]
    fn test_merge_commutative() {
        let a = summary(100, 50, 10, (0.1, 0.2, 0.01));
        let b = summary(7, 3, 1, (0.5, 0.25, 0.125));
        assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn test_merge_adds_pairwise() {
        let a = summary(100, 50, 10, (0.5, 0.25, 0.125));
        let b = summary(1, 2, 3, (0.5, 0.25, 0.125));
        let merged = a + b;

        assert_eq!(merged.input_tokens, 101);
        assert_eq!(merged.output_tokens, 52);
        assert_eq!(merged.cache_tokens, 13);
        assert!((merged.total_cost - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_sum_iterator() {
        let total: UsageSummary = vec![
            summary(1, 1, 1, (0.0, 0.0, 0.0)),
            summary(2, 2, 2, (0.0, 0.0, 0.0)),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.total_tokens(), 9);
    }

    #[test]
    fn test_tokens_only_has_zero_cost() {
        let usage = UsageSummary::tokens_only(&TokenUsage::new(5, 6, 7, 8, 9));
        assert_eq!(usage.input_tokens, 5);
        assert_eq!(usage.output_tokens, 6);
        assert_eq!(usage.cache_tokens, 17);
        assert_eq!(usage.total_cost, 0.0);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(UsageSummary::default()).unwrap();
        assert!(json.get("inputTokens").is_some());
        assert!(json.get("totalCost").is_some());
    }

    // ========== UsageTotals tests ==========

    #[test]
    fn test_totals_add_with_sessions() {
        let mut totals = UsageTotals::default();
        totals.add(&UsageTotals {
            sessions: Some(2),
            input_tokens: 10,
            output_tokens: 5,
            cache_tokens: 1,
            cost_usd: 0.5,
        });
        totals.add(&UsageTotals {
            sessions: Some(1),
            input_tokens: 1,
            output_tokens: 1,
            cache_tokens: 1,
            cost_usd: 0.25,
        });

        assert_eq!(totals.sessions, Some(3));
        assert_eq!(totals.input_tokens, 11);
        assert!((totals.cost_usd - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_without_sessions_skip_field() {
        let totals = UsageTotals::from_summary(&UsageSummary::default(), None);
        let json = serde_json::to_value(totals).unwrap();
        assert!(json.get("sessions").is_none());
        assert!(json.get("costUSD").is_some());
    }
}
