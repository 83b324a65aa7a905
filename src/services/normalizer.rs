//! Model identifier normalization
//!
//! Turns raw model identifiers into the canonical forms used for fuzzy
//! pricing lookup.

/// Provider prefixes that OpenCode puts in front of some model identifiers
pub const PROVIDER_PREFIXES: [&str; 4] = ["anthropic/", "openai/", "google/", "xai/"];

/// Remove a known provider prefix, if any.
///
/// # Examples
/// ```
/// use ocusage::services::normalizer::strip_provider_prefix;
///
/// assert_eq!(strip_provider_prefix("anthropic/claude-sonnet-4"), "claude-sonnet-4");
/// assert_eq!(strip_provider_prefix("minimax/minimax-m2"), "minimax/minimax-m2");
/// ```
pub fn strip_provider_prefix(model_id: &str) -> &str {
    PROVIDER_PREFIXES
        .iter()
        .find_map(|prefix| model_id.strip_prefix(prefix))
        .unwrap_or(model_id)
}

/// Replace `.` and `_` version separators with `-`
pub fn normalize_version_separators(model_id: &str) -> String {
    model_id.replace(['.', '_'], "-")
}

/// Remove a trailing `-YYYYMMDD` (8 digits)
pub fn strip_date_suffix(model_id: &str) -> &str {
    if let Some(suffix_start) = model_id.rfind('-') {
        let suffix = &model_id[suffix_start + 1..];
        if suffix.len() == 8 && suffix.bytes().all(|b| b.is_ascii_digit()) {
            return &model_id[..suffix_start];
        }
    }
    model_id
}

/// Canonical form used for index comparison.
///
/// # Examples
/// ```
/// use ocusage::services::normalizer::normalize_model_id;
///
/// assert_eq!(normalize_model_id("openai/gpt-5.2-20250101"), "gpt-5-2");
/// assert_eq!(normalize_model_id("claude_opus_4.5"), "claude-opus-4-5");
/// ```
pub fn normalize_model_id(model_id: &str) -> String {
    let normalized = normalize_version_separators(strip_provider_prefix(model_id));
    strip_date_suffix(&normalized).to_string()
}

/// Ordered, de-duplicated lookup candidates for a model identifier.
///
/// The first candidate is the normalized base id. GPT identifiers also yield
/// shorter hyphen-segment prefixes down to two segments.
pub fn build_candidate_ids(model_id: &str) -> Vec<String> {
    let base = normalize_model_id(model_id);
    let mut candidates: Vec<String> = Vec::new();

    let mut add = |value: String| {
        if !value.is_empty() && !candidates.contains(&value) {
            candidates.push(value);
        }
    };

    if base.starts_with("gpt-") {
        let segments: Vec<&str> = base.split('-').filter(|s| !s.is_empty()).collect();
        add(base.clone());
        for len in (2..segments.len()).rev() {
            add(segments[..len].join("-"));
        }
    } else {
        add(base);
    }

    candidates
}
