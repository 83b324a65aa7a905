use std::collections::HashSet;

/// Model identifiers that had no pricing match during one aggregation pass.
///
/// Set semantics, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownModels {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl UnknownModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier. Returns `false` if it was already present.
    pub fn record(&mut self, model_id: &str) -> bool {
        if self.seen.contains(model_id) {
            return false;
        }
        self.seen.insert(model_id.to_string());
        self.order.push(model_id.to_string());
        true
    }

    pub fn models(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.seen.contains(model_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }

    /// Drain the set, returning the identifiers in first-seen order
    pub fn take(&mut self) -> Vec<String> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

impl IntoIterator for UnknownModels {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}
