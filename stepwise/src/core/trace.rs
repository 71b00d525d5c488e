//! Ordered derivation traces returned alongside every engine result.

use serde::{Deserialize, Serialize};

/// One entry of a [`StepTrace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TraceItem {
    Line(String),
    /// Boundary between the derivation and the self-check section.
    VerificationSeparator,
}

/// Ordered trace items. Later lines may refer to values computed earlier, so
/// items are never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTrace {
    items: Vec<TraceItem>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.items.push(TraceItem::Line(text.into()));
    }

    /// Start the verification section. A trace holds at most one separator.
    pub fn begin_verification(&mut self) {
        if !self.has_verification() {
            self.items.push(TraceItem::VerificationSeparator);
        }
    }

    pub fn has_verification(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, TraceItem::VerificationSeparator))
    }

    pub fn items(&self) -> &[TraceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All text lines, skipping the separator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            TraceItem::Line(text) => Some(text.as_str()),
            TraceItem::VerificationSeparator => None,
        })
    }

    /// Lines before the separator.
    pub fn derivation(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .take_while(|item| !matches!(item, TraceItem::VerificationSeparator))
            .filter_map(|item| match item {
                TraceItem::Line(text) => Some(text.as_str()),
                TraceItem::VerificationSeparator => None,
            })
    }

    /// Lines after the separator; empty when there is no verification section.
    pub fn verification(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .skip_while(|item| !matches!(item, TraceItem::VerificationSeparator))
            .filter_map(|item| match item {
                TraceItem::Line(text) => Some(text.as_str()),
                TraceItem::VerificationSeparator => None,
            })
    }
}

/// A successful engine call: the value and the trace that proves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T> {
    pub value: T,
    pub trace: StepTrace,
}

impl<T> Solution<T> {
    pub fn new(value: T, trace: StepTrace) -> Self {
        Self { value, trace }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Solution<U> {
        Solution {
            value: f(self.value),
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StepTrace {
        let mut trace = StepTrace::new();
        trace.line("a");
        trace.line("b");
        trace.begin_verification();
        trace.line("check");
        trace
    }

    #[test]
    fn separator_partitions_lines() {
        let trace = sample();
        assert_eq!(trace.derivation().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(trace.verification().collect::<Vec<_>>(), vec!["check"]);
        assert_eq!(trace.lines().count(), 3);
    }

    #[test]
    fn begin_verification_is_idempotent() {
        let mut trace = sample();
        trace.begin_verification();
        let separators = trace
            .items()
            .iter()
            .filter(|item| matches!(item, TraceItem::VerificationSeparator))
            .count();
        assert_eq!(separators, 1);
    }

    #[test]
    fn serializes_as_tagged_items() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json[0], serde_json::json!({"kind": "line", "text": "a"}));
        assert_eq!(
            json[2],
            serde_json::json!({"kind": "verification_separator"})
        );
    }

    #[test]
    fn trace_without_separator_has_no_verification() {
        let mut trace = StepTrace::new();
        trace.line("only");
        assert!(!trace.has_verification());
        assert_eq!(trace.verification().count(), 0);
    }
}
