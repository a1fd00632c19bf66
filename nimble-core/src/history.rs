//! Roll history: what was rolled, by whom, and when.
//!
//! The engine hands results back to its caller; this module is the shape
//! callers log them in. Storage is in memory, see [`crate::persist`] for files.

use crate::binding::{RollBinding, RollKind};
use crate::engine::RollResult;
use crate::narrate::format_roll_result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// A single logged roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    pub id: Uuid,
    /// Who rolled (character or player name).
    pub actor: String,
    /// Action label shown in the log.
    pub label: String,
    pub rolled_at: DateTime<Utc>,
    pub kind: RollKind,
    pub result: RollResult,
    /// Narration as it was displayed at roll time.
    pub narration: String,
}

impl RollRecord {
    pub fn new(
        actor: impl Into<String>,
        label: impl Into<String>,
        binding: &RollBinding,
        result: RollResult,
    ) -> Self {
        let label = label.into();
        let narration = format_roll_result(&label, binding, &result);
        Self {
            id: Uuid::new_v4(),
            actor: actor.into(),
            label,
            rolled_at: Utc::now(),
            kind: binding.kind,
            result,
            narration,
        }
    }
}

/// Ordered roll log, oldest first, optionally bounded.
#[derive(Debug, Clone, Default)]
pub struct RollHistory {
    records: VecDeque<RollRecord>,
    capacity: Option<usize>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history that drops its oldest record once `capacity` is exceeded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = RollRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            capacity: None,
        }
    }

    pub fn push(&mut self, record: RollRecord) {
        self.records.push_back(record);
        if let Some(cap) = self.capacity {
            while self.records.len() > cap {
                self.records.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RollRecord> {
        self.records.iter()
    }

    /// Up to `n` records, newest first.
    pub fn recent(&self, n: usize) -> Vec<&RollRecord> {
        self.records.iter().rev().take(n).collect()
    }

    pub fn by_actor<'a>(
        &'a self,
        actor: &'a str,
    ) -> impl DoubleEndedIterator<Item = &'a RollRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.actor.eq_ignore_ascii_case(actor))
    }

    pub fn last(&self) -> Option<&RollRecord> {
        self.records.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{roll_action, RollContext};
    use crate::testing::ScriptedDice;

    fn record(actor: &str, label: &str, face: u32) -> RollRecord {
        let binding = RollBinding::new(RollKind::Check);
        let mut dice = ScriptedDice::new([face]);
        let result = roll_action(&binding, &RollContext::default(), &mut dice);
        RollRecord::new(actor, label, &binding, result)
    }

    #[test]
    fn test_record_carries_narration() {
        let rec = record("Thorin", "Perception", 11);
        assert_eq!(rec.kind, RollKind::Check);
        assert!(rec.narration.contains("Perception [CHECK]"));
        assert!(rec.narration.ends_with("Result: 11"));
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut history = RollHistory::new();
        history.push(record("A", "first", 1));
        history.push(record("A", "second", 2));
        history.push(record("A", "third", 3));

        let labels: Vec<&str> = history.recent(2).iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["third", "second"]);
        assert_eq!(history.last().map(|r| r.label.as_str()), Some("third"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = RollHistory::with_capacity(2);
        history.push(record("A", "first", 1));
        history.push(record("A", "second", 2));
        history.push(record("A", "third", 3));

        assert_eq!(history.len(), 2);
        let labels: Vec<&str> = history.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["second", "third"]);
    }

    #[test]
    fn test_by_actor() {
        let mut history = RollHistory::new();
        history.push(record("Thorin", "a", 5));
        history.push(record("Mira", "b", 6));
        history.push(record("thorin", "c", 7));

        assert_eq!(history.by_actor("Thorin").count(), 2);
        assert_eq!(history.by_actor("Nobody").count(), 0);

        history.clear();
        assert!(history.is_empty());
    }
}
