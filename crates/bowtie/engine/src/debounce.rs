//! Debounce queue: coalesces rapid free-text edits before commit
//!
//! Edits are keyed by field. A later edit to the same field replaces the
//! pending value and restarts its settle timer, so only the value the user
//! stopped at gets committed. Time is passed in by the caller, which keeps
//! the queue deterministic and free of timers.

use crate::config::DebounceConfig;
use bowtie_types::FieldKey;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// An edit waiting to settle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpdate {
    pub value: String,
    pub enqueued_at: DateTime<Utc>,
}

/// Pending free-text edits, keyed by field
#[derive(Clone, Debug)]
pub struct DebounceQueue {
    config: DebounceConfig,
    pending: BTreeMap<FieldKey, PendingUpdate>,
    last_sweep: Option<DateTime<Utc>>,
}

impl DebounceQueue {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            pending: BTreeMap::new(),
            last_sweep: None,
        }
    }

    /// Queue an edit, replacing any pending value for the same field
    pub fn enqueue(&mut self, key: FieldKey, value: impl Into<String>, now: DateTime<Utc>) {
        self.pending.insert(
            key,
            PendingUpdate {
                value: value.into(),
                enqueued_at: now,
            },
        );
    }

    /// Whether enough time has passed since the last sweep
    pub fn sweep_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_sweep {
            Some(last) => now - last >= self.config.sweep_interval(),
            None => true,
        }
    }

    /// Take every edit that has settled by `now`.
    ///
    /// Entries younger than the settle threshold stay queued.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<(FieldKey, String)> {
        self.last_sweep = Some(now);
        let settle = self.config.settle();

        let settled: Vec<FieldKey> = self
            .pending
            .iter()
            .filter(|(_, update)| now - update.enqueued_at > settle)
            .map(|(key, _)| *key)
            .collect();

        settled
            .into_iter()
            .filter_map(|key| self.pending.remove(&key).map(|u| (key, u.value)))
            .collect()
    }

    /// Take every pending edit regardless of age
    pub fn drain_all(&mut self) -> Vec<(FieldKey, String)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(key, update)| (key, update.value))
            .collect()
    }

    /// Discard every pending edit. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn pending(&self, key: FieldKey) -> Option<&PendingUpdate> {
        self.pending.get(&key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }
}

impl Default for DebounceQueue {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_last_writer_wins() {
        let mut q = DebounceQueue::default();
        q.enqueue(FieldKey::ProjectName, "B", t0());
        q.enqueue(FieldKey::ProjectName, "Ba", t0() + Duration::milliseconds(100));
        q.enqueue(FieldKey::ProjectName, "Bal", t0() + Duration::milliseconds(200));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pending(FieldKey::ProjectName).unwrap().value, "Bal");
    }

    #[test]
    fn test_sweep_commits_only_settled_entries() {
        let mut q = DebounceQueue::default();
        q.enqueue(FieldKey::ProjectName, "Baltic", t0());
        q.enqueue(
            FieldKey::CentralProblem,
            "Eutrophication",
            t0() + Duration::milliseconds(900),
        );

        let committed = q.sweep(t0() + Duration::milliseconds(1500));
        assert_eq!(committed, vec![(FieldKey::ProjectName, "Baltic".to_string())]);
        assert_eq!(q.len(), 1);

        let committed = q.sweep(t0() + Duration::milliseconds(3000));
        assert_eq!(
            committed,
            vec![(FieldKey::CentralProblem, "Eutrophication".to_string())]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_new_edit_restarts_settle_timer() {
        let mut q = DebounceQueue::default();
        q.enqueue(FieldKey::ProjectName, "Bal", t0());
        q.enqueue(FieldKey::ProjectName, "Baltic", t0() + Duration::milliseconds(800));
        assert!(q.sweep(t0() + Duration::milliseconds(1500)).is_empty());
        assert_eq!(q.sweep(t0() + Duration::milliseconds(2000)).len(), 1);
    }

    #[test]
    fn test_sweep_interval() {
        let mut q = DebounceQueue::default();
        assert!(q.sweep_due(t0()));
        q.sweep(t0());
        assert!(!q.sweep_due(t0() + Duration::milliseconds(1000)));
        assert!(q.sweep_due(t0() + Duration::milliseconds(1500)));
    }

    #[test]
    fn test_drain_and_clear() {
        let mut q = DebounceQueue::default();
        q.enqueue(FieldKey::ProjectName, "Baltic", t0());
        q.enqueue(FieldKey::AnalysisScope, "Coastal", t0());
        assert_eq!(q.drain_all().len(), 2);
        assert!(q.is_empty());

        q.enqueue(FieldKey::ProjectName, "Baltic", t0());
        assert_eq!(q.clear(), 1);
        assert!(q.is_empty());
    }
}
