//! Append-only history store
//!
//! Time-ordered, in-memory log of validated entries. `append` is the sole
//! mutator; it assigns a timestamp when the caller omits one and enforces
//! non-decreasing order across the log. Reads return borrowed windows in
//! chronological order (oldest first).
//!
//! Single-writer access is enforced by `&mut self`. A concurrent
//! collaborator wraps the store in `std::sync::RwLock`: appends take the
//! write lock, window reads share the read lock and observe a consistent
//! prefix, never a partially written entry.

use crate::types::{BehaviorMetrics, Entry};
use chrono::{DateTime, Utc};

/// Default number of entries in a history window
pub const DEFAULT_WINDOW: usize = 7;

/// Wall-clock source for timestamp assignment.
///
/// Injectable so ingestion is deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Timestamp regression on append.
///
/// Appends never re-stamp an out-of-order entry; the attempt is rejected
/// and the store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry timestamp {attempted} precedes last stored timestamp {last}")]
pub struct OrderingViolation {
    /// Timestamp of the most recently stored entry
    pub last: DateTime<Utc>,
    /// Timestamp of the rejected entry
    pub attempted: DateTime<Utc>,
}

/// Chronological read view over a run of stored entries (oldest first)
#[derive(Debug, Clone, Copy)]
pub struct HistoryWindow<'a> {
    entries: &'a [Entry],
}

impl<'a> HistoryWindow<'a> {
    /// View over an already chronological entry slice
    pub fn new(entries: &'a [Entry]) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Entry> {
        self.entries.iter()
    }

    /// Entries in chronological order
    pub fn entries(&self) -> &'a [Entry] {
        self.entries
    }

    /// Most recent entry in the window
    pub fn latest(&self) -> Option<&'a Entry> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &HistoryWindow<'a> {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Append-only store owning the entry sequence.
///
/// All other components receive read-only windows; controlled mutation goes
/// through `append` alone.
pub struct HistoryStore {
    entries: Vec<Entry>,
    clock: Box<dyn Clock>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// Create an empty store backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create an empty store with an injected clock
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            entries: Vec::new(),
            clock,
        }
    }

    /// Append validated metrics as a new entry.
    ///
    /// Assigns `clock.now()` when `timestamp` is `None`. Rejects timestamps
    /// older than the last stored entry; equal timestamps are accepted.
    pub fn append(
        &mut self,
        metrics: BehaviorMetrics,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<&Entry, OrderingViolation> {
        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());

        if let Some(last) = self.entries.last() {
            if timestamp < last.timestamp {
                return Err(OrderingViolation {
                    last: last.timestamp,
                    attempted: timestamp,
                });
            }
        }

        self.entries.push(Entry { timestamp, metrics });
        Ok(self.entries.last().unwrap())
    }

    /// Window over the `n` most recent entries, oldest first.
    ///
    /// `n = 0` yields an empty window; `n` larger than the history yields
    /// the whole history.
    pub fn latest(&self, n: usize) -> HistoryWindow<'_> {
        let start = self.entries.len().saturating_sub(n);
        HistoryWindow {
            entries: &self.entries[start..],
        }
    }

    /// Window over the whole history
    pub fn all(&self) -> HistoryWindow<'_> {
        HistoryWindow {
            entries: &self.entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every stored entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the log with a previously exported entry sequence.
    ///
    /// The sequence must already be in non-decreasing timestamp order;
    /// otherwise the store is left unchanged.
    pub fn load_entries(&mut self, entries: Vec<Entry>) -> Result<(), OrderingViolation> {
        validate_order(&entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Serialize the entry log to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}

fn validate_order(entries: &[Entry]) -> Result<(), OrderingViolation> {
    for pair in entries.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(OrderingViolation {
                last: pair[0].timestamp,
                attempted: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that advances one minute per call
    struct StepClock {
        ticks: AtomicI64,
    }

    impl StepClock {
        fn new() -> Self {
            Self {
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap() + chrono::Duration::minutes(tick)
        }
    }

    fn make_metrics(mood: u8) -> BehaviorMetrics {
        BehaviorMetrics {
            sleep_hours: 7.0,
            mood_score: mood,
            messages_sent: 15,
            steps: 5000,
            screen_time_hours: 3.0,
        }
    }

    fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_append_assigns_clock_timestamps() {
        let mut store = HistoryStore::with_clock(Box::new(StepClock::new()));

        store.append(make_metrics(5), None).unwrap();
        store.append(make_metrics(6), None).unwrap();
        store.append(make_metrics(7), None).unwrap();

        let window = store.all();
        assert_eq!(window.len(), 3);
        assert_eq!(window.entries()[0].timestamp, ts(8, 0));
        assert_eq!(window.entries()[1].timestamp, ts(8, 1));
        assert_eq!(window.entries()[2].timestamp, ts(8, 2));
    }

    #[test]
    fn test_append_respects_explicit_timestamp() {
        let mut store = HistoryStore::new();
        let entry = store.append(make_metrics(5), Some(ts(9, 30))).unwrap();
        assert_eq!(entry.timestamp, ts(9, 30));
    }

    #[test]
    fn test_out_of_order_append_is_rejected() {
        let mut store = HistoryStore::new();
        store.append(make_metrics(5), Some(ts(10, 0))).unwrap();

        let err = store.append(make_metrics(6), Some(ts(9, 0))).unwrap_err();
        assert_eq!(
            err,
            OrderingViolation {
                last: ts(10, 0),
                attempted: ts(9, 0),
            }
        );

        // Rejection leaves the store untouched
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_equal_timestamps_are_accepted() {
        let mut store = HistoryStore::new();
        store.append(make_metrics(5), Some(ts(10, 0))).unwrap();
        store.append(make_metrics(6), Some(ts(10, 0))).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_latest_window_bounds() {
        let mut store = HistoryStore::new();
        for minute in 0..5 {
            store
                .append(make_metrics(5), Some(ts(10, minute)))
                .unwrap();
        }

        assert!(store.latest(0).is_empty());
        assert_eq!(store.latest(3).len(), 3);
        assert_eq!(store.latest(100).len(), 5);

        // Oldest first, covering the most recent run
        let window = store.latest(3);
        assert_eq!(window.entries()[0].timestamp, ts(10, 2));
        assert_eq!(window.latest().unwrap().timestamp, ts(10, 4));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut store = HistoryStore::new();
        store.append(make_metrics(5), Some(ts(10, 0))).unwrap();
        store.append(make_metrics(8), Some(ts(11, 0))).unwrap();

        let json = store.to_json().unwrap();
        let entries: Vec<Entry> = serde_json::from_str(&json).unwrap();

        let mut restored = HistoryStore::new();
        restored.load_entries(entries).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(
            restored.all().entries(),
            store.all().entries()
        );
    }

    #[test]
    fn test_load_rejects_unordered_entries() {
        let entries = vec![
            Entry {
                timestamp: ts(11, 0),
                metrics: make_metrics(5),
            },
            Entry {
                timestamp: ts(10, 0),
                metrics: make_metrics(6),
            },
        ];

        let mut store = HistoryStore::new();
        assert!(store.load_entries(entries).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = HistoryStore::new();
        store.append(make_metrics(5), Some(ts(10, 0))).unwrap();
        store.clear();
        assert!(store.is_empty());

        // History restarts cleanly after a clear
        store.append(make_metrics(5), Some(ts(9, 0))).unwrap();
        assert_eq!(store.len(), 1);
    }
}
