//! Engine facade
//!
//! Public entry points for external collaborators (API layer, dashboard):
//! a stateless one-shot assessment and a stateful processor that owns the
//! history store.

use chrono::Utc;

use crate::entry::{EntryValidator, ValidationError};
use crate::error::EngineError;
use crate::history::{Clock, HistoryStore, HistoryWindow, DEFAULT_WINDOW};
use crate::intervention::InterventionSelector;
use crate::report::{ReportEncoder, RiskReport};
use crate::scorer::RiskScorer;
use crate::trend::{TrendAggregator, TrendSummary};
use crate::types::{Entry, EntryDraft, RiskAssessment, RiskLevel, Suggestion};

/// Validate and score a draft without storing it (stateless).
pub fn assess(draft: &EntryDraft) -> Result<RiskAssessment, ValidationError> {
    let metrics = EntryValidator::validate(draft)?;
    Ok(RiskScorer::score_metrics(&metrics))
}

/// Draft JSON in, risk report JSON out (stateless, one-shot).
///
/// Nothing is stored; the entry timestamp falls back to the current wall
/// clock when the draft carries none.
pub fn assess_json(draft_json: &str) -> Result<String, EngineError> {
    let draft: EntryDraft = serde_json::from_str(draft_json)?;
    let metrics = EntryValidator::validate(&draft)?;

    let entry = Entry {
        timestamp: draft.timestamp.unwrap_or_else(Utc::now),
        metrics,
    };
    let assessment = RiskScorer::score(&entry);
    let suggestion = InterventionSelector::suggest(assessment.level);

    let encoder = ReportEncoder::new();
    Ok(encoder.assessment_to_json(&entry, &assessment, &suggestion)?)
}

/// Stateful engine facade owning the entry history.
///
/// Validation or ordering failures surface to the caller without mutating
/// the history.
pub struct MindguardProcessor {
    history: HistoryStore,
    encoder: ReportEncoder,
    trend_window: usize,
}

impl Default for MindguardProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MindguardProcessor {
    /// Create a processor with the system clock and the default trend
    /// window (7 entries)
    pub fn new() -> Self {
        Self {
            history: HistoryStore::new(),
            encoder: ReportEncoder::new(),
            trend_window: DEFAULT_WINDOW,
        }
    }

    /// Create a processor with an injected clock
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            history: HistoryStore::with_clock(clock),
            encoder: ReportEncoder::new(),
            trend_window: DEFAULT_WINDOW,
        }
    }

    /// Create a processor with a specific trend window size (number of
    /// entries)
    pub fn with_trend_window(entries: usize) -> Self {
        Self {
            history: HistoryStore::new(),
            encoder: ReportEncoder::new(),
            trend_window: entries,
        }
    }

    /// Validate a draft, append it to the history, and score the stored
    /// entry.
    pub fn submit(&mut self, draft: &EntryDraft) -> Result<RiskAssessment, EngineError> {
        let metrics = EntryValidator::validate(draft)?;
        let entry = self.history.append(metrics, draft.timestamp)?;
        Ok(RiskScorer::score(entry))
    }

    /// Validate, append, and wrap the stored entry into a report payload.
    pub fn submit_report(&mut self, draft: &EntryDraft) -> Result<RiskReport, EngineError> {
        let metrics = EntryValidator::validate(draft)?;
        let entry = self.history.append(metrics, draft.timestamp)?.clone();

        let assessment = RiskScorer::score(&entry);
        let suggestion = InterventionSelector::suggest(assessment.level);
        Ok(self
            .encoder
            .encode_assessment(&entry, &assessment, &suggestion))
    }

    /// Draft JSON in, risk report JSON out, history maintained.
    pub fn submit_json(&mut self, draft_json: &str) -> Result<String, EngineError> {
        let draft: EntryDraft = serde_json::from_str(draft_json)?;
        let report = self.submit_report(&draft)?;
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Window over the `n` most recent entries, oldest first
    pub fn latest(&self, n: usize) -> HistoryWindow<'_> {
        self.history.latest(n)
    }

    /// Window over the whole history
    pub fn all(&self) -> HistoryWindow<'_> {
        self.history.all()
    }

    /// Trend summary over the `n` most recent entries
    pub fn trend(&self, n: usize) -> TrendSummary {
        TrendAggregator::summarize(&self.history.latest(n))
    }

    /// Trend summary over the configured window
    pub fn trend_default(&self) -> TrendSummary {
        self.trend(self.trend_window)
    }

    /// Suggestion for a risk level
    pub fn suggestion(&self, level: RiskLevel) -> Suggestion {
        InterventionSelector::suggest(level)
    }

    /// Configured trend window size
    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> usize {
        self.history.len()
    }

    /// Drop all stored entries
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Serialize the entry history to JSON for persistence
    pub fn save_history(&self) -> Result<String, EngineError> {
        Ok(self.history.to_json()?)
    }

    /// Replace the entry history from a JSON snapshot
    pub fn load_history(&mut self, json: &str) -> Result<(), EngineError> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        self.history.load_entries(entries)?;
        Ok(())
    }
}
