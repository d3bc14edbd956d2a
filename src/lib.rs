//! MindGuard Core - deterministic crisis-risk engine for self-reported
//! behavioral metrics
//!
//! The engine turns daily self-reported metrics (sleep, mood, messaging
//! activity, steps, screen time) into a bounded crisis-risk score through a
//! deterministic pipeline: draft validation → history append → rule-based
//! scoring → trend aggregation → intervention selection.
//!
//! ## Modules
//!
//! - **entry**: Validate untrusted submission drafts into canonical metrics
//! - **scorer**: Rule-based risk scoring over a single entry
//! - **history**: Append-only, time-ordered entry store with read windows
//! - **trend**: Rolling statistics and correlations over a window
//! - **intervention**: Static suggestion catalogue per risk level
//! - **report**: Versioned JSON report payloads for collaborators

pub mod engine;
pub mod entry;
pub mod error;
pub mod history;
pub mod intervention;
pub mod report;
pub mod scorer;
pub mod trend;
pub mod types;

pub use engine::{assess, assess_json, MindguardProcessor};
pub use entry::{EntryValidator, ValidationError};
pub use error::EngineError;
pub use history::{
    Clock, HistoryStore, HistoryWindow, OrderingViolation, SystemClock, DEFAULT_WINDOW,
};
pub use intervention::InterventionSelector;
pub use report::{ReportEncoder, RiskReport, TrendReport, REPORT_VERSION};
pub use scorer::RiskScorer;
pub use trend::{
    CorrelationMatrix, MetricKind, MetricStats, RiskPoint, TrendAggregator, TrendSummary,
};
pub use types::{
    BehaviorMetrics, Entry, EntryDraft, RiskAssessment, RiskFactor, RiskLevel, Suggestion,
};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "mindguard-core";
