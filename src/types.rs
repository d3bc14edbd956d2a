//! Core types for the MindGuard risk engine
//!
//! This module defines the data that flows through the engine: untrusted
//! submission drafts, validated metrics, stored entries, risk assessments,
//! and intervention suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw behavioral submission, as received from a collaborator.
///
/// Every metric is optional so that missing fields can be reported by name,
/// and integers are wide enough to carry negative values into validation
/// instead of failing at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Hours of sleep in the last night (0-24)
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    /// Self-reported mood (1-10)
    #[serde(default)]
    pub mood_score: Option<i64>,
    /// Messages sent during the day
    #[serde(default)]
    pub messages_sent: Option<i64>,
    /// Steps walked during the day
    #[serde(default)]
    pub steps: Option<i64>,
    /// Screen time in hours
    #[serde(default)]
    pub screen_time_hours: Option<f64>,
    /// Observation time; assigned at ingestion when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Validated behavioral metrics for a single day.
///
/// Produced only by the entry validator; every field is inside its domain
/// and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorMetrics {
    /// Hours of sleep (0-24 inclusive)
    pub sleep_hours: f64,
    /// Self-reported mood (1-10 inclusive)
    pub mood_score: u8,
    /// Messages sent
    pub messages_sent: u32,
    /// Steps walked
    pub steps: u32,
    /// Screen time in hours (>= 0)
    pub screen_time_hours: f64,
}

/// One stored behavioral observation.
///
/// Entries are immutable once appended to the history store; corrections are
/// new entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Ingestion timestamp (non-decreasing across the history)
    pub timestamp: DateTime<Utc>,
    /// Validated metrics
    pub metrics: BehaviorMetrics,
}

/// Discrete risk bucket derived from a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Bucket a risk score: `< 0.3` low, `< 0.6` medium, otherwise high
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLevel::Low
        } else if score < 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Identifier of a scoring rule that fired.
///
/// Variants are declared in rule-table order; `triggered_factors` on an
/// assessment preserves this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    SleepSevere,
    SleepMild,
    MoodSevere,
    MoodMild,
    SocialSevere,
    SocialMild,
    ScreenHigh,
    MovementLow,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::SleepSevere => "sleep_severe",
            RiskFactor::SleepMild => "sleep_mild",
            RiskFactor::MoodSevere => "mood_severe",
            RiskFactor::MoodMild => "mood_mild",
            RiskFactor::SocialSevere => "social_severe",
            RiskFactor::SocialMild => "social_mild",
            RiskFactor::ScreenHigh => "screen_high",
            RiskFactor::MovementLow => "movement_low",
        }
    }
}

/// Risk assessment derived from a single entry.
///
/// Never persisted on its own; recomputable from the entry at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of triggered rule weights, clamped to [0, 1]
    pub score: f64,
    /// Discrete bucket for the score
    pub level: RiskLevel,
    /// Rules that fired, in rule-table order
    pub triggered_factors: Vec<RiskFactor>,
}

/// Intervention suggestion for a risk level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Level the suggestion addresses
    pub level: RiskLevel,
    /// Primary suggestion text for the level
    pub message: String,
}
