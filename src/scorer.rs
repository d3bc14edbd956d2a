//! Risk scoring
//!
//! Deterministic rule-based scoring of a single entry. The rule table is
//! evaluated in a fixed order; tiered rules (sleep, mood, social) are
//! mutually exclusive per metric, with the stricter threshold checked
//! first so a severe signal is never double-counted as mild. Screen and
//! movement rules are independent booleans.

use crate::types::{BehaviorMetrics, Entry, RiskAssessment, RiskFactor, RiskLevel};

/// Sleep below this many hours is severe
const SLEEP_SEVERE_BELOW: f64 = 4.0;

/// Sleep below this many hours (but not severe) is mild
const SLEEP_MILD_BELOW: f64 = 6.0;

/// Mood at or below this score is severe
const MOOD_SEVERE_MAX: u8 = 3;

/// Mood at or below this score (but not severe) is mild
const MOOD_MILD_MAX: u8 = 5;

/// Fewer messages than this is severe social withdrawal
const SOCIAL_SEVERE_BELOW: u32 = 5;

/// Fewer messages than this (but not severe) is mild withdrawal
const SOCIAL_MILD_BELOW: u32 = 10;

/// Screen time above this many hours fires the screen rule
const SCREEN_HIGH_ABOVE: f64 = 8.0;

/// Fewer steps than this fires the movement rule
const MOVEMENT_LOW_BELOW: u32 = 1000;

impl RiskFactor {
    /// Weight this rule contributes to the risk score when it fires
    pub const fn weight(self) -> f64 {
        match self {
            RiskFactor::SleepSevere => 0.30,
            RiskFactor::SleepMild => 0.15,
            RiskFactor::MoodSevere => 0.40,
            RiskFactor::MoodMild => 0.20,
            RiskFactor::SocialSevere => 0.20,
            RiskFactor::SocialMild => 0.10,
            RiskFactor::ScreenHigh => 0.10,
            RiskFactor::MovementLow => 0.10,
        }
    }
}

/// Rule-based risk scorer
pub struct RiskScorer;

impl RiskScorer {
    /// Score a stored entry.
    ///
    /// Total function over validated entries; the score is the sum of the
    /// fired rule weights clamped to [0, 1].
    pub fn score(entry: &Entry) -> RiskAssessment {
        Self::score_metrics(&entry.metrics)
    }

    /// Score a bare metric set
    pub fn score_metrics(metrics: &BehaviorMetrics) -> RiskAssessment {
        let triggered_factors = evaluate_rules(metrics);
        let raw: f64 = triggered_factors.iter().map(|f| f.weight()).sum();
        let score = raw.clamp(0.0, 1.0);

        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
            triggered_factors,
        }
    }
}

/// Evaluate the rule table, returning fired rules in declared order
fn evaluate_rules(metrics: &BehaviorMetrics) -> Vec<RiskFactor> {
    let mut fired = Vec::new();

    if let Some(factor) = sleep_factor(metrics.sleep_hours) {
        fired.push(factor);
    }
    if let Some(factor) = mood_factor(metrics.mood_score) {
        fired.push(factor);
    }
    if let Some(factor) = social_factor(metrics.messages_sent) {
        fired.push(factor);
    }
    if metrics.screen_time_hours > SCREEN_HIGH_ABOVE {
        fired.push(RiskFactor::ScreenHigh);
    }
    if metrics.steps < MOVEMENT_LOW_BELOW {
        fired.push(RiskFactor::MovementLow);
    }

    fired
}

fn sleep_factor(sleep_hours: f64) -> Option<RiskFactor> {
    if sleep_hours < SLEEP_SEVERE_BELOW {
        Some(RiskFactor::SleepSevere)
    } else if sleep_hours < SLEEP_MILD_BELOW {
        Some(RiskFactor::SleepMild)
    } else {
        None
    }
}

fn mood_factor(mood_score: u8) -> Option<RiskFactor> {
    if mood_score <= MOOD_SEVERE_MAX {
        Some(RiskFactor::MoodSevere)
    } else if mood_score <= MOOD_MILD_MAX {
        Some(RiskFactor::MoodMild)
    } else {
        None
    }
}

fn social_factor(messages_sent: u32) -> Option<RiskFactor> {
    if messages_sent < SOCIAL_SEVERE_BELOW {
        Some(RiskFactor::SocialSevere)
    } else if messages_sent < SOCIAL_MILD_BELOW {
        Some(RiskFactor::SocialMild)
    } else {
        None
    }
}
