//! Intervention selection
//!
//! Maps a risk level to a suggested action from a static ranked catalogue.
//! Selection is deterministic: the primary (first-ranked) message for the
//! level is always returned. The full ranked list per level is exposed for
//! collaborators that want to rotate through alternatives themselves.

use crate::types::{RiskLevel, Suggestion};

/// Maintenance suggestions for low risk, ranked
const LOW_SUGGESTIONS: &[&str] = &[
    "Keep up the good work! Stay connected with friends.",
    "Great job maintaining your routine!",
    "Continue your healthy habits.",
];

/// Self-care suggestions for medium risk, ranked
const MEDIUM_SUGGESTIONS: &[&str] = &[
    "Consider taking a short walk today.",
    "Try a 5-minute breathing exercise.",
    "Reach out to a friend or family member.",
    "Take a break from screens for 30 minutes.",
];

/// Escalation suggestions for high risk, ranked
const HIGH_SUGGESTIONS: &[&str] = &[
    "Please talk to a trusted friend or family member today.",
    "Consider contacting a counselor or mental health professional.",
    "Call a mental health helpline if you're feeling overwhelmed.",
    "Reach out to someone you trust - you don't have to face this alone.",
];

/// Deterministic suggestion selector
pub struct InterventionSelector;

impl InterventionSelector {
    /// Primary suggestion for a risk level
    pub fn suggest(level: RiskLevel) -> Suggestion {
        Suggestion {
            level,
            message: Self::ranked(level)[0].to_string(),
        }
    }

    /// Full ranked suggestion list for a risk level
    pub fn ranked(level: RiskLevel) -> &'static [&'static str] {
        match level {
            RiskLevel::Low => LOW_SUGGESTIONS,
            RiskLevel::Medium => MEDIUM_SUGGESTIONS,
            RiskLevel::High => HIGH_SUGGESTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_is_deterministic() {
        let first = InterventionSelector::suggest(RiskLevel::Medium);
        let second = InterventionSelector::suggest(RiskLevel::Medium);
        assert_eq!(first, second);
    }

    #[test]
    fn test_suggestion_is_primary_ranked() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            let suggestion = InterventionSelector::suggest(level);
            assert_eq!(suggestion.level, level);
            assert_eq!(suggestion.message, InterventionSelector::ranked(level)[0]);
        }
    }

    #[test]
    fn test_levels_have_distinct_messages() {
        let low = InterventionSelector::suggest(RiskLevel::Low);
        let medium = InterventionSelector::suggest(RiskLevel::Medium);
        let high = InterventionSelector::suggest(RiskLevel::High);

        assert_ne!(low.message, medium.message);
        assert_ne!(medium.message, high.message);
        assert_ne!(low.message, high.message);
    }

    #[test]
    fn test_ranked_lists_are_populated() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert!(!InterventionSelector::ranked(level).is_empty());
        }
    }
}
