//! Entry validation
//!
//! Normalizes an untrusted submission draft into validated behavioral
//! metrics, checking every field against its domain.

use crate::types::{BehaviorMetrics, EntryDraft};

/// Minimum accepted sleep duration (hours)
pub const SLEEP_HOURS_MIN: f64 = 0.0;

/// Maximum accepted sleep duration (hours)
pub const SLEEP_HOURS_MAX: f64 = 24.0;

/// Minimum accepted mood score
pub const MOOD_SCORE_MIN: i64 = 1;

/// Maximum accepted mood score
pub const MOOD_SCORE_MAX: i64 = 10;

/// Validation errors for submission drafts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field, .. } => field,
        }
    }
}

/// Validator for submission drafts
pub struct EntryValidator;

impl EntryValidator {
    /// Validate a draft into canonical metrics.
    ///
    /// Boundary values (0, 24, 1, 10) are inclusive and valid; negative or
    /// non-finite values always fail. The draft's optional timestamp is not
    /// inspected here - timestamp assignment is the history store's concern.
    pub fn validate(draft: &EntryDraft) -> Result<BehaviorMetrics, ValidationError> {
        let sleep_hours = require_real("sleep_hours", draft.sleep_hours)?;
        if !(SLEEP_HOURS_MIN..=SLEEP_HOURS_MAX).contains(&sleep_hours) {
            return Err(ValidationError::OutOfRange {
                field: "sleep_hours",
                value: sleep_hours,
                min: SLEEP_HOURS_MIN,
                max: SLEEP_HOURS_MAX,
            });
        }

        let mood = draft.mood_score.ok_or(ValidationError::MissingField {
            field: "mood_score",
        })?;
        if !(MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(&mood) {
            return Err(ValidationError::OutOfRange {
                field: "mood_score",
                value: mood as f64,
                min: MOOD_SCORE_MIN as f64,
                max: MOOD_SCORE_MAX as f64,
            });
        }

        let messages_sent = require_count("messages_sent", draft.messages_sent)?;
        let steps = require_count("steps", draft.steps)?;

        let screen_time_hours = require_real("screen_time_hours", draft.screen_time_hours)?;
        if screen_time_hours < 0.0 {
            return Err(ValidationError::Negative {
                field: "screen_time_hours",
                value: screen_time_hours,
            });
        }

        Ok(BehaviorMetrics {
            sleep_hours,
            mood_score: mood as u8,
            messages_sent,
            steps,
            screen_time_hours,
        })
    }
}

fn require_real(field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    Ok(value)
}

fn require_count(field: &'static str, value: Option<i64>) -> Result<u32, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?;
    if value < 0 {
        return Err(ValidationError::Negative {
            field,
            value: value as f64,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value: value as f64,
        min: 0.0,
        max: u32::MAX as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_draft() -> EntryDraft {
        EntryDraft {
            sleep_hours: Some(7.0),
            mood_score: Some(6),
            messages_sent: Some(15),
            steps: Some(5000),
            screen_time_hours: Some(4.0),
            timestamp: None,
        }
    }

    #[test]
    fn test_valid_draft() {
        let metrics = EntryValidator::validate(&make_draft()).unwrap();
        assert_eq!(metrics.sleep_hours, 7.0);
        assert_eq!(metrics.mood_score, 6);
        assert_eq!(metrics.messages_sent, 15);
        assert_eq!(metrics.steps, 5000);
        assert_eq!(metrics.screen_time_hours, 4.0);
    }

    #[test]
    fn test_boundary_values_are_inclusive() {
        let mut draft = make_draft();
        draft.sleep_hours = Some(0.0);
        draft.mood_score = Some(1);
        assert!(EntryValidator::validate(&draft).is_ok());

        draft.sleep_hours = Some(24.0);
        draft.mood_score = Some(10);
        draft.messages_sent = Some(0);
        draft.steps = Some(0);
        draft.screen_time_hours = Some(0.0);
        assert!(EntryValidator::validate(&draft).is_ok());
    }

    #[test]
    fn test_sleep_out_of_range() {
        let mut draft = make_draft();
        draft.sleep_hours = Some(24.5);

        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(err.field(), "sleep_hours");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        draft.sleep_hours = Some(-1.0);
        assert!(EntryValidator::validate(&draft).is_err());
    }

    #[test]
    fn test_mood_out_of_range() {
        let mut draft = make_draft();
        draft.mood_score = Some(0);
        assert!(EntryValidator::validate(&draft).is_err());

        draft.mood_score = Some(11);
        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(err.field(), "mood_score");
    }

    #[test]
    fn test_negative_counts_fail() {
        let mut draft = make_draft();
        draft.messages_sent = Some(-1);
        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(err.field(), "messages_sent");
        assert!(matches!(err, ValidationError::Negative { .. }));

        let mut draft = make_draft();
        draft.steps = Some(-100);
        assert!(EntryValidator::validate(&draft).is_err());
    }

    #[test]
    fn test_negative_screen_time_fails() {
        let mut draft = make_draft();
        draft.screen_time_hours = Some(-0.5);
        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(err.field(), "screen_time_hours");
    }

    #[test]
    fn test_non_finite_values_fail() {
        let mut draft = make_draft();
        draft.sleep_hours = Some(f64::NAN);
        assert!(matches!(
            EntryValidator::validate(&draft).unwrap_err(),
            ValidationError::NotFinite { .. }
        ));

        let mut draft = make_draft();
        draft.screen_time_hours = Some(f64::INFINITY);
        assert!(EntryValidator::validate(&draft).is_err());
    }

    #[test]
    fn test_missing_fields_reported_by_name() {
        let draft = EntryDraft::default();
        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(err.field(), "sleep_hours");

        let mut draft = make_draft();
        draft.steps = None;
        let err = EntryValidator::validate(&draft).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField { field: "steps" }
        );
    }

    #[test]
    fn test_error_display_carries_reason() {
        let err = ValidationError::OutOfRange {
            field: "mood_score",
            value: 11.0,
            min: 1.0,
            max: 10.0,
        };
        assert_eq!(err.to_string(), "mood_score must be within [1, 10], got 11");
    }
}
