//! Report encoding
//!
//! Encodes assessments and trend summaries into versioned JSON payloads
//! with producer metadata - the shape handed to dashboard and API
//! collaborators.

use crate::trend::TrendSummary;
use crate::types::{Entry, RiskAssessment, Suggestion};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "mindguard.report.v1";

/// Producer metadata attached to every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Assessment report for one stored entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub entry: Entry,
    pub assessment: RiskAssessment,
    pub suggestion: Suggestion,
}

/// Trend report over a history window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub summary: TrendSummary,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create an encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode an assessment into a report payload
    pub fn encode_assessment(
        &self,
        entry: &Entry,
        assessment: &RiskAssessment,
        suggestion: &Suggestion,
    ) -> RiskReport {
        RiskReport {
            schema_version: REPORT_VERSION.to_string(),
            producer: self.producer(),
            generated_at_utc: Utc::now().to_rfc3339(),
            entry: entry.clone(),
            assessment: assessment.clone(),
            suggestion: suggestion.clone(),
        }
    }

    /// Encode an assessment to a JSON string
    pub fn assessment_to_json(
        &self,
        entry: &Entry,
        assessment: &RiskAssessment,
        suggestion: &Suggestion,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.encode_assessment(entry, assessment, suggestion))
    }

    /// Encode a trend summary into a report payload
    pub fn encode_trend(&self, summary: &TrendSummary) -> TrendReport {
        TrendReport {
            schema_version: REPORT_VERSION.to_string(),
            producer: self.producer(),
            generated_at_utc: Utc::now().to_rfc3339(),
            summary: summary.clone(),
        }
    }

    /// Encode a trend summary to a JSON string
    pub fn trend_to_json(&self, summary: &TrendSummary) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.encode_trend(summary))
    }

    fn producer(&self) -> ReportProducer {
        ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::InterventionSelector;
    use crate::scorer::RiskScorer;
    use crate::types::BehaviorMetrics;
    use chrono::TimeZone;

    fn make_entry() -> Entry {
        Entry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, 21, 0, 0).unwrap(),
            metrics: BehaviorMetrics {
                sleep_hours: 5.0,
                mood_score: 4,
                messages_sent: 7,
                steps: 2000,
                screen_time_hours: 4.0,
            },
        }
    }

    #[test]
    fn test_report_envelope() {
        let entry = make_entry();
        let assessment = RiskScorer::score(&entry);
        let suggestion = InterventionSelector::suggest(assessment.level);

        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode_assessment(&entry, &assessment, &suggestion);

        assert_eq!(report.schema_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, ENGINE_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.assessment, assessment);
    }

    #[test]
    fn test_assessment_json_fields() {
        let entry = make_entry();
        let assessment = RiskScorer::score(&entry);
        let suggestion = InterventionSelector::suggest(assessment.level);

        let encoder = ReportEncoder::new();
        let json = encoder
            .assessment_to_json(&entry, &assessment, &suggestion)
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["schema_version"], "mindguard.report.v1");
        assert_eq!(payload["producer"]["name"], "mindguard-core");
        assert_eq!(payload["assessment"]["level"], "medium");
        assert!(payload["assessment"]["score"].is_number());
        assert!(payload["suggestion"]["message"].is_string());
    }

    #[test]
    fn test_trend_report_roundtrip() {
        let entries = vec![make_entry()];
        let summary =
            crate::trend::TrendAggregator::summarize(&crate::history::HistoryWindow::new(&entries));

        let encoder = ReportEncoder::new();
        let json = encoder.trend_to_json(&summary).unwrap();
        let report: TrendReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.schema_version, REPORT_VERSION);
        assert_eq!(report.summary, summary);
    }
}
