//! Trend aggregation
//!
//! Derives rolling statistics from a history window: per-metric means and
//! latest values, the chronological risk-score series, and pairwise Pearson
//! correlations across all metrics. Undefined statistics (fewer than two
//! samples, zero variance) are reported as `None`; NaN never escapes this
//! module.

use crate::history::HistoryWindow;
use crate::scorer::RiskScorer;
use crate::types::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics tracked by the aggregator, in correlation-matrix order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    SleepHours,
    MoodScore,
    MessagesSent,
    Steps,
    ScreenTimeHours,
    RiskScore,
}

impl MetricKind {
    /// All metrics in matrix order
    pub const ALL: [MetricKind; 6] = [
        MetricKind::SleepHours,
        MetricKind::MoodScore,
        MetricKind::MessagesSent,
        MetricKind::Steps,
        MetricKind::ScreenTimeHours,
        MetricKind::RiskScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::SleepHours => "sleep_hours",
            MetricKind::MoodScore => "mood_score",
            MetricKind::MessagesSent => "messages_sent",
            MetricKind::Steps => "steps",
            MetricKind::ScreenTimeHours => "screen_time_hours",
            MetricKind::RiskScore => "risk_score",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Mean and latest value of one metric over a window.
///
/// Both are `None` on an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: Option<f64>,
    pub latest: Option<f64>,
}

/// One point of the risk-score series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub level: RiskLevel,
}

/// Pairwise Pearson correlations over the metric set.
///
/// `None` cells mean the pair's correlation is undefined for this window
/// (insufficient data or a constant series).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    values: [[Option<f64>; 6]; 6],
}

impl CorrelationMatrix {
    /// Correlation between two metrics, if defined
    pub fn get(&self, a: MetricKind, b: MetricKind) -> Option<f64> {
        self.values[a.index()][b.index()]
    }
}

/// Derived statistics over a history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Number of entries in the window
    pub sample_count: usize,
    pub sleep_hours: MetricStats,
    pub mood_score: MetricStats,
    pub messages_sent: MetricStats,
    pub steps: MetricStats,
    pub screen_time_hours: MetricStats,
    pub risk_score: MetricStats,
    /// Chronological risk assessments, one per entry
    pub risk_series: Vec<RiskPoint>,
    pub correlations: CorrelationMatrix,
}

impl TrendSummary {
    /// Stats for a metric by kind
    pub fn stats(&self, kind: MetricKind) -> &MetricStats {
        match kind {
            MetricKind::SleepHours => &self.sleep_hours,
            MetricKind::MoodScore => &self.mood_score,
            MetricKind::MessagesSent => &self.messages_sent,
            MetricKind::Steps => &self.steps,
            MetricKind::ScreenTimeHours => &self.screen_time_hours,
            MetricKind::RiskScore => &self.risk_score,
        }
    }
}

/// Aggregator for history windows
pub struct TrendAggregator;

impl TrendAggregator {
    /// Summarize a window.
    ///
    /// Pure function of the window contents; the risk series is obtained by
    /// scoring each entry in order.
    pub fn summarize(window: &HistoryWindow<'_>) -> TrendSummary {
        let entries = window.entries();

        let risk_series: Vec<RiskPoint> = entries
            .iter()
            .map(|entry| {
                let assessment = RiskScorer::score(entry);
                RiskPoint {
                    timestamp: entry.timestamp,
                    score: assessment.score,
                    level: assessment.level,
                }
            })
            .collect();

        let series: [Vec<f64>; 6] = [
            entries.iter().map(|e| e.metrics.sleep_hours).collect(),
            entries.iter().map(|e| e.metrics.mood_score as f64).collect(),
            entries
                .iter()
                .map(|e| e.metrics.messages_sent as f64)
                .collect(),
            entries.iter().map(|e| e.metrics.steps as f64).collect(),
            entries
                .iter()
                .map(|e| e.metrics.screen_time_hours)
                .collect(),
            risk_series.iter().map(|p| p.score).collect(),
        ];

        let mut values = [[None; 6]; 6];
        for a in MetricKind::ALL {
            for b in MetricKind::ALL {
                values[a.index()][b.index()] = pearson(&series[a.index()], &series[b.index()]);
            }
        }

        TrendSummary {
            sample_count: entries.len(),
            sleep_hours: series_stats(&series[0]),
            mood_score: series_stats(&series[1]),
            messages_sent: series_stats(&series[2]),
            steps: series_stats(&series[3]),
            screen_time_hours: series_stats(&series[4]),
            risk_score: series_stats(&series[5]),
            risk_series,
            correlations: CorrelationMatrix { values },
        }
    }
}

fn series_stats(series: &[f64]) -> MetricStats {
    if series.is_empty() {
        return MetricStats::default();
    }
    MetricStats {
        mean: Some(series.iter().sum::<f64>() / series.len() as f64),
        latest: series.last().copied(),
    }
}

/// Pearson correlation coefficient, or `None` when undefined.
///
/// Undefined for fewer than two samples and for constant series (zero
/// variance would divide by zero).
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
