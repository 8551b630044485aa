//! Chart-ready series built from history records.

use serde::{Deserialize, Serialize};
use uidai_portal_api_models::HistoryRecord;

/// Axis labels longer than this many characters are shortened.
pub const MAX_LABEL_CHARS: usize = 12;

const ELLIPSIS: &str = "...";

/// A single `{name, value}` point as consumed by the chart widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Axis label.
    pub name: String,
    /// Plotted value.
    pub value: f64,
}

/// Which field of a [`HistoryRecord`] to plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// Aadhaar Stress Index.
    #[default]
    Asi,
    /// Aadhaar Exclusion Risk Score.
    Aers,
    /// Minor Biometric Usage ratio.
    Mbu,
    /// Risk Proportion.
    Rp,
    /// Raw model output.
    MlPrediction,
    /// Biometric load.
    Biometric,
    /// Child load.
    Child,
    /// Demographic load.
    Demographic,
}

impl Metric {
    /// Reads this metric from a record.
    #[must_use]
    pub const fn value_of(self, record: &HistoryRecord) -> f64 {
        match self {
            Self::Asi => record.asi,
            Self::Aers => record.aers,
            Self::Mbu => record.mbu,
            Self::Rp => record.rp,
            Self::MlPrediction => record.ml_prediction,
            Self::Biometric => record.b,
            Self::Child => record.c,
            Self::Demographic => record.d,
        }
    }
}

/// Shortens `label` to at most [`MAX_LABEL_CHARS`] characters, ending in
/// `...` when cut.
#[must_use]
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let kept: String = label
        .chars()
        .take(MAX_LABEL_CHARS - ELLIPSIS.len())
        .collect();
    format!("{kept}{ELLIPSIS}")
}

/// Maps history to an ASI series, one point per record, in input order.
#[must_use]
pub fn to_chart_series(history: &[HistoryRecord]) -> Vec<ChartPoint> {
    to_metric_series(history, Metric::Asi)
}

/// Maps history to a series of the chosen metric, one point per record,
/// in input order.
#[must_use]
pub fn to_metric_series(history: &[HistoryRecord], metric: Metric) -> Vec<ChartPoint> {
    history
        .iter()
        .map(|record| ChartPoint {
            name: truncate_label(&record.month),
            value: metric.value_of(record),
        })
        .collect()
}
