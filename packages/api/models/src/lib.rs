#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the UIDAI risk-model backend.
//!
//! The backend is an external service; these types mirror its JSON
//! contract field-for-field (snake case on the wire). Fields the backend
//! only sometimes returns are modelled as [`Option`] so every consumer has
//! to handle their absence explicitly.

pub mod month;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use month::MonthParseError;

/// `GET /api/metadata` response used to populate the selector dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    /// All states, sorted alphabetically.
    pub states: Vec<String>,
    /// All months with recorded data, sorted chronologically.
    pub months: Vec<String>,
    /// Districts of each state, sorted alphabetically.
    pub districts_by_state: BTreeMap<String, Vec<String>>,
}

impl MetadataResponse {
    /// Returns the districts known for `state` (empty if the state is unknown).
    #[must_use]
    pub fn districts_for(&self, state: &str) -> &[String] {
        self.districts_by_state
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Earliest and latest selectable months.
    ///
    /// The upper bound is extended through the forecast horizon since the
    /// backend projects predictions for months past the recorded data.
    #[must_use]
    pub fn month_range(&self) -> Option<(&str, &str)> {
        let first = self.months.iter().min()?.as_str();
        let last = self.months.iter().max()?.as_str();
        Some((first, last.max(month::FORECAST_HORIZON_END)))
    }
}

/// `GET /api/districts` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictsResponse {
    /// District names for the requested state.
    pub districts: Vec<String>,
}

/// A location-month the user has selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationSelector {
    /// State name.
    pub state: String,
    /// District name within the state.
    pub district: String,
    /// Month in `YYYY-MM` format.
    pub month: String,
}

/// Violations of the [`LocationSelector`] invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The state is not present in the metadata.
    #[error("unknown state '{state}'")]
    UnknownState {
        /// The rejected state.
        state: String,
    },

    /// The district does not belong to the selected state.
    #[error("district '{district}' is not part of '{state}'")]
    DistrictNotInState {
        /// Selected state.
        state: String,
        /// The rejected district.
        district: String,
    },

    /// The month is not a valid `YYYY-MM` value.
    #[error(transparent)]
    Month(#[from] MonthParseError),

    /// The month falls outside the historical/forecast range.
    #[error("month '{month}' is outside the supported range {first}..={last}")]
    MonthOutOfRange {
        /// The rejected month.
        month: String,
        /// Earliest supported month.
        first: String,
        /// Latest supported month.
        last: String,
    },

    /// The metadata carries no months at all.
    #[error("no months available in metadata")]
    NoMonths,
}

impl LocationSelector {
    /// Creates a selector.
    #[must_use]
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            month: month.into(),
        }
    }

    /// Checks the selector against the loaded metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the state is unknown, the district is
    /// not in that state's list, or the month is malformed or out of range.
    pub fn validate(&self, metadata: &MetadataResponse) -> Result<(), SelectorError> {
        if !metadata.districts_by_state.contains_key(&self.state) {
            return Err(SelectorError::UnknownState {
                state: self.state.clone(),
            });
        }

        if !metadata
            .districts_for(&self.state)
            .iter()
            .any(|d| d == &self.district)
        {
            return Err(SelectorError::DistrictNotInState {
                state: self.state.clone(),
                district: self.district.clone(),
            });
        }

        month::parse_month(&self.month)?;

        let (first, last) = metadata.month_range().ok_or(SelectorError::NoMonths)?;
        if self.month.as_str() < first || self.month.as_str() > last {
            return Err(SelectorError::MonthOutOfRange {
                month: self.month.clone(),
                first: first.to_string(),
                last: last.to_string(),
            });
        }

        Ok(())
    }
}

/// One month of derived metrics for a location, as served by `/api/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Month in `YYYY-MM` format.
    pub month: String,
    /// Aadhaar Stress Index (0-100).
    pub asi: f64,
    /// Aadhaar Exclusion Risk Score (0-1).
    pub aers: f64,
    /// Minor Biometric Usage ratio.
    pub mbu: f64,
    /// Risk Proportion.
    pub rp: f64,
    /// Raw model output.
    pub ml_prediction: f64,
    /// Enrollment change.
    pub d_e: f64,
    /// Demographic change.
    pub d_d: f64,
    /// Child update change.
    pub d_c: f64,
    /// Biometric load.
    pub b: f64,
    /// Child load.
    pub c: f64,
    /// Demographic load.
    pub d: f64,
}

/// `GET /api/history` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Number of entries in `history`.
    pub records_count: u32,
    /// Records ordered by month.
    pub history: Vec<HistoryRecord>,
}

/// A single month on the forecast timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthForecast {
    /// The month's metrics.
    #[serde(flatten)]
    pub record: HistoryRecord,
    /// `true` for recorded data, `false` for a projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_actual: Option<bool>,
}

/// Boundaries of the forecast timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastTimeline {
    /// Last month with recorded data.
    pub historical_cutoff: String,
    /// The current month.
    pub current_month: String,
    /// First projected month.
    pub future_start: String,
}

/// Per-month linear deltas applied to the b/c/d workload counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTrends {
    /// Biometric load delta per month.
    pub b_trend: f64,
    /// Child load delta per month.
    pub c_trend: f64,
    /// Demographic load delta per month.
    pub d_trend: f64,
}

/// `POST /api/forecast` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRequest<'a> {
    /// State name.
    pub state: &'a str,
    /// District name.
    pub district: &'a str,
}

/// `POST /api/forecast` response: recent history plus a 3-month projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Timeline boundaries.
    pub timeline: ForecastTimeline,
    /// Workload trends used for the projection.
    pub trends: ForecastTrends,
    /// The last few recorded months.
    pub historical: Vec<MonthForecast>,
    /// The current month (recorded or projected).
    pub current: MonthForecast,
    /// First projected month.
    pub month1: MonthForecast,
    /// Second projected month.
    pub month2: MonthForecast,
    /// Third projected month.
    pub month3: MonthForecast,
}

impl ForecastResponse {
    /// The three projected months in chronological order.
    #[must_use]
    pub const fn future_months(&self) -> [&MonthForecast; 3] {
        [&self.month1, &self.month2, &self.month3]
    }
}

/// State-wide averages of the derived metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateAverage {
    /// Mean ASI.
    pub asi: f64,
    /// Mean AERS.
    pub aers: f64,
    /// Mean MBU.
    pub mbu: f64,
    /// Mean RP.
    pub rp: f64,
}

/// Summed workload counters for a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Total biometric load.
    pub biometric: f64,
    /// Total child load.
    pub child: f64,
    /// Total demographic load.
    pub demographic: f64,
}

/// A district's headline risk figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictRisk {
    /// District name.
    pub district: String,
    /// Aadhaar Stress Index.
    pub asi: f64,
    /// Aadhaar Exclusion Risk Score.
    pub aers: f64,
}

/// `GET /api/aggregate` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// State name.
    pub state: String,
    /// Month the aggregate was computed for.
    pub month: String,
    /// Number of districts aggregated.
    pub districts_count: u32,
    /// Averages across districts.
    pub average: AggregateAverage,
    /// Workload totals across districts.
    pub workload: Workload,
    /// Highest-risk districts, descending.
    pub top_districts: Vec<DistrictRisk>,
    /// Every district, descending by risk.
    pub all_districts: Vec<DistrictRisk>,
}

/// Manual input for `POST /api/predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Enrollment change (delta).
    pub d_e: f64,
    /// Demographic change (delta).
    pub d_d: f64,
    /// Child update change (delta).
    pub d_c: f64,
    /// Biometric load.
    pub b: f64,
    /// Child load.
    pub c: f64,
    /// Demographic load.
    pub d: f64,
    /// Biometric change one month back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_b_lag1: Option<f64>,
    /// Biometric change two months back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_b_lag2: Option<f64>,
    /// Child update change one month back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_c_lag1: Option<f64>,
    /// Calendar month number (1-12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_num: Option<u32>,
}

impl Default for PredictionInput {
    /// Sample scenario used to pre-fill the manual prediction form.
    fn default() -> Self {
        Self {
            d_e: 0.15,
            d_d: 0.10,
            d_c: 0.08,
            b: 100.0,
            c: 25.0,
            d: 50.0,
            d_b_lag1: None,
            d_b_lag2: None,
            d_c_lag1: None,
            month_num: None,
        }
    }
}

/// Either form of prediction request accepted by `/api/predict` and
/// `/api/batch-predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionRequest {
    /// Lookup by location and month.
    Location(LocationSelector),
    /// Model run on explicit feature values.
    Manual(PredictionInput),
}

/// `POST /api/batch-predict` request body.
#[derive(Debug, Clone, Serialize)]
pub struct BatchPredictionRequest<'a> {
    /// Scenarios to evaluate.
    pub scenarios: &'a [PredictionRequest],
}

/// `POST /api/batch-predict` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    /// One prediction per scenario, in request order.
    pub predictions: Vec<RiskPrediction>,
}

/// Relative weights of the three delta drivers in the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportances {
    /// Enrollment change weight.
    pub imp_e: f64,
    /// Demographic change weight.
    pub imp_d: f64,
    /// Child update change weight.
    pub imp_c: f64,
}

/// Feature values the backend fed into the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    /// Enrollment change.
    pub d_e: f64,
    /// Demographic change.
    pub d_d: f64,
    /// Child update change.
    pub d_c: f64,
    /// Biometric change one month back.
    pub d_b_lag1: f64,
    /// Biometric change two months back.
    pub d_b_lag2: f64,
    /// Child update change one month back.
    pub d_c_lag1: f64,
    /// Calendar month number.
    pub month_num: u32,
    /// Biometric load.
    pub b: f64,
    /// Child load.
    pub c: f64,
    /// Demographic load.
    pub d: f64,
}

/// `POST /api/predict` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    /// Aadhaar Stress Index (0-100).
    pub asi: f64,
    /// Aadhaar Exclusion Risk Score (0-1).
    pub aers: f64,
    /// Minor Biometric Usage ratio.
    pub mbu: f64,
    /// Risk Proportion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp: Option<f64>,
    /// Raw model output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_prediction: Option<f64>,
    /// Model feature weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<FeatureImportances>,
    /// Features used for the prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_features: Option<ExtractedFeatures>,
    /// The location this prediction was made for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSelector>,
    /// Set when the month lies past the recorded data and was extrapolated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_projected: Option<bool>,
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` or `"unhealthy"`.
    pub status: String,
    /// Whether the model file is loaded.
    pub model_loaded: bool,
    /// Whether the feature list is loaded.
    pub features_loaded: bool,
    /// Whether the master data set is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_loaded: Option<bool>,
    /// Number of master data records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_count: Option<u64>,
    /// Feature names the model expects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_features: Option<Vec<String>>,
}

impl HealthStatus {
    /// The degraded status reported when the backend cannot be reached.
    #[must_use]
    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            model_loaded: false,
            features_loaded: false,
            data_loaded: Some(false),
            records_count: None,
            expected_features: None,
        }
    }

    /// Whether the backend reports itself healthy with a loaded model.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

/// `GET /api/model-info` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model class name.
    pub model_type: String,
    /// Number of input features.
    #[serde(default)]
    pub n_features: Option<u32>,
    /// Input feature names.
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// Importance per feature name.
    #[serde(default)]
    pub feature_importances: Option<BTreeMap<String, f64>>,
    /// Ensemble size, for tree ensembles.
    #[serde(default)]
    pub n_estimators: Option<u32>,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure reason.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> MetadataResponse {
        MetadataResponse {
            states: vec!["Delhi".to_string(), "Kerala".to_string()],
            months: vec!["2025-09".to_string(), "2025-10".to_string(), "2025-12".to_string()],
            districts_by_state: BTreeMap::from([
                (
                    "Delhi".to_string(),
                    vec!["Central".to_string(), "North".to_string()],
                ),
                ("Kerala".to_string(), vec!["Ernakulam".to_string()]),
            ]),
        }
    }

    #[test]
    fn accepts_valid_selector() {
        let sel = LocationSelector::new("Delhi", "Central", "2025-10");
        assert!(sel.validate(&metadata()).is_ok());
    }

    #[test]
    fn accepts_forecast_months_past_recorded_data() {
        let sel = LocationSelector::new("Delhi", "Central", "2026-03");
        assert!(sel.validate(&metadata()).is_ok());
    }

    #[test]
    fn rejects_district_from_other_state() {
        let sel = LocationSelector::new("Delhi", "Ernakulam", "2025-10");
        assert_eq!(
            sel.validate(&metadata()),
            Err(SelectorError::DistrictNotInState {
                state: "Delhi".to_string(),
                district: "Ernakulam".to_string(),
            })
        );
    }

    #[test]
    fn rejects_unknown_state_and_bad_months() {
        let md = metadata();
        assert!(matches!(
            LocationSelector::new("Goa", "North", "2025-10").validate(&md),
            Err(SelectorError::UnknownState { .. })
        ));
        assert!(matches!(
            LocationSelector::new("Delhi", "North", "2025-1").validate(&md),
            Err(SelectorError::Month(_))
        ));
        assert!(matches!(
            LocationSelector::new("Delhi", "North", "2024-01").validate(&md),
            Err(SelectorError::MonthOutOfRange { .. })
        ));
        assert!(matches!(
            LocationSelector::new("Delhi", "North", "2026-05").validate(&md),
            Err(SelectorError::MonthOutOfRange { .. })
        ));
    }

    #[test]
    fn decodes_prediction_with_missing_optionals() {
        let pred: RiskPrediction =
            serde_json::from_str(r#"{"asi": 82.3, "aers": 0.61, "mbu": 0.18}"#).unwrap();
        assert!((pred.asi - 82.3).abs() < f64::EPSILON);
        assert_eq!(pred.rp, None);
        assert_eq!(pred.ml_prediction, None);
        assert!(pred.location.is_none());
    }

    #[test]
    fn decodes_month_forecast_with_flattened_record() {
        let json = serde_json::json!({
            "month": "2026-02", "asi": 61.5, "aers": 0.42, "mbu": 0.19, "rp": 0.7,
            "ml_prediction": 0.115, "d_e": 0.1, "d_d": 0.05, "d_c": 0.02,
            "b": 120, "c": 30, "d": 40, "is_actual": false
        });
        let month: MonthForecast = serde_json::from_value(json).unwrap();
        assert_eq!(month.record.month, "2026-02");
        assert!((month.record.b - 120.0).abs() < f64::EPSILON);
        assert_eq!(month.is_actual, Some(false));
    }

    #[test]
    fn prediction_request_serializes_untagged() {
        let loc = PredictionRequest::Location(LocationSelector::new("Delhi", "Central", "2026-01"));
        assert_eq!(
            serde_json::to_value(&loc).unwrap(),
            serde_json::json!({"state": "Delhi", "district": "Central", "month": "2026-01"})
        );

        let manual = PredictionRequest::Manual(PredictionInput::default());
        let value = serde_json::to_value(&manual).unwrap();
        assert_eq!(value["b"], 100.0);
        assert!(value.get("d_b_lag1").is_none());
    }

    #[test]
    fn unhealthy_status_reports_nothing_loaded() {
        let status = HealthStatus::unhealthy();
        assert!(!status.model_loaded);
        assert!(!status.is_healthy());
        assert_eq!(status.data_loaded, Some(false));
    }
}
