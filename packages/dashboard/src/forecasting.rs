//! Forecasting page: the backend's 3-month forecast and the AI-driven
//! smart forecast.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use uidai_portal_ai::{InsightClient, SmartForecast};
use uidai_portal_api_models::{ForecastResponse, ForecastTrends};
use uidai_portal_client::PortalApi;
use uidai_portal_metrics::forecast::{ForecastPoint, check_forecast, forecast_timeline};
use uidai_portal_metrics::{StressLevel, stress_level};

use crate::fetch::{FetchState, LatestSlot};
use crate::sample;

/// Insight text shown before the first AI response arrives.
pub const INITIAL_INSIGHT: &str = "Analyzing system metrics for fresh insights...";

/// Insight text after a smart forecast without a summary.
pub const FORECAST_UPDATED: &str = "Forecast updated successfully.";

/// Render data for a backend forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPanel {
    /// State name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Historical, current and projected points in order.
    pub points: Vec<ForecastPoint>,
    /// Workload trends behind the projection.
    pub trends: ForecastTrends,
    /// Stress label of the current month.
    pub current_stress: StressLevel,
    /// ASI change from the current month to the last projected one.
    pub projected_change: f64,
    /// Why the forecast looks internally inconsistent, if it does.
    pub issue: Option<String>,
}

impl ForecastPanel {
    /// Derives the panel from a forecast response.
    #[must_use]
    pub fn from_response(forecast: &ForecastResponse) -> Self {
        let issue = check_forecast(forecast).err().map(|e| {
            log::warn!(
                "Inconsistent forecast for {} / {}: {e}",
                forecast.state,
                forecast.district
            );
            e.to_string()
        });
        Self {
            state: forecast.state.clone(),
            district: forecast.district.clone(),
            points: forecast_timeline(forecast),
            trends: forecast.trends,
            current_stress: stress_level(forecast.current.record.asi),
            projected_change: forecast.month3.record.asi - forecast.current.record.asi,
            issue,
        }
    }
}

/// One row of the smart-forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartRow {
    /// Day label.
    pub name: String,
    /// Observed traffic.
    pub actual: f64,
    /// Predicted traffic.
    pub predicted: f64,
    /// Lower confidence bound.
    pub low: f64,
    /// Upper confidence bound.
    pub high: f64,
}

impl SmartRow {
    fn new(name: &str, actual: f64, predicted: f64, low: f64, high: f64) -> Self {
        Self {
            name: name.to_string(),
            actual,
            predicted,
            low,
            high,
        }
    }
}

/// Sample week the chart starts from.
#[must_use]
pub fn initial_rows() -> Vec<SmartRow> {
    vec![
        SmartRow::new("Oct 18", 60.0, 55.0, 50.0, 60.0),
        SmartRow::new("Oct 19", 55.0, 58.0, 53.0, 63.0),
        SmartRow::new("Oct 20", 65.0, 60.0, 55.0, 65.0),
        SmartRow::new("Oct 21", 40.0, 45.0, 40.0, 50.0),
        SmartRow::new("Oct 22", 45.0, 48.0, 43.0, 53.0),
        SmartRow::new("Oct 23", 35.0, 40.0, 35.0, 45.0),
        SmartRow::new("Oct 24", 45.0, 50.0, 45.0, 55.0),
    ]
}

#[derive(Debug)]
struct SmartState {
    rows: Vec<SmartRow>,
    insight: String,
    updating: bool,
}

/// View-model for the Forecasting page.
#[derive(Debug)]
pub struct ForecastingView {
    forecast: LatestSlot<ForecastPanel>,
    smart: Mutex<SmartState>,
}

impl Default for ForecastingView {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastingView {
    /// Creates the view with the sample week and placeholder insight.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forecast: LatestSlot::new("3-month forecast"),
            smart: Mutex::new(SmartState {
                rows: initial_rows(),
                insight: INITIAL_INSIGHT.to_string(),
                updating: false,
            }),
        }
    }

    fn smart(&self) -> MutexGuard<'_, SmartState> {
        self.smart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the 3-month forecast for a district.
    pub async fn load_forecast(&self, api: &dyn PortalApi, state: &str, district: &str) {
        let ticket = self.forecast.begin();
        let result = api
            .fetch_3_month_forecast(state, district)
            .await
            .map(|f| ForecastPanel::from_response(&f));
        self.forecast.finish(ticket, result);
    }

    /// Replaces the insight text with a fresh AI insight (or its fallback).
    /// An empty reply keeps the current text.
    pub async fn load_insights(&self, ai: &InsightClient) {
        if let Some(text) = ai
            .generate_ai_insights(sample::FORECAST_INSIGHT_CONTEXT)
            .await
        {
            self.smart().insight = text;
        }
    }

    /// Runs a smart forecast. On success the chart rows are replaced and the
    /// summary becomes the insight; otherwise everything is left as is.
    /// Returns whether the rows were replaced.
    pub async fn run_smart_forecast(&self, ai: &InsightClient) -> bool {
        {
            let mut smart = self.smart();
            if smart.updating {
                log::debug!("Smart forecast already running");
                return false;
            }
            smart.updating = true;
        }

        let result = ai
            .run_smart_forecast(
                sample::SMART_FORECAST_MODEL,
                sample::SMART_FORECAST_REGION,
                sample::SMART_FORECAST_HORIZON,
            )
            .await;

        let mut smart = self.smart();
        smart.updating = false;
        let Some(SmartForecast {
            data_points,
            summary,
        }) = result
        else {
            return false;
        };
        if data_points.is_empty() {
            log::warn!("Smart forecast returned no data points");
            return false;
        }

        smart.rows = data_points
            .into_iter()
            .map(|p| SmartRow {
                name: p.day,
                actual: p.actual,
                predicted: p.predicted,
                low: p.confidence_low,
                high: p.confidence_high,
            })
            .collect();
        smart.insight = summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FORECAST_UPDATED.to_string());
        true
    }

    /// The 3-month forecast panel.
    #[must_use]
    pub fn forecast(&self) -> FetchState<ForecastPanel> {
        self.forecast.snapshot()
    }

    /// Smart-forecast chart rows.
    #[must_use]
    pub fn smart_rows(&self) -> Vec<SmartRow> {
        self.smart().rows.clone()
    }

    /// Current insight text.
    #[must_use]
    pub fn insight(&self) -> String {
        self.smart().insight.clone()
    }

    /// Whether a smart forecast is in flight.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.smart().updating
    }
}

#[cfg(test)]
mod tests {
    use uidai_portal_ai::{INSIGHTS_FAILED, INSIGHTS_UNAVAILABLE};
    use uidai_portal_metrics::forecast::TimelinePhase;

    use super::*;
    use crate::testing::{FakeApi, ScriptedProvider};

    #[tokio::test]
    async fn forecast_panel_from_backend() {
        let view = ForecastingView::new();
        view.load_forecast(&FakeApi::default(), "Delhi", "Central")
            .await;
        let panel = view.forecast().data().cloned().unwrap();

        assert_eq!(panel.points.len(), 7);
        assert_eq!(panel.points[3].phase, TimelinePhase::Current);
        assert_eq!(panel.points[6].month, "2026-04");
        assert!(!panel.points[6].actual);
        assert_eq!(panel.current_stress, StressLevel::HighRisk);
        assert!((panel.projected_change - 4.5).abs() < 1e-9);
        assert_eq!(panel.issue, None);
    }

    #[test]
    fn stale_mbu_is_reported() {
        let mut forecast = FakeApi::forecast("North");
        forecast.month2.record.mbu = forecast.month1.record.mbu;
        let panel = ForecastPanel::from_response(&forecast);
        assert!(panel.issue.unwrap().contains("2026-03"));
    }

    #[tokio::test]
    async fn forecast_failure_is_kept() {
        let view = ForecastingView::new();
        view.load_forecast(&FakeApi::failing(), "Delhi", "Central")
            .await;
        assert_eq!(view.forecast().error(), Some("Master data not loaded"));
    }

    #[tokio::test]
    async fn starts_with_sample_week() {
        let view = ForecastingView::new();
        let rows = view.smart_rows();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], SmartRow::new("Oct 18", 60.0, 55.0, 50.0, 60.0));
        assert_eq!(view.insight(), INITIAL_INSIGHT);
        assert!(!view.is_updating());
    }

    #[tokio::test]
    async fn insights_without_key_use_fallback() {
        let view = ForecastingView::new();
        view.load_insights(&InsightClient::disabled()).await;
        assert_eq!(view.insight(), INSIGHTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn insights_failure_use_fallback() {
        let view = ForecastingView::new();
        view.load_insights(&InsightClient::new(Box::new(ScriptedProvider::failing())))
            .await;
        assert_eq!(view.insight(), INSIGHTS_FAILED);
    }

    #[tokio::test]
    async fn empty_insight_keeps_previous_text() {
        let view = ForecastingView::new();
        view.load_insights(&InsightClient::new(Box::new(ScriptedProvider::replying(""))))
            .await;
        assert_eq!(view.insight(), INITIAL_INSIGHT);

        view.load_insights(&InsightClient::new(Box::new(ScriptedProvider::replying(
            "1. Add staff",
        ))))
        .await;
        view.load_insights(&InsightClient::new(Box::new(ScriptedProvider::replying(" "))))
            .await;
        assert_eq!(view.insight(), "1. Add staff");
    }

    #[tokio::test]
    async fn smart_forecast_replaces_rows() {
        let reply = r#"{"dataPoints": [
            {"day": "Mon", "actual": 70, "predicted": 72, "confidenceLow": 66, "confidenceHigh": 78},
            {"day": "Tue", "actual": 64, "predicted": 61, "confidenceLow": 55, "confidenceHigh": 67}
        ], "summary": "Monday peak, then easing."}"#;
        let view = ForecastingView::new();
        let ai = InsightClient::new(Box::new(ScriptedProvider::replying(reply)));

        assert!(view.run_smart_forecast(&ai).await);
        let rows = view.smart_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], SmartRow::new("Tue", 64.0, 61.0, 55.0, 67.0));
        assert_eq!(view.insight(), "Monday peak, then easing.");
        assert!(!view.is_updating());
    }

    #[tokio::test]
    async fn smart_forecast_without_summary() {
        let reply = r#"{"dataPoints": [
            {"day": "Mon", "actual": 70, "predicted": 72, "confidenceLow": 66, "confidenceHigh": 78}
        ]}"#;
        let view = ForecastingView::new();
        let ai = InsightClient::new(Box::new(ScriptedProvider::replying(reply)));
        assert!(view.run_smart_forecast(&ai).await);
        assert_eq!(view.insight(), FORECAST_UPDATED);
    }

    #[tokio::test]
    async fn failed_smart_forecast_keeps_rows() {
        let view = ForecastingView::new();
        let ai = InsightClient::new(Box::new(ScriptedProvider::replying("no json here")));
        assert!(!view.run_smart_forecast(&ai).await);
        assert_eq!(view.smart_rows(), initial_rows());
        assert_eq!(view.insight(), INITIAL_INSIGHT);

        assert!(!view.run_smart_forecast(&InsightClient::disabled()).await);
        assert_eq!(view.smart_rows(), initial_rows());
        assert!(!view.is_updating());
    }
}
