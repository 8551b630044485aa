//! Stress Index page: location risk prediction, history trend, state
//! aggregate and the infrastructure stress gauge.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use uidai_portal_api_models::{
    AggregateAverage, AggregateResponse, DistrictRisk, LocationSelector, MetadataResponse,
    PredictionInput, RiskPrediction, SelectorError,
};
use uidai_portal_client::PortalApi;
use uidai_portal_metrics::aggregate::{
    DistrictRow, WorkloadShares, district_table, top_districts, workload_shares,
};
use uidai_portal_metrics::format::format_score;
use uidai_portal_metrics::{
    ChartPoint, Priority, StressLevel, SystemStressTier, priority_from_risk, stress_level,
    system_stress_tier, to_chart_series,
};

use crate::fetch::{FetchState, LatestSlot};
use crate::sample::{self, Alert, RegionLoad};

/// Render data for one risk prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPanel {
    /// Aadhaar Stress Index.
    pub asi: f64,
    /// Stress label for `asi`.
    pub stress: StressLevel,
    /// Aadhaar Exclusion Risk Score.
    pub aers: f64,
    /// Priority for `aers`.
    pub priority: Priority,
    /// Minor Biometric Usage ratio, if finite.
    pub mbu: Option<f64>,
    /// Risk Proportion, if reported.
    pub rp: Option<f64>,
    /// Whether the month was extrapolated past the recorded data.
    pub projected: bool,
    /// The location predicted for, when known.
    pub location: Option<LocationSelector>,
}

impl RiskPanel {
    /// Derives labels from a prediction.
    #[must_use]
    pub fn from_prediction(prediction: &RiskPrediction) -> Self {
        Self {
            asi: prediction.asi,
            stress: stress_level(prediction.asi),
            aers: prediction.aers,
            priority: priority_from_risk(prediction.aers),
            mbu: Some(prediction.mbu).filter(|v| v.is_finite()),
            rp: prediction.rp.filter(|v| v.is_finite()),
            projected: prediction.is_projected.unwrap_or(false),
            location: prediction.location.clone(),
        }
    }

    /// Label/value rows as displayed.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ASI", format_score(Some(self.asi), 2)),
            ("Stress Level", self.stress.to_string()),
            ("AERS", format_score(Some(self.aers), 3)),
            ("Priority", self.priority.to_string()),
            ("MBU", format_score(self.mbu, 4)),
            ("RP", format_score(self.rp, 4)),
        ]
    }
}

/// Render data for a state aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatePanel {
    /// State name.
    pub state: String,
    /// Month aggregated.
    pub month: String,
    /// Number of districts.
    pub districts_count: u32,
    /// State-wide averages.
    pub average: AggregateAverage,
    /// Stress label for the average ASI.
    pub average_stress: StressLevel,
    /// Workload split, when the totals are positive.
    pub shares: Option<WorkloadShares>,
    /// Highest-risk districts.
    pub top: Vec<DistrictRisk>,
    /// Every district, ranked.
    pub table: Vec<DistrictRow>,
}

impl AggregatePanel {
    /// Derives the panel from an aggregate response. The ranking uses
    /// `all_districts`, falling back to `top_districts` when it is empty.
    #[must_use]
    pub fn from_response(aggregate: &AggregateResponse) -> Self {
        let source = if aggregate.all_districts.is_empty() {
            &aggregate.top_districts
        } else {
            &aggregate.all_districts
        };
        Self {
            state: aggregate.state.clone(),
            month: aggregate.month.clone(),
            districts_count: aggregate.districts_count,
            average: aggregate.average,
            average_stress: stress_level(aggregate.average.asi),
            shares: workload_shares(&aggregate.workload),
            top: top_districts(source),
            table: district_table(aggregate),
        }
    }
}

/// Infrastructure stress gauge with its supporting sample panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressGauge {
    /// Overall load in percent.
    pub value: f64,
    /// Gauge tier for `value`.
    pub tier: SystemStressTier,
    /// Per-region loads.
    pub regions: Vec<RegionLoad>,
    /// Region with the highest peak load.
    pub hottest_region: Option<&'static str>,
    /// 24-hour load series.
    pub load_series: Vec<ChartPoint>,
    /// Node counts by health.
    pub node_health: Vec<(&'static str, u32)>,
    /// Active alerts.
    pub alerts: Vec<Alert>,
}

/// View-model for the Stress Index page.
#[derive(Debug)]
pub struct StressIndexView {
    metadata: LatestSlot<MetadataResponse>,
    selection: Mutex<Option<LocationSelector>>,
    prediction: LatestSlot<RiskPanel>,
    history: LatestSlot<Vec<ChartPoint>>,
    aggregate: LatestSlot<AggregatePanel>,
    manual: LatestSlot<RiskPanel>,
}

impl Default for StressIndexView {
    fn default() -> Self {
        Self::new()
    }
}

impl StressIndexView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: LatestSlot::new("metadata"),
            selection: Mutex::new(None),
            prediction: LatestSlot::new("location prediction"),
            history: LatestSlot::new("history"),
            aggregate: LatestSlot::new("state aggregate"),
            manual: LatestSlot::new("manual prediction"),
        }
    }

    /// Loads the selector options.
    pub async fn load_metadata(&self, api: &dyn PortalApi) {
        let ticket = self.metadata.begin();
        let result = api.fetch_metadata().await;
        self.metadata.finish(ticket, result);
    }

    /// Validates and applies a selector change, then loads the prediction,
    /// history and state aggregate for it.
    ///
    /// Responses belonging to an earlier selection are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if metadata is loaded and the selector does
    /// not match it; nothing is fetched in that case.
    pub async fn select(
        &self,
        api: &dyn PortalApi,
        selector: LocationSelector,
    ) -> Result<(), SelectorError> {
        if let Some(metadata) = self.metadata.snapshot().data() {
            selector.validate(metadata)?;
        }

        log::info!(
            "Selected {} / {} / {}",
            selector.state,
            selector.district,
            selector.month
        );
        *self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(selector.clone());

        tokio::join!(
            self.predict_location(api, &selector),
            self.load_history(api, &selector.state, &selector.district),
            self.load_aggregate(api, &selector.state),
        );
        Ok(())
    }

    /// Loads the risk prediction for a location.
    pub async fn predict_location(&self, api: &dyn PortalApi, selector: &LocationSelector) {
        let ticket = self.prediction.begin();
        let result = api
            .fetch_location_prediction(selector)
            .await
            .map(|p| RiskPanel::from_prediction(&p));
        self.prediction.finish(ticket, result);
    }

    /// Loads the history trend chart for a district.
    pub async fn load_history(&self, api: &dyn PortalApi, state: &str, district: &str) {
        let ticket = self.history.begin();
        let result = api
            .fetch_history(state, district)
            .await
            .map(|h| to_chart_series(&h.history));
        self.history.finish(ticket, result);
    }

    /// Loads the aggregate panel for a state.
    pub async fn load_aggregate(&self, api: &dyn PortalApi, state: &str) {
        let ticket = self.aggregate.begin();
        let result = api
            .fetch_state_aggregate(state)
            .await
            .map(|a| AggregatePanel::from_response(&a));
        self.aggregate.finish(ticket, result);
    }

    /// Runs a prediction on manually entered features.
    pub async fn predict_manual(&self, api: &dyn PortalApi, input: &PredictionInput) {
        let ticket = self.manual.begin();
        let result = api
            .fetch_risk_prediction(input)
            .await
            .map(|p| RiskPanel::from_prediction(&p));
        self.manual.finish(ticket, result);
    }

    /// Selector options.
    #[must_use]
    pub fn metadata(&self) -> FetchState<MetadataResponse> {
        self.metadata.snapshot()
    }

    /// The most recently applied selection.
    #[must_use]
    pub fn selection(&self) -> Option<LocationSelector> {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The location prediction panel.
    #[must_use]
    pub fn prediction(&self) -> FetchState<RiskPanel> {
        self.prediction.snapshot()
    }

    /// The history trend series.
    #[must_use]
    pub fn history(&self) -> FetchState<Vec<ChartPoint>> {
        self.history.snapshot()
    }

    /// The state aggregate panel.
    #[must_use]
    pub fn aggregate(&self) -> FetchState<AggregatePanel> {
        self.aggregate.snapshot()
    }

    /// The manual prediction panel.
    #[must_use]
    pub fn manual(&self) -> FetchState<RiskPanel> {
        self.manual.snapshot()
    }

    /// The infrastructure stress gauge.
    #[must_use]
    pub fn gauge(&self) -> StressGauge {
        let regions = sample::REGION_LOADS.to_vec();
        let hottest_region = regions
            .iter()
            .max_by(|a, b| a.peak().total_cmp(&b.peak()))
            .map(|r| r.region);
        StressGauge {
            value: sample::OVERALL_STRESS,
            tier: system_stress_tier(sample::OVERALL_STRESS),
            regions,
            hottest_region,
            load_series: sample::LOAD_SERIES
                .iter()
                .map(|&(time, load)| ChartPoint {
                    name: time.to_string(),
                    value: load,
                })
                .collect(),
            node_health: sample::NODE_HEALTH.to_vec(),
            alerts: sample::ALERTS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn selection_loads_all_panels() {
        let api = FakeApi::default();
        let view = StressIndexView::new();
        view.load_metadata(&api).await;
        view.select(&api, LocationSelector::new("Delhi", "Central", "2026-01"))
            .await
            .unwrap();

        let panel = view.prediction().data().cloned().unwrap();
        assert_eq!(panel.stress, StressLevel::HighRisk);
        assert_eq!(panel.priority, Priority::Medium);
        assert!(panel.projected);

        let history = view.history().data().cloned().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].name, "2025-10");

        let aggregate = view.aggregate().data().cloned().unwrap();
        assert_eq!(aggregate.top[0].district, "Central");
        assert_eq!(aggregate.table.len(), 2);
        assert!(aggregate.shares.is_some());
    }

    #[tokio::test]
    async fn invalid_selection_fetches_nothing() {
        let api = FakeApi::default();
        let view = StressIndexView::new();
        view.load_metadata(&api).await;

        let err = view
            .select(&api, LocationSelector::new("Delhi", "Thiruvananthapuram", "2025-11"))
            .await
            .unwrap_err();
        assert!(matches!(err, SelectorError::DistrictNotInState { .. }));
        assert_eq!(view.prediction(), FetchState::Idle);
        assert_eq!(view.selection(), None);
    }

    #[tokio::test]
    async fn latest_selection_wins() {
        let api = FakeApi::default()
            .with_delay("North", Duration::from_millis(200))
            .with_delay("Central", Duration::from_millis(10));
        let view = StressIndexView::new();

        let first = view.select(&api, LocationSelector::new("Delhi", "North", "2025-11"));
        let second = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            view.select(&api, LocationSelector::new("Delhi", "Central", "2025-11"))
                .await
        };
        let (a, b) = tokio::join!(first, second);
        a.unwrap();
        b.unwrap();

        let panel = view.prediction().data().cloned().unwrap();
        assert_eq!(panel.location.unwrap().district, "Central");
        assert_eq!(panel.stress, StressLevel::HighRisk);
        assert_eq!(view.selection().unwrap().district, "Central");
        assert_eq!(
            view.history().data().unwrap().last().unwrap().value,
            FakeApi::asi_for("Central")
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_message() {
        let view = StressIndexView::new();
        view.predict_location(
            &FakeApi::failing(),
            &LocationSelector::new("Delhi", "Central", "2025-12"),
        )
        .await;
        assert_eq!(view.prediction().error(), Some("Master data not loaded"));
    }

    #[tokio::test]
    async fn manual_prediction_panel() {
        let view = StressIndexView::new();
        view.predict_manual(&FakeApi::default(), &PredictionInput::default())
            .await;
        let panel = view.manual().data().cloned().unwrap();
        assert_eq!(panel.stress, StressLevel::Moderate);
        assert_eq!(panel.priority, Priority::Low);
        let rows = panel.rows();
        assert_eq!(rows[4], ("MBU", "0.1667".to_string()));
        assert_eq!(rows[5], ("RP", "0.7500".to_string()));
    }

    #[test]
    fn missing_optional_fields_render_placeholder() {
        let panel = RiskPanel::from_prediction(&RiskPrediction {
            asi: 82.3,
            aers: 0.61,
            mbu: f64::NAN,
            ..RiskPrediction::default()
        });
        let rows = panel.rows();
        assert_eq!(rows[0], ("ASI", "82.30".to_string()));
        assert_eq!(rows[1], ("Stress Level", "High Risk".to_string()));
        assert_eq!(rows[3], ("Priority", "Medium".to_string()));
        assert_eq!(rows[4], ("MBU", "--".to_string()));
        assert_eq!(rows[5], ("RP", "--".to_string()));
        assert!(!panel.projected);
    }

    #[test]
    fn gauge_uses_sample_load() {
        let gauge = StressIndexView::new().gauge();
        assert_eq!(gauge.tier, SystemStressTier::Elevated);
        assert_eq!(gauge.hottest_region, Some("Central"));
        assert_eq!(gauge.regions.len(), 5);
        assert_eq!(gauge.alerts[0].severity, sample::AlertSeverity::Critical);
        assert_eq!(gauge.load_series.len(), 7);
    }

    mod live_backend {
        use actix_web::{App, HttpResponse, HttpServer, web};
        use serde_json::{Value, json};
        use uidai_portal_client::{ApiClient, ClientConfig};

        use super::*;

        async fn metadata() -> HttpResponse {
            HttpResponse::Ok().json(json!({
                "states": ["Delhi"],
                "months": ["2025-11", "2025-12", "2026-01"],
                "districts_by_state": {"Delhi": ["Central", "North"]},
            }))
        }

        async fn predict(body: web::Json<Value>) -> HttpResponse {
            HttpResponse::Ok().json(json!({
                "asi": 82.3, "aers": 0.61, "mbu": 0.18,
                "location": {
                    "state": body["state"],
                    "district": body["district"],
                    "month": body["month"],
                },
                "is_projected": true,
            }))
        }

        async fn history() -> HttpResponse {
            HttpResponse::Ok().json(json!({
                "state": "Delhi", "district": "Central", "records_count": 1,
                "history": [{
                    "month": "2025-12", "asi": 80.1, "aers": 0.6, "mbu": 0.18, "rp": 0.7,
                    "ml_prediction": 0.6, "d_e": 0.1, "d_d": 0.05, "d_c": 0.02,
                    "b": 300.0, "c": 90.0, "d": 200.0,
                }],
            }))
        }

        async fn aggregate() -> HttpResponse {
            HttpResponse::InternalServerError().json(json!({"error": "Master data not loaded"}))
        }

        fn routes(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/api")
                    .route("/metadata", web::get().to(metadata))
                    .route("/predict", web::post().to(predict))
                    .route("/history", web::get().to(history))
                    .route("/aggregate", web::get().to(aggregate)),
            );
        }

        #[actix_web::test]
        async fn location_prediction_renders_labels() {
            let server = HttpServer::new(|| App::new().configure(routes))
                .workers(1)
                .bind(("127.0.0.1", 0))
                .unwrap();
            let addr = server.addrs()[0];
            actix_rt::spawn(server.run());
            let api = ApiClient::new(&ClientConfig {
                base_url: format!("http://{addr}"),
                timeout_secs: 5,
                ..ClientConfig::default()
            })
            .unwrap();

            let view = StressIndexView::new();
            view.load_metadata(&api).await;
            view.select(&api, LocationSelector::new("Delhi", "Central", "2026-01"))
                .await
                .unwrap();

            let panel = view.prediction().data().cloned().unwrap();
            assert_eq!(panel.stress.to_string(), "High Risk");
            assert_eq!(panel.priority.to_string(), "Medium");
            assert!(panel.projected);
            assert_eq!(panel.rows()[4], ("MBU", "0.1800".to_string()));

            assert_eq!(view.history().data().unwrap()[0].name, "2025-12");
            assert_eq!(view.aggregate().error(), Some("Master data not loaded"));
        }
    }
}
