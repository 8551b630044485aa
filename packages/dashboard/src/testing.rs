//! In-memory [`PortalApi`] double for view-model tests.

use std::collections::BTreeMap;
use std::time::Duration;

use uidai_portal_ai::AiError;
use uidai_portal_ai::providers::{CompletionProvider, CompletionRequest};
use uidai_portal_api_models::{
    AggregateAverage, AggregateResponse, DistrictRisk, ForecastResponse, ForecastTimeline,
    ForecastTrends, HealthStatus, HistoryRecord, HistoryResponse, LocationSelector,
    MetadataResponse, ModelInfo, MonthForecast, PredictionInput, PredictionRequest,
    RiskPrediction, Workload,
};
use uidai_portal_client::{ApiError, PortalApi};
use uidai_portal_metrics::forecast::{WorkloadCounters, project_workloads};
use uidai_portal_metrics::{mbu, risk_proportion};

const STATE: &str = "Delhi";
const HISTORY_MONTHS: [&str; 3] = ["2025-10", "2025-11", "2025-12"];
const LAST_RECORDED: &str = "2025-12";

/// Serves a fixed Delhi data set with Central and North districts.
#[derive(Debug, Default)]
pub struct FakeApi {
    fail: bool,
    delays: BTreeMap<String, Duration>,
}

impl FakeApi {
    /// Every call fails as if the backend had no data loaded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Delays every district-scoped call for `district`.
    pub fn with_delay(mut self, district: &str, delay: Duration) -> Self {
        self.delays.insert(district.to_string(), delay);
        self
    }

    /// Latest ASI recorded for a district.
    pub fn asi_for(district: &str) -> f64 {
        if district == "Central" { 82.3 } else { 24.5 }
    }

    fn aers_for(district: &str) -> f64 {
        if district == "Central" { 0.61 } else { 0.12 }
    }

    fn counters_for(district: &str) -> WorkloadCounters {
        if district == "Central" {
            WorkloadCounters {
                b: 300.0,
                c: 90.0,
                d: 200.0,
            }
        } else {
            WorkloadCounters {
                b: 120.0,
                c: 6.0,
                d: 80.0,
            }
        }
    }

    async fn district_call(&self, district: &str) -> Result<(), ApiError> {
        if let Some(delay) = self.delays.get(district) {
            tokio::time::sleep(*delay).await;
        }
        self.check()
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::Backend {
                status: 500,
                message: "Master data not loaded".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn record(month: &str, district: &str, offset: f64) -> HistoryRecord {
        let counters = Self::counters_for(district);
        HistoryRecord {
            month: month.to_string(),
            asi: Self::asi_for(district) - offset,
            aers: Self::aers_for(district),
            mbu: counters.mbu().unwrap_or_default(),
            rp: risk_proportion(counters.b, counters.c).unwrap_or_default(),
            ml_prediction: Self::aers_for(district),
            b: counters.b,
            c: counters.c,
            d: counters.d,
            ..HistoryRecord::default()
        }
    }

    fn prediction(asi: f64, aers: f64, b: f64, c: f64, d: f64) -> RiskPrediction {
        RiskPrediction {
            asi,
            aers,
            mbu: mbu(b, c, d).unwrap_or(f64::NAN),
            rp: risk_proportion(b, c),
            ml_prediction: Some(aers),
            ..RiskPrediction::default()
        }
    }

    fn manual_prediction(input: &PredictionInput) -> RiskPrediction {
        Self::prediction(42.0, 0.2, input.b, input.c, input.d)
    }

    /// A forecast whose projected months follow its trends exactly.
    pub fn forecast(district: &str) -> ForecastResponse {
        let trends = ForecastTrends {
            b_trend: 5.0,
            c_trend: 2.0,
            d_trend: -3.0,
        };
        let current = Self::record("2026-01", district, 0.0);
        let start = WorkloadCounters {
            b: current.b,
            c: current.c,
            d: current.d,
        };
        let mut future = ["2026-02", "2026-03", "2026-04"]
            .into_iter()
            .zip(project_workloads(start, &trends, 3))
            .zip([1.5, 3.0, 4.5])
            .map(|((month, counters), rise)| MonthForecast {
                record: HistoryRecord {
                    month: month.to_string(),
                    asi: current.asi + rise,
                    aers: current.aers,
                    mbu: counters.mbu().unwrap_or_default(),
                    b: counters.b,
                    c: counters.c,
                    d: counters.d,
                    ..HistoryRecord::default()
                },
                is_actual: Some(false),
            });
        let (month1, month2, month3) = (
            future.next().unwrap_or_default(),
            future.next().unwrap_or_default(),
            future.next().unwrap_or_default(),
        );

        ForecastResponse {
            state: STATE.to_string(),
            district: district.to_string(),
            timeline: ForecastTimeline {
                historical_cutoff: LAST_RECORDED.to_string(),
                current_month: "2026-01".to_string(),
                future_start: "2026-02".to_string(),
            },
            trends,
            historical: HISTORY_MONTHS
                .iter()
                .map(|m| MonthForecast {
                    record: Self::record(m, district, 2.0),
                    is_actual: Some(true),
                })
                .collect(),
            current: MonthForecast {
                record: current,
                is_actual: Some(false),
            },
            month1,
            month2,
            month3,
        }
    }
}

#[async_trait::async_trait]
impl PortalApi for FakeApi {
    async fn fetch_metadata(&self) -> Result<MetadataResponse, ApiError> {
        self.check()?;
        Ok(MetadataResponse {
            states: vec![STATE.to_string()],
            months: ["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03"]
                .map(String::from)
                .to_vec(),
            districts_by_state: BTreeMap::from([(
                STATE.to_string(),
                vec!["Central".to_string(), "North".to_string()],
            )]),
        })
    }

    async fn fetch_districts(&self, state: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.fetch_metadata().await?.districts_for(state).to_vec())
    }

    async fn fetch_history(
        &self,
        state: &str,
        district: &str,
    ) -> Result<HistoryResponse, ApiError> {
        self.district_call(district).await?;
        let history = HISTORY_MONTHS
            .iter()
            .zip([4.0, 2.0, 0.0])
            .map(|(m, offset)| Self::record(m, district, offset))
            .collect::<Vec<_>>();
        Ok(HistoryResponse {
            state: state.to_string(),
            district: district.to_string(),
            records_count: 3,
            history,
        })
    }

    async fn fetch_3_month_forecast(
        &self,
        _state: &str,
        district: &str,
    ) -> Result<ForecastResponse, ApiError> {
        self.district_call(district).await?;
        Ok(Self::forecast(district))
    }

    async fn fetch_state_aggregate(&self, state: &str) -> Result<AggregateResponse, ApiError> {
        self.check()?;
        let districts = ["North", "Central"]
            .map(|d| DistrictRisk {
                district: d.to_string(),
                asi: Self::asi_for(d),
                aers: Self::aers_for(d),
            })
            .to_vec();
        Ok(AggregateResponse {
            state: state.to_string(),
            month: LAST_RECORDED.to_string(),
            districts_count: 2,
            average: AggregateAverage {
                asi: 53.4,
                aers: 0.365,
                mbu: 0.195,
                rp: 0.8,
            },
            workload: Workload {
                biometric: 420.0,
                child: 96.0,
                demographic: 280.0,
            },
            top_districts: districts.clone(),
            all_districts: districts,
        })
    }

    async fn fetch_location_prediction(
        &self,
        selector: &LocationSelector,
    ) -> Result<RiskPrediction, ApiError> {
        self.district_call(&selector.district).await?;
        let counters = Self::counters_for(&selector.district);
        Ok(RiskPrediction {
            location: Some(selector.clone()),
            is_projected: Some(selector.month.as_str() > LAST_RECORDED),
            ..Self::prediction(
                Self::asi_for(&selector.district),
                Self::aers_for(&selector.district),
                counters.b,
                counters.c,
                counters.d,
            )
        })
    }

    async fn fetch_risk_prediction(
        &self,
        input: &PredictionInput,
    ) -> Result<RiskPrediction, ApiError> {
        self.check()?;
        Ok(Self::manual_prediction(input))
    }

    async fn fetch_batch_prediction(
        &self,
        scenarios: &[PredictionRequest],
    ) -> Result<Vec<RiskPrediction>, ApiError> {
        let mut predictions = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            predictions.push(match scenario {
                PredictionRequest::Location(selector) => {
                    self.fetch_location_prediction(selector).await?
                }
                PredictionRequest::Manual(input) => self.fetch_risk_prediction(input).await?,
            });
        }
        Ok(predictions)
    }

    async fn fetch_model_info(&self) -> Result<ModelInfo, ApiError> {
        self.check()?;
        Ok(ModelInfo {
            model_type: "RandomForestRegressor".to_string(),
            n_features: Some(3),
            feature_names: ["d_e", "d_d", "d_c"].map(String::from).to_vec(),
            feature_importances: None,
            n_estimators: Some(100),
        })
    }

    async fn check_backend_health(&self) -> HealthStatus {
        if self.fail {
            return HealthStatus::unhealthy();
        }
        HealthStatus {
            status: "healthy".to_string(),
            model_loaded: true,
            features_loaded: true,
            data_loaded: Some(true),
            records_count: Some(1200),
            expected_features: None,
        }
    }
}

/// A [`CompletionProvider`] that always gives the same answer.
pub struct ScriptedProvider {
    reply: Option<String>,
}

impl ScriptedProvider {
    /// Replies with `text` to every request.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    /// Fails every request.
    pub const fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, AiError> {
        match &self.reply {
            Some(text) if text.trim().is_empty() => Err(AiError::EmptyResponse),
            Some(text) => Ok(text.clone()),
            None => Err(AiError::Provider {
                message: "quota exceeded".to_string(),
            }),
        }
    }
}
