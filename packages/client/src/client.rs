//! `reqwest`-backed implementation of [`PortalApi`].

use serde::{Serialize, de::DeserializeOwned};
use uidai_portal_api_models::{
    AggregateResponse, BatchPredictionRequest, BatchPredictionResponse, DistrictsResponse,
    ErrorBody, ForecastRequest, ForecastResponse, HealthStatus, HistoryResponse,
    LocationSelector, MetadataResponse, ModelInfo, PredictionInput, PredictionRequest,
    RiskPrediction,
};

use crate::{ApiError, ClientConfig, PortalApi};

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_prefix: String,
}

impl ApiClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.base_url.clone(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_prefix: config.api_prefix(),
        })
    }

    /// Creates a client configured from `UIDAI_API_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env())
    }

    /// The backend origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{path}", self.base_url, self.api_prefix)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> reqwest::RequestBuilder {
        let url = self.url(path);
        log::debug!("GET {url} {query:?}");
        self.client.get(url).query(query)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> reqwest::RequestBuilder {
        let url = self.url(path);
        log::debug!("POST {url}");
        self.client.post(url).json(body)
    }

    /// Sends a request and decodes its body, logging any failure under
    /// `operation`.
    async fn send<T: DeserializeOwned>(
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let result = async {
            let resp = request.send().await?;
            decode(resp).await
        }
        .await;

        result.inspect_err(|e| log::error!("Error {operation}: {e}"))
    }
}

/// Turns a response into `T`, or into the backend's error message.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        return Err(match message {
            Some(message) => ApiError::Backend {
                status: status.as_u16(),
                message,
            },
            None => ApiError::Status {
                status: status.as_u16(),
            },
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait::async_trait]
impl PortalApi for ApiClient {
    async fn fetch_metadata(&self) -> Result<MetadataResponse, ApiError> {
        Self::send("fetching metadata", self.get("/metadata", &[])).await
    }

    async fn fetch_districts(&self, state: &str) -> Result<Vec<String>, ApiError> {
        let resp: DistrictsResponse = Self::send(
            "fetching districts",
            self.get("/districts", &[("state", state)]),
        )
        .await?;
        Ok(resp.districts)
    }

    async fn fetch_history(
        &self,
        state: &str,
        district: &str,
    ) -> Result<HistoryResponse, ApiError> {
        Self::send(
            "fetching history",
            self.get("/history", &[("state", state), ("district", district)]),
        )
        .await
    }

    async fn fetch_3_month_forecast(
        &self,
        state: &str,
        district: &str,
    ) -> Result<ForecastResponse, ApiError> {
        Self::send(
            "fetching 3-month forecast",
            self.post("/forecast", &ForecastRequest { state, district }),
        )
        .await
    }

    async fn fetch_state_aggregate(&self, state: &str) -> Result<AggregateResponse, ApiError> {
        Self::send(
            "fetching state aggregate",
            self.get("/aggregate", &[("state", state)]),
        )
        .await
    }

    async fn fetch_location_prediction(
        &self,
        selector: &LocationSelector,
    ) -> Result<RiskPrediction, ApiError> {
        Self::send(
            "fetching location prediction",
            self.post("/predict", selector),
        )
        .await
    }

    async fn fetch_risk_prediction(
        &self,
        input: &PredictionInput,
    ) -> Result<RiskPrediction, ApiError> {
        Self::send("fetching risk prediction", self.post("/predict", input)).await
    }

    async fn fetch_batch_prediction(
        &self,
        scenarios: &[PredictionRequest],
    ) -> Result<Vec<RiskPrediction>, ApiError> {
        let resp: BatchPredictionResponse = Self::send(
            "fetching batch prediction",
            self.post("/batch-predict", &BatchPredictionRequest { scenarios }),
        )
        .await?;
        Ok(resp.predictions)
    }

    async fn fetch_model_info(&self) -> Result<ModelInfo, ApiError> {
        Self::send("fetching model info", self.get("/model-info", &[])).await
    }

    async fn check_backend_health(&self) -> HealthStatus {
        match Self::send("checking backend health", self.get("/health", &[])).await {
            Ok(status) => status,
            Err(_) => {
                log::warn!("Backend at {} unreachable; reporting unhealthy", self.base_url);
                HealthStatus::unhealthy()
            }
        }
    }
}
