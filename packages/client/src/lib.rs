#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Async HTTP client for the UIDAI risk-model backend.
//!
//! [`ApiClient`] issues one request per operation against the backend's
//! `/api` routes and decodes the JSON body into the types from
//! `uidai_portal_api_models`. Failures carry the backend's `{"error"}`
//! message when one is present. Nothing is retried or cached.
//!
//! View-models depend on the [`PortalApi`] trait rather than on
//! [`ApiClient`] directly so they can be driven by a test double.

pub mod client;
pub mod config;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};

use thiserror::Error;
use uidai_portal_api_models::{
    AggregateResponse, ForecastResponse, HealthStatus, HistoryResponse, LocationSelector,
    MetadataResponse, ModelInfo, PredictionInput, PredictionRequest, RiskPrediction,
};

/// Errors returned by backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status and an `error` message.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// The backend's `error` field.
        message: String,
    },

    /// The backend answered with a non-success status and no usable body.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// A success response did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not a valid absolute URL.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

impl ApiError {
    /// HTTP status of a backend rejection, if this error has one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } | Self::Status { status } => Some(*status),
            Self::Http(_) | Self::Decode(_) | Self::InvalidUrl { .. } => None,
        }
    }
}

/// The backend operations used by the portal.
#[async_trait::async_trait]
pub trait PortalApi: Send + Sync {
    /// `GET /api/metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_metadata(&self) -> Result<MetadataResponse, ApiError>;

    /// `GET /api/districts?state=`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_districts(&self, state: &str) -> Result<Vec<String>, ApiError>;

    /// `GET /api/history?state=&district=`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_history(&self, state: &str, district: &str)
    -> Result<HistoryResponse, ApiError>;

    /// `POST /api/forecast`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_3_month_forecast(
        &self,
        state: &str,
        district: &str,
    ) -> Result<ForecastResponse, ApiError>;

    /// `GET /api/aggregate?state=`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_state_aggregate(&self, state: &str) -> Result<AggregateResponse, ApiError>;

    /// `POST /api/predict` with a location selector.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_location_prediction(
        &self,
        selector: &LocationSelector,
    ) -> Result<RiskPrediction, ApiError>;

    /// `POST /api/predict` with manual feature values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_risk_prediction(
        &self,
        input: &PredictionInput,
    ) -> Result<RiskPrediction, ApiError>;

    /// `POST /api/batch-predict`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_batch_prediction(
        &self,
        scenarios: &[PredictionRequest],
    ) -> Result<Vec<RiskPrediction>, ApiError>;

    /// `GET /api/model-info`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn fetch_model_info(&self) -> Result<ModelInfo, ApiError>;

    /// `GET /api/health`. Never fails; any problem yields
    /// [`HealthStatus::unhealthy`].
    async fn check_backend_health(&self) -> HealthStatus;
}
