#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line client for the UIDAI data portal backend.
//!
//! Each subcommand issues one backend (or AI) call and prints the result as
//! a plain-text table, or as JSON with `--json`. The backend location comes
//! from `--config <file.toml>` when given, otherwise from
//! `UIDAI_API_BASE_URL` / `UIDAI_API_TIMEOUT_SECS` / `UIDAI_API_PREFIX`.

mod render;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use uidai_portal_ai::InsightClient;
use uidai_portal_api_models::{LocationSelector, PredictionInput, PredictionRequest};
use uidai_portal_client::{ApiClient, ClientConfig, PortalApi};
use uidai_portal_dashboard::forecasting::ForecastPanel;
use uidai_portal_dashboard::sample;
use uidai_portal_dashboard::stress::{AggregatePanel, RiskPanel};

#[derive(Parser)]
#[command(name = "uidai_portal", about = "UIDAI data portal command-line client")]
struct Cli {
    /// TOML file with `base_url`, `timeout_secs` and `api_prefix`
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend and model status
    Health,
    /// List states, districts and the month range
    Metadata,
    /// List the districts of a state
    Districts {
        /// State name
        state: String,
    },
    /// Show the monthly history of a district
    History {
        /// State name
        state: String,
        /// District name
        district: String,
    },
    /// Show the 3-month forecast of a district
    Forecast {
        /// State name
        state: String,
        /// District name
        district: String,
    },
    /// Show the state-wide aggregate and district ranking
    Aggregate {
        /// State name
        state: String,
    },
    /// Predict risk for a location-month or for manual feature values
    Predict(PredictArgs),
    /// Predict risk for every scenario in a JSON file
    Batch {
        /// JSON file holding an array of scenarios, or `{"scenarios": [...]}`
        file: PathBuf,
    },
    /// Show the backend model's features and importances
    ModelInfo,
    /// Ask the AI provider for operational insights
    Insights {
        /// Data context to analyse (defaults to the forecasting page's)
        context: Option<String>,
    },
    /// Ask the AI provider for a 7-day traffic forecast
    SmartForecast {
        /// Forecast model label
        #[arg(long, default_value = sample::SMART_FORECAST_MODEL)]
        model: String,
        /// Region label
        #[arg(long, default_value = sample::SMART_FORECAST_REGION)]
        region: String,
        /// Horizon label
        #[arg(long, default_value = sample::SMART_FORECAST_HORIZON)]
        horizon: String,
    },
}

#[derive(Args)]
struct PredictArgs {
    /// State name (location mode)
    #[arg(long, requires_all = ["district", "month"])]
    state: Option<String>,
    /// District name (location mode)
    #[arg(long, requires = "state")]
    district: Option<String>,
    /// Month in YYYY-MM (location mode)
    #[arg(long, requires = "state")]
    month: Option<String>,
    /// Enrollment change
    #[arg(long, conflicts_with = "state")]
    d_e: Option<f64>,
    /// Demographic change
    #[arg(long, conflicts_with = "state")]
    d_d: Option<f64>,
    /// Child update change
    #[arg(long, conflicts_with = "state")]
    d_c: Option<f64>,
    /// Biometric load
    #[arg(long, conflicts_with = "state")]
    b: Option<f64>,
    /// Child load
    #[arg(long, conflicts_with = "state")]
    c: Option<f64>,
    /// Demographic load
    #[arg(long, conflicts_with = "state")]
    d: Option<f64>,
}

impl PredictArgs {
    /// The request these flags describe. Manual values not given take the
    /// sample scenario's values.
    fn into_request(self) -> PredictionRequest {
        if let (Some(state), Some(district), Some(month)) = (self.state, self.district, self.month)
        {
            return PredictionRequest::Location(LocationSelector::new(state, district, month));
        }
        let sample = PredictionInput::default();
        PredictionRequest::Manual(PredictionInput {
            d_e: self.d_e.unwrap_or(sample.d_e),
            d_d: self.d_d.unwrap_or(sample.d_d),
            d_c: self.d_c.unwrap_or(sample.d_c),
            b: self.b.unwrap_or(sample.b),
            c: self.c.unwrap_or(sample.c),
            d: self.d.unwrap_or(sample.d),
            ..sample
        })
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Wrapped { scenarios: Vec<PredictionRequest> },
    Bare(Vec<PredictionRequest>),
}

fn read_scenarios(path: &Path) -> Result<Vec<PredictionRequest>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(match serde_json::from_str(&text)? {
        ScenarioFile::Wrapped { scenarios } | ScenarioFile::Bare(scenarios) => scenarios,
    })
}

fn api_client(config: Option<&Path>) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env(),
    };
    log::debug!(
        "Backend: {}{} (timeout {}s)",
        config.base_url,
        config.api_prefix(),
        config.timeout_secs
    );
    Ok(ApiClient::new(&config)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    table: impl FnOnce(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        print_json(value)
    } else {
        println!("{}", table(value));
        Ok(())
    }
}

async fn run_backend(
    api: &ApiClient,
    command: Commands,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Health => {
            let status = api.check_backend_health().await;
            emit(json, &status, render::health)?;
            if !status.is_healthy() {
                std::process::exit(1);
            }
        }
        Commands::Metadata => {
            emit(json, &api.fetch_metadata().await?, render::metadata)?;
        }
        Commands::Districts { state } => {
            let districts = api.fetch_districts(&state).await?;
            emit(json, &districts, |d| d.join("\n"))?;
        }
        Commands::History { state, district } => {
            emit(json, &api.fetch_history(&state, &district).await?, render::history)?;
        }
        Commands::Forecast { state, district } => {
            let forecast = api.fetch_3_month_forecast(&state, &district).await?;
            emit(json, &forecast, |f| {
                render::forecast(&ForecastPanel::from_response(f))
            })?;
        }
        Commands::Aggregate { state } => {
            let aggregate = api.fetch_state_aggregate(&state).await?;
            emit(json, &aggregate, |a| {
                render::aggregate(&AggregatePanel::from_response(a))
            })?;
        }
        Commands::Predict(args) => {
            let prediction = match args.into_request() {
                PredictionRequest::Location(selector) => {
                    api.fetch_location_prediction(&selector).await?
                }
                PredictionRequest::Manual(input) => api.fetch_risk_prediction(&input).await?,
            };
            emit(json, &prediction, |p| {
                render::prediction(&RiskPanel::from_prediction(p))
            })?;
        }
        Commands::Batch { file } => {
            let scenarios = read_scenarios(&file)?;
            log::info!("Submitting {} scenarios", scenarios.len());
            let predictions = api.fetch_batch_prediction(&scenarios).await?;
            emit(json, &predictions, |ps| {
                render::predictions(&ps.iter().map(RiskPanel::from_prediction).collect::<Vec<_>>())
            })?;
        }
        Commands::ModelInfo => {
            emit(json, &api.fetch_model_info().await?, render::model_info)?;
        }
        // AI commands never reach the backend.
        Commands::Insights { .. } | Commands::SmartForecast { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Insights { context } => {
            let ai = InsightClient::from_env();
            let context = context.as_deref().unwrap_or(sample::FORECAST_INSIGHT_CONTEXT);
            let text = ai
                .generate_ai_insights(context)
                .await
                .ok_or("AI provider returned an empty reply")?;
            println!("{text}");
            Ok(())
        }
        Commands::SmartForecast {
            model,
            region,
            horizon,
        } => {
            let ai = InsightClient::from_env();
            if !ai.is_enabled() {
                return Err(uidai_portal_ai::INSIGHTS_UNAVAILABLE.into());
            }
            let forecast = ai.smart_forecast(&model, &region, &horizon).await?;
            emit(cli.json, &forecast, render::smart_forecast)
        }
        command => {
            let api = api_client(cli.config.as_deref())?;
            run_backend(&api, command, cli.json).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_location_flags() {
        let cli = Cli::parse_from([
            "uidai_portal",
            "predict",
            "--state",
            "Delhi",
            "--district",
            "Central",
            "--month",
            "2026-01",
        ]);
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(
            args.into_request(),
            PredictionRequest::Location(LocationSelector::new("Delhi", "Central", "2026-01"))
        );
    }

    #[test]
    fn predict_manual_flags_fill_from_sample() {
        let cli = Cli::parse_from(["uidai_portal", "predict", "--b", "200", "--c", "40"]);
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let PredictionRequest::Manual(input) = args.into_request() else {
            panic!("expected manual input");
        };
        assert!((input.b - 200.0).abs() < f64::EPSILON);
        assert!((input.c - 40.0).abs() < f64::EPSILON);
        assert!((input.d - 50.0).abs() < f64::EPSILON);
        assert!((input.d_e - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn location_flags_require_each_other() {
        assert!(Cli::try_parse_from(["uidai_portal", "predict", "--state", "Delhi"]).is_err());
        assert!(
            Cli::try_parse_from([
                "uidai_portal", "predict", "--state", "Delhi", "--district", "Central",
                "--month", "2026-01", "--b", "10",
            ])
            .is_err()
        );
    }

    #[test]
    fn scenario_files_accept_both_shapes() {
        let dir = std::env::temp_dir();
        let wrapped = dir.join("uidai_portal_cli_wrapped.json");
        let bare = dir.join("uidai_portal_cli_bare.json");
        std::fs::write(
            &wrapped,
            r#"{"scenarios": [{"state": "Delhi", "district": "Central", "month": "2025-12"}]}"#,
        )
        .unwrap();
        std::fs::write(
            &bare,
            r#"[{"d_e": 0.1, "d_d": 0.1, "d_c": 0.1, "b": 100, "c": 20, "d": 50}]"#,
        )
        .unwrap();

        assert!(matches!(
            read_scenarios(&wrapped).unwrap()[..],
            [PredictionRequest::Location(_)]
        ));
        assert!(matches!(
            read_scenarios(&bare).unwrap()[..],
            [PredictionRequest::Manual(_)]
        ));
        assert!(read_scenarios(&dir.join("uidai_portal_cli_missing.json")).is_err());

        std::fs::remove_file(wrapped).unwrap();
        std::fs::remove_file(bare).unwrap();
    }
}
