//! Plain-text tables for command output.

use uidai_portal_ai::SmartForecast;
use uidai_portal_api_models::{HealthStatus, HistoryResponse, MetadataResponse, ModelInfo};
use uidai_portal_dashboard::forecasting::ForecastPanel;
use uidai_portal_dashboard::home::HealthBanner;
use uidai_portal_dashboard::stress::{AggregatePanel, RiskPanel};
use uidai_portal_metrics::aggregate::priority_counts;
use uidai_portal_metrics::format::{format_percent, format_score};
use uidai_portal_metrics::stress_level;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn health(status: &HealthStatus) -> String {
    let banner = HealthBanner::from_status(status);
    let mut lines = vec![
        banner.message,
        format!("  model loaded:    {}", status.model_loaded),
        format!("  features loaded: {}", status.features_loaded),
    ];
    if let Some(data_loaded) = status.data_loaded {
        lines.push(format!("  data loaded:     {data_loaded}"));
    }
    lines.join("\n")
}

pub fn metadata(metadata: &MetadataResponse) -> String {
    let mut lines = vec![format!("{:<24} DISTRICTS", "STATE"), rule()];
    for state in &metadata.states {
        lines.push(format!(
            "{state:<24} {}",
            metadata.districts_for(state).len()
        ));
    }
    if let Some((first, last)) = metadata.month_range() {
        lines.push(String::new());
        lines.push(format!("Months: {first} .. {last} ({})", metadata.months.len()));
    }
    lines.join("\n")
}

pub fn history(history: &HistoryResponse) -> String {
    let mut lines = vec![
        format!(
            "{} / {} ({} records)",
            history.state, history.district, history.records_count
        ),
        format!(
            "{:<10} {:>8} {:>8} {:>8} {:>8}  STRESS",
            "MONTH", "ASI", "AERS", "MBU", "RP"
        ),
        rule(),
    ];
    for record in &history.history {
        lines.push(format!(
            "{:<10} {:>8} {:>8} {:>8} {:>8}  {}",
            record.month,
            format_score(Some(record.asi), 2),
            format_score(Some(record.aers), 3),
            format_score(Some(record.mbu), 4),
            format_score(Some(record.rp), 4),
            stress_level(record.asi),
        ));
    }
    lines.join("\n")
}

pub fn forecast(panel: &ForecastPanel) -> String {
    let mut lines = vec![
        format!(
            "{} / {}: currently {}, ASI {:+.2} over the forecast",
            panel.state, panel.district, panel.current_stress, panel.projected_change
        ),
        format!(
            "Trends per month: b {:+.2}, c {:+.2}, d {:+.2}",
            panel.trends.b_trend, panel.trends.c_trend, panel.trends.d_trend
        ),
        format!(
            "{:<10} {:<10} {:>8} {:>8} {:>8}  STRESS",
            "MONTH", "PHASE", "ASI", "AERS", "MBU"
        ),
        rule(),
    ];
    for point in &panel.points {
        let phase = format!("{:?}", point.phase).to_lowercase();
        lines.push(format!(
            "{:<10} {phase:<10} {:>8} {:>8} {:>8}  {}",
            point.month,
            format_score(Some(point.asi), 2),
            format_score(Some(point.aers), 3),
            format_score(Some(point.mbu), 4),
            point.stress,
        ));
    }
    if let Some(issue) = &panel.issue {
        lines.push(String::new());
        lines.push(format!("Warning: {issue}"));
    }
    lines.join("\n")
}

pub fn aggregate(panel: &AggregatePanel) -> String {
    let mut lines = vec![
        format!(
            "{} ({}): {} districts, average ASI {} ({})",
            panel.state,
            panel.month,
            panel.districts_count,
            format_score(Some(panel.average.asi), 2),
            panel.average_stress,
        ),
        format!(
            "Workload: biometric {}, child {}, demographic {}",
            format_percent(panel.shares.map(|s| s.biometric)),
            format_percent(panel.shares.map(|s| s.child)),
            format_percent(panel.shares.map(|s| s.demographic)),
        ),
        format!(
            "{:>4}  {:<24} {:>8} {:>8}  {:<10} PRIORITY",
            "#", "DISTRICT", "ASI", "AERS", "STRESS"
        ),
        rule(),
    ];
    for row in &panel.table {
        lines.push(format!(
            "{:>4}  {:<24} {:>8} {:>8}  {:<10} {}",
            row.rank,
            row.district,
            format_score(Some(row.asi), 2),
            format_score(Some(row.aers), 3),
            row.stress.to_string(),
            row.priority,
        ));
    }
    let counts = priority_counts(&panel.table)
        .into_iter()
        .map(|(priority, n)| format!("{priority}: {n}"))
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push(counts.join(", "));
    lines.join("\n")
}

pub fn prediction(panel: &RiskPanel) -> String {
    let mut lines = Vec::new();
    if let Some(location) = &panel.location {
        let suffix = if panel.projected { " (projected)" } else { "" };
        lines.push(format!(
            "{} / {} / {}{suffix}",
            location.state, location.district, location.month
        ));
    }
    lines.extend(
        panel
            .rows()
            .into_iter()
            .map(|(label, value)| format!("{label:<14} {value}")),
    );
    lines.join("\n")
}

pub fn predictions(panels: &[RiskPanel]) -> String {
    let mut lines = vec![
        format!(
            "{:>4}  {:>8} {:<10} {:>8} {:<8} {:>8}",
            "#", "ASI", "STRESS", "AERS", "PRIORITY", "MBU"
        ),
        rule(),
    ];
    for (i, panel) in panels.iter().enumerate() {
        lines.push(format!(
            "{:>4}  {:>8} {:<10} {:>8} {:<8} {:>8}",
            i + 1,
            format_score(Some(panel.asi), 2),
            panel.stress.to_string(),
            format_score(Some(panel.aers), 3),
            panel.priority.to_string(),
            format_score(panel.mbu, 4),
        ));
    }
    lines.join("\n")
}

pub fn model_info(info: &ModelInfo) -> String {
    let mut lines = vec![format!("Model: {}", info.model_type)];
    if let Some(n) = info.n_estimators {
        lines.push(format!("Estimators: {n}"));
    }
    lines.push(format!(
        "Features ({}):",
        info.n_features
            .map_or_else(|| info.feature_names.len().to_string(), |n| n.to_string())
    ));
    for name in &info.feature_names {
        let importance = info
            .feature_importances
            .as_ref()
            .and_then(|imp| imp.get(name).copied());
        lines.push(format!("  {name:<16} {}", format_score(importance, 4)));
    }
    lines.join("\n")
}

pub fn smart_forecast(forecast: &SmartForecast) -> String {
    let mut lines = vec![
        format!(
            "{:<10} {:>8} {:>10} {:>8} {:>8}",
            "DAY", "ACTUAL", "PREDICTED", "LOW", "HIGH"
        ),
        rule(),
    ];
    for point in &forecast.data_points {
        lines.push(format!(
            "{:<10} {:>8.1} {:>10.1} {:>8.1} {:>8.1}",
            point.day, point.actual, point.predicted, point.confidence_low, point.confidence_high
        ));
    }
    if let Some(summary) = &forecast.summary {
        lines.push(String::new());
        lines.push(summary.clone());
    }
    lines.join("\n")
}
