//! Built-in sample data for the panels that have no backend feed.

use serde::Serialize;
use uidai_portal_metrics::ChartPoint;

/// A headline statistic card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    /// Card label.
    pub label: &'static str,
    /// Displayed value.
    pub value: String,
    /// Secondary line under the value.
    pub trend: Option<&'static str>,
    /// Whether the trend reads as an increase.
    pub trend_up: bool,
    /// Whether the card calls for action.
    pub actionable: bool,
}

impl StatCard {
    fn new(label: &'static str, value: String, trend: Option<&'static str>) -> Self {
        Self {
            label,
            value,
            trend,
            trend_up: false,
            actionable: false,
        }
    }
}

/// Home page stat cards.
#[must_use]
pub fn home_stats() -> Vec<StatCard> {
    vec![
        StatCard {
            trend_up: true,
            ..StatCard::new("Total Enrolments", "1.38 Billion".to_string(), Some("+0.4% this month"))
        },
        StatCard {
            trend_up: true,
            ..StatCard::new("Auth Transactions", "85.2 Million".to_string(), Some("Daily Average"))
        },
        StatCard::new("Server Uptime", "99.98%".to_string(), Some("Last 30 Days")),
        StatCard {
            actionable: true,
            ..StatCard::new("Pending Schedules", "12".to_string(), Some("Action Required"))
        },
    ]
}

/// Weekly system stress series shown on the home page.
#[must_use]
pub fn weekly_traffic() -> Vec<ChartPoint> {
    [
        ("Mon", 40.0),
        ("Tue", 55.0),
        ("Wed", 70.0),
        ("Thu", 85.0),
        ("Fri", 92.0),
        ("Sat", 60.0),
        ("Sun", 45.0),
        ("Mon", 30.0),
    ]
    .into_iter()
    .map(|(name, value)| ChartPoint {
        name: name.to_string(),
        value,
    })
    .collect()
}

/// Infrastructure load per region in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionLoad {
    /// Region name.
    pub region: &'static str,
    /// CPU utilisation.
    pub cpu: f64,
    /// Memory usage.
    pub memory: f64,
    /// Network load.
    pub network: f64,
    /// Storage usage.
    pub storage: f64,
}

impl RegionLoad {
    /// Highest of the four loads.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.cpu.max(self.memory).max(self.network).max(self.storage)
    }
}

/// Regional infrastructure load.
pub const REGION_LOADS: [RegionLoad; 5] = [
    RegionLoad {
        region: "North",
        cpu: 78.0,
        memory: 65.0,
        network: 82.0,
        storage: 45.0,
    },
    RegionLoad {
        region: "South",
        cpu: 62.0,
        memory: 58.0,
        network: 71.0,
        storage: 52.0,
    },
    RegionLoad {
        region: "East",
        cpu: 85.0,
        memory: 72.0,
        network: 68.0,
        storage: 48.0,
    },
    RegionLoad {
        region: "West",
        cpu: 71.0,
        memory: 61.0,
        network: 76.0,
        storage: 55.0,
    },
    RegionLoad {
        region: "Central",
        cpu: 92.0,
        memory: 88.0,
        network: 95.0,
        storage: 72.0,
    },
];

/// Overall system stress shown on the gauge.
pub const OVERALL_STRESS: f64 = 78.0;

/// 24-hour load series.
pub const LOAD_SERIES: [(&str, f64); 7] = [
    ("00:00", 45.0),
    ("04:00", 32.0),
    ("08:00", 68.0),
    ("12:00", 85.0),
    ("16:00", 92.0),
    ("20:00", 78.0),
    ("23:59", 55.0),
];

/// Node counts by health.
pub const NODE_HEALTH: [(&str, u32); 3] = [("Healthy", 847), ("Warning", 123), ("Critical", 30)];

/// Severity of an active alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Needs action now.
    Critical,
}

/// An active infrastructure alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Severity.
    pub severity: AlertSeverity,
    /// Alert text.
    pub message: &'static str,
    /// Relative time raised.
    pub time: &'static str,
}

/// Active alerts, most severe first.
pub const ALERTS: [Alert; 3] = [
    Alert {
        severity: AlertSeverity::Critical,
        message: "Central HQ server cluster approaching 95% CPU utilization",
        time: "2 min ago",
    },
    Alert {
        severity: AlertSeverity::Warning,
        message: "Memory usage spike detected in North Zone authentication servers",
        time: "15 min ago",
    },
    Alert {
        severity: AlertSeverity::Info,
        message: "Scheduled maintenance window starting in 4 hours for East Zone",
        time: "1 hour ago",
    },
];

/// Context sent with the forecasting page's AI insight request.
pub const FORECAST_INSIGHT_CONTEXT: &str = "Traffic volume spikes predicted for next week due to \
     holiday alignment. Mean error 1.2%. Prediction accuracy 98.4%.";

/// Smart-forecast parameters used by the forecasting page.
pub const SMART_FORECAST_MODEL: &str = "Ensemble V2";
/// Region for the smart forecast.
pub const SMART_FORECAST_REGION: &str = "All Regions";
/// Horizon for the smart forecast.
pub const SMART_FORECAST_HORIZON: &str = "7 Days";
