#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metric derivation for the UIDAI data portal.
//!
//! Pure functions that turn the backend's raw numeric fields (ASI, AERS,
//! MBU and the b/c/d workload counters) into severity tiers, chart-ready
//! series and forecast timelines. Nothing in this crate performs I/O.

pub mod aggregate;
pub mod chart;
pub mod forecast;
pub mod format;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use chart::{ChartPoint, Metric, to_chart_series, to_metric_series};

/// Stress label for an Aadhaar Stress Index value.
///
/// Variants are declared in increasing severity so `Ord` follows severity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StressLevel {
    /// ASI below 30.
    Low,
    /// ASI in `[30, 50)`.
    Moderate,
    /// ASI in `[50, 75)`.
    Elevated,
    /// ASI of 75 or more.
    #[serde(rename = "High Risk")]
    #[strum(serialize = "High Risk")]
    HighRisk,
}

/// Intervention priority derived from an AERS value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Priority {
    /// AERS below 0.3.
    Low,
    /// AERS in `[0.3, 0.7]`.
    Medium,
    /// AERS above 0.7.
    High,
}

impl Priority {
    /// All priorities, highest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

/// Tier shown on the system stress gauge (infrastructure load in percent).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SystemStressTier {
    /// Load below 50.
    Low,
    /// Load in `[50, 75)`.
    Moderate,
    /// Load in `[75, 90)`.
    Elevated,
    /// Load of 90 or more.
    Critical,
}

/// Maps an ASI score to its stress label.
///
/// Total over `f64`: `NaN` falls through every comparison and maps to
/// [`StressLevel::Low`].
#[must_use]
pub fn stress_level(asi: f64) -> StressLevel {
    if asi >= 75.0 {
        StressLevel::HighRisk
    } else if asi >= 50.0 {
        StressLevel::Elevated
    } else if asi >= 30.0 {
        StressLevel::Moderate
    } else {
        StressLevel::Low
    }
}

/// Maps an AERS score to an intervention priority.
#[must_use]
pub fn priority_from_risk(aers: f64) -> Priority {
    if aers > 0.7 {
        Priority::High
    } else if aers >= 0.3 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Maps an infrastructure load percentage to its gauge tier.
#[must_use]
pub fn system_stress_tier(load: f64) -> SystemStressTier {
    if load >= 90.0 {
        SystemStressTier::Critical
    } else if load >= 75.0 {
        SystemStressTier::Elevated
    } else if load >= 50.0 {
        SystemStressTier::Moderate
    } else {
        SystemStressTier::Low
    }
}

/// Minor Biometric Usage ratio: `c / (b + d)`.
///
/// Returns `None` when `b + d` is zero or the ratio is not finite. No
/// clamping or epsilon is applied; callers decide how to present a
/// missing ratio.
#[must_use]
pub fn mbu(b: f64, c: f64, d: f64) -> Option<f64> {
    let denominator = b + d;
    if denominator == 0.0 {
        return None;
    }
    Some(c / denominator).filter(|v| v.is_finite())
}

/// Risk Proportion: `(b - c) / b`, or `None` when `b` is zero.
#[must_use]
pub fn risk_proportion(b: f64, c: f64) -> Option<f64> {
    if b == 0.0 {
        return None;
    }
    Some((b - c) / b).filter(|v| v.is_finite())
}
