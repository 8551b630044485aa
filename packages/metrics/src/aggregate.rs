//! State-level aggregate shaping: district ranking, workload shares and the
//! district risk table.

use serde::{Deserialize, Serialize};
use uidai_portal_api_models::{AggregateResponse, DistrictRisk, Workload};

use crate::{Priority, StressLevel, priority_from_risk, stress_level};

/// Number of districts shown in the "top districts" list.
pub const TOP_DISTRICTS: usize = 5;

/// Sorts districts by ASI, highest first.
///
/// The sort is stable, so districts with equal ASI keep their input order.
/// `NaN` scores sort after every finite score.
#[must_use]
pub fn rank_districts(districts: &[DistrictRisk]) -> Vec<DistrictRisk> {
    let mut ranked = districts.to_vec();
    ranked.sort_by(|a, b| match (a.asi.is_nan(), b.asi.is_nan()) {
        (false, false) => b.asi.total_cmp(&a.asi),
        (nan_a, nan_b) => nan_a.cmp(&nan_b),
    });
    ranked
}

/// The first [`TOP_DISTRICTS`] of a ranked list.
#[must_use]
pub fn top_districts(districts: &[DistrictRisk]) -> Vec<DistrictRisk> {
    rank_districts(districts)
        .into_iter()
        .take(TOP_DISTRICTS)
        .collect()
}

/// Each workload counter as a fraction of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadShares {
    /// Biometric share in `[0, 1]`.
    pub biometric: f64,
    /// Child share in `[0, 1]`.
    pub child: f64,
    /// Demographic share in `[0, 1]`.
    pub demographic: f64,
}

/// Splits a workload into shares, or `None` when the total is not positive.
#[must_use]
pub fn workload_shares(workload: &Workload) -> Option<WorkloadShares> {
    let total = workload.biometric + workload.child + workload.demographic;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(WorkloadShares {
        biometric: workload.biometric / total,
        child: workload.child / total,
        demographic: workload.demographic / total,
    })
}

/// One row of the district risk table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRow {
    /// 1-based position after ranking.
    pub rank: usize,
    /// District name.
    pub district: String,
    /// Aadhaar Stress Index.
    pub asi: f64,
    /// Aadhaar Exclusion Risk Score.
    pub aers: f64,
    /// Stress label for `asi`.
    pub stress: StressLevel,
    /// Priority for `aers`.
    pub priority: Priority,
}

/// Builds the ranked risk table for every district of an aggregate.
#[must_use]
pub fn district_table(aggregate: &AggregateResponse) -> Vec<DistrictRow> {
    rank_districts(&aggregate.all_districts)
        .into_iter()
        .enumerate()
        .map(|(i, d)| DistrictRow {
            rank: i + 1,
            stress: stress_level(d.asi),
            priority: priority_from_risk(d.aers),
            district: d.district,
            asi: d.asi,
            aers: d.aers,
        })
        .collect()
}

/// Counts table rows per priority, highest priority first.
#[must_use]
pub fn priority_counts(rows: &[DistrictRow]) -> Vec<(Priority, usize)> {
    Priority::all()
        .iter()
        .map(|&p| (p, rows.iter().filter(|r| r.priority == p).count()))
        .collect()
}
