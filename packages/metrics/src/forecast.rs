//! Forecast timeline derivation and consistency checks.
//!
//! The backend projects the b/c/d workload counters linearly from the last
//! recorded month and recomputes MBU from the projected counters of each
//! month. [`project_workloads`] reproduces that stepping locally and
//! [`check_forecast`] verifies a served forecast against it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uidai_portal_api_models::{
    ForecastResponse, ForecastTrends, MonthForecast, MonthParseError, month,
};

use crate::chart::truncate_label;
use crate::{Priority, StressLevel, mbu, priority_from_risk, stress_level};

/// Largest rounding error of a served counter (2 decimals).
pub const COUNTER_ROUNDING: f64 = 0.005;

/// Largest rounding error of a served MBU (4 decimals).
pub const MBU_ROUNDING: f64 = 0.000_05;

/// Absolute tolerance when comparing served counters against a projection
/// from the served (2-decimal) trends.
pub const COUNTER_TOLERANCE: f64 = 0.05;

/// The b/c/d workload counters of one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadCounters {
    /// Biometric load.
    pub b: f64,
    /// Child load.
    pub c: f64,
    /// Demographic load.
    pub d: f64,
}

impl WorkloadCounters {
    /// Reads the counters of a forecast month.
    #[must_use]
    pub const fn of(month: &MonthForecast) -> Self {
        Self {
            b: month.record.b,
            c: month.record.c,
            d: month.record.d,
        }
    }

    /// MBU of these counters.
    #[must_use]
    pub fn mbu(&self) -> Option<f64> {
        mbu(self.b, self.c, self.d)
    }

    /// How far a served MBU may sit from [`Self::mbu`] when the backend
    /// computed it from unrounded counters and then rounded everything.
    ///
    /// With `s = b + d`, rounding c moves `c / s` by up to `h / s` and
    /// rounding b and d moves it by up to `2h * c / s^2`, where `h` is
    /// [`COUNTER_ROUNDING`]. The bound is evaluated at the smallest `s` the
    /// rounding allows.
    #[must_use]
    pub fn mbu_tolerance(&self) -> f64 {
        let h = COUNTER_ROUNDING;
        let s = (self.b + self.d - 2.0 * h).max(h);
        let c = self.c.abs() + h;
        h / s + 2.0 * h * c / (s * s) + MBU_ROUNDING + 1e-9
    }

    /// Advances one month along `trends`, keeping b and d at least 1 and c
    /// at least 0.
    #[must_use]
    pub fn step(&self, trends: &ForecastTrends) -> Self {
        Self {
            b: (self.b + trends.b_trend).max(1.0),
            c: (self.c + trends.c_trend).max(0.0),
            d: (self.d + trends.d_trend).max(1.0),
        }
    }
}

/// Projects `count` months past `start`, stepping one month at a time.
///
/// Each entry's MBU must be recomputed from its own counters; it is never
/// carried over from the previous month.
#[must_use]
pub fn project_workloads(
    start: WorkloadCounters,
    trends: &ForecastTrends,
    count: usize,
) -> Vec<WorkloadCounters> {
    std::iter::successors(Some(start.step(trends)), |prev| Some(prev.step(trends)))
        .take(count)
        .collect()
}

/// Where a point sits on the forecast timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelinePhase {
    /// Recorded month before the cutoff.
    Historical,
    /// The current month.
    Current,
    /// A projected future month.
    Projected,
}

/// One point of the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Axis label.
    pub name: String,
    /// Full month key.
    pub month: String,
    /// Aadhaar Stress Index.
    pub asi: f64,
    /// Aadhaar Exclusion Risk Score.
    pub aers: f64,
    /// Minor Biometric Usage ratio as served.
    pub mbu: f64,
    /// Stress label for `asi`.
    pub stress: StressLevel,
    /// Priority for `aers`.
    pub priority: Priority,
    /// Timeline phase.
    pub phase: TimelinePhase,
    /// Whether the values are recorded rather than projected.
    pub actual: bool,
}

impl ForecastPoint {
    fn new(month: &MonthForecast, phase: TimelinePhase) -> Self {
        let record = &month.record;
        Self {
            name: truncate_label(&record.month),
            month: record.month.clone(),
            asi: record.asi,
            aers: record.aers,
            mbu: record.mbu,
            stress: stress_level(record.asi),
            priority: priority_from_risk(record.aers),
            phase,
            actual: month
                .is_actual
                .unwrap_or(phase == TimelinePhase::Historical),
        }
    }
}

/// Flattens a forecast into chart points: historical months, the current
/// month, then the three projected months.
#[must_use]
pub fn forecast_timeline(forecast: &ForecastResponse) -> Vec<ForecastPoint> {
    forecast
        .historical
        .iter()
        .map(|m| ForecastPoint::new(m, TimelinePhase::Historical))
        .chain(std::iter::once(ForecastPoint::new(
            &forecast.current,
            TimelinePhase::Current,
        )))
        .chain(
            forecast
                .future_months()
                .into_iter()
                .map(|m| ForecastPoint::new(m, TimelinePhase::Projected)),
        )
        .collect()
}

/// Month-over-month ASI change between consecutive points.
#[must_use]
pub fn asi_deltas(points: &[ForecastPoint]) -> Vec<f64> {
    points.windows(2).map(|w| w[1].asi - w[0].asi).collect()
}

/// Which workload counter a [`ForecastIssue::TrendMismatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Counter {
    /// Biometric load.
    #[strum(serialize = "b")]
    Biometric,
    /// Child load.
    #[strum(serialize = "c")]
    Child,
    /// Demographic load.
    #[strum(serialize = "d")]
    Demographic,
}

/// A way in which a served forecast is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastIssue {
    /// A month key is malformed.
    #[error(transparent)]
    Month(#[from] MonthParseError),

    /// Projected months are not strictly increasing.
    #[error("month '{later}' does not follow '{earlier}'")]
    OutOfOrder {
        /// The preceding month.
        earlier: String,
        /// The month that should be later.
        later: String,
    },

    /// A month's MBU does not match its own counters.
    #[error("MBU for {month} is {reported}, expected {expected:?} from its b/c/d")]
    MbuMismatch {
        /// The offending month.
        month: String,
        /// MBU the backend served.
        reported: f64,
        /// MBU recomputed from the month's counters.
        expected: Option<f64>,
    },

    /// A projected counter does not follow the served trend.
    #[error("{counter} for {month} is {reported}, expected {expected} from the trend")]
    TrendMismatch {
        /// The offending month.
        month: String,
        /// Which counter.
        counter: Counter,
        /// Value the backend served.
        reported: f64,
        /// Value projected from the previous month.
        expected: f64,
    },
}

/// Verifies that a forecast's future months are in order, that each
/// month's MBU was recomputed from its own counters, and that the counters
/// follow the served trends.
///
/// # Errors
///
/// Returns the first [`ForecastIssue`] found.
pub fn check_forecast(forecast: &ForecastResponse) -> Result<(), ForecastIssue> {
    let chain = std::iter::once(&forecast.current)
        .chain(forecast.future_months())
        .collect::<Vec<_>>();

    for pair in chain.windows(2) {
        let (earlier, later) = (&pair[0].record.month, &pair[1].record.month);
        if month::add_months(earlier, 1)? != *later {
            return Err(ForecastIssue::OutOfOrder {
                earlier: earlier.clone(),
                later: later.clone(),
            });
        }
    }

    for m in forecast.future_months() {
        let counters = WorkloadCounters::of(m);
        let expected = counters.mbu();
        let consistent =
            expected.is_some_and(|e| (e - m.record.mbu).abs() <= counters.mbu_tolerance());
        if !consistent {
            return Err(ForecastIssue::MbuMismatch {
                month: m.record.month.clone(),
                reported: m.record.mbu,
                expected,
            });
        }
    }

    let projected = project_workloads(
        WorkloadCounters::of(&forecast.current),
        &forecast.trends,
        3,
    );
    for (served, expected) in forecast.future_months().into_iter().zip(projected) {
        let actual = WorkloadCounters::of(served);
        for (counter, reported, expected) in [
            (Counter::Biometric, actual.b, expected.b),
            (Counter::Child, actual.c, expected.c),
            (Counter::Demographic, actual.d, expected.d),
        ] {
            if (reported - expected).abs() > COUNTER_TOLERANCE {
                return Err(ForecastIssue::TrendMismatch {
                    month: served.record.month.clone(),
                    counter,
                    reported,
                    expected,
                });
            }
        }
    }

    Ok(())
}
