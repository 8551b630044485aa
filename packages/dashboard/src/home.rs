//! Home page: backend health banner, stat cards and the weekly stress chart.

use uidai_portal_api_models::HealthStatus;
use uidai_portal_client::PortalApi;
use uidai_portal_metrics::ChartPoint;

use crate::fetch::{FetchState, LatestSlot};
use crate::sample::{self, StatCard};

/// Connection banner derived from a health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthBanner {
    /// Whether the backend is healthy with a model loaded.
    pub online: bool,
    /// One-line summary.
    pub message: String,
}

impl HealthBanner {
    /// Summarises a health status.
    #[must_use]
    pub fn from_status(status: &HealthStatus) -> Self {
        if status.is_healthy() {
            let records = status
                .records_count
                .map_or_else(String::new, |n| format!(", {n} records"));
            Self {
                online: true,
                message: format!("Backend online (model loaded{records})"),
            }
        } else {
            Self {
                online: false,
                message: format!("Backend {} (model not loaded)", status.status),
            }
        }
    }
}

/// View-model for the home page.
#[derive(Debug)]
pub struct HomeView {
    health: LatestSlot<HealthStatus>,
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeView {
    /// Creates the view with no health check run yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            health: LatestSlot::new("backend health"),
        }
    }

    /// Runs a health check. Never fails.
    pub async fn refresh_health(&self, api: &dyn PortalApi) {
        let ticket = self.health.begin();
        let status = api.check_backend_health().await;
        self.health
            .finish(ticket, Ok::<_, std::convert::Infallible>(status));
    }

    /// The latest health check.
    #[must_use]
    pub fn health(&self) -> FetchState<HealthStatus> {
        self.health.snapshot()
    }

    /// The connection banner, once a check has completed.
    #[must_use]
    pub fn banner(&self) -> Option<HealthBanner> {
        self.health().data().map(HealthBanner::from_status)
    }

    /// Headline stat cards.
    #[must_use]
    pub fn stat_cards(&self) -> Vec<StatCard> {
        sample::home_stats()
    }

    /// Weekly stress chart series.
    #[must_use]
    pub fn weekly_traffic(&self) -> Vec<ChartPoint> {
        sample::weekly_traffic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    #[tokio::test]
    async fn healthy_banner() {
        let view = HomeView::new();
        assert!(view.banner().is_none());

        view.refresh_health(&FakeApi::default()).await;
        let banner = view.banner().unwrap();
        assert!(banner.online);
        assert_eq!(banner.message, "Backend online (model loaded, 1200 records)");
    }

    #[tokio::test]
    async fn unreachable_backend_banner() {
        let view = HomeView::new();
        view.refresh_health(&FakeApi::failing()).await;
        let banner = view.banner().unwrap();
        assert!(!banner.online);
        assert_eq!(banner.message, "Backend unhealthy (model not loaded)");
    }

    #[test]
    fn static_panels() {
        let view = HomeView::default();
        assert_eq!(view.stat_cards().len(), 4);
        assert!(view.stat_cards()[3].actionable);
        assert_eq!(view.weekly_traffic().len(), 8);
    }
}
