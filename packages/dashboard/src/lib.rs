#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View-models for the pages of the UIDAI data portal.
//!
//! Each page owns the state a renderer needs: one [`fetch::FetchState`]
//! per backend call plus the derived panels built from it. Backend calls go
//! through [`uidai_portal_client::PortalApi`] so pages can be exercised
//! without a server. Loads that can overlap (a selector change while a
//! previous request is pending) are guarded by [`fetch::LatestSlot`], which
//! keeps only the newest response.

pub mod dataset;
pub mod fetch;
pub mod forecasting;
pub mod home;
pub mod page;
pub mod sample;
pub mod scheduling;
pub mod settings;
pub mod stress;

#[cfg(test)]
mod testing;

pub use dataset::DatasetView;
pub use fetch::FetchState;
pub use forecasting::ForecastingView;
pub use home::HomeView;
pub use page::{Page, Shell};
pub use scheduling::SchedulingView;
pub use settings::Preferences;
pub use stress::StressIndexView;

/// All page view-models plus the navigation shell.
#[derive(Debug, Default)]
pub struct Portal {
    /// Current page.
    pub shell: Shell,
    /// Home page.
    pub home: HomeView,
    /// Stress Index page.
    pub stress: StressIndexView,
    /// Forecasting page.
    pub forecasting: ForecastingView,
    /// Dataset page.
    pub dataset: DatasetView,
    /// Scheduling page.
    pub scheduling: SchedulingView,
    /// Settings page.
    pub preferences: Preferences,
}

impl Portal {
    /// Runs the loads every session starts with: backend health and the
    /// selector metadata.
    pub async fn start(&self, api: &dyn uidai_portal_client::PortalApi) {
        log::info!("Starting portal session");
        tokio::join!(self.home.refresh_health(api), self.stress.load_metadata(api));
    }
}
