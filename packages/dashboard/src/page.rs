//! Pages of the portal and the navigation shell.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A top-level page.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Page {
    /// Dashboard overview.
    #[default]
    Home,
    /// Stress index analysis.
    StressIndex,
    /// Predictive forecasting.
    Forecasting,
    /// Resource and task scheduling.
    Scheduling,
    /// Dataset management.
    Dataset,
    /// About and system information.
    About,
    /// User profile.
    Profile,
    /// Portal preferences.
    Settings,
}

impl Page {
    /// Every page.
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::StressIndex,
        Self::Forecasting,
        Self::Scheduling,
        Self::Dataset,
        Self::About,
        Self::Profile,
        Self::Settings,
    ];

    /// Pages listed in the sidebar, in order.
    pub const SIDEBAR: [Self; 5] = [
        Self::Home,
        Self::StressIndex,
        Self::Forecasting,
        Self::Scheduling,
        Self::Dataset,
    ];

    /// Header title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Dashboard Overview",
            Self::StressIndex => "System Stress Index Analysis",
            Self::Forecasting => "Advanced Predictive Forecasting",
            Self::Scheduling => "Resource & Task Scheduling",
            Self::Dataset => "Dataset Management",
            Self::About => "About & System Information",
            Self::Profile | Self::Settings => "Data Portal",
        }
    }

    /// Badge shown next to the header title.
    #[must_use]
    pub const fn badge(self) -> Option<&'static str> {
        match self {
            Self::StressIndex => Some("Live Data"),
            Self::Forecasting => Some("Beta v2.1"),
            _ => None,
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::StressIndex => "Stress Index",
            Self::Forecasting => "Forecasting",
            Self::Scheduling => "Scheduling",
            Self::Dataset => "Dataset",
            Self::About => "About",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
        }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    /// Target page.
    pub page: Page,
    /// Display label.
    pub label: &'static str,
    /// Whether this is the current page.
    pub active: bool,
}

/// Navigation state: which page is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shell {
    current: Page,
}

impl Shell {
    /// A shell on the home page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Page::Home,
        }
    }

    /// The page being shown.
    #[must_use]
    pub const fn current(&self) -> Page {
        self.current
    }

    /// Switches to `page`.
    pub fn navigate(&mut self, page: Page) {
        if page != self.current {
            log::debug!("Navigating {} -> {page}", self.current);
        }
        self.current = page;
    }

    /// Header title of the current page.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.current.title()
    }

    /// Header badge of the current page.
    #[must_use]
    pub const fn badge(&self) -> Option<&'static str> {
        self.current.badge()
    }

    /// Sidebar entries with the current page marked active. The About
    /// link sits below the main list.
    #[must_use]
    pub fn sidebar(&self) -> Vec<NavEntry> {
        Page::SIDEBAR
            .iter()
            .chain(std::iter::once(&Page::About))
            .map(|&page| NavEntry {
                page,
                label: page.label(),
                active: page == self.current,
            })
            .collect()
    }
}
