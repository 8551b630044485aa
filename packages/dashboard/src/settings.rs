//! Portal preferences shown on the Settings page.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Errors from importing or exporting preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The TOML text could not be parsed.
    #[error("Invalid preferences: {0}")]
    Parse(#[from] toml::de::Error),

    /// The preferences could not be written as TOML.
    #[error("Failed to export preferences: {0}")]
    Export(#[from] toml::ser::Error),
}

/// Interface language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    English,
    /// Hindi.
    Hindi,
    /// Tamil.
    Tamil,
    /// Telugu.
    Telugu,
}

impl Language {
    /// Label shown in the language picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "हिंदी (Hindi)",
            Self::Tamil => "தமிழ் (Tamil)",
            Self::Telugu => "తెలుగు (Telugu)",
        }
    }
}

/// Display timezone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Timezone {
    /// India Standard Time.
    #[default]
    Ist,
    /// Coordinated Universal Time.
    Utc,
    /// US Eastern Standard Time.
    Est,
}

impl Timezone {
    /// Offset from UTC in minutes.
    #[must_use]
    pub const fn utc_offset_minutes(self) -> i32 {
        match self {
            Self::Ist => 330,
            Self::Utc => 0,
            Self::Est => -300,
        }
    }

    /// Label shown in the timezone picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ist => "IST (UTC+5:30)",
            Self::Utc => "UTC",
            Self::Est => "EST (UTC-5)",
        }
    }
}

/// How often live panels refresh when auto refresh is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshInterval {
    /// Every 30 seconds.
    #[default]
    #[serde(rename = "30s")]
    ThirtySeconds,
    /// Every minute.
    #[serde(rename = "1m")]
    OneMinute,
    /// Every five minutes.
    #[serde(rename = "5m")]
    FiveMinutes,
}

impl RefreshInterval {
    /// The interval as a duration.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::ThirtySeconds => Duration::from_secs(30),
            Self::OneMinute => Duration::from_secs(60),
            Self::FiveMinutes => Duration::from_secs(300),
        }
    }
}

/// Page sizes offered for tables.
pub const ROWS_PER_PAGE_OPTIONS: [u32; 4] = [10, 25, 50, 100];

/// A boolean preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Toggle {
    /// Dark colour scheme.
    DarkMode,
    /// In-app notifications.
    Notifications,
    /// Email alerts.
    EmailAlerts,
    /// Periodic refresh of live panels.
    AutoRefresh,
}

/// User preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Dark colour scheme.
    pub dark_mode: bool,
    /// In-app notifications.
    pub notifications: bool,
    /// Email alerts.
    pub email_alerts: bool,
    /// Periodic refresh of live panels.
    pub auto_refresh: bool,
    /// Refresh period.
    pub refresh_interval: RefreshInterval,
    /// Table page size; one of [`ROWS_PER_PAGE_OPTIONS`].
    pub rows_per_page: u32,
    /// Interface language.
    pub language: Language,
    /// Display timezone.
    pub timezone: Timezone,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            email_alerts: true,
            auto_refresh: true,
            refresh_interval: RefreshInterval::default(),
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
            language: Language::default(),
            timezone: Timezone::default(),
        }
    }
}

impl Preferences {
    /// Flips a boolean preference and returns its new value.
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let flag = match toggle {
            Toggle::DarkMode => &mut self.dark_mode,
            Toggle::Notifications => &mut self.notifications,
            Toggle::EmailAlerts => &mut self.email_alerts,
            Toggle::AutoRefresh => &mut self.auto_refresh,
        };
        *flag = !*flag;
        *flag
    }

    /// Restores every preference to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets the table page size, snapping to the nearest offered size.
    pub fn set_rows_per_page(&mut self, rows: u32) {
        self.rows_per_page = snap_rows_per_page(rows);
    }

    /// Refresh period, or `None` when auto refresh is off.
    #[must_use]
    pub const fn refresh_period(&self) -> Option<Duration> {
        if self.auto_refresh {
            Some(self.refresh_interval.duration())
        } else {
            None
        }
    }

    /// Serialises the preferences as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Export`] if serialisation fails.
    pub fn to_toml(&self) -> Result<String, PreferencesError> {
        Ok(toml::to_string(self)?)
    }

    /// Parses preferences from TOML. Missing keys take their defaults and
    /// an unsupported page size is snapped to an offered one.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Parse`] if the text is not valid TOML or
    /// a value is not recognised.
    pub fn from_toml(text: &str) -> Result<Self, PreferencesError> {
        let mut prefs: Self = toml::de::from_str(text)?;
        if !ROWS_PER_PAGE_OPTIONS.contains(&prefs.rows_per_page) {
            log::warn!(
                "Unsupported rows_per_page {}, using nearest option",
                prefs.rows_per_page
            );
            prefs.set_rows_per_page(prefs.rows_per_page);
        }
        Ok(prefs)
    }
}

fn snap_rows_per_page(rows: u32) -> u32 {
    ROWS_PER_PAGE_OPTIONS
        .iter()
        .copied()
        .min_by_key(|option| option.abs_diff(rows))
        .unwrap_or(ROWS_PER_PAGE_OPTIONS[0])
}
