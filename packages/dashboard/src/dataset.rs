//! Dataset management page.

use serde::Serialize;
use strum_macros::Display;

/// Review state of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum DatasetStatus {
    /// Checked and usable.
    Verified,
    /// Awaiting review.
    #[strum(serialize = "Pending Review")]
    #[serde(rename = "Pending Review")]
    PendingReview,
    /// Needs operator action.
    #[strum(serialize = "Action Req.")]
    #[serde(rename = "Action Req.")]
    ActionRequired,
}

/// One dataset listed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetRecord {
    /// Dataset id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category.
    pub kind: &'static str,
    /// Owning region.
    pub region: &'static str,
    /// Review state.
    pub status: DatasetStatus,
}

/// Sample datasets.
pub const DATASETS: [DatasetRecord; 5] = [
    DatasetRecord {
        id: "DS-2023-8842",
        name: "Biometric Sync Logs",
        kind: "Biometric",
        region: "Northern Zone",
        status: DatasetStatus::Verified,
    },
    DatasetRecord {
        id: "DS-2023-8845",
        name: "Authentication Records",
        kind: "Auth Logs",
        region: "Western Zone",
        status: DatasetStatus::PendingReview,
    },
    DatasetRecord {
        id: "DS-2023-8801",
        name: "Demographic Updates",
        kind: "Demographic",
        region: "Southern Zone",
        status: DatasetStatus::Verified,
    },
    DatasetRecord {
        id: "DS-2023-8799",
        name: "Server Error Logs",
        kind: "System Logs",
        region: "Central HQ",
        status: DatasetStatus::ActionRequired,
    },
    DatasetRecord {
        id: "DS-2023-8750",
        name: "Face Auth Metadata",
        kind: "Biometric",
        region: "Eastern Zone",
        status: DatasetStatus::Verified,
    },
];

impl DatasetRecord {
    /// Case-insensitive match of `needle` (already lowercased) against the
    /// name, id and type.
    fn matches(&self, needle: &str) -> bool {
        [self.name, self.id, self.kind]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Datasets whose name, id or type contains `query`, ignoring case. A
/// blank query matches everything.
#[must_use]
pub fn search(records: &[DatasetRecord], query: &str) -> Vec<DatasetRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || r.matches(&needle))
        .copied()
        .collect()
}

/// View-model for the Dataset page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetView {
    query: String,
}

impl DatasetView {
    /// Updates the search box.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows matching the current search.
    #[must_use]
    pub fn rows(&self) -> Vec<DatasetRecord> {
        search(&DATASETS, &self.query)
    }
}
