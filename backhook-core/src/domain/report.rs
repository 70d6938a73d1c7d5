//! Report domain types

use serde::{Deserialize, Serialize};

/// One backup job row extracted from the `Details` section
///
/// A record only exists when both `id` and `name` were present on the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub time: String,
    pub size: String,
    /// Display only, never used for addressing
    pub filename: String,
    pub logs: Vec<String>,
}

impl JobRecord {
    /// Whether the job reported an `ok` status (case-insensitive)
    pub fn is_ok(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("ok")
    }
}

/// Totals from the `Total` section, kept as free-form text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub running_time: Option<String>,
    pub total_size: Option<String>,
}

/// Parser output and the only handoff between parsing and rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReport {
    /// Records in first-seen order
    pub records: Vec<JobRecord>,
    pub summary: ReportSummary,
}

impl ParsedReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every record is `ok`; vacuously true for an empty report
    pub fn all_ok(&self) -> bool {
        self.records.iter().all(JobRecord::is_ok)
    }

    /// First record whose id matches exactly
    pub fn find_mut(&mut self, id: &str) -> Option<&mut JobRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }
}
