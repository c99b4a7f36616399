//! Aggregate statistics derived by the analysis service from a batch of
//! student records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::student::RiskLevel;

/// One point of the attendance-vs-grade scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub attendance_percentage: f64,
    pub overall_grade_avg: f64,
}

/// Response of the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_students: u64,
    pub average_attendance: f64,
    pub average_grade: f64,
    /// Student count per risk label, keyed by the label the service used
    #[serde(default)]
    pub risk_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub scatter_data: Vec<ScatterPoint>,
}

impl SummaryRecord {
    /// Count for a risk level; absent labels count as zero.
    pub fn count_for(&self, level: RiskLevel) -> u64 {
        self.risk_distribution
            .get(level.label())
            .copied()
            .unwrap_or(0)
    }

    /// Sum over every label in the distribution, including unrated ones.
    pub fn distributed_total(&self) -> u64 {
        self.risk_distribution.values().sum()
    }

    /// Whether the distribution accounts for exactly `total_students`.
    ///
    /// Nothing in the client enforces this; it holds when the service is
    /// internally consistent.
    pub fn is_consistent(&self) -> bool {
        self.distributed_total() == self.total_students
    }
}
