//! View models for the dashboard panels.
//!
//! Each panel is built from the records as received; nothing here changes or
//! recomputes what the analysis service reported, except the High/Medium
//! counts of the summary panel, which are taken from the student list.

use std::fmt;

use tabled::{Table, Tabled};

use crate::models::{RiskLevel, StudentRecord, SummaryRecord};

pub const RECOMMENDED_ACTION: &str = "Schedule attendance counseling";

/// Percentage with one decimal, e.g. `81.3%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

// =============================================================================
// Sidebar summary
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPanel {
    pub total_students: u64,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub average_attendance: String,
}

impl SummaryPanel {
    pub fn new(students: &[StudentRecord], summary: &SummaryRecord) -> Self {
        let count = |level: RiskLevel| {
            students
                .iter()
                .filter(|s| s.predicted_risk.is(level))
                .count()
        };
        Self {
            total_students: summary.total_students,
            high_risk: count(RiskLevel::High),
            medium_risk: count(RiskLevel::Medium),
            average_attendance: format_percent(summary.average_attendance),
        }
    }
}

impl fmt::Display for SummaryPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Summary")?;
        writeln!(f, "  Total Students   {}", self.total_students)?;
        writeln!(f, "  High Risk        {}", self.high_risk)?;
        writeln!(f, "  Medium Risk      {}", self.medium_risk)?;
        write!(f, "  Avg. Attendance  {}", self.average_attendance)
    }
}

// =============================================================================
// Dashboard charts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieSlice {
    pub label: &'static str,
    pub count: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    /// High, Medium, Low in that order
    pub risk_slices: Vec<PieSlice>,
    /// `(attendance, grade)` pairs
    pub scatter: Vec<(f64, f64)>,
}

impl DashboardView {
    pub fn new(summary: &SummaryRecord) -> Self {
        let cards = vec![
            MetricCard {
                title: "Total Students",
                value: summary.total_students.to_string(),
            },
            MetricCard {
                title: "Avg. Attendance",
                value: format_percent(summary.average_attendance),
            },
            MetricCard {
                title: "Avg. Grade",
                value: format_percent(summary.average_grade),
            },
        ];

        let risk_slices = [
            ("High Risk", RiskLevel::High, "#ef4444"),
            ("Medium Risk", RiskLevel::Medium, "#f59e0b"),
            ("Low Risk", RiskLevel::Low, "#22c55e"),
        ]
        .into_iter()
        .map(|(label, level, color)| PieSlice {
            label,
            count: summary.count_for(level),
            color,
        })
        .collect();

        let scatter = summary
            .scatter_data
            .iter()
            .map(|p| (p.attendance_percentage, p.overall_grade_avg))
            .collect();

        Self {
            cards,
            risk_slices,
            scatter,
        }
    }

    pub fn slice_total(&self) -> u64 {
        self.risk_slices.iter().map(|s| s.count).sum()
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard")?;
        for card in &self.cards {
            writeln!(f, "  {:<16} {}", card.title, card.value)?;
        }
        writeln!(f, "Risk Distribution")?;
        for slice in &self.risk_slices {
            writeln!(f, "  {:<16} {}", slice.label, slice.count)?;
        }
        write!(f, "Attendance vs. Grades: {} points", self.scatter.len())
    }
}

// =============================================================================
// Student table and detail
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct StudentRow {
    #[tabled(rename = "Student ID")]
    pub student_id: String,
    #[tabled(rename = "Name")]
    pub full_name: String,
    #[tabled(rename = "AI Predicted Risk")]
    pub risk: String,
    #[tabled(skip)]
    pub risk_class: &'static str,
}

impl From<&StudentRecord> for StudentRow {
    fn from(student: &StudentRecord) -> Self {
        Self {
            student_id: student.student_id.clone(),
            full_name: student.full_name.clone(),
            risk: student.predicted_risk.as_str().to_string(),
            risk_class: student.predicted_risk.class_name(),
        }
    }
}

/// The student overview table, one row per record in service order.
pub fn render_student_table(students: &[StudentRecord]) -> String {
    let rows: Vec<StudentRow> = students.iter().map(StudentRow::from).collect();
    Table::new(rows).to_string()
}

/// Bar whose colour runs from red (0) to green (max).
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBar {
    pub label: &'static str,
    pub value: f64,
    /// Filled share, 0-100
    pub fill_percent: f64,
    /// HSL hue, 0 (red) to 120 (green)
    pub hue: f64,
}

impl GradientBar {
    pub fn new(label: &'static str, value: f64, max: f64) -> Self {
        let fill_percent = if max > 0.0 {
            (value / max * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            label,
            value,
            fill_percent,
            hue: fill_percent / 100.0 * 120.0,
        }
    }
}

/// Detail view of one student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDetail {
    pub full_name: String,
    pub student_id: String,
    pub risk: String,
    pub risk_class: &'static str,
    pub recommended_action: &'static str,
    pub metrics: Vec<(&'static str, String)>,
    pub bars: Vec<GradientBar>,
}

impl From<&StudentRecord> for StudentDetail {
    fn from(student: &StudentRecord) -> Self {
        Self {
            full_name: student.full_name.clone(),
            student_id: student.student_id.clone(),
            risk: student.predicted_risk.as_str().to_string(),
            risk_class: student.predicted_risk.class_name(),
            recommended_action: RECOMMENDED_ACTION,
            metrics: vec![
                ("Avg. Grade", format!("{}%", student.overall_grade_avg)),
                ("Attendance", format!("{}%", student.attendance_percentage)),
                ("Backlogs", student.failed_subjects_count.to_string()),
                ("Fee Status", student.fee_status.clone()),
            ],
            bars: vec![
                GradientBar::new("Avg. Grade", student.overall_grade_avg, 100.0),
                GradientBar::new("Attendance", student.attendance_percentage, 100.0),
            ],
        }
    }
}

impl fmt::Display for StudentDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.full_name, self.student_id)?;
        writeln!(f, "Dropout Risk Assessment: {}", self.risk)?;
        writeln!(f, "Recommended Action: {}", self.recommended_action)?;
        for (label, value) in &self.metrics {
            writeln!(f, "  {:<12} {}", label, value)?;
        }
        let mut bars = self.bars.iter().peekable();
        while let Some(bar) = bars.next() {
            let filled = (bar.fill_percent / 5.0).round() as usize;
            write!(
                f,
                "  {:<12} [{:<20}] {}%",
                bar.label,
                "#".repeat(filled),
                bar.value
            )?;
            if bars.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
