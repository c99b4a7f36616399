//! Per-student risk classification records.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The three risk classes the model predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Canonical label, as used for the summary distribution keys.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Lowercase class name used to tag the risk in the UI.
    pub fn class_name(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Case-insensitive match of a service label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk label exactly as the analysis service sent it.
///
/// The string is never normalised, so a record forwarded to the summary
/// endpoint carries the same bytes it arrived with. Labels outside the known
/// levels (the service answers `"Model Not Loaded"` when it has no model)
/// are kept too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskLabel(String);

impl RiskLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Level matched case-insensitively; `None` for unrated labels.
    pub fn level(&self) -> Option<RiskLevel> {
        RiskLevel::parse(&self.0)
    }

    /// Exact match against the canonical label, as the headline counters do.
    pub fn is(&self, level: RiskLevel) -> bool {
        self.0 == level.label()
    }

    /// Empty for labels that are not one of the known levels.
    pub fn class_name(&self) -> &'static str {
        self.level().map(RiskLevel::class_name).unwrap_or("")
    }
}

impl From<RiskLevel> for RiskLabel {
    fn from(level: RiskLevel) -> Self {
        Self(level.label().to_string())
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the analysis service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub full_name: String,
    pub predicted_risk: RiskLabel,
    /// Average score, 0-100
    pub overall_grade_avg: f64,
    /// Share of attended days, 0-100
    pub attendance_percentage: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub failed_subjects_count: u32,
    #[serde(default)]
    pub fee_status: String,
    #[serde(default)]
    pub guardian_email: String,
    /// Columns the service returns that the dashboard does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The analysis service fills missing counts with a float column, so `2.0`
/// shows up where an integer is expected.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "failed_subjects_count must be a non-negative integer, got {}",
            value
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "student_id": "S001",
            "full_name": "Ada Lovelace",
            "predicted_risk": "High",
            "overall_grade_avg": 41.5,
            "attendance_percentage": 62.0,
            "failed_subjects_count": 2.0,
            "fee_status": "Pending",
            "guardian_email": "guardian@example.com",
            "semester": 3,
            "has_consecutive_absences": true
        })
    }

    #[test]
    fn test_parses_float_count_and_keeps_extra_columns() {
        let record: StudentRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(record.failed_subjects_count, 2);
        assert_eq!(record.predicted_risk.level(), Some(RiskLevel::High));
        assert_eq!(record.extra.get("semester"), Some(&json!(3)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["has_consecutive_absences"], json!(true));
        assert_eq!(back["predicted_risk"], json!("High"));
    }

    #[test]
    fn test_rejects_fractional_count() {
        let mut value = sample();
        value["failed_subjects_count"] = json!(1.5);
        assert!(serde_json::from_value::<StudentRecord>(value).is_err());
    }

    #[test]
    fn test_unknown_risk_label_is_kept_verbatim() {
        let mut value = sample();
        value["predicted_risk"] = json!("Model Not Loaded");
        let record: StudentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.predicted_risk.as_str(), "Model Not Loaded");
        assert_eq!(record.predicted_risk.level(), None);
        assert_eq!(record.predicted_risk.class_name(), "");
        assert_eq!(
            serde_json::to_value(&record).unwrap()["predicted_risk"],
            json!("Model Not Loaded")
        );
    }

    #[test]
    fn test_risk_class_is_case_insensitive() {
        assert_eq!(RiskLabel::new("MEDIUM").class_name(), "medium");
        assert_eq!(RiskLabel::new("low").level(), Some(RiskLevel::Low));
    }

    #[test]
    fn test_lowercase_label_is_forwarded_unchanged() {
        let mut value = sample();
        value["predicted_risk"] = json!("high");
        let record: StudentRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(record.predicted_risk.class_name(), "high");
        assert!(!record.predicted_risk.is(RiskLevel::High));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["predicted_risk"], json!("high"));
    }

    #[test]
    fn test_missing_contact_fields_default_to_empty() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("guardian_email");
        value.as_object_mut().unwrap().remove("fee_status");
        let record: StudentRecord = serde_json::from_value(value).unwrap();
        assert!(record.guardian_email.is_empty());
        assert!(record.fee_status.is_empty());
    }
}
