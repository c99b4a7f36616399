//! Notification payload accepted by the relay.

use serde::{Deserialize, Serialize};

use super::student::StudentRecord;

/// Body of `POST /notify`.
///
/// Fields are not validated; missing ones deserialize as empty strings and are
/// forwarded to the provider as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl NotificationRequest {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Risk alert addressed to the student's guardian.
    pub fn risk_alert(student: &StudentRecord) -> Self {
        Self {
            to: student.guardian_email.clone(),
            subject: format!("Student Risk Alert: {}", student.full_name),
            message: format!(
                "This is an alert for {} ({}), who is currently at {} risk.",
                student.full_name, student.student_id, student.predicted_risk
            ),
        }
    }
}
