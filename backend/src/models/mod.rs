//! Data shapes exchanged with the analysis service and the notification relay.
//!
//! Student and summary records are produced by the external analysis service
//! and are treated as read-only for the lifetime of one render cycle.

pub mod notification;
pub mod student;
pub mod summary;

pub use notification::NotificationRequest;
pub use student::{RiskLabel, RiskLevel, StudentRecord};
pub use summary::{ScatterPoint, SummaryRecord};
