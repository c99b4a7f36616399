//! Presentation-layer logic of the risk dashboard.
//!
//! Everything the dashboard decides without drawing: which files are still
//! missing, where the upload cycle stands, what each panel shows, and what the
//! user is told after a notification attempt. Rendering is left to the front
//! end; the terminal front end in `bin/dashboard.rs` prints these view models.

mod cycle;
mod relay_client;
mod uploader;
mod view;

use std::fmt;
use std::future::Future;

pub use cycle::{CycleError, CycleState, UploadCycle, ANALYSIS_FAILED_MESSAGE};
pub use relay_client::{NotifyOutcome, RelayClient, DEFAULT_RELAY_URL};
pub use uploader::{UploadSelection, MISSING_FILES_MESSAGE};
pub use view::{
    format_percent, render_student_table, DashboardView, GradientBar, MetricCard, PieSlice,
    StudentDetail, StudentRow, SummaryPanel, RECOMMENDED_ACTION,
};

/// A blocking message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub message: String,
}

impl Acknowledgment {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Question asked before a notification is sent.
pub fn confirmation_prompt(student: &crate::models::StudentRecord) -> String {
    format!("Send notification for {}?", student.full_name)
}

/// Run `work` unless `interrupt` completes first, in which case `None` is
/// returned and `work` is dropped.
///
/// The session loop waits on stdin through this with Ctrl-C as the interrupt,
/// so the signal still ends the program once a handler has been installed.
pub async fn until_interrupted<F, I>(work: F, interrupt: I) -> Option<F::Output>
where
    F: Future,
    I: Future,
{
    tokio::select! {
        biased;
        _ = interrupt => None,
        output = work => Some(output),
    }
}
