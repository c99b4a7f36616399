//! Upload cycle state machine: `Idle -> Loading -> Ready | Idle`.

use tracing::error;

use super::Acknowledgment;
use crate::analysis::{AnalysisError, AnalysisResult};
use crate::models::{StudentRecord, SummaryRecord};

pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Check server logs.";

#[derive(Debug, Clone, PartialEq)]
pub enum CycleState {
    Idle,
    Loading,
    Ready(AnalysisResult),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error("an analysis is already in progress")]
    AlreadyLoading,
    #[error("no analysis is in progress")]
    NotLoading,
}

/// One dashboard's upload cycle.
///
/// Only one upload may be in flight; `begin` refuses while loading, which is
/// the whole of the guard. Results are never mutated once stored.
#[derive(Debug, Clone)]
pub struct UploadCycle {
    state: CycleState,
}

impl Default for UploadCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadCycle {
    pub fn new() -> Self {
        Self {
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CycleState::Loading)
    }

    /// Start an upload, dropping any previous results.
    pub fn begin(&mut self) -> Result<(), CycleError> {
        if self.is_loading() {
            return Err(CycleError::AlreadyLoading);
        }
        self.state = CycleState::Loading;
        Ok(())
    }

    /// Record the outcome of the in-flight upload.
    ///
    /// A failure returns the cycle to `Idle` with nothing retained, logs the
    /// tagged error for the operator and yields the message for the user.
    pub fn finish(
        &mut self,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<Option<Acknowledgment>, CycleError> {
        if !self.is_loading() {
            return Err(CycleError::NotLoading);
        }

        match outcome {
            Ok(result) => {
                self.state = CycleState::Ready(result);
                Ok(None)
            }
            Err(e) => {
                error!(kind = e.kind(), step = ?e.step(), error = %e, "analysis error");
                self.state = CycleState::Idle;
                Ok(Some(Acknowledgment::new(ANALYSIS_FAILED_MESSAGE)))
            }
        }
    }

    pub fn students(&self) -> Option<&[StudentRecord]> {
        match &self.state {
            CycleState::Ready(result) => Some(&result.students),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&SummaryRecord> {
        match &self.state {
            CycleState::Ready(result) => result.summary.as_ref(),
            _ => None,
        }
    }

    /// Look up a student of the current result by id.
    pub fn student(&self, student_id: &str) -> Option<&StudentRecord> {
        self.students()?
            .iter()
            .find(|s| s.student_id == student_id)
    }
}
