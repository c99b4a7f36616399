//! File selection for one upload.

use crate::analysis::{AnalysisError, UploadBundle, UploadFile};

pub const MISSING_FILES_MESSAGE: &str = "Please select all three required files.";

/// Files chosen so far. Analysis is only offered once all three are present.
#[derive(Debug, Clone, Default)]
pub struct UploadSelection {
    pub students: Option<UploadFile>,
    pub academic: Option<UploadFile>,
    pub activity: Option<UploadFile>,
}

impl UploadSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.students.is_some() && self.academic.is_some() && self.activity.is_some()
    }

    /// The bundle to upload, or a validation error naming the missing files.
    /// No request is made when this fails.
    pub fn to_bundle(&self) -> Result<UploadBundle, AnalysisError> {
        match (&self.students, &self.academic, &self.activity) {
            (Some(students), Some(academic), Some(activity)) => Ok(UploadBundle::new(
                students.clone(),
                academic.clone(),
                activity.clone(),
            )),
            _ => Err(AnalysisError::Validation(MISSING_FILES_MESSAGE.to_string())),
        }
    }
}
