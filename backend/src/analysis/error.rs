//! Tagged failures of an analysis run.

use std::fmt;

/// Which of the two service calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStep {
    /// `POST /analyze-spreadsheets/`
    Analyze,
    /// `POST /generate-summary/`
    Summary,
}

impl fmt::Display for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStep::Analyze => f.write_str("analyze-spreadsheets"),
            AnalysisStep::Summary => f.write_str("generate-summary"),
        }
    }
}

/// Why an analysis run produced no result.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Input rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The service could not be reached or the connection broke.
    #[error("{step} request failed: {message}")]
    Transport {
        step: AnalysisStep,
        message: String,
        timed_out: bool,
    },

    /// The service answered with a non-success status.
    #[error("{step} returned status {status}: {detail}")]
    Service {
        step: AnalysisStep,
        status: u16,
        detail: serde_json::Value,
    },

    /// The service answered with success but the body was not the expected shape.
    #[error("{step} response could not be decoded: {message}")]
    Decode { step: AnalysisStep, message: String },

    /// The caller cancelled the run while the step was in flight.
    #[error("{step} request was cancelled")]
    Cancelled { step: AnalysisStep },
}

impl AnalysisError {
    /// The step that failed; `None` for local validation failures.
    pub fn step(&self) -> Option<AnalysisStep> {
        match self {
            AnalysisError::Validation(_) => None,
            AnalysisError::Transport { step, .. }
            | AnalysisError::Service { step, .. }
            | AnalysisError::Decode { step, .. }
            | AnalysisError::Cancelled { step } => Some(*step),
        }
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "validation",
            AnalysisError::Transport { .. } => "transport",
            AnalysisError::Service { .. } => "service",
            AnalysisError::Decode { .. } => "decode",
            AnalysisError::Cancelled { .. } => "cancelled",
        }
    }

    pub(crate) fn transport(step: AnalysisStep, err: reqwest::Error) -> Self {
        AnalysisError::Transport {
            step,
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// Error detail from a failed service response. The service reports errors as
/// `{"detail": ...}`; other JSON is kept whole and non-JSON is kept as text.
pub(crate) fn service_detail(text: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(mut map)) if map.contains_key("detail") => {
            map.remove("detail").unwrap_or(serde_json::Value::Null)
        }
        Ok(value) => value,
        Err(_) => serde_json::Value::String(text.trim().to_string()),
    }
}
