//! Client for the external analysis service.
//!
//! One analysis run is two dependent calls: the three spreadsheets go to
//! `/analyze-spreadsheets/`, and a non-empty result is then posted to
//! `/generate-summary/`. Either step failing fails the run; no partial result
//! is reported as success.

mod bundle;
mod client;
mod error;

pub use bundle::{UploadBundle, UploadFile};
pub use client::{
    AnalysisClient, AnalysisClientConfig, AnalysisResult, ANALYZE_PATH, DEFAULT_BASE_URL,
    SUMMARY_PATH,
};
pub use error::{AnalysisError, AnalysisStep};
