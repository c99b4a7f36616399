//! HTTP client for the analysis service.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::bundle::UploadBundle;
use super::error::{service_detail, AnalysisError, AnalysisStep};
use crate::models::{StudentRecord, SummaryRecord};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ANALYZE_PATH: &str = "/analyze-spreadsheets/";
pub const SUMMARY_PATH: &str = "/generate-summary/";

/// Where the analysis service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct AnalysisClientConfig {
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for AnalysisClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Output of a successful run.
///
/// `summary` is `None` exactly when the service classified no students, in
/// which case the summary endpoint was not called.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub students: Vec<StudentRecord>,
    pub summary: Option<SummaryRecord>,
}

/// Sequences the two dependent analysis calls. One attempt per call, no
/// retries, no caching.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(config: AnalysisClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analyse the bundle and, if any students came back, summarise them.
    pub async fn analyze(&self, bundle: &UploadBundle) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_cancel(bundle, &CancellationToken::new())
            .await
    }

    /// Like [`analyze`](Self::analyze), abandoning the in-flight call as soon
    /// as `cancel` fires.
    pub async fn analyze_with_cancel(
        &self,
        bundle: &UploadBundle,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let students = cancellable(
            AnalysisStep::Analyze,
            cancel,
            self.analyze_spreadsheets(bundle),
        )
        .await?;
        info!(count = students.len(), "analysis service classified students");

        if students.is_empty() {
            return Ok(AnalysisResult {
                students,
                summary: None,
            });
        }

        let summary = cancellable(
            AnalysisStep::Summary,
            cancel,
            self.generate_summary(&students),
        )
        .await?;
        debug!(total = summary.total_students, "summary received");

        Ok(AnalysisResult {
            students,
            summary: Some(summary),
        })
    }

    /// `POST /analyze-spreadsheets/` with the three files.
    pub async fn analyze_spreadsheets(
        &self,
        bundle: &UploadBundle,
    ) -> Result<Vec<StudentRecord>, AnalysisError> {
        let step = AnalysisStep::Analyze;
        let form = bundle
            .to_form()
            .map_err(|e| AnalysisError::Validation(format!("Invalid upload: {}", e)))?;

        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(step, e))?;

        read_json(step, response).await
    }

    /// `POST /generate-summary/` with the records returned by the first call.
    pub async fn generate_summary(
        &self,
        students: &[StudentRecord],
    ) -> Result<SummaryRecord, AnalysisError> {
        let step = AnalysisStep::Summary;
        let response = self
            .client
            .post(self.url(SUMMARY_PATH))
            .json(students)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(step, e))?;

        read_json(step, response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn cancellable<T, F>(
    step: AnalysisStep,
    cancel: &CancellationToken,
    call: F,
) -> Result<T, AnalysisError>
where
    F: Future<Output = Result<T, AnalysisError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled { step }),
        result = call => result,
    }
}

async fn read_json<T: DeserializeOwned>(
    step: AnalysisStep,
    response: reqwest::Response,
) -> Result<T, AnalysisError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AnalysisError::transport(step, e))?;

    if !status.is_success() {
        return Err(AnalysisError::Service {
            step,
            status: status.as_u16(),
            detail: service_detail(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| AnalysisError::Decode {
        step,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = AnalysisClient::new(AnalysisClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(
            client.url(ANALYZE_PATH),
            "http://localhost:8000/analyze-spreadsheets/"
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_call_completes() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), AnalysisError> = cancellable(
            AnalysisStep::Analyze,
            &token,
            std::future::pending(),
        )
        .await;
        assert!(matches!(
            result,
            Err(AnalysisError::Cancelled {
                step: AnalysisStep::Analyze
            })
        ));
    }
}
