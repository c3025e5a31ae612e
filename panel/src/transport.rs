//! HTTP transport to the analysis service.
//!
//! DESIGN
//! ======
//! One `POST {base_url}/analyze` per request, with no retry and no client
//! timeout: a slow backend simply keeps the request pending. The transport
//! is the only component doing network I/O and sits behind the
//! `AnalysisTransport` trait so the panel can be driven by a mock in tests.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx statuses, network failures and undecodable bodies each map to an
//! `AnalyzeError` variant whose message names the underlying cause. All of
//! them are written to the diagnostic log before being returned.

use std::sync::Arc;

use tracing::{debug, warn};
use wire::{AnalysisRequest, AnalysisResponse};

use crate::diagnostics::{self, DiagnosticLog};

/// Errors produced by a single analysis call.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The service answered with a non-success HTTP status.
    #[error("Network response was not ok: {status_text}")]
    Status { status: u16, status_text: String },

    /// The request never completed (connection refused, reset, DNS, ...).
    #[error("{0}")]
    Network(String),

    /// The response body is not a valid analysis response.
    #[error("invalid analysis response: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Sends analysis requests. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Submit one request and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalyzeError`] when the call fails or the response cannot
    /// be decoded.
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError>;
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    log: Arc<dyn DiagnosticLog>,
    preview_chars: usize,
}

impl HttpTransport {
    /// Build a transport that posts to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(
        endpoint: impl Into<String>,
        log: Arc<dyn DiagnosticLog>,
        preview_chars: usize,
    ) -> Result<Self, AnalyzeError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AnalyzeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into(), log, preview_chars })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalyzeError::Network(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map_or_else(|| status.as_u16().to_string(), str::to_owned);
            return Err(AnalyzeError::Status { status: status.as_u16(), status_text });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AnalyzeError::Network(error_chain(&e)))?;
        diagnostics::log_response_body(self.log.as_ref(), &body);
        wire::decode_response(&body).map_err(|e| AnalyzeError::Parse(e.to_string()))
    }
}

/// `Display` of `err` followed by each of its sources, joined with `": "`.
///
/// reqwest keeps the OS-level cause (refused, reset, DNS) in the source chain
/// and leaves it out of its own message.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[async_trait::async_trait]
impl AnalysisTransport for HttpTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError> {
        diagnostics::log_request(self.log.as_ref(), request, self.preview_chars);
        debug!(endpoint = %self.endpoint, attachments = request.attachments.len(), "posting analysis request");

        let result = self.post(request).await;
        if let Err(e) = &result {
            warn!(endpoint = %self.endpoint, error = %e, "analysis request failed");
            diagnostics::log_failure(self.log.as_ref(), &e.to_string());
        }
        result
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
