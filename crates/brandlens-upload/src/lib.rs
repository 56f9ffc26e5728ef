#![warn(missing_docs)]
//! # brandlens-upload
//!
//! ## Purpose
//! Submits one ad file plus brand selection to the analysis service and
//! returns the raw critique body.
//!
//! ## Responsibilities
//! - Validate the configured service base URL.
//! - Assemble the multipart submission envelope (`file` + `brand`).
//! - Execute the submission through an injectable transport abstraction.
//! - Classify transport outcomes (timeout, network failure, non-2xx status).
//!
//! ## Data flow
//! Form controller hands off `(media, brand)` -> [`CritiqueClient::submit`]
//! builds a [`CritiqueRequest`] -> [`CritiqueTransport`] performs the POST ->
//! raw body returns to the session controller for contract validation.
//!
//! ## Ownership and lifetimes
//! The envelope owns its byte buffer so transports can run on worker threads
//! without borrowing form state.
//!
//! ## Error model
//! Endpoint policy violations and transport failures surface as
//! [`UploadError`]. A non-2xx status is a failure regardless of body content;
//! the body is not parsed for an error structure. No retry is attempted.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use brandlens_upload::{CritiqueClient, HttpCritiqueTransport};
//!
//! let client = CritiqueClient::new(
//!     "http://localhost:8000",
//!     Duration::from_secs(60),
//!     Arc::new(HttpCritiqueTransport),
//! ).expect("valid base url");
//! ```

use std::sync::Arc;
use std::time::Duration;

use brandlens_core::SelectedMedia;
use thiserror::Error;
use url::Url;

/// Path of the critique endpoint under the service base URL.
pub const CRITIQUE_PATH: &str = "/critique";

/// One assembled submission, ready for a transport to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritiqueRequest {
    /// Fully resolved critique endpoint.
    pub endpoint: Url,
    /// Brand value forwarded as the `brand` form field.
    pub brand: String,
    /// Original file name attached to the `file` part.
    pub file_name: String,
    /// MIME type attached to the `file` part.
    pub mime: String,
    /// Raw file contents of the `file` part.
    pub body: Vec<u8>,
    /// Bound on the whole request; a hang becomes [`UploadError::Timeout`].
    pub timeout: Duration,
}

/// Raw HTTP outcome a transport observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl TransportReply {
    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by the critique client.
///
/// The real implementation is [`HttpCritiqueTransport`]; tests inject
/// in-memory fakes to drive the session controller without a network.
pub trait CritiqueTransport: Send + Sync {
    /// Sends one submission and reports the raw HTTP outcome.
    ///
    /// # Errors
    /// Returns [`UploadError::Timeout`] when the bound elapses and
    /// [`UploadError::Network`] for connection-level failures. Any received
    /// HTTP status, success or not, is an `Ok` reply.
    fn submit(&self, request: &CritiqueRequest) -> Result<TransportReply, UploadError>;
}

/// Client that validates endpoint policy and executes critique submissions.
#[derive(Clone)]
pub struct CritiqueClient {
    endpoint: Url,
    timeout: Duration,
    transport: Arc<dyn CritiqueTransport>,
}

impl CritiqueClient {
    /// Creates a validated critique client.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidEndpoint`] when the base URL does not
    /// parse or uses a scheme other than `http`/`https`.
    pub fn new(
        base_url: impl AsRef<str>,
        timeout: Duration,
        transport: Arc<dyn CritiqueTransport>,
    ) -> Result<Self, UploadError> {
        let endpoint = resolve_critique_endpoint(base_url.as_ref())?;
        Ok(Self {
            endpoint,
            timeout,
            transport,
        })
    }

    /// Returns the resolved critique endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submits one ad and returns the raw response body on success.
    ///
    /// # Errors
    /// Returns [`UploadError::IncompleteSubmission`] for a blank brand or
    /// empty file, [`UploadError::Status`] for a non-2xx reply, and
    /// propagates transport failures as-is.
    pub fn submit(&self, media: &SelectedMedia, brand: &str) -> Result<String, UploadError> {
        if brand.trim().is_empty() || media.bytes.is_empty() {
            return Err(UploadError::IncompleteSubmission);
        }

        let request = CritiqueRequest {
            endpoint: self.endpoint.clone(),
            brand: brand.to_string(),
            file_name: media.file_name.clone(),
            mime: media.mime.clone(),
            body: media.bytes.clone(),
            timeout: self.timeout,
        };

        log::info!(
            "submitting {} ({} bytes) for brand {brand}",
            request.file_name,
            request.body.len()
        );

        let reply = self.transport.submit(&request)?;
        if !reply.is_success() {
            return Err(UploadError::Status(reply.status));
        }

        Ok(reply.body)
    }
}

/// Resolves and validates the critique endpoint under `base_url`.
///
/// # Errors
/// Returns [`UploadError::InvalidEndpoint`] for unparseable URLs or schemes
/// other than `http`/`https`.
pub fn resolve_critique_endpoint(base_url: &str) -> Result<Url, UploadError> {
    let parsed = Url::parse(base_url)
        .map_err(|error| UploadError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UploadError::InvalidEndpoint(format!(
            "unsupported scheme '{}'; expected http or https",
            parsed.scheme()
        )));
    }

    parsed
        .join(CRITIQUE_PATH)
        .map_err(|error| UploadError::InvalidEndpoint(format!("cannot resolve endpoint: {error}")))
}

/// Real transport on a blocking HTTP client with a per-request timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpCritiqueTransport;

impl CritiqueTransport for HttpCritiqueTransport {
    fn submit(&self, request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request.timeout)
            .build()
            .map_err(|error| UploadError::Network(format!("http client init failed: {error}")))?;

        let part = reqwest::blocking::multipart::Part::bytes(request.body.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime)
            .map_err(|error| UploadError::Network(format!("invalid part mime type: {error}")))?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("brand", request.brand.clone());

        let response = client
            .post(request.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(|error| {
                if error.is_timeout() {
                    UploadError::Timeout
                } else {
                    UploadError::Network(error.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|error| {
            if error.is_timeout() {
                UploadError::Timeout
            } else {
                UploadError::Network(format!("response read failed: {error}"))
            }
        })?;

        Ok(TransportReply { status, body })
    }
}

/// Errors produced by submission policy and transports.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Base URL violates endpoint policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Brand or file was blank at submission time.
    #[error("a brand and a file are both required")]
    IncompleteSubmission,
    /// The request exceeded its configured bound.
    #[error("analysis request timed out")]
    Timeout,
    /// Connection-level failure before a status was received.
    #[error("network failure: {0}")]
    Network(String),
    /// The service replied with a non-2xx status.
    #[error("analysis service returned HTTP {0}")]
    Status(u16),
}
