#![warn(missing_docs)]
//! # brandlens-app
//!
//! ## Purpose
//! Orchestrates selection, submission, contract validation, and session
//! state for `brandlens`, and hosts the desktop shell binary.
//!
//! ## Responsibilities
//! - Resolve runtime configuration (service base URL, request timeout,
//!   upload-policy preset) from the environment.
//! - Drive one submission end to end: hand-off, HTTP POST, boundary
//!   validation, session transition, and user notifications.
//! - Decode accepted media into a preview representation off the UI thread.
//!
//! ## Data flow
//! Form hand-off -> [`execute_submission`] -> transport POST -> critique
//! validation -> session `Displaying`/`Failed` -> dashboard projection.
//!
//! ## Ownership and lifetimes
//! Hand-offs and outcomes are owned values moved between the UI loop and
//! worker threads; nothing borrows across the channel boundary.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]; every failure resolves
//! the session back to an input-accepting state with a user-visible reason.

use std::time::Duration;

use base64::Engine as _;
use brandlens_contract::{CritiqueResult, parse_critique_response};
use brandlens_core::{MediaKind, MediaPreview, PreviewImage, SelectedMedia, UploadPolicy};
use brandlens_ui::{CritiqueSession, Notification, NotificationSink, SubmissionHandoff};
use brandlens_upload::{CritiqueClient, HttpCritiqueTransport, UploadError};
use thiserror::Error;

/// Build-time application version loaded from the root `VERSION` file.
pub const APP_VERSION: &str = env!("BRANDLENS_VERSION");

/// Base URL used when `BRANDLENS_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout used when `BRANDLENS_HTTP_TIMEOUT_SECS` is unset.
///
/// Video analysis can take tens of seconds; the bound converts a hung
/// request into a reported timeout instead of an indefinite `Submitting`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Returns the app version sourced from the root `VERSION` file.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Analysis service base URL; every call site goes through this value.
    pub base_url: String,
    /// Bound on the critique request.
    pub timeout: Duration,
    /// Upload-policy preset for this run.
    pub policy: UploadPolicy,
}

impl AppConfig {
    /// Resolves configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            base_url: base_url_from_env(),
            timeout: Duration::from_secs(timeout_secs_from_env()),
            policy: upload_policy_from_env(),
        }
    }

    /// Builds the critique client over the real HTTP transport.
    ///
    /// # Errors
    /// Returns [`AppError::Upload`] when the configured base URL is invalid.
    pub fn build_client(&self) -> Result<CritiqueClient, AppError> {
        let client = CritiqueClient::new(
            &self.base_url,
            self.timeout,
            std::sync::Arc::new(HttpCritiqueTransport),
        )?;
        Ok(client)
    }
}

/// Reads the service base URL from `BRANDLENS_API_URL`.
///
/// Blank values fall back to [`DEFAULT_BASE_URL`].
pub fn base_url_from_env() -> String {
    match std::env::var("BRANDLENS_API_URL") {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Reads the request timeout from `BRANDLENS_HTTP_TIMEOUT_SECS`.
///
/// Unparseable or zero values fall back to [`DEFAULT_TIMEOUT_SECS`].
pub fn timeout_secs_from_env() -> u64 {
    std::env::var("BRANDLENS_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Reads the upload-policy preset from `BRANDLENS_IMAGE_ONLY`.
///
/// Semantics:
/// - Unset => combined image/video preset (50 MiB cap).
/// - `1`, `true`, `on` (case-insensitive) => image-only preset (10 MiB cap).
/// - Any other value => combined preset.
pub fn upload_policy_from_env() -> UploadPolicy {
    match std::env::var("BRANDLENS_IMAGE_ONLY") {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            if normalized == "1" || normalized == "true" || normalized == "on" {
                UploadPolicy::image_only()
            } else {
                UploadPolicy::image_and_video()
            }
        }
        Err(_) => UploadPolicy::image_and_video(),
    }
}

/// Submits one hand-off and validates the response at the HTTP boundary.
///
/// # Errors
/// Returns [`AppError::Upload`] for transport/status failures and
/// [`AppError::Contract`] for parse or missing-field failures. Only a fully
/// validated [`CritiqueResult`] travels further inward.
pub fn perform_submission(
    client: &CritiqueClient,
    handoff: &SubmissionHandoff,
) -> Result<CritiqueResult, AppError> {
    let body = client.submit(&handoff.media, &handoff.brand)?;
    let result = parse_critique_response(&body)?;
    Ok(result)
}

/// Applies a submission outcome to the session and notifies the user.
///
/// Success lands `Displaying` plus an "Analysis Complete!" notice; any
/// failure lands `Failed` with the reason and an "Analysis Failed" notice.
/// Nothing is retried automatically.
///
/// # Errors
/// Returns [`AppError::Session`] when no submission is in flight.
pub fn resolve_submission(
    session: &mut CritiqueSession,
    outcome: Result<CritiqueResult, AppError>,
    kind: MediaKind,
    sink: &dyn NotificationSink,
) -> Result<(), AppError> {
    match outcome {
        Ok(result) => {
            session.complete(result)?;
            sink.push(Notification::info(
                "Analysis Complete!",
                format!("Your {} ad has been analyzed successfully", kind.as_str()),
            ));
            Ok(())
        }
        Err(error) => {
            log::error!("submission failed: {error}");
            let reason = error.to_string();
            session.fail(reason.clone())?;
            sink.push(Notification::destructive("Analysis Failed", reason));
            Ok(())
        }
    }
}

/// Runs one submission synchronously: transition, POST, resolution.
///
/// The desktop shell performs the same steps with the POST on a worker
/// thread; tests drive this entry point with fake transports.
///
/// # Errors
/// Returns [`AppError::Session`] when a submission is already in flight or
/// the session is not awaiting input.
pub fn execute_submission(
    session: &mut CritiqueSession,
    client: &CritiqueClient,
    handoff: &SubmissionHandoff,
    sink: &dyn NotificationSink,
) -> Result<(), AppError> {
    session.begin_submission()?;
    let outcome = perform_submission(client, handoff);
    resolve_submission(session, outcome, handoff.kind, sink)
}

/// Decodes accepted media into its preview representation.
///
/// Every selection gets a `data:` URL of the original bytes. Image media
/// additionally decodes to RGBA pixels for the preview texture; a pixel
/// decode failure degrades to the data URL alone rather than blocking the
/// selection.
pub fn decode_preview(media: &SelectedMedia) -> MediaPreview {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&media.bytes);
    let data_url = format!("data:{};base64,{encoded}", media.mime);

    let image = match media.kind {
        MediaKind::Video => None,
        MediaKind::Image => match image::load_from_memory(&media.bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                Some(PreviewImage {
                    width: rgba.width(),
                    height: rgba.height(),
                    rgba: rgba.into_raw(),
                })
            }
            Err(error) => {
                log::warn!("preview decode failed for {}: {error}", media.file_name);
                None
            }
        },
    };

    MediaPreview { data_url, image }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submission transport or policy error.
    #[error("{0}")]
    Upload(#[from] UploadError),
    /// Critique contract violation.
    #[error("{0}")]
    Contract(#[from] brandlens_contract::ContractError),
    /// Illegal session transition.
    #[error("session error: {0}")]
    Session(#[from] brandlens_ui::SessionError),
}
