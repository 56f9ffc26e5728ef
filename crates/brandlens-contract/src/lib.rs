#![warn(missing_docs)]
//! # brandlens-contract
//!
//! ## Purpose
//! Defines the critique response schema returned by the analysis service and
//! the client-side boundary validation for it.
//!
//! ## Responsibilities
//! - Parse critique response payloads into a validated [`CritiqueResult`].
//! - Report every missing required field together, not just the first.
//! - Map scores to display tones used by the dashboard.
//! - Render the verbatim pretty-printed JSON view of a result.
//!
//! ## Data flow
//! Raw HTTP body -> [`parse_critique_response`] -> session controller ->
//! dashboard projection.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs so nothing borrows from transient network
//! buffers.
//!
//! ## Error model
//! Invalid JSON, non-object bodies, and missing mandatory fields return
//! [`ContractError`]. Validation happens once at the HTTP boundary; only
//! fully validated results travel inward.

use brandlens_core::MediaKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields a critique response must carry to be displayable.
pub const REQUIRED_FIELDS: &[&str] = &[
    "brand_alignment",
    "visual_quality",
    "message_clarity",
    "safety_ethics",
    "overall_score",
    "strengths",
    "issues",
    "suggestions",
];

/// One scored metric with its written feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReview {
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Two-to-three sentence explanation of the score.
    pub feedback: String,
}

/// Audio metric returned only for video ads.
///
/// Carries the per-channel breakdown on top of the common score/feedback
/// pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioReview {
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Overall audio feedback.
    pub feedback: String,
    /// Voice-over assessment.
    pub voice_analysis: String,
    /// Music bed assessment.
    pub music_analysis: String,
    /// Sound-effect assessment.
    pub sound_effects: String,
    /// Audio/visual sync assessment.
    pub sync_quality: String,
}

/// Validated critique returned by the analysis service for one submitted ad.
///
/// This is the canonical nested per-metric shape; `brand` and `media_type`
/// are tolerated as absent because the image-only service generation omits
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResult {
    /// Brand the ad was critiqued against.
    #[serde(default)]
    pub brand: String,
    /// Average of the metric scores, in `[0, 100]`.
    pub overall_score: f64,
    /// Media class the service analyzed.
    #[serde(default = "default_media_kind")]
    pub media_type: MediaKind,
    /// Brand alignment metric.
    pub brand_alignment: MetricReview,
    /// Visual quality metric.
    pub visual_quality: MetricReview,
    /// Message clarity metric.
    pub message_clarity: MetricReview,
    /// Safety and ethics metric.
    pub safety_ethics: MetricReview,
    /// Audio metric, present only for video critiques.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_quality: Option<AudioReview>,
    /// What the ad does well.
    pub strengths: Vec<String>,
    /// Problems found in the ad.
    pub issues: Vec<String>,
    /// Actionable improvement suggestions.
    pub suggestions: Vec<String>,
}

fn default_media_kind() -> MediaKind {
    MediaKind::Image
}

impl CritiqueResult {
    /// Returns `true` when the dashboard should show the audio card.
    ///
    /// The card exists only for video critiques that actually carry the
    /// audio section; a video critique without one renders without the card.
    pub fn has_audio_card(&self) -> bool {
        self.media_type == MediaKind::Video && self.audio_quality.is_some()
    }

    /// Renders the verbatim JSON view of the result (2-space indent).
    ///
    /// # Errors
    /// Returns [`ContractError::Decode`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, ContractError> {
        serde_json::to_string_pretty(self).map_err(ContractError::Decode)
    }
}

/// Parses and validates a raw critique response body.
///
/// The shape check runs against the decoded JSON object before any typed
/// deserialization, so every absent required field is collected and
/// reported in one [`ContractError::MissingFields`] value.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON or mistyped fields,
/// [`ContractError::NotAnObject`] for non-object bodies, and
/// [`ContractError::MissingFields`] when required fields are absent.
pub fn parse_critique_response(raw: &str) -> Result<CritiqueResult, ContractError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ContractError::Decode)?;

    let Some(object) = value.as_object() else {
        return Err(ContractError::NotAnObject);
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ContractError::MissingFields(missing));
    }

    serde_json::from_value(value).map_err(ContractError::Decode)
}

/// Display tone for a score, shared by the overall gauge and every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTone {
    /// Strong result (score >= 76).
    Success,
    /// Mixed result (51 <= score <= 75).
    Warning,
    /// Weak result (score <= 50).
    Destructive,
}

/// Maps a score to its display tone.
pub fn score_tone(score: f64) -> ScoreTone {
    if score >= 76.0 {
        ScoreTone::Success
    } else if score >= 51.0 {
        ScoreTone::Warning
    } else {
        ScoreTone::Destructive
    }
}

/// Critique contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode or encode failure, including mistyped fields.
    #[error("critique decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Response body was valid JSON but not an object.
    #[error("server returned a non-object critique body")]
    NotAnObject,
    /// Response object lacks required fields; all of them are listed.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}
