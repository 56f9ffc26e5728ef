#![warn(missing_docs)]
//! # brandlens-ui
//!
//! ## Purpose
//! Defines the client-side runtime state model for `brandlens`: the upload
//! form, the analysis session lifecycle, and the dashboard projection.
//!
//! ## Responsibilities
//! - Hold transient file-selection state and gate submission on it.
//! - Model the session state machine that decides which view is mounted.
//! - Project validated critiques into metric cards with display tones.
//! - Expose an explicit notification sink so controllers stay testable
//!   without a UI runtime.
//!
//! ## Data flow
//! Shell events mutate [`UploadForm`]; a submission hand-off drives
//! [`CritiqueSession`] through `Idle -> Submitting -> Displaying | Failed`;
//! [`metric_cards`] and [`DashboardState`] shape the rendered result.
//!
//! ## Ownership and lifetimes
//! All state values are owned so event handlers and worker callbacks never
//! borrow across frames.
//!
//! ## Error model
//! Illegal session transitions return [`SessionError`]; selection problems
//! surface as notifications plus a `None`/`false` result, leaving state
//! unchanged.

use std::collections::HashSet;
use std::sync::Mutex;

use brandlens_contract::{CritiqueResult, ScoreTone, score_tone};
use brandlens_core::{
    FileCandidate, MediaKind, MediaPreview, PreviewSlot, PreviewTicket, SelectedMedia,
    SelectionError, UploadPolicy, format_file_size, is_known_brand,
};
use thiserror::Error;

/// Visual tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    /// Neutral/positive notice.
    Info,
    /// Problem notice.
    Destructive,
}

/// One user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Display tone.
    pub tone: NoticeTone,
    /// Short headline.
    pub title: String,
    /// One-line detail.
    pub detail: String,
}

impl Notification {
    /// Builds an informational notice.
    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Info,
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Builds a problem notice.
    pub fn destructive(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Destructive,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Sink controllers emit notifications into.
///
/// Shells render these as toasts; tests collect them with [`MemorySink`]
/// and assert on what was emitted.
pub trait NotificationSink {
    /// Accepts one notification.
    fn push(&self, notice: Notification);
}

/// In-memory sink backing both the shell toast queue and test assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    notices: Mutex<Vec<Notification>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all queued notifications in emission order.
    pub fn drain(&self) -> Vec<Notification> {
        match self.notices.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(_) => Vec::new(),
        }
    }

    /// Returns the number of queued notifications.
    pub fn len(&self) -> usize {
        self.notices.lock().map(|notices| notices.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn push(&self, notice: Notification) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// The `(file, brand, mediaType)` triple handed to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandoff {
    /// Accepted ad media.
    pub media: SelectedMedia,
    /// Brand value, verbatim from the picker.
    pub brand: String,
    /// Media class, derived from the MIME prefix at selection time.
    pub kind: MediaKind,
}

/// Transient upload-form state: brand, file, preview, drag flag.
///
/// Owns everything the awaiting-input view needs; the session controller
/// owns everything after hand-off.
#[derive(Debug)]
pub struct UploadForm {
    policy: UploadPolicy,
    brand: Option<String>,
    media: Option<SelectedMedia>,
    preview: PreviewSlot,
    dragging: bool,
}

impl UploadForm {
    /// Creates an empty form under the given upload policy.
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            brand: None,
            media: None,
            preview: PreviewSlot::new(),
            dragging: false,
        }
    }

    /// Returns the active upload policy.
    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    /// Returns the selected brand value, if any.
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    /// Returns the accepted media, if any.
    pub fn media(&self) -> Option<&SelectedMedia> {
        self.media.as_ref()
    }

    /// Returns the landed preview, if any.
    pub fn preview(&self) -> Option<&MediaPreview> {
        self.preview.preview()
    }

    /// Returns `true` while a preview decode is pending.
    pub fn is_decoding_preview(&self) -> bool {
        self.preview.is_decoding()
    }

    /// Stores a brand selection verbatim.
    ///
    /// Membership in the fixed catalog is the only check; an unknown value
    /// is ignored and leaves the selection unchanged.
    pub fn select_brand(&mut self, value: &str) -> bool {
        if !is_known_brand(value) {
            log::warn!("ignoring unknown brand value {value:?}");
            return false;
        }

        self.brand = Some(value.to_string());
        true
    }

    /// Validates and stores a candidate file.
    ///
    /// Rejection (absent candidate, oversize, unsupported type) emits a
    /// notification and leaves the stored file, preview, and brand
    /// untouched. Acceptance stores the media and opens a fresh preview
    /// decode ticket, invalidating any decode still in flight.
    pub fn select_file(
        &mut self,
        candidate: Option<FileCandidate>,
        sink: &dyn NotificationSink,
    ) -> Option<PreviewTicket> {
        let Some(candidate) = candidate else {
            sink.push(Notification::destructive(
                "No file provided",
                "The selection did not contain a usable file",
            ));
            return None;
        };

        match self.policy.admit(candidate) {
            Ok(media) => {
                log::info!(
                    "accepted {} ({}, {})",
                    media.file_name,
                    media.mime,
                    format_file_size(media.size_bytes())
                );
                self.media = Some(media);
                Some(self.preview.begin_decode())
            }
            Err(error) => {
                sink.push(rejection_notice(&error, self.policy));
                None
            }
        }
    }

    /// Completes a preview decode; stale tickets are discarded.
    pub fn complete_preview(&mut self, ticket: PreviewTicket, preview: MediaPreview) -> bool {
        self.preview.complete_decode(ticket, preview)
    }

    /// Sets the purely visual dragging flag.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Returns the dragging flag.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Produces the submission hand-off when the form is complete.
    ///
    /// With brand or file unset this emits a "Missing information" notice
    /// and returns `None`; the analysis callback is never reached.
    pub fn submission(&self, sink: &dyn NotificationSink) -> Option<SubmissionHandoff> {
        match (&self.media, &self.brand) {
            (Some(media), Some(brand)) => Some(SubmissionHandoff {
                media: media.clone(),
                brand: brand.clone(),
                kind: media.kind,
            }),
            _ => {
                sink.push(Notification::destructive(
                    "Missing information",
                    "Please select a brand and upload a file",
                ));
                None
            }
        }
    }

    /// Clears the form and releases the preview resource.
    ///
    /// The preview is handed back exactly once; repeated resets return
    /// `None` for it.
    pub fn reset(&mut self) -> Option<MediaPreview> {
        self.brand = None;
        self.media = None;
        self.dragging = false;
        self.preview.release()
    }
}

fn rejection_notice(error: &SelectionError, policy: UploadPolicy) -> Notification {
    match error {
        SelectionError::MissingCandidate => Notification::destructive(
            "No file provided",
            "The selection did not contain a usable file",
        ),
        SelectionError::TooLarge { limit_bytes, .. } => Notification::destructive(
            "File too large",
            format!("File size must be under {}", format_file_size(*limit_bytes)),
        ),
        SelectionError::UnsupportedMedia { .. } => Notification::destructive(
            "Invalid file type",
            match policy.accept {
                brandlens_core::MediaAccept::ImageOnly => {
                    "Please upload an image file (jpg, png)".to_string()
                }
                brandlens_core::MediaAccept::ImageAndVideo => {
                    "Please upload JPG, PNG, MP4, MOV, or WebM".to_string()
                }
            },
        ),
    }
}

/// Session lifecycle phase; decides which view is mounted.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Awaiting input; the upload form is mounted.
    Idle,
    /// Submission in flight; further submissions are rejected.
    Submitting,
    /// Validated critique on screen; the dashboard is mounted.
    Displaying(CritiqueResult),
    /// Terminal failure for this attempt; the form is mounted again with
    /// the reason.
    Failed(String),
}

/// Which top-level view a session state mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountedView {
    /// The upload form (awaiting input, in flight, or failed).
    UploadForm,
    /// The results dashboard.
    Dashboard,
}

impl SessionState {
    /// Returns the view this state mounts.
    pub fn mounted_view(&self) -> MountedView {
        match self {
            Self::Displaying(_) => MountedView::Dashboard,
            _ => MountedView::UploadForm,
        }
    }
}

/// State machine owning the request lifecycle.
///
/// Legal transitions: `Idle -> Submitting -> Displaying | Failed`, then
/// back to `Idle` on explicit reset. At most one submission is in flight
/// by construction.
#[derive(Debug)]
pub struct CritiqueSession {
    state: SessionState,
}

impl CritiqueSession {
    /// Creates a session in `Idle`.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting)
    }

    /// Enters `Submitting`.
    ///
    /// # Errors
    /// Returns [`SessionError::SubmissionInFlight`] while already
    /// submitting and [`SessionError::NotAwaitingInput`] from the
    /// displaying/failed states (reset first).
    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Submitting;
                Ok(())
            }
            SessionState::Submitting => Err(SessionError::SubmissionInFlight),
            _ => Err(SessionError::NotAwaitingInput),
        }
    }

    /// Lands a validated critique.
    ///
    /// # Errors
    /// Returns [`SessionError::NotSubmitting`] unless a submission is in
    /// flight.
    pub fn complete(&mut self, result: CritiqueResult) -> Result<(), SessionError> {
        if !self.is_submitting() {
            return Err(SessionError::NotSubmitting);
        }

        self.state = SessionState::Displaying(result);
        Ok(())
    }

    /// Records a failed submission with its user-visible reason.
    ///
    /// # Errors
    /// Returns [`SessionError::NotSubmitting`] unless a submission is in
    /// flight.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        if !self.is_submitting() {
            return Err(SessionError::NotSubmitting);
        }

        self.state = SessionState::Failed(reason.into());
        Ok(())
    }

    /// Explicit user reset back to `Idle`.
    ///
    /// # Errors
    /// Returns [`SessionError::SubmissionInFlight`] while submitting; the
    /// in-flight request has no cancellation, so the state cannot be
    /// abandoned under it.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_submitting() {
            return Err(SessionError::SubmissionInFlight);
        }

        self.state = SessionState::Idle;
        Ok(())
    }
}

impl Default for CritiqueSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Illegal session transition attempts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A submission is already in flight.
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    /// No submission is in flight to resolve.
    #[error("no submission is in flight")]
    NotSubmitting,
    /// Session is displaying or failed; reset before submitting again.
    #[error("session is not awaiting input")]
    NotAwaitingInput,
}

/// Identity of one metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    /// Brand alignment card.
    BrandAlignment,
    /// Visual quality card.
    VisualQuality,
    /// Message clarity card.
    MessageClarity,
    /// Safety & ethics card.
    SafetyEthics,
    /// Audio quality card (video critiques only).
    AudioQuality,
}

impl MetricKey {
    /// Returns the card heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BrandAlignment => "Brand Alignment",
            Self::VisualQuality => "Visual Quality",
            Self::MessageClarity => "Message Clarity",
            Self::SafetyEthics => "Safety & Ethics",
            Self::AudioQuality => "Audio Quality",
        }
    }
}

/// One projected metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    /// Card identity, used for expand/collapse state.
    pub key: MetricKey,
    /// Card heading.
    pub title: &'static str,
    /// Metric score.
    pub score: f64,
    /// Written feedback shown in the expanded detail view.
    pub feedback: String,
    /// Display tone from the shared banding rule.
    pub tone: ScoreTone,
}

/// Projects a validated critique into its metric cards.
///
/// Pure function of the result: four fixed cards, plus the audio card only
/// when the critique is for video and carries the audio section.
pub fn metric_cards(result: &CritiqueResult) -> Vec<MetricCard> {
    let mut cards = vec![
        card(MetricKey::BrandAlignment, &result.brand_alignment),
        card(MetricKey::VisualQuality, &result.visual_quality),
        card(MetricKey::MessageClarity, &result.message_clarity),
        card(MetricKey::SafetyEthics, &result.safety_ethics),
    ];

    if result.has_audio_card()
        && let Some(audio) = &result.audio_quality
    {
        cards.push(MetricCard {
            key: MetricKey::AudioQuality,
            title: MetricKey::AudioQuality.title(),
            score: audio.score,
            feedback: audio.feedback.clone(),
            tone: score_tone(audio.score),
        });
    }

    cards
}

fn card(key: MetricKey, metric: &brandlens_contract::MetricReview) -> MetricCard {
    MetricCard {
        key,
        title: key.title(),
        score: metric.score,
        feedback: metric.feedback.clone(),
        tone: score_tone(metric.score),
    }
}

/// Tab selector for the strengths/issues/suggestions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsightTab {
    /// What the ad does well.
    #[default]
    Strengths,
    /// Problems found.
    Issues,
    /// Actionable suggestions.
    Suggestions,
}

/// Local dashboard toggle state.
///
/// Expansion and JSON visibility live here, not in the result; reset
/// discards all of it.
#[derive(Debug, Default)]
pub struct DashboardState {
    expanded: HashSet<MetricKey>,
    json_shown: bool,
    tab: InsightTab,
}

impl DashboardState {
    /// Creates collapsed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles one card's expanded detail view.
    pub fn toggle_details(&mut self, key: MetricKey) {
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    /// Returns `true` when a card's detail view is expanded.
    pub fn is_expanded(&self, key: MetricKey) -> bool {
        self.expanded.contains(&key)
    }

    /// Toggles the raw-JSON panel.
    pub fn toggle_json(&mut self) {
        self.json_shown = !self.json_shown;
    }

    /// Returns `true` when the raw-JSON panel is shown.
    pub fn json_shown(&self) -> bool {
        self.json_shown
    }

    /// Switches the insight tab.
    pub fn select_tab(&mut self, tab: InsightTab) {
        self.tab = tab;
    }

    /// Returns the active insight tab.
    pub fn tab(&self) -> InsightTab {
        self.tab
    }

    /// Discards all toggle state (runs on session reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
