#![warn(missing_docs)]
//! # brandlens-core
//!
//! ## Purpose
//! Defines the pure media-selection domain model used across the `brandlens`
//! workspace.
//!
//! ## Responsibilities
//! - Represent candidate and accepted ad media (image or video).
//! - Enforce upload policy (accepted media classes, size cap) at selection.
//! - Provide the fixed brand catalog offered by the analysis service.
//! - Track preview decode tickets so only the latest decode may land.
//!
//! ## Data flow
//! Shell code turns a browsed or dropped file into a [`FileCandidate`].
//! [`UploadPolicy::admit`] validates it into [`SelectedMedia`], and the
//! form controller opens a [`PreviewSlot`] ticket for asynchronous preview
//! decoding.
//!
//! ## Ownership and lifetimes
//! Candidates and selections own their byte buffers (`Vec<u8>`) to avoid
//! borrow coupling between the UI loop and decode/upload workers.
//!
//! ## Error model
//! Selection failures (missing candidate, oversize, unsupported media type)
//! return [`SelectionError`] variants carrying user-presentable detail.
//!
//! ## Example
//! ```rust
//! use brandlens_core::{FileCandidate, MediaKind, UploadPolicy};
//!
//! let candidate = FileCandidate::new("ad.png", vec![0x89, b'P', b'N', b'G']);
//! let media = UploadPolicy::image_and_video().admit(candidate).unwrap();
//! assert_eq!(media.kind, MediaKind::Image);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size cap for the image-only deployment preset.
pub const IMAGE_ONLY_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Size cap for the combined image/video deployment preset.
pub const IMAGE_AND_VIDEO_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Broad media class of an ad file, derived from its MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image ad (`image/*`).
    Image,
    /// Video ad (`video/*`).
    Video,
}

impl MediaKind {
    /// Derives the media kind from a MIME type string.
    ///
    /// Returns `None` for MIME types outside `image/*` and `video/*`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Image)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Returns the lowercase wire name (`"image"` / `"video"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// One brand profile the analysis service knows how to critique against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandProfile {
    /// Stable value submitted to the service.
    pub value: &'static str,
    /// Human-readable label for the brand picker.
    pub label: &'static str,
}

/// Fixed brand catalog offered in the picker.
pub const BRAND_CATALOG: &[BrandProfile] = &[
    BrandProfile {
        value: "nike",
        label: "Nike",
    },
    BrandProfile {
        value: "apple",
        label: "Apple",
    },
    BrandProfile {
        value: "coca-cola",
        label: "Coca-Cola",
    },
];

/// Returns `true` when `value` names a catalog brand.
pub fn is_known_brand(value: &str) -> bool {
    BRAND_CATALOG.iter().any(|brand| brand.value == value)
}

/// Media classes a deployment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAccept {
    /// Only `image/*` files are accepted.
    ImageOnly,
    /// Both `image/*` and `video/*` files are accepted.
    ImageAndVideo,
}

impl MediaAccept {
    fn allows(&self, kind: MediaKind) -> bool {
        match self {
            Self::ImageOnly => kind == MediaKind::Image,
            Self::ImageAndVideo => true,
        }
    }

    /// Returns the supported-format hint shown next to the drop area.
    pub fn format_hint(&self) -> &'static str {
        match self {
            Self::ImageOnly => "Supports: JPG, PNG (Max 10MB)",
            Self::ImageAndVideo => "Supports: JPG, PNG, MP4, MOV, WebM (Max 50MB)",
        }
    }
}

/// Upload acceptance policy: which media classes, up to what size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Accepted media classes.
    pub accept: MediaAccept,
    /// Inclusive size cap in bytes.
    pub max_bytes: usize,
}

impl UploadPolicy {
    /// Image-only preset (10 MiB cap).
    pub fn image_only() -> Self {
        Self {
            accept: MediaAccept::ImageOnly,
            max_bytes: IMAGE_ONLY_MAX_BYTES,
        }
    }

    /// Combined image/video preset (50 MiB cap). The shipped default.
    pub fn image_and_video() -> Self {
        Self {
            accept: MediaAccept::ImageAndVideo,
            max_bytes: IMAGE_AND_VIDEO_MAX_BYTES,
        }
    }

    /// Validates a candidate file into accepted [`SelectedMedia`].
    ///
    /// Size is checked before media class, so an oversize video is reported
    /// as oversize even under the image-only preset.
    ///
    /// # Errors
    /// Returns [`SelectionError::TooLarge`] when the candidate exceeds the
    /// cap and [`SelectionError::UnsupportedMedia`] when its MIME type falls
    /// outside the accepted classes.
    pub fn admit(&self, candidate: FileCandidate) -> Result<SelectedMedia, SelectionError> {
        if candidate.bytes.len() > self.max_bytes {
            return Err(SelectionError::TooLarge {
                limit_bytes: self.max_bytes,
                actual_bytes: candidate.bytes.len(),
            });
        }

        let mime = candidate.mime();
        let kind = MediaKind::from_mime(&mime)
            .filter(|kind| self.accept.allows(*kind))
            .ok_or_else(|| SelectionError::UnsupportedMedia { mime: mime.clone() })?;

        Ok(SelectedMedia {
            file_name: candidate.file_name,
            mime,
            kind,
            bytes: candidate.bytes,
        })
    }
}

/// A file the user picked or dropped, before policy admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Original file name, used for the multipart part and MIME fallback.
    pub file_name: String,
    /// MIME type reported by the source, when it reported one.
    pub declared_mime: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    /// Creates a candidate without a declared MIME type.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            declared_mime: None,
            bytes,
        }
    }

    /// Creates a candidate with a source-declared MIME type.
    pub fn with_mime(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            declared_mime: Some(mime.into()),
            bytes,
        }
    }

    /// Resolves the candidate MIME type.
    ///
    /// Declared type wins; otherwise the content is sniffed, and the file
    /// extension is the last resort. Unrecognized candidates resolve to
    /// `application/octet-stream` and fail policy admission downstream.
    pub fn mime(&self) -> String {
        if let Some(declared) = &self.declared_mime
            && !declared.trim().is_empty()
        {
            return declared.clone();
        }

        if let Some(sniffed) = infer::get(&self.bytes) {
            return sniffed.mime_type().to_string();
        }

        mime_from_extension(&self.file_name)
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

/// An ad file accepted by upload policy, ready for preview and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMedia {
    /// Original file name.
    pub file_name: String,
    /// Resolved MIME type.
    pub mime: String,
    /// Broad media class.
    pub kind: MediaKind,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SelectedMedia {
    /// Returns the file size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Formats a byte count the way the preview caption shows it.
pub fn format_file_size(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exponent])
    } else {
        format!("{rounded} {}", UNITS[exponent])
    }
}

/// Decoded preview of the selected media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPreview {
    /// `data:` URL of the original bytes, previewable in any embedder.
    pub data_url: String,
    /// Decoded pixels for image media; `None` for video media.
    pub image: Option<PreviewImage>,
}

/// Decoded RGBA pixels backing an image preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// RGBA row-major pixel buffer (`width * height * 4` bytes).
    pub rgba: Vec<u8>,
}

/// Ticket identifying one preview decode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket(u64);

/// Holder for at most one decoded preview plus the pending decode ticket.
///
/// Re-selecting a file opens a fresh ticket; a decode completing under a
/// stale ticket is discarded, so the last selection always wins. The held
/// preview is released at most once.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    next_ticket: u64,
    pending: Option<u64>,
    current: Option<MediaPreview>,
}

impl PreviewSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a decode ticket, invalidating any pending decode.
    pub fn begin_decode(&mut self) -> PreviewTicket {
        self.next_ticket += 1;
        self.pending = Some(self.next_ticket);
        PreviewTicket(self.next_ticket)
    }

    /// Completes a decode.
    ///
    /// # Returns
    /// `true` when `ticket` is the pending one and the preview was stored;
    /// `false` when the ticket went stale and the preview was discarded.
    pub fn complete_decode(&mut self, ticket: PreviewTicket, preview: MediaPreview) -> bool {
        if self.pending != Some(ticket.0) {
            return false;
        }

        self.pending = None;
        self.current = Some(preview);
        true
    }

    /// Returns the current preview, if one has landed.
    pub fn preview(&self) -> Option<&MediaPreview> {
        self.current.as_ref()
    }

    /// Returns `true` when a decode is still pending.
    pub fn is_decoding(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the held preview and cancels any pending decode.
    ///
    /// The preview is handed back exactly once; a second release returns
    /// `None`.
    pub fn release(&mut self) -> Option<MediaPreview> {
        self.pending = None;
        self.current.take()
    }
}

/// Error type for media selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No candidate was provided (empty drop payload or cancelled picker).
    #[error("no file was provided")]
    MissingCandidate,
    /// Candidate exceeds the policy size cap.
    #[error("file is {actual_bytes} bytes; limit is {limit_bytes} bytes")]
    TooLarge {
        /// Inclusive policy cap in bytes.
        limit_bytes: usize,
        /// Candidate size in bytes.
        actual_bytes: usize,
    },
    /// Candidate MIME type is outside the accepted classes.
    #[error("unsupported media type: {mime}")]
    UnsupportedMedia {
        /// Resolved candidate MIME type.
        mime: String,
    },
}
