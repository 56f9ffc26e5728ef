//! Egui desktop shell: upload form, results dashboard, and toast rendering.
//!
//! All semantics live in the library crates; this module wires shell events
//! into the form/session controllers and paints their state. Network and
//! preview work runs on worker threads that report back over channels, so
//! the UI loop never blocks.

use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::time::{Duration, Instant};

use brandlens_app::{
    AppConfig, AppError, decode_preview, perform_submission, resolve_submission,
};
use brandlens_contract::{CritiqueResult, ScoreTone, score_tone};
use brandlens_core::{
    BRAND_CATALOG, FileCandidate, MediaAccept, MediaKind, MediaPreview, PreviewTicket,
    format_file_size,
};
use brandlens_ui::{
    CritiqueSession, DashboardState, InsightTab, MemorySink, MetricCard, MountedView,
    NoticeTone, Notification, NotificationSink, SessionState, UploadForm, metric_cards,
};
use brandlens_upload::CritiqueClient;
use egui::{Align2, Color32, FontId, Pos2, RichText, Stroke, vec2};

const TOAST_TTL: Duration = Duration::from_secs(4);
const PREVIEW_MAX_SIZE: egui::Vec2 = egui::Vec2::new(460.0, 340.0);

struct SubmissionWorker {
    kind: MediaKind,
    rx: Receiver<Result<CritiqueResult, AppError>>,
}

struct PreviewWorker {
    ticket: PreviewTicket,
    rx: Receiver<MediaPreview>,
}

struct ActiveToast {
    notice: Notification,
    shown_at: Instant,
}

/// Top-level egui application state.
pub struct BrandlensShell {
    client: CritiqueClient,
    form: UploadForm,
    session: CritiqueSession,
    dashboard: DashboardState,
    sink: MemorySink,
    toasts: Vec<ActiveToast>,
    submission: Option<SubmissionWorker>,
    preview: Option<PreviewWorker>,
    preview_texture: Option<egui::TextureHandle>,
    json_view: Option<String>,
}

impl BrandlensShell {
    /// Builds the shell from environment configuration.
    pub fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env();
        log::info!(
            "analysis endpoint {} (timeout {}s)",
            config.base_url,
            config.timeout.as_secs()
        );
        let client = config.build_client()?;

        Ok(Self {
            form: UploadForm::new(config.policy),
            client,
            session: CritiqueSession::new(),
            dashboard: DashboardState::new(),
            sink: MemorySink::new(),
            toasts: Vec::new(),
            submission: None,
            preview: None,
            preview_texture: None,
            json_view: None,
        })
    }

    fn poll_preview(&mut self, ctx: &egui::Context) {
        let Some(worker) = &self.preview else { return };

        match worker.rx.try_recv() {
            Ok(decoded) => {
                let ticket = worker.ticket;
                self.preview = None;
                if self.form.complete_preview(ticket, decoded)
                    && let Some(image) = self.form.preview().and_then(|p| p.image.as_ref())
                {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width as usize, image.height as usize],
                        &image.rgba,
                    );
                    self.preview_texture = Some(ctx.load_texture(
                        "ad_preview",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::warn!("preview worker stopped without a result");
                self.preview = None;
            }
        }
    }

    fn poll_submission(&mut self) {
        let Some(worker) = &self.submission else { return };

        let resolved = match worker.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AppError::Upload(
                brandlens_upload::UploadError::Network(
                    "analysis worker stopped unexpectedly".to_string(),
                ),
            ))),
        };

        if let Some(outcome) = resolved {
            let kind = worker.kind;
            self.submission = None;
            if let Err(error) = resolve_submission(&mut self.session, outcome, kind, &self.sink) {
                log::error!("could not resolve submission: {error}");
            }
            if let SessionState::Displaying(result) = self.session.state() {
                self.json_view = result.to_pretty_json().ok();
                self.dashboard.reset();
            }
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        if self.session.state().mounted_view() != MountedView::UploadForm {
            return;
        }

        let (hovering, dropped) =
            ctx.input(|input| (!input.raw.hovered_files.is_empty(), input.raw.dropped_files.clone()));
        self.form.set_dragging(hovering);

        // First file only; the rest of the drop payload is ignored.
        if let Some(first) = dropped.into_iter().next() {
            self.select_candidate(candidate_from_drop(first));
        }
    }

    fn select_candidate(&mut self, candidate: Option<FileCandidate>) {
        let Some(ticket) = self.form.select_file(candidate, &self.sink) else {
            return;
        };

        self.preview_texture = None;
        if let Some(media) = self.form.media().cloned() {
            let (tx, rx) = channel();
            self.preview = Some(PreviewWorker { ticket, rx });
            std::thread::spawn(move || {
                let _ = tx.send(decode_preview(&media));
            });
        }
    }

    fn browse_for_file(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter(
            "Images",
            &["jpg", "jpeg", "png", "gif", "webp", "bmp"],
        );
        if self.form.policy().accept == MediaAccept::ImageAndVideo {
            dialog = dialog.add_filter("Videos", &["mp4", "m4v", "mov", "webm"]);
        }

        let Some(path) = dialog.pick_file() else {
            return;
        };

        let candidate = match std::fs::read(&path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "upload".to_string());
                Some(FileCandidate::new(name, bytes))
            }
            Err(error) => {
                log::error!("could not read {}: {error}", path.display());
                None
            }
        };
        self.select_candidate(candidate);
    }

    fn start_submission(&mut self) {
        let Some(handoff) = self.form.submission(&self.sink) else {
            return;
        };

        // A manual retry from the failed state is an implicit reset.
        if matches!(self.session.state(), SessionState::Failed(_)) {
            let _ = self.session.reset();
        }

        if let Err(error) = self.session.begin_submission() {
            log::warn!("submission rejected: {error}");
            return;
        }

        let client = self.client.clone();
        let kind = handoff.kind;
        let (tx, rx) = channel();
        self.submission = Some(SubmissionWorker { kind, rx });
        std::thread::spawn(move || {
            let _ = tx.send(perform_submission(&client, &handoff));
        });
    }

    fn reset_session(&mut self) {
        if self.session.reset().is_err() {
            return;
        }

        // Preview resource is handed back exactly once and dropped here.
        let _released = self.form.reset();
        self.dashboard.reset();
        self.preview_texture = None;
        self.json_view = None;
        log::info!("session reset to awaiting input");
    }

    fn upload_view(&mut self, ui: &mut egui::Ui) {
        let failure = match self.session.state() {
            SessionState::Failed(reason) => Some(reason.clone()),
            _ => None,
        };
        if let Some(reason) = failure {
            egui::Frame::group(ui.style())
                .fill(Color32::from_rgb(60, 24, 24))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(tone_color(ScoreTone::Destructive), "Analysis failed:");
                        ui.label(reason);
                        if ui.small_button("Dismiss").clicked() {
                            let _ = self.session.reset();
                        }
                    });
                });
            ui.add_space(8.0);
        }

        ui.label("Select Brand");
        let selected_label = self
            .form
            .brand()
            .and_then(|value| BRAND_CATALOG.iter().find(|b| b.value == value))
            .map(|b| b.label.to_string())
            .unwrap_or_else(|| "Choose a brand to analyze...".to_string());
        egui::ComboBox::from_id_source("brand_picker")
            .selected_text(selected_label)
            .width(260.0)
            .show_ui(ui, |ui| {
                for brand in BRAND_CATALOG {
                    let selected = self.form.brand() == Some(brand.value);
                    if ui.selectable_label(selected, brand.label).clicked() {
                        self.form.select_brand(brand.value);
                    }
                }
            });

        ui.add_space(12.0);
        let drop_stroke = if self.form.is_dragging() {
            Stroke::new(2.0, Color32::from_rgb(99, 102, 241))
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };
        egui::Frame::group(ui.style())
            .stroke(drop_stroke)
            .inner_margin(egui::Margin::same(24.0))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let prompt = match self.form.policy().accept {
                        MediaAccept::ImageOnly => "Drag and drop your ad image here",
                        MediaAccept::ImageAndVideo => "Drag and drop your ad image or video here",
                    };
                    ui.strong(prompt);
                    ui.small("or");
                    if ui.button("Browse Files").clicked() {
                        self.browse_for_file();
                    }
                    ui.add_space(4.0);
                    ui.weak(self.form.policy().accept.format_hint());
                });
            });

        if let Some(media) = self.form.media() {
            let caption = format!(
                "{} • {} • {}",
                media.file_name,
                media.kind.as_str(),
                format_file_size(media.size_bytes())
            );
            let kind = media.kind;
            ui.add_space(12.0);
            ui.label("Preview");
            ui.weak(caption);
            if let Some(texture) = &self.preview_texture {
                ui.add(egui::Image::new(texture).max_size(PREVIEW_MAX_SIZE));
            } else if self.form.is_decoding_preview() {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.weak("Decoding preview...");
                });
            } else if kind == MediaKind::Video {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label("🎬 Video selected; playback preview is not rendered here.");
                });
            }
        }

        ui.add_space(16.0);
        let submitting = self.session.is_submitting();
        let ready = self.form.brand().is_some() && self.form.media().is_some();
        let is_video = self.form.media().map(|m| m.kind) == Some(MediaKind::Video);
        let label = if submitting {
            if is_video {
                "Analyzing video with AI... This may take up to 30 seconds"
            } else {
                "Analyzing image with AI..."
            }
        } else {
            "Analyze Ad"
        };

        ui.horizontal(|ui| {
            if ui
                .add_enabled(ready && !submitting, egui::Button::new(label))
                .clicked()
            {
                self.start_submission();
            }
            if submitting {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn dashboard_view(&mut self, ui: &mut egui::Ui) {
        let SessionState::Displaying(result) = self.session.state() else {
            return;
        };
        let result = result.clone();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                self.media_column(&mut columns[0], &result);
                self.scores_column(&mut columns[1], &result);
            });
        });
    }

    fn media_column(&mut self, ui: &mut egui::Ui, result: &CritiqueResult) {
        let brand_label = BRAND_CATALOG
            .iter()
            .find(|b| b.value == result.brand)
            .map(|b| b.label.to_string())
            .unwrap_or_else(|| result.brand.clone());
        ui.heading(format!("{brand_label} Ad"));
        ui.add_space(8.0);
        if let Some(texture) = &self.preview_texture {
            ui.add(egui::Image::new(texture).max_size(PREVIEW_MAX_SIZE));
        } else if let Some(media) = self.form.media() {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label(format!(
                    "🎬 {} ({})",
                    media.file_name,
                    format_file_size(media.size_bytes())
                ));
            });
        }
    }

    fn scores_column(&mut self, ui: &mut egui::Ui, result: &CritiqueResult) {
        ui.vertical_centered(|ui| draw_overall_gauge(ui, result.overall_score));
        ui.add_space(12.0);

        for card in metric_cards(result) {
            self.metric_card(ui, &card, result);
            ui.add_space(6.0);
        }

        ui.add_space(8.0);
        self.insight_tabs(ui, result);
        ui.add_space(8.0);
        self.json_panel(ui);
        ui.add_space(12.0);

        if ui.button("⟲ Analyze Another Ad").clicked() {
            self.reset_session();
        }
    }

    fn metric_card(&mut self, ui: &mut egui::Ui, card: &MetricCard, result: &CritiqueResult) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(card.title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{:.0}", card.score))
                            .size(20.0)
                            .color(tone_color(card.tone)),
                    );
                });
            });
            ui.add(
                egui::ProgressBar::new((card.score / 100.0).clamp(0.0, 1.0) as f32)
                    .fill(tone_color(card.tone)),
            );

            let expanded = self.dashboard.is_expanded(card.key);
            let toggle = if expanded { "Details ⏶" } else { "Details ⏷" };
            if ui.small_button(toggle).clicked() {
                self.dashboard.toggle_details(card.key);
            }
            if expanded {
                ui.label(&card.feedback);
                if card.key == brandlens_ui::MetricKey::AudioQuality
                    && let Some(audio) = &result.audio_quality
                {
                    ui.separator();
                    for (heading, text) in [
                        ("Voice Analysis", &audio.voice_analysis),
                        ("Music Analysis", &audio.music_analysis),
                        ("Sound Effects", &audio.sound_effects),
                        ("Sync Quality", &audio.sync_quality),
                    ] {
                        ui.strong(heading);
                        ui.label(text);
                    }
                }
            }
        });
    }

    fn insight_tabs(&mut self, ui: &mut egui::Ui, result: &CritiqueResult) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                for (tab, label) in [
                    (InsightTab::Strengths, "Strengths"),
                    (InsightTab::Issues, "Issues"),
                    (InsightTab::Suggestions, "Suggestions"),
                ] {
                    if ui
                        .selectable_label(self.dashboard.tab() == tab, label)
                        .clicked()
                    {
                        self.dashboard.select_tab(tab);
                    }
                }
            });
            ui.separator();

            let (marker, entries) = match self.dashboard.tab() {
                InsightTab::Strengths => ("✓", &result.strengths),
                InsightTab::Issues => ("✕", &result.issues),
                InsightTab::Suggestions => ("💡", &result.suggestions),
            };
            for entry in entries {
                ui.horizontal_wrapped(|ui| {
                    ui.label(marker);
                    ui.label(entry);
                });
            }
        });
    }

    fn json_panel(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            let toggle = if self.dashboard.json_shown() {
                "View JSON ⏶"
            } else {
                "View JSON ⏷"
            };
            if ui.button(toggle).clicked() {
                self.dashboard.toggle_json();
            }

            if self.dashboard.json_shown()
                && let Some(json) = &self.json_view
            {
                if ui.small_button("Copy").clicked() {
                    ui.ctx().output_mut(|out| out.copied_text = json.clone());
                    self.sink.push(Notification::info(
                        "Copied!",
                        "JSON data copied to clipboard",
                    ));
                }
                egui::ScrollArea::both().max_height(260.0).show(ui, |ui| {
                    ui.monospace(json);
                });
            }
        });
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        for notice in self.sink.drain() {
            self.toasts.push(ActiveToast {
                notice,
                shown_at: Instant::now(),
            });
        }
        self.toasts.retain(|toast| toast.shown_at.elapsed() < TOAST_TTL);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(Align2::RIGHT_TOP, vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let accent = match toast.notice.tone {
                        NoticeTone::Info => Color32::from_rgb(34, 197, 94),
                        NoticeTone::Destructive => Color32::from_rgb(239, 68, 68),
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(Stroke::new(1.0, accent))
                        .show(ui, |ui| {
                            ui.strong(&toast.notice.title);
                            ui.weak(&toast.notice.detail);
                        });
                    ui.add_space(6.0);
                }
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for BrandlensShell {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_preview(ctx);
        self.poll_submission();
        self.handle_file_drops(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("brandlens — AI Ad Critique");
                ui.weak("Upload your ad and get instant AI-powered brand analysis");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.session.state().mounted_view() {
                MountedView::UploadForm => self.upload_view(ui),
                MountedView::Dashboard => self.dashboard_view(ui),
            }
        });

        self.show_toasts(ctx);

        if self.submission.is_some() || self.preview.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn candidate_from_drop(file: egui::DroppedFile) -> Option<FileCandidate> {
    let name = file
        .path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.name.clone());

    let bytes = match (&file.bytes, &file.path) {
        (Some(bytes), _) => Some(bytes.to_vec()),
        (None, Some(path)) => match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                log::error!("could not read dropped file {}: {error}", path.display());
                None
            }
        },
        (None, None) => None,
    }?;

    if file.mime.trim().is_empty() {
        Some(FileCandidate::new(name, bytes))
    } else {
        Some(FileCandidate::with_mime(name, file.mime.clone(), bytes))
    }
}

fn tone_color(tone: ScoreTone) -> Color32 {
    match tone {
        ScoreTone::Success => Color32::from_rgb(34, 197, 94),
        ScoreTone::Warning => Color32::from_rgb(234, 179, 8),
        ScoreTone::Destructive => Color32::from_rgb(239, 68, 68),
    }
}

fn draw_overall_gauge(ui: &mut egui::Ui, score: f64) {
    let (rect, _) = ui.allocate_exact_size(vec2(150.0, 150.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = 58.0;
    let tone = score_tone(score);

    painter.circle_stroke(
        center,
        radius,
        Stroke::new(9.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
    );

    let frac = (score / 100.0).clamp(0.0, 1.0) as f32;
    if frac > 0.0 {
        let start = -std::f32::consts::FRAC_PI_2;
        let sweep = frac * std::f32::consts::TAU;
        let steps = ((64.0 * frac).ceil() as usize).max(2);
        let points: Vec<Pos2> = (0..=steps)
            .map(|i| {
                let angle = start + sweep * i as f32 / steps as f32;
                center + radius * vec2(angle.cos(), angle.sin())
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(9.0, tone_color(tone))));
    }

    painter.text(
        center,
        Align2::CENTER_CENTER,
        format!("{score:.0}"),
        FontId::proportional(34.0),
        tone_color(tone),
    );
    painter.text(
        center + vec2(0.0, 30.0),
        Align2::CENTER_CENTER,
        "Overall Score",
        FontId::proportional(11.0),
        ui.visuals().weak_text_color(),
    );
}
