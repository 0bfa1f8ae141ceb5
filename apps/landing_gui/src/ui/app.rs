use std::{
    collections::{HashMap, VecDeque},
    time::Instant,
};

use capture_core::{CaptureSession, EndpointSettings, SubmitAdmission};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{RichText, TextureHandle};
use shared::{
    domain::{CaptureStatus, SessionSlot, SubmissionId},
    error::CaptureError,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::{GifPlayback, PreloadGate, HERO_GIF_URL, VIBE_GIF_URLS};
use crate::ui::copy::{self, FormCopy};
use crate::ui::layout::{break_lines, LayoutMetrics, ViewportSignal};
use crate::ui::theme::{apply_landing_style, LandingPalette};

const GIF_ASPECT: f32 = 10.0 / 16.0;
const FORM_CONTROL_HEIGHT: f32 = 48.0;

struct CaptureForm {
    session: CaptureSession,
    /// Id of the submission the worker is currently running for this form.
    pending: Option<SubmissionId>,
}

impl CaptureForm {
    fn new(slot: SessionSlot, settings: &EndpointSettings) -> Self {
        Self {
            session: CaptureSession::new(slot, settings.success_display_interval()),
            pending: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingAlert {
    pub(crate) slot: SessionSlot,
    pub(crate) message: &'static str,
}

enum GifState {
    Loading,
    Ready {
        playback: GifPlayback,
        texture: Option<TextureHandle>,
    },
    Failed(String),
}

pub struct LandingApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    forms: [CaptureForm; 2],
    alerts: VecDeque<PendingAlert>,
    viewport: ViewportSignal,
    vibe_preload: PreloadGate,
    gifs: HashMap<String, GifState>,
    status: String,
    backend_error: Option<String>,
    palette: LandingPalette,
    style_applied: bool,
}

impl LandingApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &EndpointSettings,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            forms: SessionSlot::ALL.map(|slot| CaptureForm::new(slot, settings)),
            alerts: VecDeque::new(),
            viewport: ViewportSignal::default(),
            vibe_preload: PreloadGate::default(),
            gifs: HashMap::new(),
            status: "Starting...".to_string(),
            backend_error: None,
            palette: LandingPalette::dark(),
            style_applied: false,
        };
        app.request_gifs(&[HERO_GIF_URL]);
        app
    }

    pub(crate) fn session(&self, slot: SessionSlot) -> &CaptureSession {
        &self.forms[slot.index()].session
    }

    pub(crate) fn session_mut(&mut self, slot: SessionSlot) -> &mut CaptureSession {
        &mut self.forms[slot.index()].session
    }

    /// Latest backend worker status, shown under the footer.
    pub(crate) fn status_line(&self) -> &str {
        &self.status
    }

    pub(crate) fn current_alert(&self) -> Option<&PendingAlert> {
        self.alerts.front()
    }

    pub(crate) fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub(crate) fn submit(&mut self, slot: SessionSlot) {
        let admission = self.forms[slot.index()].session.begin_submit();
        match admission {
            Ok(SubmitAdmission::InFlight) => {
                tracing::debug!(%slot, "submission already in flight; ignoring");
            }
            Ok(SubmitAdmission::Accepted { email }) => {
                let submission_id = SubmissionId::new();
                self.forms[slot.index()].pending = Some(submission_id);
                tracing::info!(%slot, %submission_id, "submission accepted");
                let cmd = BackendCommand::Subscribe {
                    slot,
                    submission_id,
                    email,
                };
                if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
                    self.finish_submission(
                        slot,
                        submission_id,
                        Err(CaptureError::Submission(err.to_string())),
                        Instant::now(),
                    );
                }
            }
            Err(err) => {
                tracing::debug!(%slot, detail = err.detail(), "rejected candidate email");
                self.raise_alert(slot, &err);
            }
        }
    }

    fn finish_submission(
        &mut self,
        slot: SessionSlot,
        submission_id: SubmissionId,
        outcome: Result<(), CaptureError>,
        now: Instant,
    ) {
        let form = &mut self.forms[slot.index()];
        if form.pending != Some(submission_id) {
            tracing::debug!(%slot, %submission_id, "dropping outcome of a stale submission");
            return;
        }
        form.pending = None;
        match form.session.finish(outcome, now) {
            Ok(()) => tracing::info!(%slot, %submission_id, "subscribed"),
            Err(err) => {
                tracing::warn!(%slot, %submission_id, detail = err.detail(), "submission failed");
                self.raise_alert(slot, &err);
            }
        }
    }

    fn raise_alert(&mut self, slot: SessionSlot, err: &CaptureError) {
        self.alerts.push_back(PendingAlert {
            slot,
            message: err.user_message(),
        });
    }

    /// Expires success displays whose deadline passed.
    pub(crate) fn tick(&mut self, now: Instant) {
        for form in &mut self.forms {
            if form.session.poll_revert(now) {
                tracing::debug!(slot = %form.session.slot(), "success display expired");
            }
        }
    }

    pub(crate) fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::SubscribeFinished {
                    slot,
                    submission_id,
                    outcome,
                } => self.finish_submission(slot, submission_id, outcome, now),
                UiEvent::GifLoaded { url, gif } => {
                    self.gifs.insert(
                        url,
                        GifState::Ready {
                            playback: GifPlayback::new(gif),
                            texture: None,
                        },
                    );
                }
                UiEvent::GifFailed { url, reason } => {
                    self.gifs.insert(url, GifState::Failed(reason));
                }
                UiEvent::BackendUnavailable(message) => {
                    self.status = "Backend unavailable".to_string();
                    self.backend_error = Some(message);
                }
            }
        }
    }

    fn request_gifs(&mut self, urls: &[&str]) {
        let urls: Vec<String> = urls
            .iter()
            .filter(|url| !self.gifs.contains_key(**url))
            .map(|url| url.to_string())
            .collect();
        if urls.is_empty() {
            return;
        }
        for url in &urls {
            self.gifs.insert(url.clone(), GifState::Loading);
        }
        let cmd = BackendCommand::FetchGifs { urls: urls.clone() };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            for url in urls {
                self.gifs.insert(url, GifState::Failed(err.to_string()));
            }
        }
    }

    /// Starts the vibe GIF downloads once the section nears the visible area.
    pub(crate) fn observe_vibe_section(&mut self, section: egui::Rect, viewport: egui::Rect) {
        if self.vibe_preload.has_fired() {
            return;
        }
        if self
            .vibe_preload
            .observe(section.top(), section.bottom(), viewport.top(), viewport.bottom())
        {
            tracing::debug!("vibe section near viewport; preloading gifs");
            self.request_gifs(&VIBE_GIF_URLS);
        }
    }

    pub(crate) fn observe_viewport_width(&mut self, width: f32) {
        if let Some(variant) = self.viewport.observe(width) {
            tracing::debug!(?variant, width = self.viewport.width(), "layout variant changed");
        }
    }

    fn any_gif_animating(&self) -> bool {
        self.gifs.values().any(|state| {
            matches!(state, GifState::Ready { playback, .. } if playback.is_animated())
        })
    }

    fn show_page(&mut self, ui: &mut egui::Ui) {
        let metrics = self.viewport.variant().metrics();
        let palette = self.palette;

        if let Some(message) = &self.backend_error {
            egui::Frame::NONE
                .fill(palette.card_background)
                .inner_margin(egui::Margin::symmetric(16, 8))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("{}: {message}", self.status))
                            .color(palette.muted_text)
                            .size(metrics.caption_size),
                    );
                });
        }

        section(ui, palette.page_background, &metrics, |ui| {
            self.show_hero(ui, &metrics)
        });
        section(ui, palette.alt_section_background, &metrics, |ui| {
            self.show_filter(ui, &metrics)
        });
        let vibe = section(ui, palette.page_background, &metrics, |ui| {
            self.show_vibe(ui, &metrics)
        });
        let visible = ui.clip_rect();
        self.observe_vibe_section(vibe.rect, visible);
        section(ui, palette.alt_section_background, &metrics, |ui| {
            self.show_early(ui, &metrics)
        });
        section(ui, palette.page_background, &metrics, |ui| {
            self.show_urgency(ui, &metrics)
        });
        section(ui, palette.alt_section_background, &metrics, |ui| {
            centered_title(ui, copy::SECOND_CAPTURE_TITLE, metrics.section_title_size);
            ui.add_space(24.0);
            self.show_capture_form(ui, SessionSlot::Secondary, &copy::SECONDARY_FORM, &metrics);
        });
        section(ui, palette.page_background, &metrics, |ui| {
            self.show_final(ui, &metrics)
        });

        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(copy::FOOTER)
                    .color(palette.footer_text)
                    .size(metrics.caption_size),
            );
            ui.small(RichText::new(self.status_line()).weak());
        });
        ui.add_space(24.0);
    }

    fn show_hero(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        if metrics.stack_columns {
            self.show_hero_copy(ui, metrics);
            ui.add_space(32.0);
            self.show_gif(ui, HERO_GIF_URL, metrics.card_max_width);
        } else {
            ui.columns(2, |columns| {
                self.show_hero_copy(&mut columns[0], metrics);
                self.show_gif(&mut columns[1], HERO_GIF_URL, metrics.card_max_width);
            });
        }
    }

    fn show_hero_copy(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let palette = self.palette;
        ui.label(
            RichText::new(format!("{},", copy::HERO_TITLE))
                .strong()
                .size(metrics.hero_title_size),
        );
        ui.label(
            RichText::new(copy::HERO_HIGHLIGHT)
                .strong()
                .size(metrics.hero_title_size)
                .color(palette.accent),
        );
        ui.add_space(16.0);
        ui.label(
            RichText::new(break_lines(&copy::HERO_SUBTITLE, self.viewport.variant()))
                .size(metrics.hero_subtitle_size)
                .color(palette.muted_text),
        );
        ui.add_space(24.0);
        self.show_capture_form(ui, SessionSlot::Primary, &copy::PRIMARY_FORM, metrics);
    }

    fn show_filter(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let palette = self.palette;
        ui.vertical_centered(|ui| {
            centered_title(ui, copy::FILTER_TITLE, metrics.section_title_size);
            ui.add_space(24.0);
            ui.label(
                RichText::new(format!("\u{201c}{}\u{201d}", copy::FILTER_QUOTE))
                    .italics()
                    .size(metrics.body_size)
                    .color(palette.quote_text),
            );
            ui.add_space(12.0);
            ui.label(
                RichText::new(copy::FILTER_HIGHLIGHT)
                    .strong()
                    .size(metrics.body_size)
                    .color(palette.accent),
            );
        });
    }

    fn show_vibe(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let cards = [
            (VIBE_GIF_URLS[0], copy::VIBE_CAPTIONS[0]),
            (VIBE_GIF_URLS[1], copy::VIBE_CAPTIONS[1]),
        ];
        if metrics.stack_columns {
            for (url, caption) in cards {
                self.show_vibe_card(ui, url, caption, metrics);
                ui.add_space(24.0);
            }
        } else {
            ui.columns(2, |columns| {
                for (column, (url, caption)) in columns.iter_mut().zip(cards) {
                    self.show_vibe_card(column, url, caption, metrics);
                }
            });
        }
    }

    fn show_vibe_card(
        &mut self,
        ui: &mut egui::Ui,
        url: &str,
        caption: &str,
        metrics: &LayoutMetrics,
    ) {
        let palette = self.palette;
        egui::Frame::NONE
            .fill(palette.card_background)
            .stroke(egui::Stroke::new(1.0, palette.card_border))
            .corner_radius(16.0)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                self.show_gif(ui, url, metrics.card_max_width);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(caption)
                            .size(metrics.caption_size)
                            .color(palette.muted_text),
                    );
                });
            });
    }

    fn show_early(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let palette = self.palette;
        ui.vertical_centered(|ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    RichText::new(copy::EARLY_TITLE)
                        .strong()
                        .size(metrics.section_title_size),
                );
                ui.label(
                    RichText::new(copy::EARLY_HIGHLIGHT)
                        .strong()
                        .size(metrics.section_title_size)
                        .color(palette.accent),
                );
            });
            ui.add_space(16.0);
            ui.label(
                RichText::new(break_lines(&copy::EARLY_BODY, self.viewport.variant()))
                    .size(metrics.body_size)
                    .color(palette.muted_text),
            );
        });
    }

    fn show_urgency(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let palette = self.palette;
        let variant = self.viewport.variant();
        ui.vertical_centered(|ui| {
            egui::Frame::NONE
                .fill(palette.accent_soft)
                .corner_radius(999.0)
                .inner_margin(egui::Margin::symmetric(14, 6))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(copy::URGENCY_BADGE)
                            .strong()
                            .size(metrics.caption_size * 0.8)
                            .color(palette.badge_text),
                    );
                });
            ui.add_space(16.0);
            centered_title(
                ui,
                &break_lines(&copy::URGENCY_TITLE, variant),
                metrics.section_title_size,
            );
            ui.add_space(16.0);
            ui.label(
                RichText::new(break_lines(&copy::URGENCY_BODY, variant))
                    .size(metrics.body_size)
                    .color(palette.muted_text),
            );
            ui.add_space(12.0);
            ui.label(
                RichText::new(break_lines(&copy::URGENCY_FOOTNOTE, variant))
                    .size(metrics.caption_size)
                    .color(palette.faint_text),
            );
        });
    }

    fn show_final(&mut self, ui: &mut egui::Ui, metrics: &LayoutMetrics) {
        let palette = self.palette;
        let variant = self.viewport.variant();
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(break_lines(&copy::FINAL_TITLE, variant))
                    .strong()
                    .size(metrics.final_title_size),
            );
            ui.label(
                RichText::new(copy::FINAL_HIGHLIGHT)
                    .strong()
                    .size(metrics.final_title_size)
                    .color(palette.accent),
            );
            ui.add_space(24.0);
            self.show_gif(ui, VIBE_GIF_URLS[2], metrics.card_max_width);
            ui.add_space(24.0);
            ui.label(
                RichText::new(break_lines(&copy::FINAL_SUBTITLE, variant))
                    .size(metrics.body_size)
                    .color(palette.muted_text),
            );
        });
    }

    fn show_capture_form(
        &mut self,
        ui: &mut egui::Ui,
        slot: SessionSlot,
        form_copy: &FormCopy,
        metrics: &LayoutMetrics,
    ) {
        let palette = self.palette;
        let status = self.session(slot).status();
        let control = submit_control(status, form_copy);
        let mut submit_requested = false;

        let field_width = ui.available_width().min(metrics.card_max_width);
        let edit = egui::TextEdit::singleline(self.session_mut(slot).input_mut())
            .id_salt(("capture_input", slot.label()))
            .hint_text(form_copy.placeholder)
            .margin(egui::Margin::symmetric(16, 12))
            .desired_width(field_width);
        let response = ui.add_sized([field_width, FORM_CONTROL_HEIGHT], edit);
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit_requested = true;
        }

        let button = egui::Button::new(
            RichText::new(control.label)
                .strong()
                .size(metrics.button_text_size)
                .color(egui::Color32::WHITE),
        )
        .fill(palette.accent)
        .corner_radius(12.0)
        .min_size(egui::vec2(field_width, FORM_CONTROL_HEIGHT));
        if ui.add_enabled(control.enabled, button).clicked() {
            submit_requested = true;
        }

        ui.label(
            RichText::new(form_copy.note)
                .size(metrics.caption_size * 0.8)
                .color(palette.faint_text),
        );
        if status == CaptureStatus::Succeeded {
            ui.label(
                RichText::new(format!("\u{2714} {}", form_copy.success))
                    .strong()
                    .color(palette.success),
            );
        }

        if submit_requested {
            self.submit(slot);
        }
    }

    fn show_gif(&mut self, ui: &mut egui::Ui, url: &str, max_width: f32) {
        let palette = self.palette;
        let width = ui.available_width().min(max_width);
        let size = egui::vec2(width, width * GIF_ASPECT);
        let now_secs = ui.input(|i| i.time);

        let texture = match self.gifs.get_mut(url) {
            Some(GifState::Ready { playback, texture }) => {
                let changed = playback.advance(now_secs);
                if texture.is_none() || changed {
                    let frame = playback.current_frame();
                    let image = egui::ColorImage::from_rgba_unmultiplied(
                        [frame.width, frame.height],
                        &frame.rgba,
                    );
                    if let Some(handle) = texture.as_mut() {
                        handle.set(image, egui::TextureOptions::LINEAR);
                    } else {
                        *texture = Some(ui.ctx().load_texture(
                            format!("landing_gif_{url}"),
                            image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                texture.clone()
            }
            _ => None,
        };

        match texture {
            Some(texture) => {
                ui.add(
                    egui::Image::new(egui::load::SizedTexture::new(texture.id(), size))
                        .corner_radius(16.0),
                );
            }
            None => {
                let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter().rect_filled(rect, 16.0, palette.card_background);
                let placeholder = match self.gifs.get(url) {
                    Some(GifState::Failed(reason)) => {
                        response.on_hover_text(reason.as_str());
                        "Unavailable"
                    }
                    _ => "Loading...",
                };
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    placeholder,
                    egui::FontId::proportional(14.0),
                    palette.faint_text,
                );
            }
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.current_alert().cloned() else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new(("capture_alert", alert.slot.label())))
            .show(ctx, |ui| {
                ui.set_width(320.0);
                ui.label(RichText::new(alert.message).size(16.0));
                ui.add_space(12.0);
                ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
            });
        if modal.inner || modal.should_close() {
            self.dismiss_alert();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubmitControl {
    pub(crate) label: &'static str,
    pub(crate) enabled: bool,
}

/// The submit button is disabled and reads "Sending..." while its session is in flight.
pub(crate) fn submit_control(status: CaptureStatus, form_copy: &FormCopy) -> SubmitControl {
    match status {
        CaptureStatus::Submitting => SubmitControl {
            label: copy::SENDING_LABEL,
            enabled: false,
        },
        CaptureStatus::Idle | CaptureStatus::Succeeded => SubmitControl {
            label: form_copy.button,
            enabled: true,
        },
    }
}

/// Full-width band with the layout's vertical padding and centered, capped content.
fn section(
    ui: &mut egui::Ui,
    fill: egui::Color32,
    metrics: &LayoutMetrics,
    add: impl FnOnce(&mut egui::Ui),
) -> egui::Response {
    let padding = metrics.section_padding.clamp(0.0, 127.0) as i8;
    egui::Frame::NONE
        .fill(fill)
        .inner_margin(egui::Margin::symmetric(16, padding))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.set_max_width(metrics.content_max_width.min(ui.available_width()));
                add(ui);
            });
        })
        .response
}

fn centered_title(ui: &mut egui::Ui, text: &str, size: f32) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).strong().size(size));
    });
}

impl eframe::App for LandingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_applied {
            apply_landing_style(ctx, &self.palette);
            self.style_applied = true;
        }

        let now = Instant::now();
        self.process_ui_events(now);
        self.tick(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.palette.page_background))
            .show(ctx, |ui| {
                self.observe_viewport_width(ui.available_width());
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_page(ui));
            });
        self.show_alert(ctx);

        if self.any_gif_animating() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
