//! Main eframe application.

use eframe::egui;

use crate::constants::ALERT_DURATION_SECS;
use crate::controller::ViewerController;
use crate::engine::{NiftiEngine, RenderEngine};
use crate::handlers::{handle_message, UiAction};
use crate::message::Message;
use crate::model::{Orientation, PanelKind, Phase};
use crate::source::HttpFetcher;
use crate::ui::{info, settings, toolbar};

/// Transient alert shown at the bottom of the viewer.
struct Alert {
    text: String,
    shown_at: f64,
}

/// The viewer application: one controller, one engine, one volume.
pub struct ViewerApp {
    controller: ViewerController<NiftiEngine>,
    /// GPU texture holding the engine's latest frame.
    texture: Option<egui::TextureHandle>,
    alert: Option<Alert>,
}

impl ViewerApp {
    /// Build the app and kick off the initial volume load.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &crate::config::AppConfig,
        url: &str,
        name: &str,
    ) -> Self {
        let fetcher = HttpFetcher::new(
            (!config.base_origin.trim().is_empty()).then(|| config.base_origin.clone()),
            config.request_timeout(),
        );
        let mut controller = ViewerController::new(NiftiEngine::new(), std::sync::Arc::new(fetcher))
            .with_load_timeout(config.load_timeout());

        // Bind the engine to an initial surface before activation; the
        // real size follows from the first central panel layout.
        let size = cc.egui_ctx.screen_rect().size();
        controller.handle_resize(size.x.max(1.0) as u32, size.y.max(1.0) as u32);

        if let Err(e) = controller.activate(url, name) {
            log::error!("initial activation failed: {e}");
        }

        Self {
            controller,
            texture: None,
            alert: None,
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, messages: Vec<Message>) {
        for msg in messages {
            match handle_message(msg, &mut self.controller) {
                UiAction::None => {}
                UiAction::SetFullscreen(on) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(on));
                }
                UiAction::Alert(text) => {
                    self.alert = Some(Alert {
                        text,
                        shown_at: ctx.input(|i| i.time),
                    });
                }
            }
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        if let Some(frame) = self.controller.engine().frame() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width as usize, frame.height as usize],
                &frame.rgba,
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("volume-frame", image, egui::TextureOptions::NEAREST));
                }
            }
        }
    }

    /// Keyboard slice navigation: up/down steps axial, left/right
    /// sagittal, page up/down coronal.
    fn keyboard_messages(&self, ctx: &egui::Context) -> Vec<Message> {
        if !self.controller.view().interactive() || ctx.wants_keyboard_input() {
            return Vec::new();
        }
        let mut messages = Vec::new();
        ctx.input(|i| {
            for (key, axis, delta) in [
                (egui::Key::ArrowUp, Orientation::Axial, 1),
                (egui::Key::ArrowDown, Orientation::Axial, -1),
                (egui::Key::ArrowRight, Orientation::Sagittal, 1),
                (egui::Key::ArrowLeft, Orientation::Sagittal, -1),
                (egui::Key::PageUp, Orientation::Coronal, 1),
                (egui::Key::PageDown, Orientation::Coronal, -1),
            ] {
                if i.key_pressed(key) {
                    messages.push(Message::SliceStep(axis, delta));
                }
            }
            if i.key_pressed(egui::Key::Plus) {
                messages.push(Message::ZoomIn);
            }
            if i.key_pressed(egui::Key::Minus) {
                messages.push(Message::ZoomOut);
            }
        });
        messages
    }

    fn central_content(&mut self, ui: &mut egui::Ui) -> Vec<Message> {
        let mut messages = Vec::new();
        match self.controller.view().phase {
            Phase::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {}...", self.controller.volume_name()));
                    });
                });
            }
            Phase::Error => {
                let message = self
                    .controller
                    .view()
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string());
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Failed to load volume");
                        ui.label(message);
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("Reload").clicked() {
                                messages.push(Message::Reload);
                            }
                            if ui.button("Download original").clicked() {
                                if let Some(path) = save_dialog(self.controller.volume_name()) {
                                    messages.push(Message::DownloadOriginal(path));
                                }
                            }
                        });
                    });
                });
            }
            Phase::Ready => {
                if let Some(texture) = &self.texture {
                    let zoom = self.controller.view().zoom_factor;
                    let size = texture.size_vec2() * zoom;
                    egui::ScrollArea::both().show(ui, |ui| {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                    });
                }
            }
        }
        messages
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if let Some(alert) = &self.alert {
            if now - alert.shown_at > ALERT_DURATION_SECS {
                self.alert = None;
                return;
            }
            egui::TopBottomPanel::bottom("alert").show(ctx, |ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, &alert.text);
            });
        }
    }
}

/// Ask for a save path. Separate fn so the picker stays out of layout code.
fn save_dialog(suggested_name: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(suggested_name)
        .save_file()
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
        self.controller.reconcile_fullscreen(fullscreen);

        let mut messages = self.keyboard_messages(ctx);
        messages.extend(toolbar::show(ctx, self.controller.view()));

        if self.controller.view().panel_open(PanelKind::Settings) {
            messages.extend(settings::show(
                ctx,
                self.controller.view(),
                self.controller.metadata(),
            ));
        }
        if self.controller.view().panel_open(PanelKind::Info) {
            messages.extend(info::show(
                ctx,
                self.controller.view(),
                self.controller.metadata(),
                self.controller.volume_name(),
            ));
        }

        let mut central_messages = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            // Layout drives the drawable surface size.
            let avail = ui.available_size();
            let (w, h) = (avail.x.max(1.0) as u32, avail.y.max(1.0) as u32);
            if self.controller.engine().surface_size() != Some([w, h]) {
                self.controller.handle_resize(w, h);
            }
            central_messages = self.central_content(ui);
        });
        messages.extend(central_messages);

        self.dispatch(ctx, messages);

        if self.controller.flush_redraw() {
            self.upload_frame(ctx);
        }

        self.show_alert(ctx);

        // Keep polling while a load is in flight.
        if self.controller.view().phase == Phase::Loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.teardown();
    }
}
