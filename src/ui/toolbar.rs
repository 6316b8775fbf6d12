//! Top toolbar: mode toggle, reset, zoom, visibility, fullscreen, panels.

use eframe::egui;

use crate::message::Message;
use crate::model::{PanelKind, ViewMode, ViewState};

/// Draw the toolbar and collect emitted messages.
pub fn show(ctx: &egui::Context, view: &ViewState) -> Vec<Message> {
    let mut messages = Vec::new();
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let interactive = view.interactive();

            let mode_label = match view.mode {
                ViewMode::Planar2D => "3D view",
                ViewMode::Render3D => "2D view",
            };
            if ui
                .add_enabled(interactive, egui::Button::new(mode_label))
                .clicked()
            {
                messages.push(Message::ToggleViewMode);
            }
            if ui
                .add_enabled(interactive, egui::Button::new("Reset"))
                .clicked()
            {
                messages.push(Message::ResetView);
            }

            ui.separator();

            if ui
                .add_enabled(interactive, egui::Button::new("🔍+"))
                .clicked()
            {
                messages.push(Message::ZoomIn);
            }
            if ui
                .add_enabled(interactive, egui::Button::new("🔍-"))
                .clicked()
            {
                messages.push(Message::ZoomOut);
            }
            if interactive {
                ui.label(format!("{:.0}%", view.zoom_factor * 100.0));
            }

            ui.separator();

            let visibility_label = if view.volume_visible { "Hide" } else { "Show" };
            if ui
                .add_enabled(interactive, egui::Button::new(visibility_label))
                .clicked()
            {
                messages.push(Message::ToggleVolumeVisibility);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let fullscreen_label = if view.fullscreen {
                    "Exit fullscreen"
                } else {
                    "Fullscreen"
                };
                if ui.button(fullscreen_label).clicked() {
                    messages.push(Message::ToggleFullscreen);
                }
                if ui
                    .selectable_label(view.panel_open(PanelKind::Info), "Info")
                    .clicked()
                {
                    messages.push(Message::TogglePanel(PanelKind::Info));
                }
                if ui
                    .selectable_label(view.panel_open(PanelKind::Settings), "Settings")
                    .clicked()
                {
                    messages.push(Message::TogglePanel(PanelKind::Settings));
                }
            });
        });
    });
    messages
}
