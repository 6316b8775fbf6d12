//! Settings side panel: colormap, opacity, intensity window, slice sliders.

use eframe::egui;

use crate::colormap::Colormap;
use crate::message::Message;
use crate::model::{Orientation, ViewMode, ViewState, VolumeMetadata};

/// Draw the settings panel and collect emitted messages.
pub fn show(
    ctx: &egui::Context,
    view: &ViewState,
    metadata: Option<&VolumeMetadata>,
) -> Vec<Message> {
    let mut messages = Vec::new();
    egui::SidePanel::right("settings")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Display");
            ui.add_enabled_ui(view.interactive(), |ui| {
                colormap_picker(ui, view, &mut messages);
                opacity_slider(ui, view, &mut messages);
                window_controls(ui, view, metadata, &mut messages);
                if view.mode == ViewMode::Planar2D {
                    if let Some(meta) = metadata {
                        ui.separator();
                        ui.heading("Slices");
                        slice_sliders(ui, view, meta, &mut messages);
                    }
                }
            });
        });
    messages
}

fn colormap_picker(ui: &mut egui::Ui, view: &ViewState, messages: &mut Vec<Message>) {
    let mut selected = view.colormap;
    egui::ComboBox::from_label("Colormap")
        .selected_text(selected.name())
        .show_ui(ui, |ui| {
            for &colormap in Colormap::all() {
                ui.selectable_value(&mut selected, colormap, colormap.name());
            }
        });
    if selected != view.colormap {
        messages.push(Message::ColormapSelected(selected));
    }
}

fn opacity_slider(ui: &mut egui::Ui, view: &ViewState, messages: &mut Vec<Message>) {
    let mut opacity = view.opacity;
    if ui
        .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
        .changed()
    {
        messages.push(Message::OpacityChanged(opacity));
    }
}

fn window_controls(
    ui: &mut egui::Ui,
    view: &ViewState,
    metadata: Option<&VolumeMetadata>,
    messages: &mut Vec<Message>,
) {
    let (range_lo, range_hi) = metadata.map(|m| m.value_range).unwrap_or((0.0, 1.0));
    let full_width = (range_hi - range_lo).max(1.0);
    let mut center = view.window_center;
    let mut width = view.window_width;
    let mut changed = false;
    changed |= ui
        .add(egui::Slider::new(&mut center, range_lo..=range_hi).text("Window center"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut width, 0.0..=full_width).text("Window width"))
        .changed();
    if changed {
        messages.push(Message::WindowLevelChanged { center, width });
    }
}

fn slice_sliders(
    ui: &mut egui::Ui,
    view: &ViewState,
    meta: &VolumeMetadata,
    messages: &mut Vec<Message>,
) {
    for &axis in Orientation::all() {
        let max = meta.dimension(axis).saturating_sub(1);
        let mut index = view.slice.get(axis);
        if ui
            .add(egui::Slider::new(&mut index, 0..=max).text(axis.name()))
            .changed()
        {
            messages.push(Message::SliceSet(axis, index));
        }
    }
}
