//! Info side panel: volume metadata and the download action.

use eframe::egui;

use crate::message::Message;
use crate::model::{ViewState, VolumeMetadata};

/// Draw the info panel and collect emitted messages.
pub fn show(
    ctx: &egui::Context,
    view: &ViewState,
    metadata: Option<&VolumeMetadata>,
    volume_name: &str,
) -> Vec<Message> {
    let mut messages = Vec::new();
    egui::SidePanel::right("info")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading(volume_name);
            match metadata {
                Some(meta) => {
                    let [nx, ny, nz] = meta.dimensions;
                    let [vx, vy, vz] = meta.voxel_size;
                    let [ex, ey, ez] = meta.physical_extent();
                    let (lo, hi) = meta.value_range;
                    egui::Grid::new("volume-info").num_columns(2).show(ui, |ui| {
                        ui.label("Dimensions");
                        ui.label(format!("{nx} × {ny} × {nz}"));
                        ui.end_row();
                        ui.label("Voxel size");
                        ui.label(format!("{vx:.2} × {vy:.2} × {vz:.2} mm"));
                        ui.end_row();
                        ui.label("Extent");
                        ui.label(format!("{ex:.1} × {ey:.1} × {ez:.1} mm"));
                        ui.end_row();
                        ui.label("Value range");
                        ui.label(format!("{lo:.1} to {hi:.1}"));
                        ui.end_row();
                        ui.label("Crosshair");
                        ui.label(format!(
                            "({}, {}, {})",
                            view.slice.sagittal, view.slice.coronal, view.slice.axial
                        ));
                        ui.end_row();
                    });
                }
                None => {
                    ui.label("No volume loaded");
                }
            }
            ui.separator();
            if ui.button("Download original").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(volume_name)
                    .save_file()
                {
                    messages.push(Message::DownloadOriginal(path));
                }
            }
        });
    messages
}
