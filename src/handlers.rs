//! Message handlers.
//!
//! A thin dispatch layer between the UI's [`Message`] values and the
//! [`ViewerController`] operations, keeping the eframe update function
//! clean and organized.

use crate::controller::ViewerController;
use crate::engine::RenderEngine;
use crate::message::Message;

/// Platform-level effects a handled message may request. The eframe
/// layer executes these with viewport commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// No platform effect.
    None,
    /// Ask the window system for this fullscreen state.
    SetFullscreen(bool),
    /// Surface a transient alert with this message.
    Alert(String),
}

/// Handle one UI message against the controller.
pub fn handle_message<E: RenderEngine>(
    msg: Message,
    controller: &mut ViewerController<E>,
) -> UiAction {
    match msg {
        Message::ToggleViewMode => {
            controller.toggle_view_mode();
        }
        Message::ResetView => {
            log::debug!("🔄 View reset");
            controller.reset_view();
        }
        Message::ZoomIn => {
            controller.zoom_in();
        }
        Message::ZoomOut => {
            controller.zoom_out();
        }
        Message::ToggleFullscreen => {
            return UiAction::SetFullscreen(controller.fullscreen_target());
        }
        Message::TogglePanel(panel) => {
            controller.toggle_panel(panel);
        }
        Message::SliceStep(axis, delta) => {
            controller.change_slice(axis, delta);
        }
        Message::SliceSet(axis, index) => {
            controller.set_slice(axis, index);
        }
        Message::ColormapSelected(colormap) => {
            log::debug!("🎨 Colormap: {}", colormap.name());
            controller.set_colormap(colormap);
        }
        Message::OpacityChanged(value) => {
            controller.set_opacity(value);
        }
        Message::ToggleVolumeVisibility => {
            controller.toggle_volume_visibility();
        }
        Message::WindowLevelChanged { center, width } => {
            controller.set_window_level(center, width);
        }
        Message::Reload => {
            if let Err(e) = controller.reload() {
                log::error!("reload failed: {e}");
                return UiAction::Alert(format!("Reload failed: {e}"));
            }
        }
        Message::DownloadOriginal(path) => {
            if let Err(e) = controller.download_original(&path) {
                log::error!("download failed: {e}");
                return UiAction::Alert(format!("Download failed: {e}"));
            }
        }
    }
    UiAction::None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::colormap::Colormap;
    use crate::engine::{ClipPlane, DisplayDefaults};
    use crate::error::{EngineError, FetchError};
    use crate::model::{ViewMode, VolumeMetadata};
    use crate::source::VolumeFetcher;

    struct NullEngine;

    impl RenderEngine for NullEngine {
        fn surface_size(&self) -> Option<[u32; 2]> {
            Some([64, 64])
        }
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn load_volume(
            &mut self,
            _name: &str,
            _bytes: &[u8],
            _defaults: &DisplayDefaults,
        ) -> Result<VolumeMetadata, EngineError> {
            VolumeMetadata::new([8; 3], [1.0; 3], (0.0, 1.0))
        }
        fn set_slice_mode(&mut self, _mode: ViewMode) {}
        fn set_crosshair(&mut self, _position: [u32; 3]) {}
        fn set_clip_plane(&mut self, _plane: ClipPlane) {}
        fn set_render_orientation(&mut self, _azimuth: f32, _elevation: f32) {}
        fn set_colormap(&mut self, _colormap: Colormap) {}
        fn set_opacity(&mut self, _opacity: f32) {}
        fn set_intensity_window(&mut self, _low: f32, _high: f32) {}
        fn set_zoom(&mut self, _factor: f32) {}
        fn draw_scene(&mut self) {}
        fn release(&mut self) {}
    }

    struct UnreachableFetcher;

    impl VolumeFetcher for UnreachableFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Request(format!("backend unreachable: {url}")))
        }
    }

    fn controller() -> ViewerController<NullEngine> {
        ViewerController::new(NullEngine, Arc::new(UnreachableFetcher))
    }

    #[test]
    fn test_reload_without_url_raises_alert() {
        let mut c = controller();
        let action = handle_message(Message::Reload, &mut c);
        assert!(
            matches!(&action, UiAction::Alert(text) if text.contains("Reload failed")),
            "unexpected action: {action:?}"
        );
    }

    #[test]
    fn test_download_failure_alert_carries_cause() {
        let mut c = controller();
        c.activate("vol.nii.gz", "vol").unwrap();
        let path = std::env::temp_dir().join("voxview-test-failed-download.nii.gz");
        let action = handle_message(Message::DownloadOriginal(path), &mut c);
        match action {
            UiAction::Alert(text) => {
                assert!(text.contains("Download failed"), "missing prefix: {text}");
                assert!(text.contains("backend unreachable"), "missing cause: {text}");
            }
            other => panic!("expected an alert, got {other:?}"),
        }
    }

    #[test]
    fn test_fullscreen_toggle_requests_opposite_state() {
        let mut c = controller();
        assert_eq!(
            handle_message(Message::ToggleFullscreen, &mut c),
            UiAction::SetFullscreen(true)
        );
        c.reconcile_fullscreen(true);
        assert_eq!(
            handle_message(Message::ToggleFullscreen, &mut c),
            UiAction::SetFullscreen(false)
        );
    }
}
