//! Application message types.
//!
//! All UI events are represented as messages; the handler layer maps
//! them onto viewer controller operations.

use std::path::PathBuf;

use crate::colormap::Colormap;
use crate::model::{Orientation, PanelKind};

/// Messages emitted by the UI to update viewer state.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Toolbar
    /// Switch between 2D multiplanar and 3D raycast rendering
    ToggleViewMode,
    /// Reset the view for the current mode
    ResetView,
    /// Zoom in one step
    ZoomIn,
    /// Zoom out one step
    ZoomOut,
    /// Toggle fullscreen (asks the platform; state is reconciled later)
    ToggleFullscreen,
    /// Open or close an auxiliary panel
    TogglePanel(PanelKind),

    // Slice navigation
    /// Step one slice along an orientation
    SliceStep(Orientation, i32),
    /// Jump to an absolute slice index (slider scrubbing)
    SliceSet(Orientation, u32),

    // Display settings
    /// Colormap selected from the settings panel
    ColormapSelected(Colormap),
    /// Opacity slider moved
    OpacityChanged(f32),
    /// Hide or show the volume without losing the opacity setting
    ToggleVolumeVisibility,
    /// Intensity window center/width changed
    WindowLevelChanged { center: f32, width: f32 },

    // Error screen
    /// Re-run the full load sequence for the current volume
    Reload,
    /// Save the original volume payload to a chosen path
    DownloadOriginal(PathBuf),
}
