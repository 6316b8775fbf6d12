//! Viewer data model: volume metadata and view state.

mod metadata;
mod view_state;

pub use metadata::VolumeMetadata;
pub use view_state::{Orientation, PanelKind, Phase, SlicePosition, ViewMode, ViewState};
