//! Render engine collaborator seam.
//!
//! The viewer controller drives any volumetric renderer through the
//! [`RenderEngine`] trait. The trait mirrors the surface the controller
//! actually consumes: volume load/release, scene parameters, and redraws.
//! [`NiftiEngine`] is the built-in reference implementation; GPU raycast
//! backends implement the same trait externally.

mod nifti;

pub use nifti::NiftiEngine;

use crate::colormap::Colormap;
use crate::error::EngineError;
use crate::model::{ViewMode, VolumeMetadata};

/// Display parameters applied when a volume is first loaded.
#[derive(Debug, Clone, Copy)]
pub struct DisplayDefaults {
    pub colormap: Colormap,
    pub opacity: f32,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self {
            colormap: Colormap::Grayscale,
            opacity: crate::constants::display::OPACITY,
        }
    }
}

/// A plane that cuts away part of the volume in 3D render mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    /// Unit normal of the plane in volume-local coordinates.
    pub normal: [f32; 3],
    /// Signed distance of the plane from the volume center, normalized.
    pub offset: f32,
}

impl Default for ClipPlane {
    fn default() -> Self {
        Self {
            normal: [0.0, 0.0, 1.0],
            offset: 0.0,
        }
    }
}

/// The volumetric renderer surface consumed by the viewer controller.
///
/// Calls for one controller instance are strictly ordered by call
/// sequence; implementations do not need any internal locking.
pub trait RenderEngine {
    /// Size of the bound drawable surface, or `None` when detached.
    fn surface_size(&self) -> Option<[u32; 2]>;

    /// Re-layout for a new surface size. Binds the surface on first call.
    fn resize(&mut self, width: u32, height: u32);

    /// Decode a volume from raw bytes and make it the engine's current
    /// volume, replacing any previous one. `name` is only used for
    /// format hints and diagnostics.
    fn load_volume(
        &mut self,
        name: &str,
        bytes: &[u8],
        defaults: &DisplayDefaults,
    ) -> Result<VolumeMetadata, EngineError>;

    /// Switch between planar multiplanar and 3D raycast rendering.
    fn set_slice_mode(&mut self, mode: ViewMode);

    /// Move the crosshair that selects the displayed slices, in
    /// (sagittal, coronal, axial) voxel coordinates.
    fn set_crosshair(&mut self, position: [u32; 3]);

    /// Configure the 3D clip plane.
    fn set_clip_plane(&mut self, plane: ClipPlane);

    /// Set the 3D camera azimuth and elevation, in degrees.
    fn set_render_orientation(&mut self, azimuth: f32, elevation: f32);

    /// Switch the active colormap.
    fn set_colormap(&mut self, colormap: Colormap);

    /// Set the live volume opacity in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f32);

    /// Set the intensity window as explicit display bounds.
    fn set_intensity_window(&mut self, low: f32, high: f32);

    /// Set the view zoom factor.
    fn set_zoom(&mut self, factor: f32);

    /// Present the scene with the current parameters. Idempotent given
    /// unchanged state, so redundant calls are safe to coalesce.
    fn draw_scene(&mut self);

    /// Drop the current volume and any surface-bound resources. Safe to
    /// call repeatedly and in any phase.
    fn release(&mut self);
}
