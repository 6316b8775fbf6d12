//! Read-only volume metadata captured once per successful load.

use crate::error::EngineError;

/// Shape and scale of a loaded volume.
///
/// Axis order follows the radiological convention used throughout the
/// viewer: x = sagittal, y = coronal, z = axial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMetadata {
    /// Voxel counts per axis (sagittal, coronal, axial).
    pub dimensions: [u32; 3],
    /// Physical voxel size in millimetres per axis.
    pub voxel_size: [f32; 3],
    /// Intensity range `[min, max]` used as the display window at load time.
    pub value_range: (f32, f32),
}

impl VolumeMetadata {
    /// Build metadata, enforcing the volume invariants: every dimension
    /// is at least 1 voxel and every voxel size is strictly positive.
    pub fn new(
        dimensions: [u32; 3],
        voxel_size: [f32; 3],
        value_range: (f32, f32),
    ) -> Result<Self, EngineError> {
        if dimensions.iter().any(|&d| d == 0) {
            return Err(EngineError::InvalidVolume(format!(
                "dimension of zero voxels: {dimensions:?}"
            )));
        }
        if voxel_size.iter().any(|&s| !(s > 0.0)) {
            return Err(EngineError::InvalidVolume(format!(
                "non-positive voxel size: {voxel_size:?}"
            )));
        }
        if !value_range.0.is_finite() || !value_range.1.is_finite() {
            return Err(EngineError::InvalidVolume(format!(
                "non-finite value range: {value_range:?}"
            )));
        }
        Ok(Self {
            dimensions,
            voxel_size,
            value_range,
        })
    }

    /// Voxel count along one orientation axis.
    pub fn dimension(&self, axis: super::Orientation) -> u32 {
        match axis {
            super::Orientation::Sagittal => self.dimensions[0],
            super::Orientation::Coronal => self.dimensions[1],
            super::Orientation::Axial => self.dimensions[2],
        }
    }

    /// The volume center, used as the default crosshair position.
    pub fn center(&self) -> [u32; 3] {
        [
            self.dimensions[0] / 2,
            self.dimensions[1] / 2,
            self.dimensions[2] / 2,
        ]
    }

    /// Physical extent of the volume in millimetres per axis.
    pub fn physical_extent(&self) -> [f32; 3] {
        [
            self.dimensions[0] as f32 * self.voxel_size[0],
            self.dimensions[1] as f32 * self.voxel_size[1],
            self.dimensions[2] as f32 * self.voxel_size[2],
        ]
    }
}
