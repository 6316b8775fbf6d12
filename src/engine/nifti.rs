//! Reference render engine backed by the `nifti` crate.
//!
//! Decodes NIfTI-1 volumes (`.nii`, `.nii.gz`, gzip auto-detected) into
//! an in-memory array and rasterizes the current multiplanar slices on
//! the CPU. Raycast rendering and DICOM decode are intentionally not
//! implemented here; backends providing them plug in through the
//! [`RenderEngine`](super::RenderEngine) trait.

use std::io::Cursor;

use flate2::read::GzDecoder;
use ndarray::{ArrayD, Axis};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiObject};

use crate::colormap::Colormap;
use crate::error::EngineError;
use crate::model::{ViewMode, VolumeMetadata};

use super::{ClipPlane, DisplayDefaults, RenderEngine};

/// A CPU-rasterized RGBA frame ready for texture upload.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Scene parameters tracked between draws.
#[derive(Debug, Clone)]
struct Scene {
    mode: ViewMode,
    crosshair: [u32; 3],
    clip_plane: ClipPlane,
    azimuth: f32,
    elevation: f32,
    colormap: Colormap,
    opacity: f32,
    window: (f32, f32),
    zoom: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            mode: ViewMode::Planar2D,
            crosshair: [0; 3],
            clip_plane: ClipPlane::default(),
            azimuth: 0.0,
            elevation: 0.0,
            colormap: Colormap::Grayscale,
            opacity: 1.0,
            window: (0.0, 1.0),
            zoom: 1.0,
        }
    }
}

struct LoadedVolume {
    data: ArrayD<f32>,
    meta: VolumeMetadata,
}

/// Software reference engine for NIfTI volumes.
pub struct NiftiEngine {
    surface: Option<[u32; 2]>,
    volume: Option<LoadedVolume>,
    scene: Scene,
    frame: Option<Frame>,
    dirty: bool,
}

impl NiftiEngine {
    /// Create a detached engine; call [`RenderEngine::resize`] to bind a surface.
    pub fn new() -> Self {
        Self {
            surface: None,
            volume: None,
            scene: Scene::default(),
            frame: None,
            dirty: false,
        }
    }

    /// The last frame produced by `draw_scene`, if a volume is loaded.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Decode a NIfTI payload into a 3D array plus its header voxel sizes.
    fn decode(name: &str, bytes: &[u8]) -> Result<(ArrayD<f32>, [f32; 3]), EngineError> {
        if name.to_lowercase().ends_with(".dcm") {
            return Err(EngineError::UnsupportedFormat(
                "DICOM decode is not built into the reference engine".into(),
            ));
        }

        let object = if is_gzip(bytes) {
            InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))?
        } else {
            InMemNiftiObject::from_reader(Cursor::new(bytes))?
        };

        let pixdim = object.header().pixdim;
        let voxels = [pixdim[1], pixdim[2], pixdim[3]];

        // Intensity scaling (scl_slope/scl_inter) is applied by the
        // ndarray conversion.
        let mut array = object.into_volume().into_ndarray::<f32>()?;

        if array.ndim() < 3 {
            return Err(EngineError::InvalidVolume(format!(
                "expected a 3D volume, got {}D",
                array.ndim()
            )));
        }
        // Take the first frame of any trailing dimensions (time, channels).
        while array.ndim() > 3 {
            array = array.index_axis_move(Axis(3), 0);
        }
        Ok((array, voxels))
    }

    fn metadata_from(header_voxels: [f32; 3], array: &ArrayD<f32>) -> Result<VolumeMetadata, EngineError> {
        let shape = array.shape();
        let dimensions = [shape[0] as u32, shape[1] as u32, shape[2] as u32];
        // Sloppy files carry pixdim 0; fall back to isotropic 1mm voxels.
        let voxel_size =
            header_voxels.map(|s| if s.is_finite() && s > 0.0 { s } else { 1.0 });

        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for &v in array.iter() {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if !lo.is_finite() || !hi.is_finite() {
            return Err(EngineError::InvalidVolume(
                "volume contains no finite samples".into(),
            ));
        }
        VolumeMetadata::new(dimensions, voxel_size, (lo, hi))
    }

    /// Rasterize the three planar slices side by side into one frame.
    fn compose_planar(&self, volume: &LoadedVolume) -> Frame {
        let [nx, ny, nz] = volume.meta.dimensions.map(|d| d as usize);
        let [cx, cy, cz] = self.scene.crosshair.map(|c| c as usize);
        let cx = cx.min(nx - 1);
        let cy = cy.min(ny - 1);
        let cz = cz.min(nz - 1);

        // Pane layout: axial (nx × ny), coronal (nx × nz), sagittal (ny × nz).
        let width = nx + nx + ny;
        let height = ny.max(nz);
        let mut rgba = vec![0u8; width * height * 4];

        let lut = self.scene.colormap.lut();
        let alpha = (self.scene.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (lo, hi) = self.scene.window;
        let span = if hi > lo { hi - lo } else { 1.0 };

        let mut put = |px: usize, py: usize, value: f32| {
            let t = ((value - lo) / span).clamp(0.0, 1.0);
            let [r, g, b] = lut[(t * 255.0).round() as usize];
            let at = (py * width + px) * 4;
            rgba[at] = r;
            rgba[at + 1] = g;
            rgba[at + 2] = b;
            rgba[at + 3] = alpha;
        };

        // Axial pane: x across, y down, fixed z.
        for y in 0..ny {
            for x in 0..nx {
                put(x, y, volume.data[[x, y, cz]]);
            }
        }
        // Coronal pane: x across, z down (flipped so superior is up), fixed y.
        for z in 0..nz {
            for x in 0..nx {
                put(nx + x, nz - 1 - z, volume.data[[x, cy, z]]);
            }
        }
        // Sagittal pane: y across, z down (flipped), fixed x.
        for z in 0..nz {
            for y in 0..ny {
                put(nx + nx + y, nz - 1 - z, volume.data[[cx, y, z]]);
            }
        }

        Frame {
            width: width as u32,
            height: height as u32,
            rgba,
        }
    }

    /// Placeholder 3D frame. Raycast compositing lives in external
    /// backends; the reference engine presents a flat stand-in so mode
    /// toggling stays observable.
    fn compose_render3d(&self, volume: &LoadedVolume) -> Frame {
        let [nx, ny, _] = volume.meta.dimensions.map(|d| d as usize);
        let (width, height) = (nx.max(64), ny.max(64));
        let alpha = (self.scene.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let base = self.scene.colormap.sample(0.25);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            rgba.extend_from_slice(&[base[0] / 2, base[1] / 2, base[2] / 2, alpha]);
        }
        Frame {
            width: width as u32,
            height: height as u32,
            rgba,
        }
    }
}

impl Default for NiftiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for NiftiEngine {
    fn surface_size(&self) -> Option<[u32; 2]> {
        self.surface
    }

    fn resize(&mut self, width: u32, height: u32) {
        let size = [width.max(1), height.max(1)];
        if self.surface != Some(size) {
            self.surface = Some(size);
            self.mark_dirty();
        }
    }

    fn load_volume(
        &mut self,
        name: &str,
        bytes: &[u8],
        defaults: &DisplayDefaults,
    ) -> Result<VolumeMetadata, EngineError> {
        if self.surface.is_none() {
            return Err(EngineError::NotAttached);
        }

        let (array, header_voxels) = Self::decode(name, bytes)?;
        let meta = Self::metadata_from(header_voxels, &array)?;

        log::info!(
            "decoded volume {:?}: {}x{}x{} voxels, range [{:.1}, {:.1}]",
            name,
            meta.dimensions[0],
            meta.dimensions[1],
            meta.dimensions[2],
            meta.value_range.0,
            meta.value_range.1
        );

        self.scene = Scene {
            colormap: defaults.colormap,
            opacity: defaults.opacity,
            crosshair: meta.center(),
            window: meta.value_range,
            ..Scene::default()
        };
        self.volume = Some(LoadedVolume { data: array, meta });
        self.frame = None;
        self.mark_dirty();
        Ok(meta)
    }

    fn set_slice_mode(&mut self, mode: ViewMode) {
        if self.scene.mode != mode {
            self.scene.mode = mode;
            self.mark_dirty();
        }
    }

    fn set_crosshair(&mut self, position: [u32; 3]) {
        if self.scene.crosshair != position {
            self.scene.crosshair = position;
            self.mark_dirty();
        }
    }

    fn set_clip_plane(&mut self, plane: ClipPlane) {
        self.scene.clip_plane = plane;
        self.mark_dirty();
    }

    fn set_render_orientation(&mut self, azimuth: f32, elevation: f32) {
        self.scene.azimuth = azimuth;
        self.scene.elevation = elevation;
        self.mark_dirty();
    }

    fn set_colormap(&mut self, colormap: Colormap) {
        if self.scene.colormap != colormap {
            self.scene.colormap = colormap;
            self.mark_dirty();
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.scene.opacity = opacity.clamp(0.0, 1.0);
        self.mark_dirty();
    }

    fn set_intensity_window(&mut self, low: f32, high: f32) {
        self.scene.window = (low, high);
        self.mark_dirty();
    }

    fn set_zoom(&mut self, factor: f32) {
        self.scene.zoom = factor;
        // Zoom is applied by the presentation layer when blitting the
        // frame; no re-rasterization needed.
    }

    fn draw_scene(&mut self) {
        if !self.dirty {
            return;
        }
        self.frame = self.volume.as_ref().map(|volume| match self.scene.mode {
            ViewMode::Planar2D => self.compose_planar(volume),
            ViewMode::Render3D => self.compose_render3d(volume),
        });
        self.dirty = false;
    }

    fn release(&mut self) {
        self.volume = None;
        self.frame = None;
        self.dirty = false;
    }
}

/// Check if bytes are gzip compressed.
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
        assert!(!is_gzip(&[0x00, 0x00]));
        assert!(!is_gzip(&[0x1f]));
        assert!(!is_gzip(b"not a volume"));
    }

    #[test]
    fn test_load_requires_surface() {
        let mut engine = NiftiEngine::new();
        let err = engine
            .load_volume("scan.nii", &[0u8; 16], &DisplayDefaults::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::NotAttached));
    }

    #[test]
    fn test_dcm_payload_reports_unsupported() {
        let mut engine = NiftiEngine::new();
        engine.resize(640, 480);
        let err = engine
            .load_volume("series.dcm", &[0u8; 16], &DisplayDefaults::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_garbage_bytes_fail_decode() {
        let mut engine = NiftiEngine::new();
        engine.resize(640, 480);
        let err = engine
            .load_volume("scan.nii", b"definitely not nifti", &DisplayDefaults::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Nifti(_)));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut engine = NiftiEngine::new();
        engine.resize(640, 480);
        engine.release();
        engine.release();
        assert!(engine.frame().is_none());
    }

    #[test]
    fn test_draw_without_volume_produces_no_frame() {
        let mut engine = NiftiEngine::new();
        engine.resize(640, 480);
        engine.set_colormap(Colormap::Hot);
        engine.draw_scene();
        assert!(engine.frame().is_none());
    }
}
