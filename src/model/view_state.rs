//! Mutable view state owned by the viewer controller.
//!
//! `ViewState` is the single source of truth for both the render engine
//! calls and the UI. All mutators clamp rather than error: out-of-range
//! interaction input is a normal event, not a failure.

use std::collections::BTreeSet;

use crate::colormap::Colormap;
use crate::constants::zoom;
use crate::model::VolumeMetadata;

/// Lifecycle phase of the current activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// A load is in flight; interaction is disabled.
    #[default]
    Loading,
    /// Volume is loaded; interaction handlers may mutate state.
    Ready,
    /// The load failed; only reload/download remain available.
    Error,
}

/// Rendering strategy. The two modes are mutually exclusive in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Axial/coronal/sagittal 2D slice views.
    #[default]
    Planar2D,
    /// Volumetric raycast rendering.
    Render3D,
}

/// Anatomical slice orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Top-down slices (z axis).
    Axial,
    /// Front-back slices (y axis).
    Coronal,
    /// Left-right slices (x axis).
    Sagittal,
}

impl Orientation {
    /// All orientations in UI order.
    pub fn all() -> &'static [Orientation] {
        &[
            Orientation::Axial,
            Orientation::Coronal,
            Orientation::Sagittal,
        ]
    }

    /// Display label.
    pub fn name(&self) -> &'static str {
        match self {
            Orientation::Axial => "Axial",
            Orientation::Coronal => "Coronal",
            Orientation::Sagittal => "Sagittal",
        }
    }
}

/// Current slice index per orientation, in voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlicePosition {
    pub axial: u32,
    pub coronal: u32,
    pub sagittal: u32,
}

impl SlicePosition {
    /// Crosshair position in (sagittal, coronal, axial) axis order.
    pub fn crosshair(&self) -> [u32; 3] {
        [self.sagittal, self.coronal, self.axial]
    }

    /// Index along one orientation.
    pub fn get(&self, axis: Orientation) -> u32 {
        match axis {
            Orientation::Axial => self.axial,
            Orientation::Coronal => self.coronal,
            Orientation::Sagittal => self.sagittal,
        }
    }

    fn set(&mut self, axis: Orientation, index: u32) {
        match axis {
            Orientation::Axial => self.axial = index,
            Orientation::Coronal => self.coronal = index,
            Orientation::Sagittal => self.sagittal = index,
        }
    }
}

/// Auxiliary panels the UI can open. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PanelKind {
    Settings,
    Info,
}

/// The controller-owned view state.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Lifecycle phase of the current activation.
    pub phase: Phase,
    /// Human-readable message captured when `phase == Error`.
    pub error_message: Option<String>,
    /// Current rendering mode.
    pub mode: ViewMode,
    /// Current slice indices.
    pub slice: SlicePosition,
    /// Volume opacity in `[0, 1]`. Preserved across visibility toggles.
    pub opacity: f32,
    /// Active colormap.
    pub colormap: Colormap,
    /// Display window center.
    pub window_center: f32,
    /// Display window width.
    pub window_width: f32,
    /// Multiplicative zoom factor.
    pub zoom_factor: f32,
    /// Whether the volume is shown at all (distinct from `opacity == 0`).
    pub volume_visible: bool,
    /// Whether the container is currently fullscreen (platform-reported).
    pub fullscreen: bool,
    /// Currently open auxiliary panels.
    pub panels: BTreeSet<PanelKind>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            error_message: None,
            mode: ViewMode::Planar2D,
            slice: SlicePosition::default(),
            opacity: crate::constants::display::OPACITY,
            colormap: Colormap::default(),
            window_center: 0.5,
            window_width: 1.0,
            zoom_factor: 1.0,
            volume_visible: true,
            fullscreen: false,
            panels: BTreeSet::new(),
        }
    }
}

impl ViewState {
    /// Reset to the post-load defaults for a freshly loaded volume:
    /// Planar2D mode, centered slices, full-range window, zoom 1.
    pub fn apply_load_defaults(&mut self, meta: &VolumeMetadata) {
        let center = meta.center();
        self.phase = Phase::Ready;
        self.error_message = None;
        self.mode = ViewMode::Planar2D;
        self.slice = SlicePosition {
            sagittal: center[0],
            coronal: center[1],
            axial: center[2],
        };
        let (lo, hi) = meta.value_range;
        self.window_center = (lo + hi) / 2.0;
        self.window_width = hi - lo;
        self.zoom_factor = 1.0;
    }

    /// Whether interaction handlers may mutate render state.
    pub fn interactive(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Flip between the two mutually exclusive rendering modes.
    pub fn toggle_mode(&mut self) -> ViewMode {
        self.mode = match self.mode {
            ViewMode::Planar2D => ViewMode::Render3D,
            ViewMode::Render3D => ViewMode::Planar2D,
        };
        self.mode
    }

    /// Step one slice along an orientation, saturating at the volume bounds.
    ///
    /// Returns the new index. A step beyond either bound is a successful
    /// no-op, never an error.
    pub fn step_slice(&mut self, axis: Orientation, delta: i32, meta: &VolumeMetadata) -> u32 {
        let max = meta.dimension(axis).saturating_sub(1);
        let current = self.slice.get(axis) as i64;
        let next = (current + delta as i64).clamp(0, max as i64) as u32;
        self.slice.set(axis, next);
        next
    }

    /// Jump to an absolute slice index, clamped to the volume bounds.
    pub fn set_slice(&mut self, axis: Orientation, index: u32, meta: &VolumeMetadata) -> u32 {
        let max = meta.dimension(axis).saturating_sub(1);
        let next = index.min(max);
        self.slice.set(axis, next);
        next
    }

    /// Re-center all slices on the volume center.
    pub fn center_slices(&mut self, meta: &VolumeMetadata) {
        let center = meta.center();
        self.slice = SlicePosition {
            sagittal: center[0],
            coronal: center[1],
            axial: center[2],
        };
    }

    /// Multiply the zoom factor, clamped to the sane range.
    pub fn zoom_by(&mut self, factor: f32) -> f32 {
        self.zoom_factor = (self.zoom_factor * factor).clamp(zoom::MIN, zoom::MAX);
        self.zoom_factor
    }

    /// Set opacity, clamping out-of-range input.
    pub fn set_opacity(&mut self, value: f32) -> f32 {
        self.opacity = if value.is_nan() {
            self.opacity
        } else {
            value.clamp(0.0, 1.0)
        };
        self.opacity
    }

    /// Flip visibility. Returns the opacity the engine should now use:
    /// 0 when hidden, the preserved `opacity` when shown again.
    pub fn toggle_visibility(&mut self) -> f32 {
        self.volume_visible = !self.volume_visible;
        self.effective_opacity()
    }

    /// The opacity the engine should display right now.
    pub fn effective_opacity(&self) -> f32 {
        if self.volume_visible {
            self.opacity
        } else {
            0.0
        }
    }

    /// Set the intensity window and return the derived display bounds
    /// `[center - width/2, center + width/2]`.
    pub fn set_window_level(&mut self, center: f32, width: f32) -> (f32, f32) {
        self.window_center = center;
        self.window_width = width.max(0.0);
        self.display_bounds()
    }

    /// Derived display intensity bounds.
    pub fn display_bounds(&self) -> (f32, f32) {
        let half = self.window_width / 2.0;
        (self.window_center - half, self.window_center + half)
    }

    /// Toggle a panel open/closed. Returns whether it is now open.
    pub fn toggle_panel(&mut self, panel: PanelKind) -> bool {
        if !self.panels.remove(&panel) {
            self.panels.insert(panel);
            true
        } else {
            false
        }
    }

    /// Whether a panel is currently open.
    pub fn panel_open(&self, panel: PanelKind) -> bool {
        self.panels.contains(&panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(dims: [u32; 3]) -> VolumeMetadata {
        VolumeMetadata::new(dims, [1.0; 3], (0.0, 100.0)).unwrap()
    }

    #[test]
    fn test_load_defaults_center_slices() {
        let mut state = ViewState::default();
        state.apply_load_defaults(&meta([256, 256, 180]));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.mode, ViewMode::Planar2D);
        assert_eq!(state.slice.sagittal, 128);
        assert_eq!(state.slice.coronal, 128);
        assert_eq!(state.slice.axial, 90);
        assert_eq!(state.display_bounds(), (0.0, 100.0));
    }

    #[test]
    fn test_step_slice_saturates_at_zero() {
        let m = meta([64, 64, 120]);
        let mut state = ViewState::default();
        state.apply_load_defaults(&m);
        state.set_slice(Orientation::Axial, 0, &m);
        assert_eq!(state.step_slice(Orientation::Axial, -1, &m), 0);
        assert_eq!(state.slice.axial, 0);
    }

    #[test]
    fn test_step_slice_saturates_at_upper_bound() {
        let m = meta([64, 64, 120]);
        let mut state = ViewState::default();
        state.apply_load_defaults(&m);
        state.set_slice(Orientation::Axial, 119, &m);
        assert_eq!(state.step_slice(Orientation::Axial, 1, &m), 119);
    }

    #[test]
    fn test_step_slice_leaves_other_axes_unchanged() {
        let m = meta([64, 64, 120]);
        let mut state = ViewState::default();
        state.apply_load_defaults(&m);
        let (coronal, sagittal) = (state.slice.coronal, state.slice.sagittal);
        state.step_slice(Orientation::Axial, 1, &m);
        assert_eq!(state.slice.coronal, coronal);
        assert_eq!(state.slice.sagittal, sagittal);
    }

    #[test]
    fn test_set_slice_clamps() {
        let m = meta([64, 64, 120]);
        let mut state = ViewState::default();
        assert_eq!(state.set_slice(Orientation::Coronal, 9999, &m), 63);
    }

    #[test]
    fn test_zoom_is_multiplicative() {
        let mut state = ViewState::default();
        state.zoom_by(1.2);
        state.zoom_by(1.2);
        state.zoom_by(1.2);
        assert!((state.zoom_factor - 1.2f32.powi(3)).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_clamps_to_sane_range() {
        let mut state = ViewState::default();
        for _ in 0..200 {
            state.zoom_by(0.8);
        }
        assert!(state.zoom_factor >= zoom::MIN);
        for _ in 0..400 {
            state.zoom_by(1.2);
        }
        assert!(state.zoom_factor <= zoom::MAX);
    }

    #[test]
    fn test_visibility_preserves_opacity() {
        let mut state = ViewState::default();
        state.set_opacity(0.7);
        assert_eq!(state.toggle_visibility(), 0.0);
        assert_eq!(state.opacity, 0.7);
        assert_eq!(state.toggle_visibility(), 0.7);
        assert!(state.volume_visible);
    }

    #[test]
    fn test_set_opacity_clamps() {
        let mut state = ViewState::default();
        assert_eq!(state.set_opacity(1.5), 1.0);
        assert_eq!(state.set_opacity(-0.2), 0.0);
        // NaN input is ignored rather than stored.
        state.set_opacity(0.4);
        assert_eq!(state.set_opacity(f32::NAN), 0.4);
    }

    #[test]
    fn test_window_level_bounds() {
        let mut state = ViewState::default();
        let bounds = state.set_window_level(40.0, 400.0);
        assert_eq!(bounds, (-160.0, 240.0));
    }

    #[test]
    fn test_double_mode_toggle_is_identity() {
        let mut state = ViewState::default();
        assert_eq!(state.toggle_mode(), ViewMode::Render3D);
        assert_eq!(state.toggle_mode(), ViewMode::Planar2D);
    }

    #[test]
    fn test_panel_toggle() {
        let mut state = ViewState::default();
        assert!(state.toggle_panel(PanelKind::Info));
        assert!(state.panel_open(PanelKind::Info));
        assert!(!state.toggle_panel(PanelKind::Info));
        assert!(!state.panel_open(PanelKind::Info));
    }
}
