//! Colormaps and color utility functions.
//!
//! Each colormap maps a normalized intensity in `[0, 1]` to an RGB
//! triple. The perceptual maps (viridis, plasma) use small control-point
//! tables with linear interpolation, which is plenty for 8-bit display.

use serde::{Deserialize, Serialize};

/// The fixed set of colormaps the viewer offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Linear grayscale (display default).
    #[default]
    Grayscale,
    /// Bone: gray with a cold blue cast, common for CT.
    Bone,
    /// Black-red-yellow-white heat ramp.
    Hot,
    /// Cyan-to-magenta ramp.
    Cool,
    /// Perceptually uniform viridis.
    Viridis,
    /// Perceptually uniform plasma.
    Plasma,
    /// Classic blue-cyan-yellow-red rainbow.
    Jet,
}

impl Colormap {
    /// All selectable colormaps, in display order.
    pub fn all() -> &'static [Colormap] {
        &[
            Colormap::Grayscale,
            Colormap::Bone,
            Colormap::Hot,
            Colormap::Cool,
            Colormap::Viridis,
            Colormap::Plasma,
            Colormap::Jet,
        ]
    }

    /// Display name for UI lists.
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Grayscale => "Grayscale",
            Colormap::Bone => "Bone",
            Colormap::Hot => "Hot",
            Colormap::Cool => "Cool",
            Colormap::Viridis => "Viridis",
            Colormap::Plasma => "Plasma",
            Colormap::Jet => "Jet",
        }
    }

    /// Sample the map at a normalized intensity.
    ///
    /// `t` is clamped to `[0, 1]`; returns RGB components in `0..=255`.
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (r, g, b) = match self {
            Colormap::Grayscale => (t, t, t),
            Colormap::Bone => {
                // Gray ramp with the green/blue channels pulled slightly ahead.
                let r = (t * 0.89).min(1.0);
                let g = (t * 0.97).min(1.0);
                let b = (t * 1.14).min(1.0);
                (r, g, b)
            }
            Colormap::Hot => {
                let r = (t * 3.0).min(1.0);
                let g = ((t - 1.0 / 3.0) * 3.0).clamp(0.0, 1.0);
                let b = ((t - 2.0 / 3.0) * 3.0).clamp(0.0, 1.0);
                (r, g, b)
            }
            Colormap::Cool => (t, 1.0 - t, 1.0),
            Colormap::Viridis => interpolate(&VIRIDIS, t),
            Colormap::Plasma => interpolate(&PLASMA, t),
            Colormap::Jet => {
                // Hue sweep from blue (240°) to red (0°).
                hsv_to_rgb((1.0 - t) * 240.0, 1.0, 1.0)
            }
        };
        [
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        ]
    }

    /// Precompute a 256-entry lookup table for per-pixel mapping.
    pub fn lut(&self) -> [[u8; 3]; 256] {
        let mut table = [[0u8; 3]; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = self.sample(i as f32 / 255.0);
        }
        table
    }
}

/// Viridis control points (normalized RGB, evenly spaced).
const VIRIDIS: [(f32, f32, f32); 6] = [
    (0.267, 0.005, 0.329),
    (0.254, 0.265, 0.530),
    (0.164, 0.471, 0.558),
    (0.128, 0.667, 0.524),
    (0.478, 0.821, 0.318),
    (0.993, 0.906, 0.144),
];

/// Plasma control points (normalized RGB, evenly spaced).
const PLASMA: [(f32, f32, f32); 6] = [
    (0.050, 0.030, 0.528),
    (0.418, 0.001, 0.658),
    (0.693, 0.165, 0.564),
    (0.881, 0.392, 0.383),
    (0.988, 0.652, 0.211),
    (0.940, 0.975, 0.131),
];

/// Linearly interpolate between evenly spaced control points.
fn interpolate(points: &[(f32, f32, f32)], t: f32) -> (f32, f32, f32) {
    let last = points.len() - 1;
    let pos = t * last as f32;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f32;
    let (r0, g0, b0) = points[lo];
    let (r1, g1, b1) = points[hi];
    (
        r0 + (r1 - r0) * frac,
        g0 + (g1 - g0) * frac,
        b0 + (b1 - b0) * frac,
    )
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_red() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_blue() {
        let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
        assert!(r.abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!((b - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_grayscale_endpoints() {
        assert_eq!(Colormap::Grayscale.sample(0.0), [0, 0, 0]);
        assert_eq!(Colormap::Grayscale.sample(1.0), [255, 255, 255]);
        assert_eq!(Colormap::Grayscale.sample(0.5), [128, 128, 128]);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        assert_eq!(Colormap::Hot.sample(-3.0), Colormap::Hot.sample(0.0));
        assert_eq!(Colormap::Hot.sample(7.0), Colormap::Hot.sample(1.0));
        // NaN maps to the low end rather than poisoning the LUT.
        assert_eq!(Colormap::Viridis.sample(f32::NAN), Colormap::Viridis.sample(0.0));
    }

    #[test]
    fn test_jet_sweeps_blue_to_red() {
        let low = Colormap::Jet.sample(0.0);
        let high = Colormap::Jet.sample(1.0);
        assert!(low[2] > low[0], "jet low end should be blue: {low:?}");
        assert!(high[0] > high[2], "jet high end should be red: {high:?}");
    }

    #[test]
    fn test_lut_matches_sample() {
        let lut = Colormap::Plasma.lut();
        assert_eq!(lut[0], Colormap::Plasma.sample(0.0));
        assert_eq!(lut[255], Colormap::Plasma.sample(1.0));
        assert_eq!(lut[128], Colormap::Plasma.sample(128.0 / 255.0));
    }

    #[test]
    fn test_all_maps_have_unique_names() {
        let names: Vec<_> = Colormap::all().iter().map(|c| c.name()).collect();
        let mut dedup = names.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(names.len(), dedup.len());
    }
}
