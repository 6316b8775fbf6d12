//! Global constants for the voxview application.

/// Zoom constants.
pub mod zoom {
    /// Multiplier applied by a zoom-in step.
    pub const FACTOR_IN: f32 = 1.2;
    /// Multiplier applied by a zoom-out step.
    pub const FACTOR_OUT: f32 = 0.8;
    /// Lowest zoom factor the view state will hold.
    pub const MIN: f32 = 0.01;
    /// Highest zoom factor the view state will hold.
    pub const MAX: f32 = 100.0;
}

/// Window sizing for the native shell.
pub mod window {
    /// Default window size (width, height) in logical pixels.
    pub const DEFAULT_SIZE: [f32; 2] = [1280.0, 860.0];
    /// Minimum window size in logical pixels.
    pub const MIN_SIZE: [f32; 2] = [720.0, 480.0];
}

/// Default display parameters applied to a freshly loaded volume.
pub mod display {
    /// Default volume opacity.
    pub const OPACITY: f32 = 1.0;
}

/// How long a transient alert (e.g. a failed download) stays on screen, in seconds.
pub const ALERT_DURATION_SECS: f64 = 5.0;

/// Default capacity of the volume source byte cache, in bytes (256 MiB).
pub const DEFAULT_CACHE_CAPACITY: usize = 256 * 1024 * 1024;
