//! voxview - Volumetric scan viewer
//!
//! A desktop viewer for CBCT/MRI volumes in NIfTI format: multiplanar
//! 2D slice views and a 3D render mode, driven by a controller that
//! owns the load lifecycle and view state.

pub mod cache;
pub mod colormap;
pub mod config;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod message;
pub mod model;
pub mod source;
pub mod ui;

pub use controller::ViewerController;
pub use ui::ViewerApp;
