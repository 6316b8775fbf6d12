//! Error types for volume loading and viewer orchestration.

use thiserror::Error;

/// Errors produced while fetching volume bytes from a source.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Network request failed (connection, DNS, TLS, non-2xx status).
    #[error("request failed: {0}")]
    Request(String),

    /// Local file read or write failed.
    #[error("file access failed: {0}")]
    File(String),
}

/// Errors produced by a render engine while decoding or presenting a volume.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The byte payload is not a format this engine can decode.
    #[error("unsupported volume format: {0}")]
    UnsupportedFormat(String),

    /// NIfTI parse or volume conversion error.
    #[error("NIfTI decode failed: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// Decoded data violates a volume invariant (empty axis, bad voxel size).
    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    /// The engine has no drawable surface bound.
    #[error("no drawable surface bound to engine")]
    NotAttached,
}

/// Top-level errors reported by the viewer controller.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Required input was missing at activation time; no load was attempted.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// Volume fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Volume decode failed inside the render engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The auxiliary file download failed.
    #[error("download failed: {0}")]
    Download(String),

    /// The load did not complete within the configured timeout.
    #[error("volume load timed out after {0} seconds")]
    LoadTimeout(u64),
}
