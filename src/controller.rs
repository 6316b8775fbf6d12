//! Volume view controller: lifecycle, load supersession, and the
//! interaction operations.
//!
//! The controller owns the render engine, the view state, and the load
//! generation counter. The volume fetch is the single asynchronous
//! operation: it runs on a worker thread and reports back over a
//! channel tagged with the generation captured at load start, so a
//! superseded load's late result is discarded rather than applied.

use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::cache::SourceCache;
use crate::colormap::Colormap;
use crate::engine::{ClipPlane, DisplayDefaults, RenderEngine};
use crate::error::{FetchError, ViewerError};
use crate::model::{Orientation, PanelKind, Phase, ViewMode, ViewState, VolumeMetadata};
use crate::source::{save_payload, VolumeFetcher};

/// Outcome of one fetch attempt, tagged with its load generation.
struct FetchOutcome {
    generation: u64,
    result: Result<Vec<u8>, FetchError>,
}

/// An in-flight load.
struct PendingLoad {
    generation: u64,
    started: Instant,
    url: String,
    name: String,
}

/// Orchestrates one drawable surface, one render engine, and at most
/// one loaded volume.
pub struct ViewerController<E: RenderEngine> {
    engine: E,
    fetcher: Arc<dyn VolumeFetcher>,
    cache: SourceCache,
    view: ViewState,
    metadata: Option<VolumeMetadata>,
    volume_url: Option<String>,
    volume_name: String,
    generation: u64,
    pending: Option<PendingLoad>,
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    load_timeout: Option<Duration>,
    needs_redraw: bool,
    released: bool,
    on_load_complete: Option<Box<dyn FnMut()>>,
    on_error: Option<Box<dyn FnMut(&str)>>,
}

impl<E: RenderEngine> ViewerController<E> {
    /// Create a controller around an engine and a fetcher. The engine
    /// should be bound to a surface (via `resize`) before `activate`.
    pub fn new(engine: E, fetcher: Arc<dyn VolumeFetcher>) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            engine,
            fetcher,
            cache: SourceCache::default(),
            view: ViewState::default(),
            metadata: None,
            volume_url: None,
            volume_name: String::new(),
            generation: 0,
            pending: None,
            outcome_tx,
            outcome_rx,
            load_timeout: None,
            needs_redraw: false,
            released: false,
            on_load_complete: None,
            on_error: None,
        }
    }

    /// Substitute the source cache (tests inject a fresh instance).
    pub fn with_cache(mut self, cache: SourceCache) -> Self {
        self.cache = cache;
        self
    }

    /// Configure the optional load timeout. `None` (the default) lets a
    /// stuck fetch stay in `Loading` until the transport gives up.
    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Callback fired once per successful load.
    pub fn set_on_load_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_load_complete = Some(Box::new(callback));
    }

    /// Callback fired once per failed load attempt.
    pub fn set_on_error(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Metadata of the loaded volume, if any.
    pub fn metadata(&self) -> Option<&VolumeMetadata> {
        self.metadata.as_ref()
    }

    /// Display name of the current volume.
    pub fn volume_name(&self) -> &str {
        &self.volume_name
    }

    /// URL of the current volume, if one was activated.
    pub fn volume_url(&self) -> Option<&str> {
        self.volume_url.as_deref()
    }

    /// The engine, for presentation-layer access (frame readback).
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start loading a volume, superseding any in-flight load.
    ///
    /// The previous volume is fully released before the new fetch
    /// starts; a superseded load's eventual outcome is discarded by
    /// generation check in [`poll`](Self::poll).
    pub fn activate(&mut self, url: &str, name: &str) -> Result<(), ViewerError> {
        if url.trim().is_empty() {
            return self.activation_failure(ViewerError::MissingInput("no volume URL"));
        }
        if self.engine.surface_size().is_none() {
            return self.activation_failure(ViewerError::MissingInput("no drawable surface"));
        }

        // Supersede: bump the generation and tear the old volume down
        // eagerly so stale resources never outlive their load.
        self.generation += 1;
        self.engine.release();
        self.metadata = None;
        self.reset_view_state(Phase::Loading);
        self.volume_url = Some(url.to_string());
        self.volume_name = name.to_string();

        let generation = self.generation;
        self.pending = Some(PendingLoad {
            generation,
            started: Instant::now(),
            url: url.to_string(),
            name: name.to_string(),
        });

        if let Some(bytes) = self.cache.lookup(url) {
            log::info!("volume {url:?} served from source cache ({} bytes)", bytes.len());
            let _ = self.outcome_tx.send(FetchOutcome {
                generation,
                result: Ok(bytes.to_vec()),
            });
            return Ok(());
        }

        log::info!("loading volume {url:?} (generation {generation})");
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.outcome_tx.clone();
        let url = url.to_string();
        thread::Builder::new()
            .name("volume-fetch".into())
            .spawn(move || {
                let result = fetcher.fetch(&url);
                // The controller may be gone; a dead channel is fine.
                let _ = tx.send(FetchOutcome { generation, result });
            })
            .map_err(|e| ViewerError::Download(e.to_string()))?;
        Ok(())
    }

    /// Re-run the full activation sequence for the current URL.
    pub fn reload(&mut self) -> Result<(), ViewerError> {
        let (url, name) = match &self.volume_url {
            Some(url) => (url.clone(), self.volume_name.clone()),
            None => return Err(ViewerError::MissingInput("no volume URL")),
        };
        // A reload should observe the backend, not the cache.
        self.cache.remove(&url);
        self.activate(&url, &name)
    }

    /// Drain fetch outcomes and the load timeout. Call once per frame.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if outcome.generation != self.generation {
                log::debug!(
                    "discarding outcome for superseded load generation {}",
                    outcome.generation
                );
                continue;
            }
            self.complete_load(outcome.result);
        }

        if let (Some(timeout), Some(pending)) = (self.load_timeout, self.pending.as_ref()) {
            if self.view.phase == Phase::Loading && pending.started.elapsed() > timeout {
                // Supersede the stuck fetch so its late outcome is discarded.
                self.generation += 1;
                let err = ViewerError::LoadTimeout(timeout.as_secs());
                self.fail_load(err.to_string());
            }
        }
    }

    fn complete_load(&mut self, result: Result<Vec<u8>, FetchError>) {
        let pending = match self.pending.take() {
            Some(p) => p,
            None => return,
        };
        match result {
            Ok(bytes) => {
                let defaults = DisplayDefaults::default();
                match self.engine.load_volume(&pending.name, &bytes, &defaults) {
                    Ok(meta) => {
                        self.cache.populate(&pending.url, bytes);
                        self.view.apply_load_defaults(&meta);
                        self.engine.set_slice_mode(ViewMode::Planar2D);
                        self.engine.set_crosshair(self.view.slice.crosshair());
                        let (lo, hi) = meta.value_range;
                        self.engine.set_intensity_window(lo, hi);
                        self.engine.set_colormap(self.view.colormap);
                        self.engine.set_opacity(self.view.effective_opacity());
                        self.metadata = Some(meta);
                        self.needs_redraw = true;
                        log::info!(
                            "volume {:?} ready: {:?} voxels",
                            pending.name,
                            meta.dimensions
                        );
                        if let Some(callback) = self.on_load_complete.as_mut() {
                            callback();
                        }
                    }
                    Err(e) => self.fail_load(e.to_string()),
                }
            }
            Err(e) => self.fail_load(e.to_string()),
        }
    }

    fn fail_load(&mut self, message: String) {
        log::error!("volume load failed: {message}");
        self.pending = None;
        self.metadata = None;
        self.engine.release();
        self.view.phase = Phase::Error;
        self.view.error_message = Some(message.clone());
        if let Some(callback) = self.on_error.as_mut() {
            callback(&message);
        }
    }

    fn activation_failure(&mut self, error: ViewerError) -> Result<(), ViewerError> {
        let message = error.to_string();
        log::error!("activation rejected: {message}");
        self.view.phase = Phase::Error;
        self.view.error_message = Some(message.clone());
        if let Some(callback) = self.on_error.as_mut() {
            callback(&message);
        }
        Err(error)
    }

    /// Fresh view state for a new activation; fullscreen and panel
    /// visibility are presentation state that survives reloads.
    fn reset_view_state(&mut self, phase: Phase) {
        let fullscreen = self.view.fullscreen;
        let panels = std::mem::take(&mut self.view.panels);
        self.view = ViewState {
            phase,
            fullscreen,
            panels,
            ..ViewState::default()
        };
    }

    /// Release the engine's bound context. Safe in any phase; only the
    /// first call does work.
    pub fn teardown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.pending = None;
        self.metadata = None;
        self.engine.release();
        log::debug!("viewer controller torn down");
    }

    // ------------------------------------------------------------------
    // Interaction operations (all gated on Phase::Ready)
    // ------------------------------------------------------------------

    fn ready(&self, operation: &str) -> bool {
        if self.view.interactive() {
            true
        } else {
            log::debug!("{operation} ignored outside Ready phase");
            false
        }
    }

    /// Switch between 2D multiplanar and 3D raycast rendering.
    pub fn toggle_view_mode(&mut self) {
        if !self.ready("toggle_view_mode") {
            return;
        }
        let mode = self.view.toggle_mode();
        self.engine.set_slice_mode(mode);
        self.needs_redraw = true;
        log::debug!("view mode now {mode:?}");
    }

    /// Reset the view for the current mode. Idempotent.
    pub fn reset_view(&mut self) {
        if !self.ready("reset_view") {
            return;
        }
        let Some(meta) = self.metadata else { return };
        match self.view.mode {
            ViewMode::Planar2D => {
                self.view.center_slices(&meta);
                self.engine.set_crosshair(self.view.slice.crosshair());
            }
            ViewMode::Render3D => {
                self.engine.set_render_orientation(0.0, 0.0);
                self.engine.set_clip_plane(ClipPlane::default());
            }
        }
        self.needs_redraw = true;
    }

    /// Step one slice along `axis`. Planar mode only; saturates at the
    /// volume bounds. A clamped step is a successful no-op.
    pub fn change_slice(&mut self, axis: Orientation, delta: i32) {
        if !self.ready("change_slice") {
            return;
        }
        if self.view.mode != ViewMode::Planar2D {
            log::debug!("change_slice ignored in 3D render mode");
            return;
        }
        let Some(meta) = self.metadata else { return };
        self.view.step_slice(axis, delta, &meta);
        self.engine.set_crosshair(self.view.slice.crosshair());
        self.needs_redraw = true;
    }

    /// Jump to an absolute slice index (slider scrubbing), clamped.
    pub fn set_slice(&mut self, axis: Orientation, index: u32) {
        if !self.ready("set_slice") {
            return;
        }
        if self.view.mode != ViewMode::Planar2D {
            return;
        }
        let Some(meta) = self.metadata else { return };
        self.view.set_slice(axis, index, &meta);
        self.engine.set_crosshair(self.view.slice.crosshair());
        self.needs_redraw = true;
    }

    /// Multiply zoom by the zoom-in factor.
    pub fn zoom_in(&mut self) {
        self.zoom_by(crate::constants::zoom::FACTOR_IN);
    }

    /// Multiply zoom by the zoom-out factor.
    pub fn zoom_out(&mut self) {
        self.zoom_by(crate::constants::zoom::FACTOR_OUT);
    }

    fn zoom_by(&mut self, factor: f32) {
        if !self.ready("zoom") {
            return;
        }
        let zoom = self.view.zoom_by(factor);
        self.engine.set_zoom(zoom);
        self.needs_redraw = true;
        log::debug!("zoom now {zoom:.2}x");
    }

    /// Switch colormap.
    pub fn set_colormap(&mut self, colormap: Colormap) {
        if !self.ready("set_colormap") {
            return;
        }
        self.view.colormap = colormap;
        self.engine.set_colormap(colormap);
        self.needs_redraw = true;
    }

    /// Set opacity (clamped). Applied live only while the volume is visible.
    pub fn set_opacity(&mut self, value: f32) {
        if !self.ready("set_opacity") {
            return;
        }
        self.view.set_opacity(value);
        if self.view.volume_visible {
            self.engine.set_opacity(self.view.opacity);
        }
        self.needs_redraw = true;
    }

    /// Hide/show the volume, preserving the stored opacity.
    pub fn toggle_volume_visibility(&mut self) {
        if !self.ready("toggle_volume_visibility") {
            return;
        }
        let effective = self.view.toggle_visibility();
        self.engine.set_opacity(effective);
        self.needs_redraw = true;
    }

    /// Set window center/width and push the derived bounds to the engine.
    pub fn set_window_level(&mut self, center: f32, width: f32) {
        if !self.ready("set_window_level") {
            return;
        }
        let (lo, hi) = self.view.set_window_level(center, width);
        self.engine.set_intensity_window(lo, hi);
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Presentation plumbing
    // ------------------------------------------------------------------

    /// Record the platform-reported fullscreen state. The platform may
    /// deny a request or exit on its own, so the flag is reconciled,
    /// never assumed.
    pub fn reconcile_fullscreen(&mut self, actual: bool) {
        if self.view.fullscreen != actual {
            log::debug!("fullscreen now {actual}");
            self.view.fullscreen = actual;
        }
    }

    /// The fullscreen state a toggle request should ask the platform for.
    pub fn fullscreen_target(&self) -> bool {
        !self.view.fullscreen
    }

    /// Toggle an auxiliary panel. No redraw: panels do not touch the scene.
    pub fn toggle_panel(&mut self, panel: PanelKind) {
        self.view.toggle_panel(panel);
    }

    /// Tell the engine about a layout-driven surface size change.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
        self.needs_redraw = true;
    }

    /// Draw at most once for all state changes since the last call.
    /// Returns whether a draw was issued.
    pub fn flush_redraw(&mut self) -> bool {
        if self.needs_redraw {
            self.engine.draw_scene();
            self.needs_redraw = false;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Auxiliary download
    // ------------------------------------------------------------------

    /// Re-fetch the current volume and save it to `path`. Uses the
    /// source cache when the payload is still present.
    pub fn download_original(&mut self, path: &Path) -> Result<(), ViewerError> {
        let url = self
            .volume_url
            .clone()
            .ok_or(ViewerError::MissingInput("no volume URL"))?;

        if let Some(bytes) = self.cache.lookup(&url) {
            save_payload(path, bytes)?;
            log::info!("saved cached volume payload to {path:?}");
            return Ok(());
        }

        let bytes = self.fetcher.fetch(&url)?;
        save_payload(path, &bytes)?;
        self.cache.populate(&url, bytes);
        log::info!("downloaded volume to {path:?}");
        Ok(())
    }
}

impl<E: RenderEngine> Drop for ViewerController<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
