//! Application driver
//!
//! Owns the per-session components and wires them together: a collection
//! or folder feeds the background scan, the completed scan feeds the
//! ordering strategy, the ordered pool feeds the navigation session, and
//! the auto-advance timer drives it forward once per second.

use glimpse_core::{
    dominant_color_of_file, load_for_display, order_images, AppConfig, AppError, AutoAdvanceTimer,
    BackgroundMode, NavigationSession, SortMethod, Tick, Transforms, Zoom,
};
use glimpse_fs::{scan_roots, ScanEvent, ScanWorker};
use glimpse_store::{Collection, CollectionStore};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Why an image is being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayReason {
    /// The user asked for a new image
    UserInitiated,
    /// The auto-advance timer fired
    Automatic,
    /// Back/forward/history replay of an image already shown
    Replay,
}

/// Bounded wait for a superseded scan worker to stop
const SCAN_STOP_TIMEOUT: Duration = Duration::from_secs(3);

/// Ordering settings the in-flight scan will be ordered with
struct PendingSource {
    sort_method: SortMethod,
    sort_descending: bool,
}

pub struct App {
    config: AppConfig,
    store: CollectionStore,
    session: NavigationSession,
    timer: AutoAdvanceTimer,
    transforms: Transforms,
    zoom: Zoom,
    scan: Option<ScanWorker>,
    pending: Option<PendingSource>,
    /// Sampled backdrop color while the adaptive mode is active
    background: Option<[u8; 3]>,
}

impl App {
    pub fn new(config: AppConfig, store: CollectionStore) -> Self {
        let mut timer = AutoAdvanceTimer::new();
        if config.timer.auto_advance {
            timer.enable(config.timer.interval_seconds);
        }

        let transforms = Transforms {
            grayscale: config.viewer.grayscale,
            ..Default::default()
        };

        Self {
            config,
            store,
            session: NavigationSession::empty(),
            timer,
            transforms,
            zoom: Zoom::new(),
            scan: None,
            pending: None,
            background: None,
        }
    }

    // ----- sources -----

    /// Start viewing a single folder (random order, like quick shuffle)
    pub fn open_folder(&mut self, folder: PathBuf) {
        self.config.general.last_folder = Some(folder.clone());
        self.save_config();
        self.start_scan(vec![folder], SortMethod::Random, false);
    }

    /// Open a named collection, stamping its recency first
    pub fn open_collection(&mut self, name: &str) -> Result<Collection, AppError> {
        let mut collection = self.store.load(name)?;
        self.store.mark_used(&mut collection)?;
        self.start_scan(
            collection.paths.clone(),
            collection.sort_method,
            collection.sort_descending,
        );
        Ok(collection)
    }

    fn start_scan(&mut self, roots: Vec<PathBuf>, sort_method: SortMethod, sort_descending: bool) {
        // One scan per session: supersede any in-flight worker first
        if let Some(mut worker) = self.scan.take() {
            if !worker.cancel_and_wait(SCAN_STOP_TIMEOUT) {
                tracing::warn!("Superseded scan worker did not stop in time");
            }
        }

        self.session
            .reset(Vec::new(), sort_method == SortMethod::Random);
        self.background = None;
        self.pending = Some(PendingSource {
            sort_method,
            sort_descending,
        });
        self.scan = Some(ScanWorker::spawn(roots));
    }

    /// Drain scan worker events. Returns true when the pool changed.
    pub fn pump_scan(&mut self) -> bool {
        let Some(worker) = &self.scan else {
            return false;
        };

        let mut completed = None;
        let mut cancelled = false;
        while let Some(event) = worker.try_event() {
            match event {
                ScanEvent::Progress {
                    found,
                    estimated_total,
                    current_dir,
                } => {
                    tracing::debug!(
                        "Scanning {}: {}/{} images",
                        current_dir.display(),
                        found,
                        estimated_total
                    );
                }
                ScanEvent::Completed(images) => completed = Some(images),
                ScanEvent::Cancelled => cancelled = true,
            }
        }

        if cancelled {
            self.scan = None;
            self.pending = None;
            tracing::info!("Scan cancelled; no images loaded");
            return false;
        }

        let Some(images) = completed else {
            return false;
        };
        self.scan = None;

        let Some(pending) = self.pending.take() else {
            return false;
        };

        if images.is_empty() {
            // A valid terminal state the UI renders distinctly
            self.session.reset(Vec::new(), true);
            tracing::info!("No images found in the selected folders");
            return true;
        }

        let random = pending.sort_method == SortMethod::Random;
        let pool = order_images(images, pending.sort_method, pending.sort_descending);
        tracing::info!("Session pool ready: {} images", pool.len());
        self.session.reset(pool, random);

        // First image comes up on its own, with a fresh countdown
        self.advance(DisplayReason::Automatic);
        self.timer.notify_manual_navigation();
        true
    }

    // ----- navigation -----

    /// Next image: forward replay when the cursor is behind the tip,
    /// otherwise a new draw
    pub fn show_next(&mut self) {
        let replaying = match self.session.cursor() {
            Some(cursor) => cursor + 1 < self.session.history().len(),
            None => false,
        };
        let reason = if replaying {
            DisplayReason::Replay
        } else {
            DisplayReason::UserInitiated
        };

        if let Some(path) = self.session.next().map(Path::to_path_buf) {
            self.display(&path, reason);
        }
    }

    pub fn show_previous(&mut self) {
        if let Some(path) = self.session.previous().map(Path::to_path_buf) {
            self.display(&path, DisplayReason::Replay);
        }
    }

    /// History-panel click. Returns false when the path is not in history.
    pub fn jump_to(&mut self, path: &Path) -> bool {
        match self.session.jump_to(path).map(Path::to_path_buf) {
            Some(found) => {
                self.display(&found, DisplayReason::Replay);
                true
            }
            None => {
                tracing::warn!("Not in history: {}", path.display());
                false
            }
        }
    }

    fn advance(&mut self, reason: DisplayReason) {
        if let Some(path) = self.session.advance().map(Path::to_path_buf) {
            self.display(&path, reason);
        }
    }

    /// One second elapsed: drive the timer, then the scan pump
    pub fn tick(&mut self) {
        if self.timer.on_tick() == Tick::Advance {
            self.advance(DisplayReason::Automatic);
        }
        self.pump_scan();
    }

    /// Hand the chosen image to the display collaborator
    fn display(&mut self, path: &Path, reason: DisplayReason) {
        // Flips are per-image; grayscale persists as a setting
        self.transforms.flip_horizontal = false;
        self.transforms.flip_vertical = false;

        if self.config.viewer.background == BackgroundMode::Adaptive {
            self.background = dominant_color_of_file(path);
        }

        match reason {
            DisplayReason::Automatic => {}
            DisplayReason::UserInitiated | DisplayReason::Replay => {
                self.timer.notify_manual_navigation();
            }
        }

        tracing::info!(?reason, "Showing {}", path.display());
    }

    /// Decoded current image with the active transforms applied,
    /// for the rendering surface
    pub fn current_display_image(&self) -> Result<Option<DynamicImage>, AppError> {
        match self.session.current() {
            Some(path) => Ok(Some(load_for_display(path, self.transforms)?)),
            None => Ok(None),
        }
    }

    // ----- timer controls -----

    pub fn enable_timer(&mut self, interval_seconds: u32) {
        self.timer.enable(interval_seconds);
        self.config.timer.auto_advance = true;
        self.config.timer.interval_seconds = self.timer.interval_seconds();
        self.save_config();
    }

    pub fn disable_timer(&mut self) {
        self.timer.disable();
        self.config.timer.auto_advance = false;
        self.save_config();
    }

    pub fn toggle_pause(&mut self) {
        match self.timer.state() {
            glimpse_core::TimerState::Running => self.timer.pause(),
            glimpse_core::TimerState::Paused => self.timer.resume(),
            glimpse_core::TimerState::Disabled => {}
        }
    }

    pub fn set_timer_interval(&mut self, interval_seconds: u32) {
        self.timer.set_interval(interval_seconds);
        self.config.timer.interval_seconds = self.timer.interval_seconds();
        self.save_config();
    }

    // ----- transforms -----

    pub fn flip_horizontal(&mut self) {
        self.transforms.flip_horizontal = !self.transforms.flip_horizontal;
    }

    pub fn flip_vertical(&mut self) {
        self.transforms.flip_vertical = !self.transforms.flip_vertical;
    }

    pub fn toggle_grayscale(&mut self) {
        self.transforms.grayscale = !self.transforms.grayscale;
        self.config.viewer.grayscale = self.transforms.grayscale;
        self.save_config();
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    pub fn toggle_history_panel(&mut self) {
        self.config.general.show_history_panel = !self.config.general.show_history_panel;
        self.save_config();
    }

    // ----- collections -----

    /// Create a collection, counting its images up front to seed the
    /// cached total
    pub fn create_collection(
        &mut self,
        name: &str,
        paths: Vec<PathBuf>,
        sort_method: SortMethod,
        sort_descending: bool,
    ) -> Result<Collection, AppError> {
        let mut collection = self
            .store
            .create(name, paths, sort_method, sort_descending)?;

        let count = scan_roots(&collection.paths, &AtomicBool::new(false), None)
            .map(|images| images.len())
            .unwrap_or(0);
        self.store.set_image_count(&mut collection, count)?;

        Ok(collection)
    }

    /// Edit a collection's folders and ordering; a structural change
    /// refreshes the cached image count
    pub fn update_collection(
        &mut self,
        name: &str,
        paths: Vec<PathBuf>,
        sort_method: SortMethod,
        sort_descending: bool,
    ) -> Result<Collection, AppError> {
        let mut collection = self.store.load(name)?;

        let mut deduped: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !deduped.contains(&path) {
                deduped.push(path);
            }
        }

        collection.paths = deduped;
        collection.sort_method = sort_method;
        collection.sort_descending = sort_descending;
        collection.image_count = scan_roots(&collection.paths, &AtomicBool::new(false), None)
            .map(|images| images.len())
            .unwrap_or(0);

        self.store.save(&collection)?;
        Ok(collection)
    }

    pub fn delete_collection(&mut self, name: &str) -> Result<(), AppError> {
        Ok(self.store.delete(name)?)
    }

    pub fn list_collections(&self) -> Result<Vec<Collection>, AppError> {
        Ok(self.store.list_all()?)
    }

    /// Rename = delete-old + create-new at the same identity boundary,
    /// with a best-effort rollback when the second step fails
    pub fn rename_collection(&mut self, old: &str, new: &str) -> Result<Collection, AppError> {
        let existing = self.store.load(old)?;
        if self.store.exists(new)? {
            return Err(AppError::CollectionExists(new.to_string()));
        }

        self.store.delete(old)?;
        match self
            .store
            .create(new, existing.paths.clone(), existing.sort_method, existing.sort_descending)
        {
            Ok(renamed) => Ok(renamed),
            Err(e) => {
                let _ = self.store.create(
                    old,
                    existing.paths,
                    existing.sort_method,
                    existing.sort_descending,
                );
                Err(e.into())
            }
        }
    }

    // ----- accessors -----

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&Path> {
        self.session.current()
    }

    pub fn history(&self) -> &[PathBuf] {
        self.session.history()
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn timer(&self) -> &AutoAdvanceTimer {
        &self.timer
    }

    pub fn transforms(&self) -> Transforms {
        self.transforms
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn background(&self) -> Option<[u8; 3]> {
        self.background
    }

    pub fn scan_in_flight(&self) -> bool {
        self.scan.is_some()
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::warn!("Could not save configuration: {}", e);
        }
    }
}
