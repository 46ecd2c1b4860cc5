//! Background scan worker
//!
//! Runs the locator on one dedicated thread and reports back over a
//! channel. Only one scan runs per session; starting a new one means the
//! caller cancels the previous worker and waits (bounded) for it to stop.

use crate::locator::{self, ScanProgress};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Messages emitted by a running scan
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Progress {
        found: usize,
        estimated_total: usize,
        current_dir: PathBuf,
    },
    /// Terminal: the full result set
    Completed(Vec<PathBuf>),
    /// Terminal: the scan stopped early, partial results discarded
    Cancelled,
}

/// Handle to an in-flight (or finished) background scan
pub struct ScanWorker {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<ScanEvent>,
}

impl ScanWorker {
    /// Spawn a scan over the given roots on a dedicated thread
    pub fn spawn(roots: Vec<PathBuf>) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = unbounded();
        let flag = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || run_scan(roots, flag, tx));

        Self {
            cancel,
            handle: Some(handle),
            events: rx,
        }
    }

    /// Receive the next event without blocking
    pub fn try_event(&self) -> Option<ScanEvent> {
        self.events.try_recv().ok()
    }

    /// Raise the cooperative cancellation flag
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Cancel and wait for the worker thread to acknowledge the stop.
    ///
    /// Returns `false` when the thread did not finish within `timeout`;
    /// the caller should treat the worker as leaked and log it.
    pub fn cancel_and_wait(&mut self, timeout: Duration) -> bool {
        self.cancel();

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                tracing::warn!("Scan worker did not stop within {:?}", timeout);
                self.handle = Some(handle);
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        let _ = handle.join();
        true
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

fn run_scan(roots: Vec<PathBuf>, cancel: Arc<AtomicBool>, tx: Sender<ScanEvent>) {
    let progress_tx = tx.clone();
    let mut on_progress = |p: ScanProgress| {
        // Receiver gone means nobody cares anymore; keep scanning until the
        // cancel flag says otherwise.
        let _ = progress_tx.send(ScanEvent::Progress {
            found: p.found,
            estimated_total: p.estimated_total,
            current_dir: p.current_dir,
        });
    };

    match locator::scan_roots(&roots, &cancel, Some(&mut on_progress)) {
        Some(images) => {
            tracing::info!("Scan finished: {} images", images.len());
            let _ = tx.send(ScanEvent::Completed(images));
        }
        None => {
            let _ = tx.send(ScanEvent::Cancelled);
        }
    }
}
