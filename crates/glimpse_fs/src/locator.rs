//! Image locator - recursive discovery of supported image files
//!
//! Traversal order is whatever the filesystem yields; callers that need a
//! deterministic order sort downstream.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

/// Supported image file extensions (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Emit a progress report every this many files found
const PROGRESS_EVERY: usize = 50;

/// Directories sampled up front for the total estimate
const SAMPLE_DIRS: usize = 10;

/// Cap on directories visited while projecting the estimate
const MAX_COUNTED_DIRS: usize = 2_000;

/// Progress report emitted while a scan is running
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub found: usize,
    pub estimated_total: usize,
    pub current_dir: PathBuf,
}

/// Check whether a path has a supported image extension (case-insensitive)
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collect image files under the given roots.
///
/// Nonexistent roots are skipped silently, as are entries that cannot be
/// read. Symlinks are not followed, so traversal cannot cycle. Returns
/// `None` when the cancellation flag was raised; partial results are
/// discarded and the caller treats the scan as "no images loaded".
pub fn scan_roots(
    roots: &[PathBuf],
    cancel: &AtomicBool,
    mut progress: Option<&mut dyn FnMut(ScanProgress)>,
) -> Option<Vec<PathBuf>> {
    // The estimate pass only pays off when someone is watching.
    let mut estimated_total = if progress.is_some() {
        estimate_total(roots, cancel)?
    } else {
        0
    };

    let mut images: Vec<PathBuf> = Vec::new();
    let mut current_dir = PathBuf::new();

    for root in roots {
        if !root.exists() {
            tracing::debug!("Skipping nonexistent root: {}", root.display());
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!("Scan cancelled after {} images", images.len());
                return None;
            }

            if entry.file_type().is_dir() {
                current_dir = entry.path().to_path_buf();
                emit_progress(&mut progress, images.len(), &mut estimated_total, &current_dir);
                continue;
            }

            if !entry.file_type().is_file() || !is_image_file(entry.path()) {
                continue;
            }

            images.push(entry.path().to_path_buf());

            if images.len() % PROGRESS_EVERY == 0 {
                emit_progress(&mut progress, images.len(), &mut estimated_total, &current_dir);
            }
        }
    }

    Some(images)
}

fn emit_progress(
    progress: &mut Option<&mut dyn FnMut(ScanProgress)>,
    found: usize,
    estimated_total: &mut usize,
    current_dir: &Path,
) {
    if let Some(report) = progress.as_deref_mut() {
        // Correct the estimate upward once reality overtakes it.
        if found > *estimated_total {
            *estimated_total = found * 6 / 5;
        }
        report(ScanProgress {
            found,
            estimated_total: *estimated_total,
            current_dir: current_dir.to_path_buf(),
        });
    }
}

/// Project a total image count by sampling the first few directories.
///
/// A UX heuristic, not a promise: any monotonic, eventually-accurate
/// estimate will do. Returns `None` only on cancellation.
fn estimate_total(roots: &[PathBuf], cancel: &AtomicBool) -> Option<usize> {
    let mut sampled_images = 0usize;
    let mut sampled_dirs = 0usize;
    let mut total_dirs = 0usize;

    'roots: for root in roots {
        if !root.exists() {
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            if !entry.file_type().is_dir() {
                continue;
            }

            total_dirs += 1;
            if sampled_dirs < SAMPLE_DIRS {
                sampled_dirs += 1;
                sampled_images += count_images_shallow(entry.path());
            }
            if total_dirs >= MAX_COUNTED_DIRS {
                break 'roots;
            }
        }
    }

    let estimate = if sampled_dirs == 0 {
        0
    } else {
        sampled_images * total_dirs / sampled_dirs
    };

    Some(estimate.max(100))
}

/// Count image files directly inside a directory (non-recursive)
fn count_images_shallow(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().map(|t| t.is_file()).unwrap_or(false) && is_image_file(&e.path())
            })
            .count(),
        Err(_) => 0,
    }
}
