//! Glimpse - random glimpses of your image collections
//!
//! Headless driver entry point: opens the folder given on the command
//! line (or the last-used folder, or the most recent collection) and
//! runs the one-second tick loop.

use anyhow::Result;
use glimpse::App;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    glimpse_log::init()?;

    if let Err(e) = glimpse_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Glimpse starting...");

    let config = glimpse_core::AppConfig::load().unwrap_or_default();
    let store = glimpse_store::init()?;
    let mut app = App::new(config, store);

    let folder: Option<PathBuf> = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| app.config().general.last_folder.clone());

    match folder {
        Some(folder) => app.open_folder(folder),
        None => {
            let collections = app.list_collections()?;
            let Some(most_recent) = collections.first() else {
                tracing::info!("No folder given and no collections saved; exiting");
                return Ok(());
            };
            let name = most_recent.name.clone();
            tracing::info!("Opening most recent collection '{}'", name);
            app.open_collection(&name)?;
        }
    }

    loop {
        std::thread::sleep(Duration::from_secs(1));
        app.tick();
    }
}
