//! Mirrors the brightness the display stack requests into the arbiter.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lights::sysfs::FULL_SCALE;
use lights::{Brightness, LightArbiter};
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Convert a raw source reading to the 0-255 scale. Readings above
/// `max_source` are ignored.
pub fn source_to_brightness(raw: u32, max_source: u32) -> Option<Brightness> {
    if max_source == 0 || raw > max_source {
        return None;
    }
    Some((u64::from(raw) * u64::from(FULL_SCALE) / u64::from(max_source)) as Brightness)
}

async fn read_source(path: &Path) -> Option<u32> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

pub fn run_brightness_poller(
    task_tracker: &TaskTracker,
    arbiter: Arc<LightArbiter>,
    source: PathBuf,
    max_source: u32,
    interval: Duration,
    shutdown_token: CancellationToken,
) {
    info!("mirroring brightness from {}", source.display());
    task_tracker.spawn(async move {
        let mut last_raw = None;
        let mut warned = false;
        loop {
            match read_source(&source).await {
                Some(raw) if last_raw != Some(raw) => {
                    last_raw = Some(raw);
                    match source_to_brightness(raw, max_source) {
                        Some(brightness) => arbiter.set_backlight_brightness(brightness),
                        None => warn!("ignoring out-of-range brightness {raw}"),
                    }
                }
                Some(_) => {}
                None if !warned => {
                    warn!("couldn't read brightness from {}", source.display());
                    warned = true;
                }
                None => {}
            }

            tokio::select! {
                _ = shutdown_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {},
            }
        }
        info!("brightness poller stopped");
    });
}
