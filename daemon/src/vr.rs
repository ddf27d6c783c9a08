//! Follows the VR session state and hands changes to the arbiter's VR
//! policy.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lights::LightArbiter;
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Parse the contents of a VR state file: `1`/`0` or `true`/`false`.
pub fn parse_vr_state(contents: &str) -> Option<bool> {
    match contents.trim() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

async fn read_state(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

pub fn run_vr_mode_poller(
    task_tracker: &TaskTracker,
    arbiter: Arc<LightArbiter>,
    source: PathBuf,
    interval: Duration,
    shutdown_token: CancellationToken,
) {
    info!("following VR state from {}", source.display());
    task_tracker.spawn(async move {
        let mut last_state = None;
        let mut warned = false;
        loop {
            match read_state(&source).await {
                Some(contents) => match parse_vr_state(&contents) {
                    Some(enabled) if last_state != Some(enabled) => {
                        last_state = Some(enabled);
                        info!("VR mode {}", if enabled { "on" } else { "off" });
                        arbiter.set_vr_mode(enabled);
                    }
                    Some(_) => {}
                    None if !warned => {
                        warn!("ignoring unexpected VR state {:?}", contents.trim());
                        warned = true;
                    }
                    None => {}
                },
                None if !warned => {
                    warn!("couldn't read VR state from {}", source.display());
                    warned = true;
                }
                None => {}
            }

            tokio::select! {
                _ = shutdown_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {},
            }
        }
        info!("VR state poller stopped");
    });
}
