use std::sync::Arc;

use anyhow::{Context, Result};
use lights::props::AndroidProperties;
use lights_daemon::backlight::run_brightness_poller;
use lights_daemon::buttons::run_buttons_activity;
use lights_daemon::config::{DEFAULT_CONFIG_PATH, VrPolicyKind, parse_config};
use lights_daemon::hardware::build_arbiter;
use lights_daemon::vr::run_vr_mode_poller;
use log::{error, info, warn};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

async fn wait_for_shutdown() -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.context("failed to listen for ctrl-c")?,
        _ = sigterm.recv() => {},
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = parse_config(&config_path).await?;
    lights::init_logging(config.level_filter());
    info!("lights-daemon {} starting", env!("CARGO_PKG_VERSION"));

    let arbiter = Arc::new(
        build_arbiter(&config, &AndroidProperties).context("failed to set up lights")?,
    );

    let task_tracker = TaskTracker::new();
    let shutdown_token = CancellationToken::new();

    match &config.brightness_source {
        Some(source) => run_brightness_poller(
            &task_tracker,
            arbiter.clone(),
            source.clone(),
            config.max_source_brightness,
            config.poll_interval(),
            shutdown_token.clone(),
        ),
        None => info!("no brightness source configured"),
    }
    match &config.vr_mode_source {
        Some(source) => run_vr_mode_poller(
            &task_tracker,
            arbiter.clone(),
            source.clone(),
            config.poll_interval(),
            shutdown_token.clone(),
        ),
        None if config.vr_policy != VrPolicyKind::Ignore => {
            warn!("vr_policy is set but no vr_mode_source is configured")
        }
        None => {}
    }
    run_buttons_activity(
        &task_tracker,
        arbiter.clone(),
        &config.input_devices,
        config.buttons_timeout(),
        shutdown_token.clone(),
    );
    task_tracker.close();

    wait_for_shutdown().await?;
    info!("shutting down");
    shutdown_token.cancel();
    task_tracker.wait().await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        eprintln!("lights-daemon: {e:#}");
        std::process::exit(1);
    }
}
