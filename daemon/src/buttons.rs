//! Buttons light activity handling: key presses light the buttons, and in
//! timeout mode they go dark again after a period without input.

use std::mem::size_of;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lights::LightArbiter;
use log::{debug, info, warn};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

const EV_KEY: u16 = 0x01;
const KEY_PRESSED: i32 = 1;

// struct input_event { struct timeval time; __u16 type; __u16 code; __s32 value; }
const TIMEVAL_SIZE: usize = 2 * size_of::<usize>();
pub const INPUT_EVENT_SIZE: usize = TIMEVAL_SIZE + 8;

/// Whether a raw `input_event` is a key going down. Autorepeats and releases
/// don't count.
pub fn is_key_press(event: &[u8; INPUT_EVENT_SIZE]) -> bool {
    let kind = u16::from_ne_bytes([event[TIMEVAL_SIZE], event[TIMEVAL_SIZE + 1]]);
    let value = i32::from_ne_bytes([
        event[TIMEVAL_SIZE + 4],
        event[TIMEVAL_SIZE + 5],
        event[TIMEVAL_SIZE + 6],
        event[TIMEVAL_SIZE + 7],
    ]);
    kind == EV_KEY && value == KEY_PRESSED
}

fn watch_input_device(
    task_tracker: &TaskTracker,
    path: PathBuf,
    presses: mpsc::Sender<()>,
    shutdown_token: CancellationToken,
) {
    task_tracker.spawn(async move {
        let mut file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!("{} unavailable: {e}", path.display());
                return;
            }
        };
        info!("watching {} for key presses", path.display());

        let mut buf = [0u8; INPUT_EVENT_SIZE];
        loop {
            tokio::select! {
                _ = shutdown_token.cancelled() => break,
                res = file.read_exact(&mut buf) => {
                    if let Err(e) = res {
                        warn!("stopped reading {}: {e}", path.display());
                        break;
                    }
                    if is_key_press(&buf) && presses.send(()).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Turn the buttons light on for every press and, in timeout mode, off again
/// once `timeout` passes without one.
pub async fn run_buttons_loop(
    arbiter: Arc<LightArbiter>,
    mut presses: mpsc::Receiver<()>,
    timeout: Duration,
    shutdown_token: CancellationToken,
) {
    // the buttons may already be lit by the backlight before any press
    let mut deadline = arbiter
        .is_buttons_light_timeout()
        .then(|| Instant::now() + timeout);
    loop {
        let idle_deadline = deadline;
        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            press = presses.recv() => {
                if press.is_none() {
                    break;
                }
                arbiter.turn_on_buttons();
                if arbiter.is_buttons_light_timeout() {
                    deadline = Some(Instant::now() + timeout);
                }
            }
            _ = async move {
                match idle_deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                debug!("no key presses for {timeout:?}, turning buttons off");
                arbiter.turn_off_buttons();
                deadline = None;
            }
        }
    }
}

pub fn run_buttons_activity(
    task_tracker: &TaskTracker,
    arbiter: Arc<LightArbiter>,
    input_devices: &[PathBuf],
    timeout: Duration,
    shutdown_token: CancellationToken,
) {
    if input_devices.is_empty() {
        info!("no input devices configured, buttons light follows the backlight only");
        return;
    }
    let (tx, rx) = mpsc::channel(16);
    for device in input_devices {
        watch_input_device(
            task_tracker,
            device.clone(),
            tx.clone(),
            shutdown_token.clone(),
        );
    }
    task_tracker.spawn(run_buttons_loop(arbiter, rx, timeout, shutdown_token));
}

#[cfg(test)]
mod tests {
    use std::fs;

    use lights::light::NullLight;
    use lights::sysfs::SysfsLight;
    use lights::{ButtonsLightMode, Light, LightId, LightTable};

    use super::*;

    fn event(kind: u16, code: u16, value: i32) -> [u8; INPUT_EVENT_SIZE] {
        let mut buf = [0u8; INPUT_EVENT_SIZE];
        buf[TIMEVAL_SIZE..TIMEVAL_SIZE + 2].copy_from_slice(&kind.to_ne_bytes());
        buf[TIMEVAL_SIZE + 2..TIMEVAL_SIZE + 4].copy_from_slice(&code.to_ne_bytes());
        buf[TIMEVAL_SIZE + 4..].copy_from_slice(&value.to_ne_bytes());
        buf
    }

    #[test]
    fn test_is_key_press() {
        const KEY_BACK: u16 = 158;
        const EV_SYN: u16 = 0x00;
        assert!(is_key_press(&event(EV_KEY, KEY_BACK, 1)));
        assert!(!is_key_press(&event(EV_KEY, KEY_BACK, 0)));
        assert!(!is_key_press(&event(EV_KEY, KEY_BACK, 2)));
        assert!(!is_key_press(&event(EV_SYN, 0, 1)));
    }

    fn buttons_device(mode: ButtonsLightMode) -> (tempfile::TempDir, Arc<LightArbiter>) {
        let dir = tempfile::tempdir().unwrap();
        let led = dir.path().join("button-backlight");
        fs::create_dir(&led).unwrap();
        fs::write(led.join("brightness"), "0").unwrap();
        let table = LightTable::from_lookup(|id| {
            let light: Arc<dyn Light> = if id == LightId::Buttons {
                Arc::new(SysfsLight::open(&led))
            } else {
                Arc::new(NullLight)
            };
            Some(light)
        })
        .unwrap();
        (dir, Arc::new(LightArbiter::new(table, mode)))
    }

    fn buttons(dir: &tempfile::TempDir) -> String {
        fs::read_to_string(dir.path().join("button-backlight/brightness")).unwrap()
    }

    #[tokio::test]
    async fn test_press_then_timeout() {
        let (dir, arbiter) = buttons_device(ButtonsLightMode::Timeout);
        arbiter.set_backlight_brightness(120);
        arbiter.turn_off_buttons();

        let (tx, rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        let task = tokio::spawn(run_buttons_loop(
            arbiter.clone(),
            rx,
            Duration::from_millis(40),
            token.clone(),
        ));

        tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(buttons(&dir), "120");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(buttons(&dir), "0");

        token.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_without_any_press() {
        let (dir, arbiter) = buttons_device(ButtonsLightMode::Timeout);
        arbiter.set_backlight_brightness(120);
        assert_eq!(buttons(&dir), "120");

        let (_tx, rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        let task = tokio::spawn(run_buttons_loop(
            arbiter.clone(),
            rx,
            Duration::from_millis(30),
            token.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(buttons(&dir), "0");

        token.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_linked_mode_never_times_out() {
        let (dir, arbiter) = buttons_device(ButtonsLightMode::Linked);
        arbiter.set_backlight_brightness(60);

        let (tx, rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        let task = tokio::spawn(run_buttons_loop(
            arbiter.clone(),
            rx,
            Duration::from_millis(10),
            token.clone(),
        ));

        tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(buttons(&dir), "60");

        drop(tx);
        task.await.unwrap();
    }
}
