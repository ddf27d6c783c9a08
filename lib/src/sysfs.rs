//! Lights backed by the LED class in /sys.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, error, warn};

use crate::error::{Error, Result};
use crate::light::{Brightness, Light};

pub const LEDS_CLASS_DIR: &str = "/sys/class/leds";

const BRIGHTNESS: &str = "brightness";
const MAX_BRIGHTNESS: &str = "max_brightness";

/// Full scale of the brightness values handed to lights.
pub const FULL_SCALE: Brightness = 255;

/// Read an integer from a sysfs attribute.
pub fn read_int(path: &Path) -> Result<u32> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    contents.trim().parse().map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// An LED class device, e.g. `/sys/class/leds/button-backlight`.
pub struct SysfsLight {
    brightness_path: PathBuf,
    max_brightness: u32,
    /// Last requested brightness on the 0-255 scale, `None` until the first
    /// request.
    last: Mutex<Option<Brightness>>,
}

impl SysfsLight {
    /// Open the LED named `name` under [`LEDS_CLASS_DIR`].
    pub fn named(name: &str) -> Self {
        Self::open(Path::new(LEDS_CLASS_DIR).join(name))
    }

    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let max_brightness = match read_int(&dir.join(MAX_BRIGHTNESS)) {
            Ok(0) | Err(_) => {
                warn!(
                    "no usable {MAX_BRIGHTNESS} under {}, assuming {FULL_SCALE}",
                    dir.display()
                );
                FULL_SCALE
            }
            Ok(max) => max,
        };
        SysfsLight {
            brightness_path: dir.join(BRIGHTNESS),
            max_brightness,
            last: Mutex::new(None),
        }
    }

    pub fn max_brightness(&self) -> u32 {
        self.max_brightness
    }

    /// Map a 0-255 request onto `0..=max_brightness`. Any nonzero request
    /// lights the LED, even one with a single level.
    fn scale(&self, brightness: Brightness) -> u32 {
        if brightness == 0 {
            return 0;
        }
        let clamped = u64::from(brightness.min(FULL_SCALE));
        let raw = clamped * u64::from(self.max_brightness) / u64::from(FULL_SCALE);
        raw.max(1) as u32
    }

    fn write(&self, brightness: Brightness) {
        let raw = self.scale(brightness);
        debug!("{} <- {raw}", self.brightness_path.display());
        if let Err(e) = fs::write(&self.brightness_path, raw.to_string()) {
            error!(
                "failed to set brightness via {}: {e}",
                self.brightness_path.display()
            );
        }
    }
}

impl Light for SysfsLight {
    fn set_brightness(&self, brightness: Brightness) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(brightness);
        self.write(brightness);
    }

    fn set_brightness_if_not_off(&self, brightness: Brightness) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if *last == Some(0) {
            return;
        }
        *last = Some(brightness);
        self.write(brightness);
    }

    fn turn_off(&self) {
        self.set_brightness(0);
    }
}
