//! Backends for the quick-settings style device toggles.
//!
//! Each toggle reads a system property or a sysfs attribute, flips it, and
//! reports whether it can currently be used. Rendering is left to whoever
//! presents them.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

pub mod adb;
pub mod lockscreen;
pub mod sysfs;

pub use adb::AdbOverNetwork;
pub use lockscreen::{KeyguardMediator, LockscreenToggle};
pub use sysfs::SysfsToggle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    Unavailable,
    Inactive,
    Active,
}

/// The lock screen as seen by the toggles.
pub trait Keyguard: Send + Sync {
    fn is_showing(&self) -> bool;

    fn is_secure(&self) -> bool;

    /// Showing and protected by a credential. Toggles that could weaken
    /// security refuse to enable themselves in this state.
    fn is_locked(&self) -> bool {
        self.is_showing() && self.is_secure()
    }
}

/// A keyguard that is never shown, for hosts without a lock screen.
#[derive(Debug, Default)]
pub struct NoKeyguard;

impl Keyguard for NoKeyguard {
    fn is_showing(&self) -> bool {
        false
    }

    fn is_secure(&self) -> bool {
        false
    }
}

pub trait Toggle {
    fn label(&self) -> String;

    fn is_enabled(&self) -> bool;

    fn state(&self) -> TileState;

    /// Flip the toggle if it is usable and return the resulting state.
    fn toggle(&self) -> Result<bool>;
}

/// First line of a file without its line terminator, or `None` if the file
/// can't be read.
pub(crate) fn read_one_line(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    Some(contents.lines().next().unwrap_or_default().to_string())
}

pub(crate) fn write_line(path: &Path, line: &str) -> Result<()> {
    fs::write(path, format!("{line}\n")).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod test_keyguard {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::Keyguard;

    #[derive(Default)]
    pub struct FakeKeyguard {
        pub showing: AtomicBool,
        pub secure: AtomicBool,
    }

    impl FakeKeyguard {
        pub fn locked() -> Self {
            FakeKeyguard {
                showing: AtomicBool::new(true),
                secure: AtomicBool::new(true),
            }
        }

        pub fn set_showing(&self, showing: bool) {
            self.showing.store(showing, Ordering::SeqCst);
        }
    }

    impl Keyguard for FakeKeyguard {
        fn is_showing(&self) -> bool {
            self.showing.load(Ordering::SeqCst)
        }

        fn is_secure(&self) -> bool {
            self.secure.load(Ordering::SeqCst)
        }
    }
}
