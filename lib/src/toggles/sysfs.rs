use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use super::{TileState, Toggle, read_one_line, write_line};
use crate::error::Result;
use crate::props::PropertyStore;

pub const FAST_CHARGE_PATH: &str = "/sys/kernel/fast_charge/force_fast_charge";
pub const JACK_DET_FORCE_PATH: &str =
    "/sys/devices/platform/msm_ssbi.0/pm8058-core/simple_remote_pf/simple_remote/det_force";
/// Set on devices whose headphone jack detection is known to misfire.
pub const JACK_BROKEN_PROPERTY: &str = "persist.sys.jack_broken";

const ON: &str = "1";
const OFF: &str = "0";

struct Gate {
    props: Arc<dyn PropertyStore>,
    key: &'static str,
}

/// A boolean kernel switch exposed as a sysfs attribute holding `0` or `1`.
pub struct SysfsToggle {
    name: &'static str,
    path: PathBuf,
    gate: Option<Gate>,
}

impl SysfsToggle {
    pub fn new(name: &'static str, path: impl Into<PathBuf>) -> Self {
        SysfsToggle {
            name,
            path: path.into(),
            gate: None,
        }
    }

    pub fn fast_charge() -> Self {
        Self::new("Fast charge", FAST_CHARGE_PATH)
    }

    pub fn jack_detect(props: Arc<dyn PropertyStore>) -> Self {
        Self::new("Jack detection", JACK_DET_FORCE_PATH).gated_by(props, JACK_BROKEN_PROPERTY)
    }

    /// Report the toggle as unavailable while the boolean property `key` is
    /// false. Clicks still flip the switch.
    pub fn gated_by(mut self, props: Arc<dyn PropertyStore>, key: &'static str) -> Self {
        self.gate = Some(Gate { props, key });
        self
    }

    pub fn is_available(&self) -> bool {
        self.gate
            .as_ref()
            .is_none_or(|gate| gate.props.get_bool(gate.key, false))
    }
}

impl Toggle for SysfsToggle {
    fn label(&self) -> String {
        if self.is_enabled() {
            format!("{} on", self.name)
        } else {
            format!("{} off", self.name)
        }
    }

    fn is_enabled(&self) -> bool {
        read_one_line(&self.path).is_some_and(|line| line == ON)
    }

    fn state(&self) -> TileState {
        if !self.is_available() {
            TileState::Unavailable
        } else if self.is_enabled() {
            TileState::Active
        } else {
            TileState::Inactive
        }
    }

    fn toggle(&self) -> Result<bool> {
        let Some(current) = read_one_line(&self.path) else {
            return Ok(false);
        };
        let enable = current != ON;
        write_line(&self.path, if enable { ON } else { OFF })?;
        info!("{} {}", self.name, if enable { "enabled" } else { "disabled" });
        Ok(enable)
    }
}
