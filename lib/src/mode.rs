use log::{info, warn};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::props::PropertyStore;

/// Persisted property selecting how the buttons light follows the backlight.
pub const BUTTONS_LIGHT_MODE_PROPERTY: &str = "persist.sys.lightbar_mode";

/// How the buttons light follows the backlight.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(i64)]
#[serde(rename_all = "lowercase")]
pub enum ButtonsLightMode {
    /// The buttons light is never driven.
    Disabled = 0,
    /// The buttons light mirrors the backlight until it is turned off, and
    /// stays off until explicitly turned back on.
    #[default]
    Timeout = 1,
    /// The buttons light always mirrors the backlight.
    Linked = 2,
}

impl ButtonsLightMode {
    /// Map a configured integer onto a mode. Out-of-range values fall back
    /// to [`ButtonsLightMode::Timeout`].
    pub fn from_config(value: i64) -> Self {
        match Self::try_from(value) {
            Ok(mode) => mode,
            Err(_) => {
                warn!("invalid buttons light mode {value}, using timeout");
                Self::default()
            }
        }
    }

    /// Read the mode from [`BUTTONS_LIGHT_MODE_PROPERTY`].
    pub fn from_properties(props: &dyn PropertyStore) -> Self {
        let mode = Self::from_config(
            props.get_int(BUTTONS_LIGHT_MODE_PROPERTY, i64::from(Self::default())),
        );
        info!("buttons light mode: {mode:?}");
        mode
    }
}
