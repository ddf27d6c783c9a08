//! Light identities and the capability every indicator light exposes.

use std::sync::Arc;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Brightness on the 0-255 scale used by the display stack.
pub type Brightness = u32;

/// The physical lights a device can expose, numbered like the light HAL's
/// `Type` enumeration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum LightId {
    Backlight = 0,
    Keyboard = 1,
    Buttons = 2,
    Battery = 3,
    Notifications = 4,
    Attention = 5,
    Bluetooth = 6,
    Wifi = 7,
}

impl LightId {
    pub const COUNT: usize = 8;

    pub const ALL: [LightId; LightId::COUNT] = [
        LightId::Backlight,
        LightId::Keyboard,
        LightId::Buttons,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
        LightId::Bluetooth,
        LightId::Wifi,
    ];

    fn index(self) -> usize {
        u8::from(self) as usize
    }
}

/// A single light as the hardware layer exposes it.
///
/// Implementations own their error handling: a failed write is logged by the
/// light and never reported to the caller.
pub trait Light: Send + Sync {
    fn set_brightness(&self, brightness: Brightness);

    /// Like [`Light::set_brightness`], but leaves a light that is currently
    /// off untouched.
    fn set_brightness_if_not_off(&self, brightness: Brightness);

    fn turn_off(&self);
}

/// A light that accepts and discards every request. Used for identities the
/// device has no hardware for.
#[derive(Debug, Default)]
pub struct NullLight;

impl Light for NullLight {
    fn set_brightness(&self, _brightness: Brightness) {}

    fn set_brightness_if_not_off(&self, _brightness: Brightness) {}

    fn turn_off(&self) {}
}

/// One handle per [`LightId`], resolved once at startup.
pub struct LightTable {
    lights: Vec<Arc<dyn Light>>,
}

impl LightTable {
    /// Resolve every light identity through `lookup`. An identity the lookup
    /// cannot resolve is a misconfiguration of the hardware layer.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(LightId) -> Option<Arc<dyn Light>>,
    {
        let mut lights = Vec::with_capacity(LightId::COUNT);
        for id in LightId::ALL {
            lights.push(lookup(id).ok_or(Error::MissingLight(id))?);
        }
        Ok(Self { lights })
    }

    pub fn get(&self, id: LightId) -> &Arc<dyn Light> {
        &self.lights[id.index()]
    }
}
