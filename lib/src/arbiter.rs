//! Arbitration between the backlight and the buttons light.
//!
//! The display stack owns the backlight brightness; the buttons light
//! follows it according to the configured [`ButtonsLightMode`]. Every
//! operation that touches the buttons light runs under the same lock as the
//! brightness read-modify-write, so concurrent callers see brightness
//! updates in a single sequential order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::light::{Brightness, Light, LightId, LightTable};
use crate::mode::ButtonsLightMode;
use crate::vr::{IgnoreVrMode, VrModePolicy};

pub struct LightArbiter {
    lights: LightTable,
    mode: ButtonsLightMode,
    vr_policy: Box<dyn VrModePolicy>,
    backlight: Mutex<Brightness>,
}

impl LightArbiter {
    pub fn new(lights: LightTable, mode: ButtonsLightMode) -> Self {
        Self::with_vr_policy(lights, mode, Box::new(IgnoreVrMode))
    }

    pub fn with_vr_policy(
        lights: LightTable,
        mode: ButtonsLightMode,
        vr_policy: Box<dyn VrModePolicy>,
    ) -> Self {
        LightArbiter {
            lights,
            mode,
            vr_policy,
            backlight: Mutex::new(0),
        }
    }

    // The guarded value is a plain integer, so a panic elsewhere can't leave
    // it half-written.
    fn lock(&self) -> MutexGuard<'_, Brightness> {
        self.backlight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_backlight_brightness(&self, brightness: Brightness) {
        let mut current = self.lock();
        if *current == brightness {
            return;
        }
        debug!("backlight {} -> {brightness}", *current);
        *current = brightness;
        self.lights
            .get(LightId::Backlight)
            .set_brightness(brightness);

        let buttons = self.lights.get(LightId::Buttons);
        match self.mode {
            ButtonsLightMode::Linked => buttons.set_brightness(brightness),
            ButtonsLightMode::Timeout => buttons.set_brightness_if_not_off(brightness),
            ButtonsLightMode::Disabled => {}
        }
    }

    pub fn turn_on_buttons(&self) {
        if self.is_buttons_light_disabled() {
            return;
        }
        let current = self.lock();
        self.lights.get(LightId::Buttons).set_brightness(*current);
    }

    pub fn turn_off_buttons(&self) {
        if self.is_buttons_light_disabled() {
            return;
        }
        let _current = self.lock();
        self.lights.get(LightId::Buttons).turn_off();
    }

    fn is_buttons_light_disabled(&self) -> bool {
        self.mode == ButtonsLightMode::Disabled
    }

    pub fn is_buttons_light_timeout(&self) -> bool {
        self.mode == ButtonsLightMode::Timeout
    }

    pub fn buttons_light_mode(&self) -> ButtonsLightMode {
        self.mode
    }

    /// The last backlight brightness that was applied.
    pub fn backlight_brightness(&self) -> Brightness {
        *self.lock()
    }

    pub fn get_light(&self, id: LightId) -> &Arc<dyn Light> {
        self.lights.get(id)
    }

    pub fn set_vr_mode(&self, enabled: bool) {
        self.vr_policy.set_vr_mode(enabled, &self.lights);
    }
}
