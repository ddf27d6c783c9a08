use std::path::Path;
use std::sync::Arc;

use lights::light::NullLight;
use lights::props::PropertyStore;
use lights::sysfs::SysfsLight;
use lights::vr::{IgnoreVrMode, SuppressIndicators, VrModePolicy};
use lights::{ButtonsLightMode, Light, LightArbiter, LightTable};
use log::info;

use crate::config::{Config, VrPolicyKind};

/// Resolve every light from the `[lights]` table. Lights the device doesn't
/// have are left as [`NullLight`].
pub fn build_light_table(config: &Config) -> lights::Result<LightTable> {
    LightTable::from_lookup(|id| {
        let light: Arc<dyn Light> = match config.lights.get(&id) {
            Some(led) => {
                let light = if Path::new(led).is_absolute() {
                    SysfsLight::open(led)
                } else {
                    SysfsLight::named(led)
                };
                info!("{id:?} light: {led} (max {})", light.max_brightness());
                Arc::new(light)
            }
            None => Arc::new(NullLight),
        };
        Some(light)
    })
}

pub fn buttons_light_mode(config: &Config, props: &dyn PropertyStore) -> ButtonsLightMode {
    match config.buttons_light_mode {
        Some(value) => ButtonsLightMode::from_config(value),
        None => ButtonsLightMode::from_properties(props),
    }
}

pub fn build_arbiter(config: &Config, props: &dyn PropertyStore) -> lights::Result<LightArbiter> {
    let table = build_light_table(config)?;
    let mode = buttons_light_mode(config, props);
    let vr_policy: Box<dyn VrModePolicy> = match config.vr_policy {
        VrPolicyKind::Ignore => Box::new(IgnoreVrMode),
        VrPolicyKind::SuppressIndicators => Box::new(SuppressIndicators),
    };
    Ok(LightArbiter::with_vr_policy(table, mode, vr_policy))
}
