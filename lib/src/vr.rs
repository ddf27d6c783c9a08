use log::info;

use crate::light::{LightId, LightTable};

/// Lighting adjustments applied while a VR session is active.
pub trait VrModePolicy: Send + Sync {
    fn set_vr_mode(&self, enabled: bool, lights: &LightTable);
}

/// Leaves every light alone.
#[derive(Debug, Default)]
pub struct IgnoreVrMode;

impl VrModePolicy for IgnoreVrMode {
    fn set_vr_mode(&self, _enabled: bool, _lights: &LightTable) {}
}

/// Turns the indicator lights off when a VR session starts. Their owners
/// restore them after it ends.
#[derive(Debug, Default)]
pub struct SuppressIndicators;

const SUPPRESSED: [LightId; 3] = [LightId::Notifications, LightId::Attention, LightId::Battery];

impl VrModePolicy for SuppressIndicators {
    fn set_vr_mode(&self, enabled: bool, lights: &LightTable) {
        if !enabled {
            return;
        }
        info!("VR session started, suppressing indicator lights");
        for id in SUPPRESSED {
            lights.get(id).turn_off();
        }
    }
}
