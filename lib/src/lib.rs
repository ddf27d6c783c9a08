//! Backlight/buttons-light arbitration and the device toggles that sit next
//! to it on Android handsets.

/// Initialize logging with the given default level. Respects `RUST_LOG`
/// overrides.
pub fn init_logging(default_level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

pub mod arbiter;
pub mod error;
pub mod light;
pub mod mode;
pub mod props;
pub mod sysfs;
#[cfg(test)]
mod testing;
pub mod toggles;
pub mod vr;

pub use arbiter::LightArbiter;
pub use error::{Error, Result};
pub use light::{Brightness, Light, LightId, LightTable};
pub use mode::ButtonsLightMode;
