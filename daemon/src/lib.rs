pub mod backlight;
pub mod buttons;
pub mod config;
pub mod hardware;
pub mod vr;
