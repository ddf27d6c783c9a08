//! Integration tests driving the arbiter against LED class directories laid
//! out like /sys/class/leds.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use lights::light::NullLight;
use lights::props::{MemoryProperties, PropertyStore};
use lights::sysfs::{SysfsLight, read_int};
use lights::{ButtonsLightMode, Light, LightArbiter, LightId, LightTable};
use tempfile::TempDir;

/// Create `<root>/<name>/{brightness,max_brightness}`.
fn make_led(root: &Path, name: &str, max: u32) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("brightness"), "0\n").unwrap();
    fs::write(dir.join("max_brightness"), format!("{max}\n")).unwrap();
}

fn brightness(root: &Path, name: &str) -> u32 {
    read_int(&root.join(name).join("brightness")).unwrap()
}

fn device(mode: ButtonsLightMode) -> (TempDir, LightArbiter) {
    let root = tempfile::tempdir().unwrap();
    make_led(root.path(), "lcd-backlight", 255);
    make_led(root.path(), "button-backlight", 1);

    let path = root.path().to_path_buf();
    let table = LightTable::from_lookup(|id| {
        let light: Arc<dyn Light> = match id {
            LightId::Backlight => Arc::new(SysfsLight::open(path.join("lcd-backlight"))),
            LightId::Buttons => Arc::new(SysfsLight::open(path.join("button-backlight"))),
            _ => Arc::new(NullLight),
        };
        Some(light)
    })
    .unwrap();
    (root, LightArbiter::new(table, mode))
}

#[test]
fn test_timeout_mode_on_sysfs() {
    let (root, arbiter) = device(ButtonsLightMode::Timeout);
    let root = root.path();

    arbiter.set_backlight_brightness(100);
    assert_eq!(brightness(root, "lcd-backlight"), 100);
    // single-level button LED: any nonzero request lights it
    assert_eq!(brightness(root, "button-backlight"), 1);

    arbiter.set_backlight_brightness(255);
    assert_eq!(brightness(root, "button-backlight"), 1);

    arbiter.turn_off_buttons();
    assert_eq!(brightness(root, "button-backlight"), 0);

    arbiter.set_backlight_brightness(200);
    assert_eq!(brightness(root, "lcd-backlight"), 200);
    assert_eq!(brightness(root, "button-backlight"), 0);

    arbiter.turn_on_buttons();
    assert_eq!(brightness(root, "button-backlight"), 1);
}

#[test]
fn test_linked_mode_lights_single_level_buttons() {
    let (root, arbiter) = device(ButtonsLightMode::Linked);
    let root = root.path();

    arbiter.set_backlight_brightness(100);
    assert_eq!(brightness(root, "button-backlight"), 1);
    arbiter.set_backlight_brightness(0);
    assert_eq!(brightness(root, "button-backlight"), 0);
    arbiter.set_backlight_brightness(3);
    assert_eq!(brightness(root, "button-backlight"), 1);
}

#[test]
fn test_disabled_mode_leaves_buttons_file_alone() {
    let (root, arbiter) = device(ButtonsLightMode::Disabled);
    let root = root.path();
    fs::write(root.join("button-backlight/brightness"), "1\n").unwrap();

    arbiter.set_backlight_brightness(30);
    arbiter.turn_off_buttons();
    arbiter.turn_on_buttons();
    assert_eq!(brightness(root, "lcd-backlight"), 30);
    assert_eq!(brightness(root, "button-backlight"), 1);
}

#[test]
fn test_mode_from_properties() {
    let props = MemoryProperties::default();
    props.set("persist.sys.lightbar_mode", "2").unwrap();
    let (root, arbiter) = device(ButtonsLightMode::from_properties(&props));
    assert_eq!(arbiter.buttons_light_mode(), ButtonsLightMode::Linked);
    assert!(!arbiter.is_buttons_light_timeout());

    arbiter.turn_off_buttons();
    arbiter.set_backlight_brightness(255);
    assert_eq!(brightness(root.path(), "button-backlight"), 1);
}
