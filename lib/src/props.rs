//! System property and global setting access.
//!
//! On a device the properties live in Android's property service and are
//! reached through `getprop`/`setprop`; global settings come from the
//! settings provider through `settings get global`. [`MemoryProperties`]
//! backs tests and hosts that have neither.

use std::collections::HashMap;
use std::process::Command;
use std::sync::{Mutex, PoisonError};

use log::warn;

use crate::error::{Error, Result};

pub trait PropertyStore: Send + Sync {
    /// Returns `None` when the property is unset or empty.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).as_deref().map(str::trim) {
            Some("1" | "y" | "yes" | "on" | "true") => true,
            Some("0" | "n" | "no" | "off" | "false") => false,
            _ => default,
        }
    }
}

/// Read-only view of the `global` settings namespace.
pub trait GlobalSettings: Send + Sync {
    /// Returns `None` when the setting is unset.
    fn get_global(&self, name: &str) -> Option<String>;

    fn get_global_int(&self, name: &str, default: i64) -> i64 {
        self.get_global(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// The Android property service, via the `getprop` and `setprop` tools.
#[derive(Debug, Default)]
pub struct AndroidProperties;

impl PropertyStore for AndroidProperties {
    fn get(&self, key: &str) -> Option<String> {
        let output = match Command::new("getprop").arg(key).output() {
            Ok(output) => output,
            Err(e) => {
                warn!("getprop {key} failed: {e}");
                return None;
            }
        };
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() { None } else { Some(value) }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let output = Command::new("setprop")
            .args([key, value])
            .output()
            .map_err(|e| Error::Property {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::Property {
                key: key.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// The Android settings provider, via the `settings` tool.
#[derive(Debug, Default)]
pub struct AndroidSettings;

impl GlobalSettings for AndroidSettings {
    fn get_global(&self, name: &str) -> Option<String> {
        let output = match Command::new("settings").args(["get", "global", name]).output() {
            Ok(output) => output,
            Err(e) => {
                warn!("settings get global {name} failed: {e}");
                return None;
            }
        };
        if !output.status.success() {
            warn!(
                "settings get global {name} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        parse_setting(&String::from_utf8_lossy(&output.stdout))
    }
}

/// `settings get` prints `null` for unset names.
fn parse_setting(stdout: &str) -> Option<String> {
    match stdout.trim() {
        "" | "null" => None,
        value => Some(value.to_string()),
    }
}

/// In-memory properties. Also answers global settings lookups from the same
/// map.
#[derive(Debug, Default)]
pub struct MemoryProperties {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryProperties {
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl PropertyStore for MemoryProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}

impl GlobalSettings for MemoryProperties {
    fn get_global(&self, name: &str) -> Option<String> {
        self.get(name)
    }
}
