use std::net::Ipv4Addr;
use std::process::Command;
use std::sync::Arc;

use log::{info, warn};

use super::{Keyguard, TileState, Toggle};
use crate::error::Result;
use crate::props::{GlobalSettings, PropertyStore};

pub const ADB_TCP_PROPERTY: &str = "service.adb.tcp.port";
/// Global setting behind the "USB debugging" developer option.
pub const ADB_ENABLED_SETTING: &str = "adb_enabled";
pub const ADB_TCP_ON: i64 = 5555;
pub const ADB_TCP_OFF: i64 = -1;

const WIFI_IFACE: &str = "wlan0";

/// Exposes adbd on TCP port 5555.
pub struct AdbOverNetwork {
    props: Arc<dyn PropertyStore>,
    settings: Arc<dyn GlobalSettings>,
    keyguard: Arc<dyn Keyguard>,
    wifi_iface: String,
}

impl AdbOverNetwork {
    pub fn new(
        props: Arc<dyn PropertyStore>,
        settings: Arc<dyn GlobalSettings>,
        keyguard: Arc<dyn Keyguard>,
    ) -> Self {
        AdbOverNetwork {
            props,
            settings,
            keyguard,
            wifi_iface: WIFI_IFACE.to_string(),
        }
    }

    pub fn with_wifi_iface(mut self, iface: &str) -> Self {
        self.wifi_iface = iface.to_string();
        self
    }

    /// USB debugging is switched on in developer settings.
    pub fn is_adb_enabled(&self) -> bool {
        self.settings.get_global_int(ADB_ENABLED_SETTING, 0) != 0
    }

    pub fn is_network_enabled(&self) -> bool {
        self.props.get_int(ADB_TCP_PROPERTY, ADB_TCP_OFF) != ADB_TCP_OFF
    }

    /// While the keyguard is locked, network ADB may only be switched off.
    fn can_toggle(&self) -> bool {
        if !self.is_adb_enabled() {
            return false;
        }
        !self.keyguard.is_locked() || self.is_network_enabled()
    }

    fn set_network(&self, on: bool) -> Result<()> {
        let port = if on { ADB_TCP_ON } else { ADB_TCP_OFF };
        self.props.set(ADB_TCP_PROPERTY, &port.to_string())?;
        // adbd only reads the port at startup
        self.props.set("ctl.stop", "adbd")?;
        self.props.set("ctl.start", "adbd")?;
        Ok(())
    }
}

impl Toggle for AdbOverNetwork {
    fn label(&self) -> String {
        if !self.is_enabled() {
            return "Network ADB off".to_string();
        }
        match wifi_address(&self.wifi_iface) {
            Some(addr) => addr.to_string(),
            None => "Network ADB on".to_string(),
        }
    }

    fn is_enabled(&self) -> bool {
        self.is_adb_enabled() && self.is_network_enabled()
    }

    fn state(&self) -> TileState {
        if !self.is_adb_enabled() || (self.keyguard.is_locked() && !self.is_network_enabled()) {
            TileState::Unavailable
        } else {
            TileState::Active
        }
    }

    fn toggle(&self) -> Result<bool> {
        if !self.can_toggle() {
            return Ok(self.is_enabled());
        }
        let enable = !self.is_network_enabled();
        self.set_network(enable)?;
        info!(
            "network ADB {}",
            if enable { "enabled" } else { "disabled" }
        );
        Ok(enable)
    }
}

/// IPv4 address of `iface`, if it has one.
pub fn wifi_address(iface: &str) -> Option<Ipv4Addr> {
    let output = match Command::new("ip").args(["-4", "addr", "show", iface]).output() {
        Ok(output) => output,
        Err(e) => {
            warn!("failed to query address of {iface}: {e}");
            return None;
        }
    };
    parse_inet(&String::from_utf8_lossy(&output.stdout))
}

fn parse_inet(ip_output: &str) -> Option<Ipv4Addr> {
    ip_output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("inet ")
            .and_then(|rest| rest.split('/').next())
            .and_then(|addr| addr.parse().ok())
    })
}
