use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use super::{Keyguard, TileState, Toggle};
use crate::error::Result;

/// The part of the keyguard service that decides whether the lock screen is
/// used at all.
///
/// Only the host's keyguard service can implement this, so the crate ships
/// no implementation and `lightctl` does not offer the lock screen toggle. A
/// host embedding [`LockscreenToggle`] passes its own mediator in and calls
/// [`LockscreenToggle::reapply`] once the keyguard has bound.
pub trait KeyguardMediator: Send + Sync {
    /// The keyguard service has finished binding and accepts changes.
    fn is_keyguard_bound(&self) -> bool;

    fn lockscreen_enforced_by_policy(&self) -> bool;

    fn keyguard_enabled_internal(&self) -> bool;

    fn set_keyguard_enabled_internal(&self, enabled: bool);
}

/// Enables or disables the lock screen until the next reboot.
pub struct LockscreenToggle {
    mediator: Arc<dyn KeyguardMediator>,
    keyguard: Arc<dyn Keyguard>,
    /// Requested state. Not persisted, so every boot starts with the lock
    /// screen enabled.
    requested: AtomicBool,
    bound: AtomicBool,
}

impl LockscreenToggle {
    pub fn new(mediator: Arc<dyn KeyguardMediator>, keyguard: Arc<dyn Keyguard>) -> Self {
        let toggle = LockscreenToggle {
            bound: AtomicBool::new(mediator.is_keyguard_bound()),
            mediator,
            keyguard,
            requested: AtomicBool::new(true),
        };
        toggle.apply();
        toggle
    }

    /// Re-check whether the keyguard service is bound and push the requested
    /// state to it. Called when the service asks for the state to be applied.
    pub fn reapply(&self) {
        self.bound
            .store(self.mediator.is_keyguard_bound(), Ordering::SeqCst);
        self.apply();
    }

    pub fn is_enforced(&self) -> bool {
        self.mediator.lockscreen_enforced_by_policy()
    }

    fn apply(&self) {
        if !self.bound.load(Ordering::SeqCst) {
            debug!("keyguard not bound yet, deferring lockscreen state");
            return;
        }
        self.mediator
            .set_keyguard_enabled_internal(self.requested.load(Ordering::SeqCst));
    }
}

impl Toggle for LockscreenToggle {
    fn label(&self) -> String {
        match (self.is_enforced(), self.is_enabled()) {
            (true, _) => "Lock screen (enforced)".to_string(),
            (false, true) => "Lock screen on".to_string(),
            (false, false) => "Lock screen off".to_string(),
        }
    }

    fn is_enabled(&self) -> bool {
        self.is_enforced()
            || self.requested.load(Ordering::SeqCst)
            || self.mediator.keyguard_enabled_internal()
    }

    fn state(&self) -> TileState {
        if self.keyguard.is_locked() {
            TileState::Unavailable
        } else {
            TileState::Active
        }
    }

    fn toggle(&self) -> Result<bool> {
        if self.keyguard.is_locked() {
            return Ok(self.is_enabled());
        }
        let requested = !self.requested.fetch_xor(true, Ordering::SeqCst);
        info!(
            "lock screen {}",
            if requested { "enabled" } else { "disabled" }
        );
        self.apply();
        Ok(self.is_enabled())
    }
}
