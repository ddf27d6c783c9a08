//! In-memory lights for unit tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::light::{Brightness, Light, LightId, LightTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Brightness(Brightness),
    Off,
}

#[derive(Default)]
struct Inner {
    writes: Vec<Write>,
    last: Option<Write>,
}

/// Records every write that actually reaches the device.
#[derive(Default)]
pub struct RecordingLight {
    inner: Mutex<Inner>,
}

impl RecordingLight {
    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn writes(&self) -> Vec<Write> {
        self.with(|inner| inner.writes.clone())
    }

    pub fn last(&self) -> Option<Write> {
        self.with(|inner| inner.last)
    }

    pub fn is_off(&self) -> bool {
        matches!(self.last(), Some(Write::Off | Write::Brightness(0)))
    }

    fn record(&self, write: Write) {
        self.with(|inner| {
            inner.writes.push(write);
            inner.last = Some(write);
        });
    }
}

impl Light for RecordingLight {
    fn set_brightness(&self, brightness: Brightness) {
        self.record(Write::Brightness(brightness));
    }

    fn set_brightness_if_not_off(&self, brightness: Brightness) {
        if !self.is_off() {
            self.record(Write::Brightness(brightness));
        }
    }

    fn turn_off(&self) {
        self.record(Write::Off);
    }
}

/// A table of recording lights plus typed handles to inspect them.
pub struct RecordingLights {
    lights: Vec<Arc<RecordingLight>>,
}

impl RecordingLights {
    pub fn new() -> Self {
        Self {
            lights: LightId::ALL
                .iter()
                .map(|_| Arc::new(RecordingLight::default()))
                .collect(),
        }
    }

    pub fn get(&self, id: LightId) -> &RecordingLight {
        &self.lights[u8::from(id) as usize]
    }

    pub fn table(&self) -> LightTable {
        LightTable::from_lookup(|id| {
            Some(self.lights[u8::from(id) as usize].clone() as Arc<dyn Light>)
        })
        .expect("every light is registered")
    }
}
