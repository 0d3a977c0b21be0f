//! Simulated clock and buttons for host tests.
//!
//! Time only moves when someone sleeps or advances it explicitly, so every
//! run is deterministic. Button levels are a function of the shared time:
//! a scripted press reads low from its start until its end, which lets the
//! debouncer's release-wait finish on its own while it sleeps.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use crate::clock::Clock;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Shared virtual clock; clones observe the same time
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    nanos: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.nanos.set(self.nanos.get() + ms * NANOS_PER_MILLI);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.nanos.get() / NANOS_PER_MILLI
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.nanos.set(self.nanos.get() + u64::from(ns));
    }
}

/// Button whose level follows scripted press windows on a [`SimClock`]
///
/// Reads high (released) except inside a window `[start, end)`.
#[derive(Debug, Clone)]
pub struct SimButton {
    clock: SimClock,
    presses: Rc<RefCell<Vec<(u64, u64)>>>,
}

impl SimButton {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            presses: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Hold the button from `start_ms` for `duration_ms`
    pub fn press_at(&self, start_ms: u64, duration_ms: u64) {
        self.presses
            .borrow_mut()
            .push((start_ms, start_ms + duration_ms));
    }

    /// Hold the button from now for `duration_ms`
    pub fn press_for(&self, duration_ms: u64) {
        self.press_at(self.clock.now_ms(), duration_ms);
    }

    pub fn is_pressed(&self) -> bool {
        let now = self.clock.now_ms();
        self.presses
            .borrow()
            .iter()
            .any(|&(start, end)| start <= now && now < end)
    }
}

impl ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_pressed())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_pressed())
    }
}
