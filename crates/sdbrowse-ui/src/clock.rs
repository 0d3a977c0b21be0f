//! Time source abstraction.
//!
//! Sleeping goes through [`embedded_hal::delay::DelayNs`]; reading the time
//! goes through [`Clock`]. The firmware backs both with the ESP-IDF timer and
//! FreeRTOS delays, host tests with [`SimClock`](crate::sim::SimClock).

use embedded_hal::delay::DelayNs;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point
    fn now_ms(&self) -> u64;
}

/// Anything that can both tell the time and sleep
pub trait Timer: Clock + DelayNs {}

impl<T: Clock + DelayNs> Timer for T {}
