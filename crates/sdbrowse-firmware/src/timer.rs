//! Boot-relative clock and FreeRTOS sleeps for the browser loop.

use embedded_hal::delay::DelayNs;
use esp_idf_svc::hal::delay::{Delay, FreeRtos};
use esp_idf_svc::systime::EspSystemTime;
use sdbrowse_ui::Clock;

/// Monotonic time since boot plus sleeps that yield to FreeRTOS
pub struct EspTimer {
    spin: Delay,
}

impl EspTimer {
    pub fn new() -> Self {
        Self {
            spin: Delay::new_default(),
        }
    }
}

impl Clock for EspTimer {
    fn now_ms(&self) -> u64 {
        EspSystemTime.now().as_millis() as u64
    }
}

impl DelayNs for EspTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.spin.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
