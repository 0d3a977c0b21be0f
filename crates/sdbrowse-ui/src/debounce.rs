//! Button debouncing.
//!
//! A press counts once the pin has read low continuously for the debounce
//! interval. The poll then sleeps until the button is released before it
//! returns, so holding a button produces exactly one action and there is no
//! auto-repeat.

use embedded_hal::digital::InputPin;

use crate::clock::Timer;
use crate::config::BrowserConfig;
use crate::input::{ButtonPins, NavButton, PressEvent};

/// Pins are pulled up: high means released
const RELEASED: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ButtonState {
    last_level: bool,
    last_edge_ms: u64,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            last_level: RELEASED,
            last_edge_ms: 0,
        }
    }
}

/// Debounce state for the three navigation buttons
pub struct InputDebouncer<P> {
    pins: [P; 3],
    states: [ButtonState; 3],
    debounce_ms: u64,
    release_poll_ms: u32,
}

impl<P: InputPin> InputDebouncer<P> {
    pub fn new(pins: ButtonPins<P>, config: &BrowserConfig) -> Self {
        Self {
            pins: pins.into_array(),
            states: [ButtonState::default(); 3],
            debounce_ms: config.debounce_ms,
            release_poll_ms: config.release_poll_ms.max(1),
        }
    }

    /// Sample one button and report a confirmed press
    ///
    /// A level change only restarts the debounce timer. Once the button has
    /// been held for the debounce interval this blocks until it is released,
    /// then returns the event. A button that never lets go blocks forever.
    pub fn poll<T: Timer>(&mut self, button: NavButton, timer: &mut T) -> Option<PressEvent> {
        let idx = button.index();
        let level = self.read_level(idx);
        let now = timer.now_ms();

        let state = &mut self.states[idx];
        if level != state.last_level {
            state.last_level = level;
            state.last_edge_ms = now;
            return None;
        }
        if level == RELEASED || now.saturating_sub(state.last_edge_ms) < self.debounce_ms {
            return None;
        }

        log::debug!("INPUT: {:?} confirmed, waiting for release", button);
        while self.read_level(idx) != RELEASED {
            timer.delay_ms(self.release_poll_ms);
        }

        let state = &mut self.states[idx];
        state.last_level = RELEASED;
        state.last_edge_ms = timer.now_ms();

        Some(PressEvent {
            button,
            confirmed_at_ms: now,
        })
    }

    /// Poll Scroll, Enter and Back in that order; first press wins
    pub fn poll_any<T: Timer>(&mut self, timer: &mut T) -> Option<PressEvent> {
        NavButton::ALL
            .into_iter()
            .find_map(|button| self.poll(button, timer))
    }

    // A failed read counts as released.
    fn read_level(&mut self, idx: usize) -> bool {
        self.pins[idx].is_high().unwrap_or(RELEASED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::sim::{SimButton, SimClock};

    struct Rig {
        clock: SimClock,
        scroll: SimButton,
        enter: SimButton,
        back: SimButton,
        debouncer: InputDebouncer<SimButton>,
    }

    fn rig() -> Rig {
        let clock = SimClock::new();
        let scroll = SimButton::new(&clock);
        let enter = SimButton::new(&clock);
        let back = SimButton::new(&clock);
        let debouncer = InputDebouncer::new(
            ButtonPins {
                scroll: scroll.clone(),
                enter: enter.clone(),
                back: back.clone(),
            },
            &BrowserConfig::default(),
        );
        Rig {
            clock,
            scroll,
            enter,
            back,
            debouncer,
        }
    }

    /// Poll every 10ms until `until_ms`, collecting events
    fn run_until(rig: &mut Rig, until_ms: u64) -> std::vec::Vec<PressEvent> {
        let mut events = std::vec::Vec::new();
        let mut timer = rig.clock.clone();
        while rig.clock.now_ms() < until_ms {
            match rig.debouncer.poll_any(&mut timer) {
                Some(event) => events.push(event),
                None => rig.clock.advance_ms(10),
            }
        }
        events
    }

    #[test]
    fn test_single_press_yields_one_event() {
        let mut rig = rig();
        rig.enter.press_at(100, 300);

        let events = run_until(&mut rig, 1_000);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].button, NavButton::Enter);
        assert!(events[0].confirmed_at_ms >= 220);
        assert!(events[0].confirmed_at_ms < 240);
    }

    #[test]
    fn test_poll_blocks_until_release() {
        let mut rig = rig();
        rig.scroll.press_at(0, 2_000);
        let mut timer = rig.clock.clone();

        assert!(rig.debouncer.poll(NavButton::Scroll, &mut timer).is_none());
        rig.clock.advance_ms(150);
        let event = rig.debouncer.poll(NavButton::Scroll, &mut timer);

        assert!(event.is_some());
        assert!(rig.clock.now_ms() >= 2_000);
        assert!(!rig.scroll.is_pressed());
    }

    #[test]
    fn test_long_hold_does_not_repeat() {
        let mut rig = rig();
        rig.back.press_at(50, 3_000);

        let events = run_until(&mut rig, 5_000);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].button, NavButton::Back);
    }

    #[test]
    fn test_contact_bounce_is_ignored() {
        let mut rig = rig();
        for i in 0..8 {
            rig.scroll.press_at(100 + i * 40, 20);
        }

        let events = run_until(&mut rig, 1_000);
        assert!(events.is_empty());
    }

    #[test]
    fn test_press_shorter_than_debounce_is_ignored() {
        let mut rig = rig();
        rig.enter.press_at(100, 100);

        assert!(run_until(&mut rig, 1_000).is_empty());
    }

    #[test]
    fn test_bounce_then_stable_press_counts_once() {
        let mut rig = rig();
        rig.enter.press_at(100, 20);
        rig.enter.press_at(130, 20);
        rig.enter.press_at(160, 400);

        let events = run_until(&mut rig, 1_000);
        assert_eq!(events.len(), 1);
        assert!(events[0].confirmed_at_ms >= 280);
    }

    #[test]
    fn test_buttons_debounce_independently() {
        let mut rig = rig();
        rig.scroll.press_at(100, 200);
        rig.enter.press_at(600, 200);
        rig.back.press_at(1_100, 200);

        let buttons: std::vec::Vec<NavButton> = run_until(&mut rig, 2_000)
            .into_iter()
            .map(|event| event.button)
            .collect();
        assert_eq!(buttons, [NavButton::Scroll, NavButton::Enter, NavButton::Back]);
    }

    #[test]
    fn test_repeated_presses_each_count() {
        let mut rig = rig();
        for i in 0..4 {
            rig.scroll.press_at(100 + i * 500, 200);
        }

        assert_eq!(run_until(&mut rig, 3_000).len(), 4);
    }
}
