//! Button input abstraction.

/// The three navigation buttons (directly maps to hardware)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavButton {
    /// Advance the selection (wraps around)
    Scroll,
    /// Descend into a directory or select a file
    Enter,
    /// Ascend to the parent directory
    Back,
}

impl NavButton {
    /// Polling order used by the main loop
    pub const ALL: [NavButton; 3] = [NavButton::Scroll, NavButton::Enter, NavButton::Back];

    pub(crate) const fn index(self) -> usize {
        match self {
            NavButton::Scroll => 0,
            NavButton::Enter => 1,
            NavButton::Back => 2,
        }
    }
}

/// A debounced press, reported once per press-release cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    pub button: NavButton,
    /// Timestamp at which the press was confirmed
    pub confirmed_at_ms: u64,
}

/// Input pins for the three buttons, idle-high / active-low.
pub struct ButtonPins<P> {
    pub scroll: P,
    pub enter: P,
    pub back: P,
}

impl<P> ButtonPins<P> {
    pub(crate) fn into_array(self) -> [P; 3] {
        [self.scroll, self.enter, self.back]
    }
}
