//! Navigation core for a three-button SD card browser.
//! Runs on ESP32 and on the desktop for tests.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod directory;
pub mod input;
pub mod path;
pub mod render;
pub mod startup;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod mock_storage;
#[cfg(any(test, feature = "std"))]
pub mod sim;
#[cfg(any(test, feature = "std"))]
pub mod test_display;

pub use clock::{Clock, Timer};
pub use config::{BrowserConfig, ConfigBuilder, ConfigError};
pub use controller::{BrowserController, Phase};
pub use debounce::InputDebouncer;
pub use directory::{
    DirectoryError, DirectoryModel, Entry, EntryName, ExtensionFilter, ENTRY_CAPACITY,
    NAME_CAPACITY,
};
pub use input::{ButtonPins, NavButton, PressEvent};
pub use path::{PathBuf, PATH_CAPACITY};
pub use render::{Notice, Renderer, Screen};
pub use startup::{SplashStatus, StartupError, StartupReport, StartupSequencer};
pub use storage::{Storage, StorageError};

/// Panel width in pixels
pub const DISPLAY_WIDTH: u32 = 128;
/// Panel height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;
