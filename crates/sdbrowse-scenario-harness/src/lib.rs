//! Host-side scenario test harness for scripted browser flows.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use png::{BitDepth, ColorType, Encoder};
use sdbrowse_ui::mock_storage::MockStorage;
use sdbrowse_ui::sim::{SimButton, SimClock};
use sdbrowse_ui::test_display::TestDisplay;
use sdbrowse_ui::{
    BrowserConfig, BrowserController, ButtonPins, Clock, DirectoryModel, NavButton, Phase,
    StartupError, StartupReport,
};

type Controller = BrowserController<MockStorage, TestDisplay, SimButton, SimClock>;

/// Couples the controller, mock storage, display and simulated buttons.
pub struct ScenarioHarness {
    clock: SimClock,
    scroll: SimButton,
    enter: SimButton,
    back: SimButton,
    controller: Controller,
}

impl ScenarioHarness {
    /// How long a scripted press holds the button
    pub const PRESS_MS: u64 = 200;
    const MAX_STEPS: usize = 64;

    /// Construct a harness with caller-provided storage and config.
    pub fn new(storage: MockStorage, config: BrowserConfig) -> Self {
        let clock = SimClock::new();
        let scroll = SimButton::new(&clock);
        let enter = SimButton::new(&clock);
        let back = SimButton::new(&clock);
        let pins = ButtonPins {
            scroll: scroll.clone(),
            enter: enter.clone(),
            back: back.clone(),
        };
        let controller = BrowserController::new(
            storage,
            TestDisplay::default_size(),
            pins,
            clock.clone(),
            config,
        );
        Self {
            clock,
            scroll,
            enter,
            back,
            controller,
        }
    }

    pub fn with_defaults(storage: MockStorage) -> Self {
        Self::new(storage, BrowserConfig::default())
    }

    /// Run the splash and startup verification.
    pub fn boot(&mut self) -> Result<StartupReport, StartupError> {
        self.controller.start()
    }

    /// Press and release a button, stepping the loop until it is handled.
    pub fn press(&mut self, button: NavButton) -> bool {
        self.hold(button, Self::PRESS_MS)
    }

    /// Hold a button for `duration_ms`, stepping until it is handled.
    pub fn hold(&mut self, button: NavButton, duration_ms: u64) -> bool {
        self.button(button).press_for(duration_ms);
        for _ in 0..Self::MAX_STEPS {
            if let Some(handled) = self.controller.step() {
                return handled == button;
            }
        }
        false
    }

    /// Step the loop with no input until `duration_ms` has passed.
    pub fn idle(&mut self, duration_ms: u64) -> usize {
        let until = self.clock.now_ms() + duration_ms;
        let mut handled = 0;
        while self.clock.now_ms() < until {
            if self.controller.step().is_some() {
                handled += 1;
            }
        }
        handled
    }

    fn button(&self, button: NavButton) -> &SimButton {
        match button {
            NavButton::Scroll => &self.scroll,
            NavButton::Enter => &self.enter,
            NavButton::Back => &self.back,
        }
    }

    /// Access the controller for assertions.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn model(&self) -> &DirectoryModel {
        self.controller.model()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Access the display for render assertions.
    pub fn display(&self) -> &TestDisplay {
        self.controller.display()
    }

    /// Access mock storage for scenario setup.
    pub fn storage_mut(&mut self) -> &mut MockStorage {
        self.controller.storage_mut()
    }

    pub fn storage(&self) -> &MockStorage {
        self.controller.storage()
    }

    /// Simulated time since the harness was created.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Save the current framebuffer to a PNG (white = Off, black = On).
    pub fn save_screenshot_png(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let display = self.display();
        let (width, height) = display.dimensions();
        let mut data = Vec::with_capacity((width * height) as usize);
        for pixel in display.pixels() {
            let value = match pixel {
                BinaryColor::On => 0u8,
                BinaryColor::Off => 255u8,
            };
            data.push(value);
        }

        let file = File::create(path).map_err(|e| e.to_string())?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, width, height);
        encoder.set_color(ColorType::Grayscale);
        encoder.set_depth(BitDepth::Eight);
        let mut png_writer = encoder.write_header().map_err(|e| e.to_string())?;
        png_writer
            .write_image_data(&data)
            .map_err(|e| e.to_string())
    }
}
