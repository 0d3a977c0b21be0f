//! Main browser loop.
//!
//! One debounced press drives one transition. Navigation errors never leave
//! this module: a failed Enter shows a timed notice over the unchanged list,
//! a failed Back falls back to root. The only terminal state is a failed
//! startup, after which the controller just repaints the error screen.

use embedded_hal::digital::InputPin;

use crate::clock::Timer;
use crate::config::BrowserConfig;
use crate::debounce::InputDebouncer;
use crate::directory::{DirectoryModel, EntryName};
use crate::input::{ButtonPins, NavButton};
use crate::path;
use crate::render::{Notice, Renderer, Screen};
use crate::startup::{StartupError, StartupReport, StartupSequencer};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `start` has not run yet
    Booting,
    Browsing,
    /// Startup failed; input is ignored from here on
    Halted(StartupError),
}

pub struct BrowserController<S, D, P, T> {
    storage: S,
    display: D,
    timer: T,
    debouncer: InputDebouncer<P>,
    model: DirectoryModel,
    renderer: Renderer,
    config: BrowserConfig,
    phase: Phase,
    last_notice: Option<(Notice, EntryName)>,
}

impl<S, D, P, T> BrowserController<S, D, P, T>
where
    S: Storage,
    D: Screen,
    P: InputPin,
    T: Timer,
{
    pub fn new(storage: S, display: D, pins: ButtonPins<P>, timer: T, config: BrowserConfig) -> Self {
        Self {
            storage,
            display,
            timer,
            debouncer: InputDebouncer::new(pins, &config),
            model: DirectoryModel::new(config.visible_rows),
            renderer: Renderer::new(config.visible_rows),
            config,
            phase: Phase::Booting,
            last_notice: None,
        }
    }

    /// Run the splash and bring up storage, then show the root listing
    pub fn start(&mut self) -> Result<StartupReport, StartupError> {
        let result = StartupSequencer::new(&self.config).run(
            &mut self.storage,
            &mut self.model,
            &self.renderer,
            &mut self.display,
            &mut self.timer,
        );
        match result {
            Ok(report) => {
                self.phase = Phase::Browsing;
                self.redraw();
                Ok(report)
            }
            Err(err) => {
                self.phase = Phase::Halted(err);
                Err(err)
            }
        }
    }

    /// One loop iteration
    ///
    /// Returns the button that was handled, if any. Sleeps for the poll
    /// interval when nothing was pressed.
    pub fn step(&mut self) -> Option<NavButton> {
        match self.phase {
            Phase::Booting => {
                // Outcome is recorded in `phase`
                let _ = self.start();
                None
            }
            Phase::Halted(err) => {
                if self.renderer.draw_fatal(&mut self.display, &err).is_err() {
                    log::warn!("BOOT: fatal screen failed to draw");
                }
                self.timer.delay_ms(self.config.halt_repaint_ms);
                None
            }
            Phase::Browsing => match self.debouncer.poll_any(&mut self.timer) {
                Some(event) => {
                    self.handle(event.button);
                    Some(event.button)
                }
                None => {
                    self.timer.delay_ms(self.config.poll_interval_ms);
                    None
                }
            },
        }
    }

    /// Start, then loop forever
    pub fn run(mut self) -> ! {
        if let Err(err) = self.start() {
            log::error!("BOOT: halted: {}", err);
        }
        loop {
            self.step();
        }
    }

    /// Apply one press and redraw the list
    ///
    /// Ignored unless the browser is up.
    pub fn handle(&mut self, button: NavButton) {
        if self.phase != Phase::Browsing {
            return;
        }
        match button {
            NavButton::Scroll => self.model.advance_selection(),
            NavButton::Enter => self.enter_selected(),
            NavButton::Back => self.go_back(),
        }
        self.redraw();
    }

    fn enter_selected(&mut self) {
        let Some(entry) = self.model.selected_entry().cloned() else {
            return;
        };

        if !entry.is_directory() {
            log::info!("NAV: selected file '{}'", entry.name());
            self.show_notice(Notice::FileSelected, entry.name());
            return;
        }

        let target = path::join(self.model.current_path(), entry.name());
        log::info!("NAV: enter '{}'", target);
        if let Err(err) = self
            .model
            .load(&mut self.storage, &target, self.config.extension_filter)
        {
            log::warn!("NAV: cannot open '{}': {}", target, err);
            self.show_notice(Notice::OpenFailed, entry.name());
        }
    }

    fn go_back(&mut self) {
        if self.model.is_at_root() {
            return;
        }

        let target = path::parent(self.model.current_path());
        log::info!("NAV: back to '{}'", target);
        let filter = self.config.extension_filter;
        if let Err(err) = self.model.load(&mut self.storage, &target, filter) {
            log::warn!("NAV: cannot open '{}': {}, returning to root", target, err);
            self.model.reset_to_root();
            if let Err(err) = self.model.load(&mut self.storage, path::ROOT, filter) {
                log::error!("NAV: root unreadable: {}", err);
            }
        }
    }

    fn show_notice(&mut self, notice: Notice, name: &str) {
        if self
            .renderer
            .draw_notice(&mut self.display, notice, name)
            .is_err()
        {
            log::warn!("NAV: notice failed to draw");
        }
        self.last_notice = Some((notice, path::bounded(name)));
        self.timer.delay_ms(self.config.overlay_dwell_ms);
    }

    fn redraw(&mut self) {
        if self
            .renderer
            .draw_list(&mut self.display, &self.model)
            .is_err()
        {
            log::warn!("NAV: list failed to draw");
        }
    }

    pub fn model(&self) -> &DirectoryModel {
        &self.model
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Most recent notice shown, if any
    pub fn last_notice(&self) -> Option<(Notice, &str)> {
        self.last_notice
            .as_ref()
            .map(|(notice, name)| (*notice, name.as_str()))
    }
}
