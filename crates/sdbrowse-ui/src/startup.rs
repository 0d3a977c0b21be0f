//! Boot splash and storage bring-up.
//!
//! The splash always runs for the full budget in fixed steps. Storage init is
//! retried on every step until it succeeds; the root scan is tried once, as
//! soon as storage is up. When the budget is spent both are verified again
//! unconditionally, and a failure there is final.

use crate::clock::Timer;
use crate::config::BrowserConfig;
use crate::directory::{DirectoryError, DirectoryModel, ExtensionFilter};
use crate::path;
use crate::render::{Renderer, Screen};
use crate::storage::{Storage, StorageError};

/// Status line shown under the splash title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashStatus {
    LoadingStorage,
    Scanning,
    Ready,
}

impl SplashStatus {
    pub fn label(self) -> &'static str {
        match self {
            SplashStatus::LoadingStorage => "Loading storage...",
            SplashStatus::Scanning => "Scanning...",
            SplashStatus::Ready => "Ready",
        }
    }
}

/// Fatal startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    /// Storage did not come up by the end of the splash
    StorageInit(StorageError),
    /// Storage is up but the root directory cannot be listed
    RootScan(DirectoryError),
}

impl StartupError {
    /// One-line description that fits the fatal screen
    pub fn summary(&self) -> &'static str {
        match self {
            StartupError::StorageInit(_) => "No card found",
            StartupError::RootScan(_) => "Cannot read root",
        }
    }
}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::StorageInit(err) => write!(f, "Storage init failed: {}", err),
            StartupError::RootScan(err) => write!(f, "Root scan failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StartupError {}

/// What happened during the splash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupReport {
    /// Splash frames drawn
    pub frames: u32,
    /// Init calls made during the splash (verification not included)
    pub init_attempts: u32,
    /// Whether the one in-splash root scan succeeded
    pub scanned_during_splash: bool,
    /// Time spent in the splash loop
    pub splash_ms: u64,
}

pub struct StartupSequencer {
    budget_ms: u64,
    step_ms: u32,
    filter: Option<ExtensionFilter>,
    storage_ready: bool,
    scanned: bool,
    report: StartupReport,
}

impl StartupSequencer {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            budget_ms: config.splash_budget_ms,
            step_ms: config.splash_step_ms.max(1),
            filter: config.extension_filter,
            storage_ready: false,
            scanned: false,
            report: StartupReport::default(),
        }
    }

    /// Status line for the current (ready, scanned) state
    pub fn status(&self) -> SplashStatus {
        match (self.storage_ready, self.scanned) {
            (false, _) => SplashStatus::LoadingStorage,
            (true, false) => SplashStatus::Scanning,
            (true, true) => SplashStatus::Ready,
        }
    }

    /// Run the splash, then verify storage and load root into `model`
    ///
    /// On failure the fatal screen has already been drawn when this returns.
    pub fn run<S, D, T>(
        &mut self,
        storage: &mut S,
        model: &mut DirectoryModel,
        renderer: &Renderer,
        display: &mut D,
        timer: &mut T,
    ) -> Result<StartupReport, StartupError>
    where
        S: Storage + ?Sized,
        D: Screen,
        T: Timer,
    {
        let start = timer.now_ms();
        log::info!("BOOT: splash for {}ms", self.budget_ms);

        while timer.now_ms().saturating_sub(start) < self.budget_ms {
            self.step(storage, model);

            let elapsed = timer.now_ms().saturating_sub(start);
            let progress = progress_permille(elapsed, self.budget_ms);
            if renderer
                .draw_splash(display, self.status(), progress)
                .is_err()
            {
                log::warn!("BOOT: splash frame {} failed to draw", self.report.frames);
            }
            self.report.frames += 1;
            timer.delay_ms(self.step_ms);
        }
        self.report.splash_ms = timer.now_ms().saturating_sub(start);
        log::info!(
            "BOOT: splash done after {} frames, {} init attempts",
            self.report.frames,
            self.report.init_attempts
        );

        if let Err(err) = self.verify(storage, model) {
            log::error!("BOOT: {}", err);
            if renderer.draw_fatal(display, &err).is_err() {
                log::warn!("BOOT: fatal screen failed to draw");
            }
            return Err(err);
        }

        log::info!("BOOT: ready, {} entries at root", model.entry_count());
        Ok(self.report)
    }

    fn step<S: Storage + ?Sized>(&mut self, storage: &mut S, model: &mut DirectoryModel) {
        if !self.storage_ready {
            self.report.init_attempts += 1;
            match storage.init() {
                Ok(()) => {
                    self.storage_ready = true;
                    log::info!("BOOT: storage up after {} attempts", self.report.init_attempts);
                }
                Err(err) => log::debug!("BOOT: storage init: {}", err),
            }
        }

        if self.storage_ready && !self.scanned {
            self.scanned = true;
            match model.load(storage, path::ROOT, self.filter) {
                Ok(()) => self.report.scanned_during_splash = true,
                Err(err) => log::warn!("BOOT: root scan failed: {}", err),
            }
        }
    }

    fn verify<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        model: &mut DirectoryModel,
    ) -> Result<(), StartupError> {
        storage.init().map_err(StartupError::StorageInit)?;
        model
            .load(storage, path::ROOT, self.filter)
            .map_err(StartupError::RootScan)
    }
}

fn progress_permille(elapsed_ms: u64, budget_ms: u64) -> u32 {
    if budget_ms == 0 {
        return 1000;
    }
    (elapsed_ms.min(budget_ms) * 1000 / budget_ms) as u32
}
