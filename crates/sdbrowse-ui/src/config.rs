//! Browser configuration types and builder

use crate::directory::{ExtensionFilter, ENTRY_CAPACITY};
use crate::render::Renderer;
use crate::DISPLAY_HEIGHT;

/// Runtime tuning for the browser.
///
/// Table and string capacities are compile-time constants
/// ([`ENTRY_CAPACITY`], [`crate::directory::NAME_CAPACITY`],
/// [`crate::path::PATH_CAPACITY`]); everything timing- or layout-related
/// lives here. Use [`ConfigBuilder`] to get a validated value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowserConfig {
    /// How long a button must read pressed before it counts
    pub debounce_ms: u64,
    /// Sampling interval while waiting for a confirmed press to be released
    pub release_poll_ms: u32,
    /// Sleep between idle main-loop iterations
    pub poll_interval_ms: u32,
    /// Number of list rows drawn below the header
    pub visible_rows: usize,
    /// Total wall-clock length of the startup splash
    pub splash_budget_ms: u64,
    /// Sleep after each splash frame
    pub splash_step_ms: u32,
    /// How long a notice overlay stays up before the list is redrawn
    pub overlay_dwell_ms: u32,
    /// Repaint interval of the fatal screen once halted
    pub halt_repaint_ms: u32,
    /// Optional file-name filter applied on every load
    pub extension_filter: Option<ExtensionFilter>,
}

impl BrowserConfig {
    pub const DEFAULT_DEBOUNCE_MS: u64 = 120;
    pub const DEFAULT_VISIBLE_ROWS: usize = 5;
    pub const DEFAULT_SPLASH_BUDGET_MS: u64 = 5_000;
    pub const DEFAULT_SPLASH_STEP_MS: u32 = 50;
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            release_poll_ms: 10,
            poll_interval_ms: 10,
            visible_rows: Self::DEFAULT_VISIBLE_ROWS,
            splash_budget_ms: Self::DEFAULT_SPLASH_BUDGET_MS,
            splash_step_ms: Self::DEFAULT_SPLASH_STEP_MS,
            overlay_dwell_ms: 1_500,
            halt_repaint_ms: 1_000,
            extension_filter: None,
        }
    }
}

/// Errors that can occur when building configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one list row must be visible
    ZeroVisibleRows,
    /// More visible rows than the entry table can ever hold
    VisibleRowsExceedCapacity {
        /// Rows requested
        rows: usize,
    },
    /// More visible rows than fit below the header on the panel
    VisibleRowsExceedPanel {
        /// Rows requested
        rows: usize,
        /// Rows the panel can show
        max: usize,
    },
    /// Splash step of zero would never advance the animation
    ZeroSplashStep,
    /// A single splash step longer than the whole budget
    SplashStepExceedsBudget {
        /// Step requested
        step_ms: u32,
        /// Budget configured
        budget_ms: u64,
    },
    /// Extension filter suffix is not three ASCII alphanumerics
    InvalidExtension,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroVisibleRows => write!(f, "Visible rows must be at least 1"),
            ConfigError::VisibleRowsExceedCapacity { rows } => write!(
                f,
                "Visible rows {rows} exceed entry capacity {ENTRY_CAPACITY}"
            ),
            ConfigError::VisibleRowsExceedPanel { rows, max } => {
                write!(f, "Visible rows {rows} exceed the {max} rows that fit on the panel")
            }
            ConfigError::ZeroSplashStep => write!(f, "Splash step must be non-zero"),
            ConfigError::SplashStepExceedsBudget { step_ms, budget_ms } => write!(
                f,
                "Splash step {step_ms}ms exceeds splash budget {budget_ms}ms"
            ),
            ConfigError::InvalidExtension => {
                write!(f, "Extension filter must be three ASCII letters or digits")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for constructing a [`BrowserConfig`]
///
/// # Example
///
/// ```
/// use sdbrowse_ui::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .visible_rows(4)
///     .extension_filter("txt")
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.visible_rows, 4);
/// assert!(config.extension_filter.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: BrowserConfig,
    pending_error: Option<ConfigError>,
}

impl ConfigBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    pub fn release_poll_ms(mut self, ms: u32) -> Self {
        self.config.release_poll_ms = ms;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u32) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn visible_rows(mut self, rows: usize) -> Self {
        self.config.visible_rows = rows;
        self
    }

    pub fn splash_budget_ms(mut self, ms: u64) -> Self {
        self.config.splash_budget_ms = ms;
        self
    }

    pub fn splash_step_ms(mut self, ms: u32) -> Self {
        self.config.splash_step_ms = ms;
        self
    }

    pub fn overlay_dwell_ms(mut self, ms: u32) -> Self {
        self.config.overlay_dwell_ms = ms;
        self
    }

    pub fn halt_repaint_ms(mut self, ms: u32) -> Self {
        self.config.halt_repaint_ms = ms;
        self
    }

    /// Only list files ending in `.<suffix>` (case-insensitive). Directories
    /// are always listed.
    pub fn extension_filter(mut self, suffix: &str) -> Self {
        match ExtensionFilter::parse(suffix) {
            Some(filter) => self.config.extension_filter = Some(filter),
            None => self.pending_error = Some(ConfigError::InvalidExtension),
        }
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<BrowserConfig, ConfigError> {
        if let Some(err) = self.pending_error {
            return Err(err);
        }
        let config = self.config;
        if config.visible_rows == 0 {
            return Err(ConfigError::ZeroVisibleRows);
        }
        if config.visible_rows > ENTRY_CAPACITY {
            return Err(ConfigError::VisibleRowsExceedCapacity {
                rows: config.visible_rows,
            });
        }
        let max_rows = Renderer::rows_fitting(DISPLAY_HEIGHT);
        if config.visible_rows > max_rows {
            return Err(ConfigError::VisibleRowsExceedPanel {
                rows: config.visible_rows,
                max: max_rows,
            });
        }
        if config.splash_step_ms == 0 {
            return Err(ConfigError::ZeroSplashStep);
        }
        if u64::from(config.splash_step_ms) > config.splash_budget_ms {
            return Err(ConfigError::SplashStepExceedsBudget {
                step_ms: config.splash_step_ms,
                budget_ms: config.splash_budget_ms,
            });
        }
        Ok(config)
    }
}
