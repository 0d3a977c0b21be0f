//! Storage abstraction for the browser.
//! Backed by the SD card on the device and by [`MockStorage`](crate::mock_storage::MockStorage)
//! on the host.

use core::ops::ControlFlow;

/// Storage error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Device absent, not mounted yet, or not answering
    NotReady,
    /// Path does not exist or could not be opened
    NotFound,
    /// Path exists but is not a directory
    NotADirectory,
    /// Low-level read failure; the driver logs the details
    Io,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::NotReady => write!(f, "Storage not ready"),
            StorageError::NotFound => write!(f, "Path not found"),
            StorageError::NotADirectory => write!(f, "Not a directory"),
            StorageError::Io => write!(f, "Storage read error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// Trait for the storage operations the browser needs
///
/// Implementations:
/// - `SdCardStorage` in the firmware (FAT volume on an SPI SD card)
/// - `MockStorage` for host tests
pub trait Storage {
    /// Bring the device up.
    ///
    /// May be called repeatedly until it succeeds and must be cheap and
    /// successful on every call after that, as long as the device stays
    /// present.
    fn init(&mut self) -> Result<(), StorageError>;

    /// Enumerate the immediate children of the directory at `path`
    ///
    /// Opens `path`, checks that it is a directory, then calls `visit` once per
    /// child with its name and whether it is a directory, in the order the
    /// device yields them. Enumeration stops early when `visit` breaks. The
    /// directory is closed before returning.
    ///
    /// # Errors
    /// `NotFound` if the path cannot be opened, `NotADirectory` if it is a
    /// file, `NotReady`/`Io` for device trouble.
    fn read_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&str, bool) -> ControlFlow<()>,
    ) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn init(&mut self) -> Result<(), StorageError> {
        (**self).init()
    }

    fn read_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&str, bool) -> ControlFlow<()>,
    ) -> Result<(), StorageError> {
        (**self).read_dir(path, visit)
    }
}
