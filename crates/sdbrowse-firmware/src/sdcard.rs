//! SD card over SPI, mounted through ESP-IDF's FAT VFS.
//!
//! Mounting is attempted from `init`, so a card inserted during the splash
//! is picked up on the next attempt. Listing goes through `std::fs`.

use core::ops::ControlFlow;
use core::ptr;
use std::ffi::CString;
use std::fs;
use std::io::ErrorKind;

use esp_idf_svc::hal::gpio::Pin;
use esp_idf_svc::hal::spi::SpiDriver;
use esp_idf_svc::sys;
use sdbrowse_ui::{Storage, StorageError};

const SD_MOUNT_POINT: &str = "/sd";
const SD_MAX_FILES: i32 = 4;

pub struct SdCardStorage {
    // Keeps the SPI bus initialized while the card is mounted
    spi: SpiDriver<'static>,
    cs_gpio: i32,
    mounted: bool,
}

impl SdCardStorage {
    pub fn new(spi: SpiDriver<'static>, cs_pin: impl Pin) -> Self {
        Self {
            spi,
            cs_gpio: cs_pin.pin(),
            mounted: false,
        }
    }

    fn mount(&mut self) -> Result<(), StorageError> {
        let c_base = CString::new(SD_MOUNT_POINT).map_err(|_| StorageError::Io)?;
        let host = build_sdspi_host(self.spi.host());
        let slot_config = sys::sdspi_device_config_t {
            host_id: self.spi.host(),
            gpio_cs: self.cs_gpio,
            gpio_cd: -1,
            gpio_wp: -1,
            gpio_int: -1,
            gpio_wp_polarity: false,
        };
        let mount_config = sys::esp_vfs_fat_mount_config_t {
            format_if_mount_failed: false,
            max_files: SD_MAX_FILES,
            allocation_unit_size: 0,
            disk_status_check_enable: false,
            use_one_fat: false,
        };

        let res = unsafe {
            sys::esp_vfs_fat_sdspi_mount(
                c_base.as_ptr(),
                &host,
                &slot_config,
                &mount_config,
                ptr::null_mut(),
            )
        };
        if res != sys::ESP_OK {
            log::debug!("SD: mount failed: {}", res);
            return Err(StorageError::NotReady);
        }

        log::info!("SD: card mounted at {}", SD_MOUNT_POINT);
        self.mounted = true;
        Ok(())
    }

    fn host_path(path: &str) -> String {
        if path == "/" {
            SD_MOUNT_POINT.to_string()
        } else {
            format!("{}/{}", SD_MOUNT_POINT, path.trim_start_matches('/'))
        }
    }
}

impl Storage for SdCardStorage {
    fn init(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Ok(());
        }
        self.mount()
    }

    fn read_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&str, bool) -> ControlFlow<()>,
    ) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotReady);
        }

        let host_path = Self::host_path(path);
        let meta = fs::metadata(&host_path).map_err(to_storage_error)?;
        if !meta.is_dir() {
            return Err(StorageError::NotADirectory);
        }

        for entry in fs::read_dir(&host_path).map_err(to_storage_error)? {
            let entry = entry.map_err(to_storage_error)?;
            let is_directory = entry.file_type().map_err(to_storage_error)?.is_dir();
            let name = entry.file_name();
            if visit(&name.to_string_lossy(), is_directory).is_break() {
                break;
            }
        }
        Ok(())
    }
}

fn to_storage_error(err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::Io,
    }
}

fn build_sdspi_host(host_id: sys::spi_host_device_t) -> sys::sdmmc_host_t {
    const SDMMC_HOST_FLAG_SPI: u32 = 1 << 3;
    const SDMMC_HOST_FLAG_DEINIT_ARG: u32 = 1 << 5;

    sys::sdmmc_host_t {
        flags: SDMMC_HOST_FLAG_SPI | SDMMC_HOST_FLAG_DEINIT_ARG,
        slot: host_id as _,
        max_freq_khz: 20_000,
        io_voltage: 3.3,
        init: Some(sys::sdspi_host_init),
        set_bus_width: None,
        get_bus_width: None,
        set_bus_ddr_mode: None,
        set_card_clk: Some(sys::sdspi_host_set_card_clk),
        set_cclk_always_on: None,
        do_transaction: Some(sys::sdspi_host_do_transaction),
        __bindgen_anon_1: sys::sdmmc_host_t__bindgen_ty_1 {
            deinit_p: Some(sys::sdspi_host_remove_device),
        },
        io_int_enable: Some(sys::sdspi_host_io_int_enable),
        io_int_wait: Some(sys::sdspi_host_io_int_wait),
        command_timeout_ms: 0,
        get_real_freq: Some(sys::sdspi_host_get_real_freq),
        input_delay_phase: sys::sdmmc_delay_phase_t_SDMMC_DELAY_PHASE_0,
        set_input_delay: None,
        dma_aligned_buffer: ptr::null_mut(),
        pwr_ctrl_handle: ptr::null_mut(),
        get_dma_info: Some(sys::sdspi_host_get_dma_info),
    }
}
