mod display;
mod sdcard;
mod timer;

use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyInputPin, Input, InputPin, PinDriver, Pull},
    i2c::{I2cConfig, I2cDriver},
    peripherals::Peripherals,
    prelude::*,
    spi::{SpiDriver, SpiDriverConfig},
};
use esp_idf_svc::sys::EspError;
use sdbrowse_ui::{BrowserConfig, BrowserController, ButtonPins};

use display::OledScreen;
use sdcard::SdCardStorage;
use timer::EspTimer;

type Button = PinDriver<'static, AnyInputPin, Input>;

fn button(pin: impl InputPin + 'static) -> Result<Button, EspError> {
    let mut driver = PinDriver::input(pin.downgrade_input())?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn run() -> Result<(), EspError> {
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // OLED on I2C0: SDA 4, SCL 5
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pins.gpio4,
        pins.gpio5,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;
    let mut screen = OledScreen::new(i2c);
    if let Err(err) = screen.init() {
        log::error!("OLED init failed: {:?}", err);
    }

    // SD card on SPI2: SCLK 8, MOSI 10, MISO 7, CS 12
    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio8,
        pins.gpio10,
        Some(pins.gpio7),
        &SpiDriverConfig::default(),
    )?;
    let storage = SdCardStorage::new(spi, pins.gpio12);

    // Buttons to ground, internal pull-ups
    let buttons = ButtonPins {
        scroll: button(pins.gpio1)?,
        enter: button(pins.gpio2)?,
        back: button(pins.gpio3)?,
    };

    let config = BrowserConfig::default();
    log::info!(
        "Starting browser: debounce {}ms, {} rows",
        config.debounce_ms,
        config.visible_rows
    );
    BrowserController::new(storage, screen, buttons, EspTimer::new(), config).run()
}

fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    if let Err(err) = run() {
        log::error!("Board setup failed: {}", err);
    }
    loop {
        FreeRtos::delay_ms(1000);
    }
}
