//! Peripheral representations.
//!
//! This module contains the configuration records of every peripheral the
//! Linux layer can attach, such as the SPI flash controller, GPIO banks,
//! serial bus masters and the framebuffer, and the [`Peripheral`] union the
//! registry stores them in.

use serde::Serialize;

use crate::soc::registry::PeripheralKind;

/// XADC and ICAP.
pub mod fabric;

/// Memory-mapped SPI flash.
pub mod flash;

/// GPIO banks and PWM.
pub mod gpio;

/// SPI and I2C masters.
pub mod serial;

/// Framebuffer and video mode catalog.
pub mod video;

pub use fabric::{IcapBitstream, Xadc};
pub use flash::SpiFlash;
pub use gpio::{Channel, GpioOut, Pwm, RgbLed};
pub use serial::{I2cMaster, SpiMaster};
pub use video::{VIDEO_TIMINGS, VideoOut, VideoTiming};

/// Tagged union of attached peripherals.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Peripheral {
    /// SPI flash controller.
    SpiFlash(SpiFlash),
    /// User LED bank.
    Leds(GpioOut),
    /// RGB LED.
    RgbLed(RgbLed),
    /// User switch bank.
    Switches(GpioOut),
    /// SPI master.
    Spi(SpiMaster),
    /// I2C master.
    I2c(I2cMaster),
    /// XADC.
    Xadc(Xadc),
    /// Framebuffer.
    Framebuffer(VideoOut),
    /// ICAP bitstream reload.
    IcapBitstream(IcapBitstream),
}

impl Peripheral {
    /// Returns the kind tag.
    pub const fn kind(&self) -> PeripheralKind {
        match self {
            Self::SpiFlash(_) => PeripheralKind::SpiFlash,
            Self::Leds(_) => PeripheralKind::Leds,
            Self::RgbLed(_) => PeripheralKind::RgbLed,
            Self::Switches(_) => PeripheralKind::Switches,
            Self::Spi(_) => PeripheralKind::Spi,
            Self::I2c(_) => PeripheralKind::I2c,
            Self::Xadc(_) => PeripheralKind::Xadc,
            Self::Framebuffer(_) => PeripheralKind::Framebuffer,
            Self::IcapBitstream(_) => PeripheralKind::IcapBitstream,
        }
    }
}
