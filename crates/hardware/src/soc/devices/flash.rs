//! Memory-mapped SPI flash.
//!
//! The flash controller maps the whole chip into the bus address space and also
//! exposes a bit-bang CSR bank for erase/program. Reads run in quad mode with 11
//! dummy cycles and the SPI clock at a quarter of the system clock (`div = 2`).

use serde::Serialize;

use crate::config::Endianness;
use crate::soc::pads::PadGroup;

/// Dummy cycles between the read command and the first data nibble.
pub const DUMMY_CYCLES: u32 = 11;

/// SPI clock divider.
pub const CLK_DIV: u32 = 2;

/// Pad group the controller is wired to.
pub const PADS: &str = "spiflash4x";

/// SPI flash controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpiFlash {
    /// Quad SPI pads.
    pub pads: PadGroup,
    /// Dummy cycles.
    pub dummy: u32,
    /// Clock divider.
    pub div: u32,
    /// Bit-bang CSR access for programming.
    pub with_bitbang: bool,
    /// Byte order of words on the bus.
    pub endianness: Endianness,
    /// FPGA part used to pick the clock primitive (STARTUPE2 on 7-series).
    pub clk_primitive_device: String,
}

impl SpiFlash {
    /// Creates the controller with the fixed read timing.
    pub fn new(pads: PadGroup, endianness: Endianness, device: &str) -> Self {
        Self {
            pads,
            dummy: DUMMY_CYCLES,
            div: CLK_DIV,
            with_bitbang: true,
            endianness,
            clk_primitive_device: device.to_string(),
        }
    }
}
