//! Serial bus masters (SPI, I2C).
//!
//! Frequencies and widths are carried through to the generated gateware as
//! given; they are only checked for presence.

use serde::Serialize;

use crate::soc::pads::PadGroup;

/// SPI master.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpiMaster {
    /// `spi` pads.
    pub pads: PadGroup,
    /// Word width in bits.
    pub data_width: u32,
    /// System clock frequency in Hz.
    pub sys_clk_freq: f64,
    /// SPI clock frequency in Hz.
    pub spi_clk_freq: f64,
}

/// Bit-banged I2C master.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct I2cMaster {
    /// `i2c` pads of this instance.
    pub pads: PadGroup,
    /// Instance number; the CSR bank is `i2c{index}`.
    pub index: u32,
}

impl I2cMaster {
    /// CSR bank name of instance `index`.
    pub fn csr_name(index: u32) -> String {
        format!("i2c{index}")
    }
}
