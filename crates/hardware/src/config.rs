//! Configuration system for platform composition.
//!
//! This module defines the configuration structures a board description is
//! deserialized into. It provides:
//! 1. **Defaults:** Baseline values from the Linux-capable SoC layer (CPU, UART rate,
//!    emulator RAM, flash window, CSR decoding) and a stock base platform.
//! 2. **Structures:** SoC layer parameters, the base platform's own reservations,
//!    the list of peripherals to attach, and the board's pads.
//! 3. **Enums:** CPU endianness.
//!
//! Configuration is supplied as JSON by the orchestrator, or use `Config::default()`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::soc::pads::PadDefinition;

/// Default configuration constants.
///
/// These values define the stock platform when a board file does not
/// override them.
mod defaults {
    /// CPU core the Linux layer targets.
    pub const CPU_TYPE: &str = "vexriscv";

    /// CPU variant with MMU and the machine-mode emulator hooks.
    pub const CPU_VARIANT: &str = "linux";

    /// Serial console baud rate.
    pub const UART_BAUDRATE: f64 = 1e6;

    /// Limit of mapped SDRAM (256 MiB).
    pub const MAX_SDRAM_SIZE: u64 = 0x1000_0000;

    /// Size of the machine-mode emulator RAM (16 KiB).
    pub const EMULATOR_RAM_SIZE: u64 = 0x4000;

    /// Size of the memory-mapped SPI flash window (16 MiB).
    pub const SPIFLASH_SIZE: u64 = 0x100_0000;

    /// Offset in flash where the boot image starts.
    pub const FLASH_BOOT_ADDRESS: u64 = 0x0040_0000;

    /// CSR banks decodable in the CSR window (14 address bits, 2 KiB pages).
    pub const CSR_SLOTS: u32 = 32;

    /// Bytes of bus address space per CSR bank.
    pub const CSR_PAGE_SIZE: u64 = 0x800;

    /// System clock frequency in Hz.
    pub const SYS_CLK_FREQ: f64 = 100e6;

    /// FPGA part of the stock base platform.
    pub const DEVICE: &str = "xc7a35ticsg324-1L";

    /// Native data width of the stock SDRAM controller in bits.
    pub const SDRAM_DATA_WIDTH: u32 = 128;

    /// CSR banks reserved by the stock base platform.
    pub const BASE_CSR_MAP: &[(&str, u32)] = &[
        ("crg", 1),
        ("identifier_mem", 4),
        ("ddrphy", 5),
        ("sdram", 6),
    ];

    /// Memory-map bases reserved by the stock base platform.
    pub const BASE_MEM_MAP: &[(&str, u64)] = &[
        ("rom", 0x0000_0000),
        ("sram", 0x1000_0000),
        ("main_ram", 0x4000_0000),
    ];

    /// SPI word width in bits.
    pub const SPI_DATA_WIDTH: u32 = 8;

    /// SPI clock frequency in Hz.
    pub const SPI_CLK_FREQ: f64 = 1e6;
}

/// CPU byte order, forwarded to blocks that expose words on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Little-endian (VexRiscv).
    #[default]
    Little,
    /// Big-endian (LM32, mor1kx).
    Big,
}

/// Root configuration structure.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use linsoc_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.soc.cpu_type, "vexriscv");
/// assert_eq!(config.soc.emulator_ram_size, 0x4000);
/// assert!(config.peripherals.boot);
/// ```
///
/// Deserializing a board file:
///
/// ```
/// use linsoc_core::config::Config;
///
/// let json = r#"{
///     "base": { "device": "xc7a100tcsg324-1", "sdram": null },
///     "peripherals": {
///         "leds": true,
///         "ethernet": { "local_ip": "192.168.1.50", "remote_ip": "192.168.1.100" }
///     },
///     "pads": [
///         { "name": "user_led", "index": 0 },
///         { "name": "user_led", "index": 1 }
///     ]
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.base.device, "xc7a100tcsg324-1");
/// assert!(config.base.sdram.is_none());
/// assert!(config.peripherals.leds);
/// assert_eq!(config.pads.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Linux SoC layer parameters.
    #[serde(default)]
    pub soc: SocConfig,
    /// Base platform reservations and capabilities.
    #[serde(default)]
    pub base: BaseConfig,
    /// Peripherals to attach.
    #[serde(default)]
    pub peripherals: PeripheralConfig,
    /// Pads declared by the board.
    #[serde(default)]
    pub pads: Vec<PadDefinition>,
}

impl Config {
    /// Parses a board description from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Json`](crate::common::CompositionError::Json)
    /// if the text is not a valid board description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a board description file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Parameters of the Linux SoC layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SocConfig {
    /// CPU core type
    #[serde(default = "SocConfig::default_cpu_type")]
    pub cpu_type: String,

    /// CPU variant
    #[serde(default = "SocConfig::default_cpu_variant")]
    pub cpu_variant: String,

    /// Serial console baud rate
    #[serde(default = "SocConfig::default_uart_baudrate")]
    pub uart_baudrate: f64,

    /// Upper bound of SDRAM mapped into the address space
    #[serde(default = "SocConfig::default_max_sdram_size")]
    pub max_sdram_size: u64,

    /// Emulator RAM size in bytes
    #[serde(default = "SocConfig::default_emulator_ram_size")]
    pub emulator_ram_size: u64,

    /// SPI flash window size in bytes
    #[serde(default = "SocConfig::default_spiflash_size")]
    pub spiflash_size: u64,

    /// Flash offset of the boot image
    #[serde(default = "SocConfig::default_flash_boot_address")]
    pub flash_boot_address: u64,

    /// Number of decodable CSR banks
    #[serde(default = "SocConfig::default_csr_slots")]
    pub csr_slots: u32,

    /// Bus bytes per CSR bank
    #[serde(default = "SocConfig::default_csr_page_size")]
    pub csr_page_size: u64,
}

impl SocConfig {
    fn default_cpu_type() -> String {
        defaults::CPU_TYPE.to_string()
    }

    fn default_cpu_variant() -> String {
        defaults::CPU_VARIANT.to_string()
    }

    const fn default_uart_baudrate() -> f64 {
        defaults::UART_BAUDRATE
    }

    const fn default_max_sdram_size() -> u64 {
        defaults::MAX_SDRAM_SIZE
    }

    const fn default_emulator_ram_size() -> u64 {
        defaults::EMULATOR_RAM_SIZE
    }

    const fn default_spiflash_size() -> u64 {
        defaults::SPIFLASH_SIZE
    }

    const fn default_flash_boot_address() -> u64 {
        defaults::FLASH_BOOT_ADDRESS
    }

    const fn default_csr_slots() -> u32 {
        defaults::CSR_SLOTS
    }

    const fn default_csr_page_size() -> u64 {
        defaults::CSR_PAGE_SIZE
    }
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            cpu_type: Self::default_cpu_type(),
            cpu_variant: Self::default_cpu_variant(),
            uart_baudrate: defaults::UART_BAUDRATE,
            max_sdram_size: defaults::MAX_SDRAM_SIZE,
            emulator_ram_size: defaults::EMULATOR_RAM_SIZE,
            spiflash_size: defaults::SPIFLASH_SIZE,
            flash_boot_address: defaults::FLASH_BOOT_ADDRESS,
            csr_slots: defaults::CSR_SLOTS,
            csr_page_size: defaults::CSR_PAGE_SIZE,
        }
    }
}

/// SDRAM controller in the base platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SdramConfig {
    /// Native data width of the controller's crossbar in bits
    #[serde(default = "SdramConfig::default_data_width")]
    pub data_width: u32,
}

impl SdramConfig {
    const fn default_data_width() -> u32 {
        defaults::SDRAM_DATA_WIDTH
    }
}

impl Default for SdramConfig {
    fn default() -> Self {
        Self {
            data_width: defaults::SDRAM_DATA_WIDTH,
        }
    }
}

/// The base SoC this layer extends.
///
/// The maps hold the base platform's own reservations; the Linux layer adds
/// its entries on top and must not collide with them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BaseConfig {
    /// CSR banks reserved by the base platform
    #[serde(default = "BaseConfig::default_csr_map")]
    pub csr_map: BTreeMap<String, u32>,

    /// Interrupt lines reserved by the base platform
    #[serde(default)]
    pub interrupt_map: BTreeMap<String, u32>,

    /// Memory-map bases reserved by the base platform
    #[serde(default = "BaseConfig::default_mem_map")]
    pub mem_map: BTreeMap<String, u64>,

    /// FPGA part name
    #[serde(default = "BaseConfig::default_device")]
    pub device: String,

    /// CPU byte order
    #[serde(default)]
    pub endianness: Endianness,

    /// System clock frequency in Hz
    #[serde(default = "BaseConfig::default_sys_clk_freq")]
    pub sys_clk_freq: f64,

    /// SDRAM controller, if the base platform has one
    #[serde(default = "BaseConfig::default_sdram")]
    pub sdram: Option<SdramConfig>,
}

impl BaseConfig {
    fn default_csr_map() -> BTreeMap<String, u32> {
        defaults::BASE_CSR_MAP
            .iter()
            .map(|&(name, index)| (name.to_string(), index))
            .collect()
    }

    fn default_mem_map() -> BTreeMap<String, u64> {
        defaults::BASE_MEM_MAP
            .iter()
            .map(|&(name, addr)| (name.to_string(), addr))
            .collect()
    }

    fn default_device() -> String {
        defaults::DEVICE.to_string()
    }

    const fn default_sys_clk_freq() -> f64 {
        defaults::SYS_CLK_FREQ
    }

    fn default_sdram() -> Option<SdramConfig> {
        Some(SdramConfig::default())
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            csr_map: Self::default_csr_map(),
            interrupt_map: BTreeMap::new(),
            mem_map: Self::default_mem_map(),
            device: Self::default_device(),
            endianness: Endianness::default(),
            sys_clk_freq: defaults::SYS_CLK_FREQ,
            sdram: Self::default_sdram(),
        }
    }
}

/// SPI master parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpiConfig {
    /// Word width in bits
    #[serde(default = "SpiConfig::default_data_width")]
    pub data_width: u32,

    /// SPI clock frequency in Hz
    #[serde(default = "SpiConfig::default_spi_clk_freq")]
    pub spi_clk_freq: f64,
}

impl SpiConfig {
    const fn default_data_width() -> u32 {
        defaults::SPI_DATA_WIDTH
    }

    const fn default_spi_clk_freq() -> f64 {
        defaults::SPI_CLK_FREQ
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            data_width: defaults::SPI_DATA_WIDTH,
            spi_clk_freq: defaults::SPI_CLK_FREQ,
        }
    }
}

/// Addresses baked into the firmware's network stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EthernetConfig {
    /// Address of the board
    pub local_ip: String,
    /// Address of the TFTP server
    pub remote_ip: String,
}

/// Which peripherals the orchestrator attaches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeripheralConfig {
    /// Memory-mapped quad SPI flash
    #[serde(default)]
    pub spiflash: bool,

    /// User LEDs
    #[serde(default)]
    pub leds: bool,

    /// RGB LED driven by three PWM channels
    #[serde(default)]
    pub rgb_led: bool,

    /// User switches
    #[serde(default)]
    pub switches: bool,

    /// SPI master
    #[serde(default)]
    pub spi: Option<SpiConfig>,

    /// I2C master instances, by pad index
    #[serde(default)]
    pub i2c: Vec<u32>,

    /// XADC analog front-end
    #[serde(default)]
    pub xadc: bool,

    /// Framebuffer video mode, by catalog name
    #[serde(default)]
    pub framebuffer: Option<String>,

    /// ICAP bitstream reload controller
    #[serde(default)]
    pub icap_bitstream: bool,

    /// Network stack addresses
    #[serde(default)]
    pub ethernet: Option<EthernetConfig>,

    /// Emit the flash boot address when a flash is attached
    #[serde(default = "PeripheralConfig::default_boot")]
    pub boot: bool,
}

impl PeripheralConfig {
    const fn default_boot() -> bool {
        true
    }
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            spiflash: false,
            leds: false,
            rgb_led: false,
            switches: false,
            spi: None,
            i2c: Vec::new(),
            xadc: false,
            framebuffer: None,
            icap_bitstream: false,
            ethernet: None,
            boot: true,
        }
    }
}
