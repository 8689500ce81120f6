//! Base platform and the Linux layer's fixed reservations.
//!
//! The base SoC (CPU, SDRAM controller, clocking) comes with its own CSR banks,
//! interrupt lines and memory map. The Linux layer adds a fixed set of entries on
//! top: the CPU control bank, the serial console and timer with their
//! interrupts, and the windows for the emulator RAM, Ethernet MAC, SPI flash
//! and CSR bus. Seeding fails if the two sets collide.

use crate::common::{PhysAddr, Result};
use crate::config::{BaseConfig, Endianness, SdramConfig};
use crate::soc::namespace::{Namespace, NamespaceTable};

/// Memory-map name of the machine-mode emulator RAM.
pub const EMULATOR_RAM: &str = "emulator_ram";

/// Memory-map name of the Ethernet MAC buffers.
pub const ETHMAC: &str = "ethmac";

/// Memory-map name of the SPI flash window.
pub const SPIFLASH: &str = "spiflash";

/// Memory-map name of the CSR window.
pub const CSR: &str = "csr";

/// CSR banks added by the Linux layer.
pub const LAYER_CSR: &[(&str, u32)] = &[("ctrl", 0), ("uart", 2), ("timer0", 3)];

/// Interrupt lines added by the Linux layer.
pub const LAYER_INTERRUPTS: &[(&str, u32)] = &[("uart", 0), ("timer0", 1)];

/// Memory-map bases added by the Linux layer.
pub const LAYER_MEMORY: &[(&str, u64)] = &[
    (EMULATOR_RAM, 0x2000_0000),
    (ETHMAC, 0xb000_0000),
    (SPIFLASH, 0xd000_0000),
    (CSR, 0xf000_0000),
];

/// Seeded CSR, interrupt and memory-map tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedTables {
    /// CSR bank indices.
    pub csr: NamespaceTable<u32>,
    /// Interrupt lines.
    pub interrupts: NamespaceTable<u32>,
    /// Memory-map bases.
    pub memory: NamespaceTable<PhysAddr>,
}

/// The base SoC capability this layer extends.
#[derive(Clone, Debug, PartialEq)]
pub struct BasePlatform {
    /// CSR banks the base platform reserves.
    pub csr_map: NamespaceTable<u32>,
    /// Interrupt lines the base platform reserves.
    pub interrupt_map: NamespaceTable<u32>,
    /// Memory-map bases the base platform reserves.
    pub mem_map: NamespaceTable<PhysAddr>,
    /// FPGA part name.
    pub device: String,
    /// CPU byte order.
    pub endianness: Endianness,
    /// System clock frequency in Hz.
    pub sys_clk_freq: f64,
    /// SDRAM controller, if present.
    pub sdram: Option<SdramConfig>,
}

impl BasePlatform {
    /// Builds the base platform from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`](crate::common::CompositionError::Collision)
    /// if the base maps assign one value to two names.
    pub fn from_config(config: &BaseConfig) -> Result<Self> {
        let csr: Vec<(String, u32)> = config.csr_map.iter().map(|(n, &v)| (n.clone(), v)).collect();
        let interrupts: Vec<(String, u32)> = config
            .interrupt_map
            .iter()
            .map(|(n, &v)| (n.clone(), v))
            .collect();
        let memory: Vec<(String, PhysAddr)> = config
            .mem_map
            .iter()
            .map(|(n, &v)| (n.clone(), PhysAddr::new(v)))
            .collect();

        Ok(Self {
            csr_map: NamespaceTable::from_entries(Namespace::Csr, &csr)?,
            interrupt_map: NamespaceTable::from_entries(Namespace::Interrupt, &interrupts)?,
            mem_map: NamespaceTable::from_entries(Namespace::Memory, &memory)?,
            device: config.device.clone(),
            endianness: config.endianness,
            sys_clk_freq: config.sys_clk_freq,
            sdram: config.sdram,
        })
    }

    /// Derives the session tables: base reservations plus the layer's entries.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Collision`](crate::common::CompositionError::Collision)
    /// if a layer entry reuses a base name or value.
    pub fn seed(&self) -> Result<SeedTables> {
        Ok(SeedTables {
            csr: NamespaceTable::derive(&self.csr_map, &entries(LAYER_CSR, |v| v))?,
            interrupts: NamespaceTable::derive(&self.interrupt_map, &entries(LAYER_INTERRUPTS, |v| v))?,
            memory: NamespaceTable::derive(&self.mem_map, &entries(LAYER_MEMORY, PhysAddr::new))?,
        })
    }
}

fn entries<T: Copy, V>(list: &[(&str, T)], convert: impl Fn(T) -> V) -> Vec<(String, V)> {
    list.iter()
        .map(|&(name, value)| (name.to_string(), convert(value)))
        .collect()
}
