//! Registry of attached peripherals.
//!
//! Keyed by kind so later steps can ask what is present; boot finalization, for
//! instance, only emits the flash boot address when a flash controller exists.
//! Records are never removed.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::soc::allocator::Grant;
use crate::soc::devices::Peripheral;

/// Peripheral kinds the Linux layer can attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeripheralKind {
    /// Memory-mapped SPI flash.
    SpiFlash,
    /// User LEDs.
    Leds,
    /// RGB LED.
    RgbLed,
    /// User switches.
    Switches,
    /// SPI master.
    Spi,
    /// I2C master.
    I2c,
    /// XADC.
    Xadc,
    /// Framebuffer.
    Framebuffer,
    /// ICAP bitstream reload.
    IcapBitstream,
}

impl PeripheralKind {
    /// Returns `true` if a session may hold several records of this kind.
    pub const fn allows_multiple(self) -> bool {
        matches!(self, Self::I2c)
    }

    /// Short name used in logs and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpiFlash => "spiflash",
            Self::Leds => "leds",
            Self::RgbLed => "rgb_led",
            Self::Switches => "switches",
            Self::Spi => "spi",
            Self::I2c => "i2c",
            Self::Xadc => "xadc",
            Self::Framebuffer => "framebuffer",
            Self::IcapBitstream => "icap_bit",
        }
    }
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attached peripheral and the resources it holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeripheralRecord {
    /// Kind-specific configuration.
    #[serde(flatten)]
    pub peripheral: Peripheral,
    /// Resources claimed by the attachment.
    pub claims: Grant,
}

impl PeripheralRecord {
    /// Kind of the peripheral.
    pub const fn kind(&self) -> PeripheralKind {
        self.peripheral.kind()
    }
}

/// Attached peripherals, grouped by kind.
#[derive(Clone, Debug, Default)]
pub struct PeripheralRegistry {
    records: BTreeMap<PeripheralKind, Vec<PeripheralRecord>>,
}

impl PeripheralRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Returns `true` if another record of `kind` may be added.
    pub fn accepts(&self, kind: PeripheralKind) -> bool {
        kind.allows_multiple() || !self.contains(kind)
    }

    /// Stores a record and returns a reference to it.
    ///
    /// Callers commit the record's claims first; since every kind owns a named
    /// CSR bank, a second single-instance record is refused by the allocator
    /// before it gets here.
    pub fn insert(&mut self, record: PeripheralRecord) -> &PeripheralRecord {
        debug_assert!(self.accepts(record.kind()));
        let list = self.records.entry(record.kind()).or_default();
        list.push(record);
        &list[list.len() - 1]
    }

    /// Returns `true` if at least one record of `kind` exists.
    pub fn contains(&self, kind: PeripheralKind) -> bool {
        self.records.get(&kind).is_some_and(|l| !l.is_empty())
    }

    /// Records of `kind`, in attachment order.
    pub fn get(&self, kind: PeripheralKind) -> &[PeripheralRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, grouped by kind.
    pub fn iter(&self) -> impl Iterator<Item = &PeripheralRecord> + '_ {
        self.records.values().flatten()
    }
}
