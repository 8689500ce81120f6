//! System interconnect and SDRAM access arbiter.
//!
//! This module models the two collaborators peripherals are wired into:
//! 1. **Bus:** Memory-mapped slaves, each selected by an address decoder over a
//!    validated region window. Slaves are kept sorted by base address.
//! 2. **Crossbar:** The SDRAM controller's port arbiter, which hands out numbered
//!    native ports (the framebuffer takes a dedicated read port).
//!
//! Neither does any overlap checking of its own: every window it receives has
//! already been claimed through the resource allocator.

use serde::Serialize;

use crate::common::PhysAddr;

/// Address predicate selecting a slave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AddressDecoder {
    /// First decoded address.
    pub base: PhysAddr,
    /// Decoded window size in bytes.
    pub size: u64,
}

impl AddressDecoder {
    /// Returns `true` if the decoder selects `addr`.
    pub const fn matches(&self, addr: PhysAddr) -> bool {
        addr.val() >= self.base.val() && addr.val() - self.base.val() < self.size
    }
}

/// A memory-mapped slave registered on the bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Slave {
    /// Slave name (the region it serves).
    pub name: String,
    /// Address decoder.
    pub decoder: AddressDecoder,
}

/// System bus; routes addresses to registered slaves.
#[derive(Clone, Debug, Default)]
pub struct Bus {
    slaves: Vec<Slave>,
}

impl Bus {
    /// Creates a bus with no slaves.
    pub const fn new() -> Self {
        Self { slaves: Vec::new() }
    }

    /// Registers a slave; slaves are kept sorted by base address for lookup.
    ///
    /// # Arguments
    ///
    /// * `name` - Slave name.
    /// * `base` - Decoder base address.
    /// * `size` - Decoder window size in bytes.
    pub fn add_slave(&mut self, name: impl Into<String>, base: PhysAddr, size: u64) {
        let slave = Slave {
            name: name.into(),
            decoder: AddressDecoder { base, size },
        };
        tracing::debug!(name = %slave.name, base = %base, size, "bus slave");
        self.slaves.push(slave);
        self.slaves.sort_by_key(|s| s.decoder.base);
    }

    /// Returns the slave decoding `addr`.
    pub fn route(&self, addr: PhysAddr) -> Option<&Slave> {
        self.slaves.iter().find(|s| s.decoder.matches(addr))
    }

    /// Registered slaves in address order.
    pub fn slaves(&self) -> &[Slave] {
        &self.slaves
    }
}

/// Direction of a crossbar port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortMode {
    /// Read-only port.
    Read,
    /// Write-only port.
    Write,
    /// Read/write port.
    Both,
}

/// Parameters of a port request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PortRequest {
    /// Port direction.
    pub mode: PortMode,
    /// User-side data width in bits.
    pub data_width: u32,
    /// Clock domain the user side runs in.
    pub clock_domain: String,
    /// Reverse word order on the user side.
    pub reverse: bool,
}

/// A port granted by the crossbar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Port {
    /// Port number, in grant order.
    pub id: usize,
    /// Granted parameters.
    #[serde(flatten)]
    pub request: PortRequest,
}

/// SDRAM crossbar handing out native ports.
#[derive(Clone, Debug)]
pub struct Crossbar {
    controller_width: u32,
    ports: Vec<Port>,
}

impl Crossbar {
    /// Creates a crossbar in front of a controller of `controller_width` bits.
    pub const fn new(controller_width: u32) -> Self {
        Self {
            controller_width,
            ports: Vec::new(),
        }
    }

    /// Controller-side data width in bits.
    pub const fn controller_width(&self) -> u32 {
        self.controller_width
    }

    /// Grants a new port.
    pub fn get_port(&mut self, request: PortRequest) -> Port {
        let port = Port {
            id: self.ports.len(),
            request,
        };
        tracing::debug!(id = port.id, mode = ?port.request.mode, "crossbar port");
        self.ports.push(port.clone());
        port
    }

    /// Ports granted so far.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }
}
