//! Platform description hand-off.
//!
//! Code generation (firmware headers, device tree, linker scripts) does not see
//! the session itself. It reads a snapshot: every namespace table, the memory
//! regions, the emitted constants and the attached peripherals, serialized as a
//! single JSON document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::common::{PhysAddr, Result};
use crate::config::SocConfig;
use crate::soc::builder::Session;
use crate::soc::constants::ConstantTable;
use crate::soc::interconnect::Slave;
use crate::soc::namespace::NamespaceTable;
use crate::soc::regions::RegionTable;
use crate::soc::registry::PeripheralRecord;

/// Snapshot of a composed platform.
#[derive(Clone, Debug, Serialize)]
pub struct PlatformDescription {
    /// Linux layer parameters the platform was composed with.
    pub soc: SocConfig,
    /// Bus address of every CSR bank.
    pub csr_bases: BTreeMap<String, PhysAddr>,
    /// CSR bank indices, in claim order.
    pub csr_indices: NamespaceTable<u32>,
    /// Interrupt lines, in claim order.
    pub interrupts: NamespaceTable<u32>,
    /// Memory-map bases, in claim order.
    pub mem_map: NamespaceTable<PhysAddr>,
    /// Sized memory regions.
    pub memories: RegionTable,
    /// Constants, in emission order.
    pub constants: ConstantTable,
    /// Attached peripherals.
    pub peripherals: Vec<PeripheralRecord>,
    /// Bus slaves in address order.
    pub bus_slaves: Vec<Slave>,
}

impl PlatformDescription {
    /// Takes a snapshot of `session`.
    pub fn from_session(session: &Session) -> Self {
        let csr_bases = session
            .csr()
            .iter()
            .filter_map(|(name, _)| session.csr_base(name).map(|addr| (name.to_string(), addr)))
            .collect();

        Self {
            soc: session.soc().clone(),
            csr_bases,
            csr_indices: session.csr().clone(),
            interrupts: session.interrupts().clone(),
            mem_map: session.memory().clone(),
            memories: session.regions().clone(),
            constants: session.constants().clone(),
            peripherals: session.peripherals().iter().cloned().collect(),
            bus_slaves: session.bus().slaves().to_vec(),
        }
    }

    /// Default hand-off location for `board`: `build/<board>/csr.json`.
    pub fn default_path(board: &str) -> PathBuf {
        Path::new("build").join(board).join("csr.json")
    }

    /// Serializes the description as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Json`](crate::common::CompositionError::Json)
    /// if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the description to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "platform description written");
        Ok(())
    }
}
