//! Resource allocator.
//!
//! The allocator is the only code path that mutates the namespace tables. An
//! attachment describes everything it wants in a [`ClaimSet`]; [`ResourceAllocator::commit`]
//! then validates the whole set against every table before touching any of
//! them, so an attachment either gets all of its resources or none.
//!
//! CSR banks are usually claimed by name only. Those claims receive the lowest
//! free bank index at commit time, in the order they were added to the set.
//!
//! [`ResourceAllocator::check`] runs the same validation without applying it.
//! Attachments call it before they take pads from the board.
//!
//! The CSR decode window is reserved separately from the region table: it is not
//! a region of its own, but no region may overlap it.

use serde::Serialize;

use crate::common::{CompositionError, Conflict, PhysAddr, Result};
use crate::soc::base::CSR;
use crate::soc::constants::{ConstantTable, ConstantValue};
use crate::soc::namespace::{Namespace, NamespaceTable};
use crate::soc::regions::{MemoryRegion, RegionKind, RegionTable};

/// Resources requested by one attachment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimSet {
    csr_fixed: Vec<(String, u32)>,
    csr_auto: Vec<String>,
    interrupts: Vec<(String, u32)>,
    memory: Vec<(String, PhysAddr)>,
    regions: Vec<MemoryRegion>,
    constants: Vec<(String, ConstantValue)>,
}

impl ClaimSet {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a CSR bank under `name` at the lowest free index.
    #[must_use]
    pub fn csr(mut self, name: impl Into<String>) -> Self {
        self.csr_auto.push(name.into());
        self
    }

    /// Claims CSR bank `index` under `name`.
    #[must_use]
    pub fn csr_at(mut self, name: impl Into<String>, index: u32) -> Self {
        self.csr_fixed.push((name.into(), index));
        self
    }

    /// Claims interrupt `line` under `name`.
    #[must_use]
    pub fn interrupt_at(mut self, name: impl Into<String>, line: u32) -> Self {
        self.interrupts.push((name.into(), line));
        self
    }

    /// Claims the memory-map base `addr` under `name`.
    #[must_use]
    pub fn memory_at(mut self, name: impl Into<String>, addr: PhysAddr) -> Self {
        self.memory.push((name.into(), addr));
        self
    }

    /// Claims a sized memory region.
    #[must_use]
    pub fn region(mut self, region: MemoryRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Emits a constant.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<ConstantValue>) -> Self {
        self.constants.push((name.into(), value.into()));
        self
    }

    /// Emits a batch of constants, keeping their order.
    #[must_use]
    pub fn constants(mut self, records: impl IntoIterator<Item = (String, ConstantValue)>) -> Self {
        self.constants.extend(records);
        self
    }

    /// Returns `true` if the set claims nothing.
    pub fn is_empty(&self) -> bool {
        self.csr_fixed.is_empty()
            && self.csr_auto.is_empty()
            && self.interrupts.is_empty()
            && self.memory.is_empty()
            && self.regions.is_empty()
            && self.constants.is_empty()
    }
}

/// What a committed [`ClaimSet`] obtained.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Grant {
    /// CSR banks, fixed claims first, then automatic ones in request order.
    pub csr: Vec<(String, u32)>,
    /// Interrupt lines.
    pub interrupts: Vec<(String, u32)>,
    /// Memory-map bases.
    pub memory: Vec<(String, PhysAddr)>,
    /// Region names.
    pub regions: Vec<String>,
    /// Constant names, in emission order.
    pub constants: Vec<String>,
}

impl Grant {
    /// Returns the CSR index granted to `name`.
    pub fn csr_index(&self, name: &str) -> Option<u32> {
        self.csr.iter().find(|(n, _)| n == name).map(|&(_, i)| i)
    }
}

/// Owner of the namespace tables of one composition session.
#[derive(Clone, Debug)]
pub struct ResourceAllocator {
    csr: NamespaceTable<u32>,
    interrupts: NamespaceTable<u32>,
    memory: NamespaceTable<PhysAddr>,
    regions: RegionTable,
    constants: ConstantTable,
    csr_slots: u32,
    csr_window: Option<CsrWindow>,
}

/// CSR decode window: one page per bank.
#[derive(Clone, Debug)]
struct CsrWindow {
    region: MemoryRegion,
    page_size: u64,
}

impl ResourceAllocator {
    /// Creates an allocator over already-seeded tables.
    ///
    /// # Arguments
    ///
    /// * `csr` - CSR index table.
    /// * `interrupts` - Interrupt line table.
    /// * `memory` - Memory-map table.
    /// * `csr_slots` - Number of CSR banks the CSR window can decode.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::MalformedInput`] if a seeded CSR index is
    /// outside the decodable banks.
    pub fn new(
        csr: NamespaceTable<u32>,
        interrupts: NamespaceTable<u32>,
        memory: NamespaceTable<PhysAddr>,
        csr_slots: u32,
    ) -> Result<Self> {
        if let Some((name, index)) = csr.iter().find(|&(_, i)| i >= csr_slots) {
            return Err(CompositionError::malformed(
                "CSR index",
                format!("{name}={index}"),
            ));
        }
        Ok(Self {
            csr,
            interrupts,
            memory,
            regions: RegionTable::new(),
            constants: ConstantTable::new(),
            csr_slots,
            csr_window: None,
        })
    }

    /// Reserves the CSR decode window at `base`: `csr_slots` pages of `page_size` bytes.
    ///
    /// Regions claimed afterwards may not overlap the window.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] if the window size overflows, is zero,
    ///   or runs past the end of the bus address space.
    /// * [`CompositionError::Overlap`] if an already claimed region overlaps it.
    pub fn with_csr_window(mut self, base: PhysAddr, page_size: u64) -> Result<Self> {
        let size = u64::from(self.csr_slots)
            .checked_mul(page_size)
            .ok_or_else(|| CompositionError::malformed("CSR page size", page_size.to_string()))?;
        let region = MemoryRegion::new(CSR, base, size, RegionKind::Io);
        self.regions.check(std::slice::from_ref(&region))?;
        tracing::debug!(%base, size, "CSR window reserved");
        self.csr_window = Some(CsrWindow { region, page_size });
        Ok(self)
    }

    /// Validates `claims` without applying them.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceAllocator::commit`].
    pub fn check(&self, claims: &ClaimSet) -> Result<()> {
        let _csr = self.validate(claims)?;
        Ok(())
    }

    /// Validates and applies `claims` atomically.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::Collision`] for any duplicate name or value.
    /// * [`CompositionError::Exhausted`] when no CSR bank is left for an automatic claim.
    /// * [`CompositionError::Overlap`] for overlapping regions.
    /// * [`CompositionError::MalformedInput`] for empty names, bad windows or
    ///   out-of-range CSR indices.
    ///
    /// On error no table is modified.
    pub fn commit(&mut self, claims: ClaimSet) -> Result<Grant> {
        let csr = self.validate(&claims)?;

        self.csr.merge(&csr)?;
        self.interrupts.merge(&claims.interrupts)?;
        self.memory.merge(&claims.memory)?;
        self.regions.extend(&claims.regions)?;
        self.constants.extend(&claims.constants)?;

        Ok(Grant {
            csr,
            interrupts: claims.interrupts,
            memory: claims.memory,
            regions: claims.regions.into_iter().map(|r| r.name).collect(),
            constants: claims.constants.into_iter().map(|(n, _)| n).collect(),
        })
    }

    /// Checks every part of `claims` and returns the resolved CSR banks.
    fn validate(&self, claims: &ClaimSet) -> Result<Vec<(String, u32)>> {
        let csr = self.resolve_csr(claims)?;

        self.csr.check(&csr)?;
        self.interrupts.check(&claims.interrupts)?;
        self.memory.check(&claims.memory)?;
        self.regions.check(&claims.regions)?;
        self.constants.check(&claims.constants)?;

        let clash = self.csr_window.as_ref().and_then(|window| {
            claims
                .regions
                .iter()
                .find(|r| r.overlaps(&window.region))
                .map(|r| (r, &window.region))
        });
        if let Some((region, window)) = clash {
            return Err(CompositionError::Overlap {
                name: region.name.clone(),
                other: window.name.clone(),
            });
        }
        Ok(csr)
    }

    /// Turns fixed and automatic CSR claims into concrete `(name, index)` pairs.
    fn resolve_csr(&self, claims: &ClaimSet) -> Result<Vec<(String, u32)>> {
        let mut resolved = Vec::with_capacity(claims.csr_fixed.len() + claims.csr_auto.len());
        for (name, index) in &claims.csr_fixed {
            if *index >= self.csr_slots {
                return Err(CompositionError::malformed(
                    "CSR index",
                    format!("{name}={index}"),
                ));
            }
            resolved.push((name.clone(), *index));
        }
        for name in &claims.csr_auto {
            // Report a reused name as a collision even when the banks are full.
            if self.csr.contains_name(name) || resolved.iter().any(|(n, _)| n == name) {
                return Err(CompositionError::Collision {
                    namespace: Namespace::Csr,
                    conflict: Conflict::Name(name.clone()),
                });
            }
            let taken: Vec<u32> = resolved.iter().map(|&(_, i)| i).collect();
            let index = self
                .csr
                .lowest_free(self.csr_slots, &taken)
                .ok_or(CompositionError::Exhausted {
                    namespace: Namespace::Csr,
                })?;
            resolved.push((name.clone(), index));
        }
        Ok(resolved)
    }

    /// CSR index table.
    pub const fn csr(&self) -> &NamespaceTable<u32> {
        &self.csr
    }

    /// Interrupt line table.
    pub const fn interrupts(&self) -> &NamespaceTable<u32> {
        &self.interrupts
    }

    /// Memory-map table.
    pub const fn memory(&self) -> &NamespaceTable<PhysAddr> {
        &self.memory
    }

    /// Memory regions.
    pub const fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Emitted constants.
    pub const fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// The reserved CSR decode window, if any.
    pub fn csr_window(&self) -> Option<&MemoryRegion> {
        self.csr_window.as_ref().map(|w| &w.region)
    }

    /// Bus address of CSR bank `index`, or `None` without a window or for an
    /// index outside it.
    pub fn csr_bank_base(&self, index: u32) -> Option<PhysAddr> {
        let window = self.csr_window.as_ref()?;
        if index >= self.csr_slots {
            return None;
        }
        let offset = u64::from(index).checked_mul(window.page_size)?;
        window.region.base.checked_offset(offset)
    }

    /// Number of decodable CSR banks.
    pub const fn csr_slots(&self) -> u32 {
        self.csr_slots
    }
}
