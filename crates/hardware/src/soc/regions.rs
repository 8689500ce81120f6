//! Memory region descriptors.
//!
//! The memory map only records base addresses; the sizes arrive with each region
//! as it is added. `RegionTable` keeps the sized windows and guarantees that no two
//! of them share an address, which is what the device-tree generator relies on.

use serde::Serialize;

use crate::common::{CompositionError, PhysAddr, Result};

/// Access mode of a region, as consumed by the linker script and device tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Cacheable memory (RAM, memory-mapped flash).
    Cached,
    /// Uncached I/O window.
    Io,
}

/// A named, sized window in the bus address space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryRegion {
    /// Region name; matches its memory-map entry.
    pub name: String,
    /// First byte of the region.
    pub base: PhysAddr,
    /// Size in bytes.
    pub size: u64,
    /// Access mode.
    #[serde(rename = "type")]
    pub kind: RegionKind,
}

impl MemoryRegion {
    /// Creates a region descriptor.
    pub fn new(name: impl Into<String>, base: PhysAddr, size: u64, kind: RegionKind) -> Self {
        Self {
            name: name.into(),
            base,
            size,
            kind,
        }
    }

    /// Exclusive end address. Only meaningful for validated regions.
    pub const fn end(&self) -> u64 {
        self.base.val() + self.size
    }

    /// Returns `true` if the two windows share at least one byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.base.val() < other.end() && other.base.val() < self.end()
    }

    /// Returns `true` if `addr` falls inside the region.
    pub const fn contains(&self, addr: PhysAddr) -> bool {
        addr.val() >= self.base.val() && addr.val() < self.end()
    }
}

/// Non-overlapping set of memory regions, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: Vec<MemoryRegion>,
}

impl RegionTable {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    /// Validates `proposed` against the table and against each other.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] for an empty name, a zero size or a
    ///   window running past the end of the bus address space.
    /// * [`CompositionError::Overlap`] for a name reused or any shared address.
    pub fn check(&self, proposed: &[MemoryRegion]) -> Result<()> {
        for (i, region) in proposed.iter().enumerate() {
            if region.name.is_empty() {
                return Err(CompositionError::malformed("region name", ""));
            }
            if region.size == 0 || region.base.window_end(region.size).is_none() {
                return Err(CompositionError::malformed(
                    "region window",
                    format!("{} at {} size {:#x}", region.name, region.base, region.size),
                ));
            }
            let clash = self
                .regions
                .iter()
                .chain(&proposed[..i])
                .find(|r| r.name == region.name || r.overlaps(region));
            if let Some(other) = clash {
                return Err(CompositionError::Overlap {
                    name: region.name.clone(),
                    other: other.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Adds every region of `proposed`, or none of them.
    ///
    /// # Errors
    ///
    /// Same as [`RegionTable::check`].
    pub fn extend(&mut self, proposed: &[MemoryRegion]) -> Result<()> {
        self.check(proposed)?;
        for region in proposed {
            tracing::debug!(name = %region.name, base = %region.base, size = region.size, "region added");
        }
        self.regions.extend_from_slice(proposed);
        Ok(())
    }

    /// Looks a region up by name.
    pub fn get(&self, name: &str) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Returns the region containing `addr`.
    pub fn find(&self, addr: PhysAddr) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.contains(addr))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if there are no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over the regions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, MemoryRegion> {
        self.regions.iter()
    }
}
