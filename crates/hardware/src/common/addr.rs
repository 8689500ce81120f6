//! Physical address type.
//!
//! This module defines the strong type used for every base address in the composed
//! platform. It provides the following:
//! 1. **Type Safety:** Keeps bus addresses apart from CSR indices and interrupt lines,
//!    which share the same integer width but live in different namespaces.
//! 2. **Range Helpers:** Window end computation with overflow checking against the
//!    32-bit system bus.
//! 3. **Display:** Hexadecimal rendering used in collision reports and the JSON hand-off.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest byte address reachable on the 32-bit Wishbone system bus.
pub const BUS_ADDRESS_LIMIT: u64 = 0x1_0000_0000;

/// A physical address on the system bus.
///
/// Physical addresses are the values stored in the memory map; memory regions,
/// bus slave decoders and the CSR window are all expressed with this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysAddr(pub u64);

impl PhysAddr {
    /// Creates a new physical address from a raw value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw address value.
    ///
    /// # Returns
    ///
    /// A new `PhysAddr` instance wrapping the provided address.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the exclusive end of a window of `size` bytes starting here.
    ///
    /// # Returns
    ///
    /// `None` when the window does not fit below [`BUS_ADDRESS_LIMIT`].
    pub const fn window_end(&self, size: u64) -> Option<u64> {
        match self.0.checked_add(size) {
            Some(end) if end <= BUS_ADDRESS_LIMIT => Some(end),
            _ => None,
        }
    }

    /// Returns the address `offset` bytes above this one, or `None` past the end
    /// of the bus address space.
    #[inline]
    pub const fn checked_offset(&self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) if addr < BUS_ADDRESS_LIMIT => Some(Self(addr)),
            _ => None,
        }
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
