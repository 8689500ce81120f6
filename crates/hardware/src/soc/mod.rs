//! Platform composition.
//!
//! This module organizes everything a Linux-capable SoC is composed from: the
//! namespace tables and the allocator that guards them, the base platform, the
//! peripherals and their collaborators (bus, SDRAM crossbar, pads), and the
//! session that drives the composition.

/// Resource allocator with all-or-nothing claim sets.
pub mod allocator;

/// Base platform and the layer's fixed reservations.
pub mod base;

/// Composition session and peripheral attachment.
pub mod builder;

/// Named constants handed to firmware.
pub mod constants;

/// Platform description hand-off.
pub mod description;

/// Peripheral configuration records.
pub mod devices;

/// System bus and SDRAM crossbar.
pub mod interconnect;

/// Uniqueness-enforcing namespace tables.
pub mod namespace;

/// Pad groups and pad providers.
pub mod pads;

/// Memory regions.
pub mod regions;

/// Registry of attached peripherals.
pub mod registry;

/// Seams to the board.
pub mod traits;

pub use builder::{Session, SessionState};
pub use description::PlatformDescription;
