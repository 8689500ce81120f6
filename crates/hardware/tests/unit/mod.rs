//! # Unit Components
//!
//! Tests grouped by the module they exercise: shared types, configuration and
//! the composition components.



/// Unit tests for the composition components.
///
/// This module organizes tests for the namespace tables, the allocator,
/// peripheral attachment and the description hand-off.
pub mod soc;
