//! Common types shared across the composition engine.
//!
//! This module provides the small building blocks every other module leans on:
//! 1. **Address Types:** A strong type for bus addresses.
//! 2. **Network Addresses:** Strict dotted-quad parsing for the network constants.
//! 3. **Error Handling:** The composition error taxonomy and `Result` alias.

/// Physical address type.
pub mod addr;

/// Error types.
pub mod error;

/// Dotted-quad address parsing.
pub mod net;

pub use addr::PhysAddr;
pub use error::{CompositionError, Conflict, Result};
pub use net::DottedQuad;
