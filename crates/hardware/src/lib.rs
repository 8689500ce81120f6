//! Linux-capable SoC composition library.
//!
//! This crate composes a Linux-capable system-on-chip on top of a base platform:
//! 1. **Namespaces:** CSR bank indices, interrupt lines and memory-map bases, each
//!    with unique names and values.
//! 2. **Allocation:** All-or-nothing claim sets covering namespaces, memory
//!    regions and firmware constants.
//! 3. **Peripherals:** SPI flash, GPIO banks, RGB LED, SPI/I2C masters, XADC,
//!    framebuffer and ICAP, each attached with its pads and bus wiring.
//! 4. **Hand-off:** A JSON platform description for code generation.

/// Common types (addresses, errors, network addresses).
pub mod common;
/// Composition configuration (defaults, board descriptions).
pub mod config;
/// Platform composition (allocator, session, peripherals, interconnect).
pub mod soc;

/// Error type of every fallible composition step.
pub use crate::common::CompositionError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Composition session; construct with `Session::begin` or `Session::from_config`.
pub use crate::soc::Session;
