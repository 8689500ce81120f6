//! Collaborator trait for physical pad requests.
//!
//! The board's pin constraints are owned by the platform description, not by this
//! crate. `PadProvider` is the seam through which attachment procedures ask for
//! them:
//! 1. **Named requests:** A singular pad group such as `spiflash4x` or `vga_out`.
//! 2. **Indexed requests:** One of several numbered groups (`user_led` #0, #1, ...).
//! 3. **Exhaustion:** `PadError::Unavailable` once no matching group is left.
//!
//! Providers are consumed by one composition session and are not shared.

use crate::soc::pads::{PadError, PadGroup};

/// Source of named, optionally indexed physical signal groups.
pub trait PadProvider {
    /// Requests the pad group `name`, optionally a specific `index` of it.
    ///
    /// A group handed out once is never handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Unavailable`] if no matching group is left.
    fn request(&mut self, name: &str, index: Option<u32>) -> Result<PadGroup, PadError>;
}
