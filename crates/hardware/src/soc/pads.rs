//! Pad groups, pad enumeration and a table-driven provider.
//!
//! Discrete outputs (LEDs, switches) do not declare how many pads they need; they
//! take every numbered group the board has. `PadEnumerator` turns the
//! "request until unavailable" probing into a plain iterator, and `request_all`
//! collects it so callers only have to look at an empty or non-empty `Vec`.

use serde::{Deserialize, Serialize};

use crate::common::CompositionError;
use crate::soc::traits::PadProvider;

/// Error reported by a [`PadProvider`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PadError {
    /// No matching pad group is (still) available.
    #[error("pad `{name}` (index {index:?}) is not available")]
    Unavailable {
        /// Requested group name.
        name: String,
        /// Requested index, if any.
        index: Option<u32>,
    },
}

/// Handle to a group of physical signals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PadGroup {
    /// Group name, e.g. `user_led`.
    pub name: String,
    /// Group index for numbered groups.
    pub index: Option<u32>,
    /// Signal names in the group (`clk`, `cs_n`, `dq`, ...). Empty for one-bit groups.
    pub signals: Vec<String>,
}

impl PadGroup {
    /// Creates a pad group handle.
    pub fn new(name: impl Into<String>, index: Option<u32>, signals: Vec<String>) -> Self {
        Self {
            name: name.into(),
            index,
            signals,
        }
    }

    /// Returns `true` if the group exposes a signal called `signal`.
    pub fn has_signal(&self, signal: &str) -> bool {
        self.signals.iter().any(|s| s == signal)
    }

    /// Bit width contributed by the group: one bit for a plain pin, otherwise one
    /// per signal.
    pub fn width(&self) -> usize {
        self.signals.len().max(1)
    }
}

/// Iterator over `name` #0, #1, ... that stops at the first unavailable index.
pub struct PadEnumerator<'a> {
    provider: &'a mut dyn PadProvider,
    name: &'a str,
    next: u32,
    done: bool,
}

impl<'a> PadEnumerator<'a> {
    /// Starts enumerating `name` from index 0.
    pub fn new(provider: &'a mut dyn PadProvider, name: &'a str) -> Self {
        Self {
            provider,
            name,
            next: 0,
            done: false,
        }
    }
}

impl Iterator for PadEnumerator<'_> {
    type Item = PadGroup;

    fn next(&mut self) -> Option<PadGroup> {
        if self.done {
            return None;
        }
        match self.provider.request(self.name, Some(self.next)) {
            Ok(group) => {
                tracing::debug!(name = self.name, index = self.next, "pad enumerated");
                self.next += 1;
                Some(group)
            }
            Err(PadError::Unavailable { .. }) => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for PadEnumerator<'_> {}

impl std::fmt::Debug for PadEnumerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PadEnumerator")
            .field("name", &self.name)
            .field("next", &self.next)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Requests every numbered group called `name`.
///
/// # Returns
///
/// The groups in index order; empty if the board has none.
pub fn request_all(provider: &mut dyn PadProvider, name: &str) -> Vec<PadGroup> {
    PadEnumerator::new(provider, name).collect()
}

/// One pad group as declared in a board file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PadDefinition {
    /// Group name.
    pub name: String,
    /// Group index; omit for singular groups.
    #[serde(default)]
    pub index: Option<u32>,
    /// Signal names.
    #[serde(default)]
    pub signals: Vec<String>,
}

/// Provider backed by a fixed list of pad definitions.
///
/// Each group can be requested once. A request without an index takes the
/// lowest-numbered available group of that name.
#[derive(Clone, Debug, Default)]
pub struct StaticPadProvider {
    available: Vec<PadDefinition>,
}

impl StaticPadProvider {
    /// Creates a provider offering `pads`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::MalformedInput`] if two definitions share a
    /// name and index.
    pub fn new(pads: Vec<PadDefinition>) -> Result<Self, CompositionError> {
        for (i, pad) in pads.iter().enumerate() {
            if pads[..i].iter().any(|p| p.name == pad.name && p.index == pad.index) {
                let input = pad
                    .index
                    .map_or_else(|| pad.name.clone(), |index| format!("{} #{index}", pad.name));
                return Err(CompositionError::malformed("duplicate pad definition", input));
            }
        }
        Ok(Self { available: pads })
    }

    /// Number of groups not yet handed out.
    pub fn remaining(&self) -> usize {
        self.available.len()
    }
}

impl PadProvider for StaticPadProvider {
    fn request(&mut self, name: &str, index: Option<u32>) -> Result<PadGroup, PadError> {
        let position = self
            .available
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name == name && (index.is_none() || p.index == index))
            .min_by_key(|(_, p)| p.index)
            .map(|(i, _)| i);

        match position {
            Some(i) => {
                let pad = self.available.remove(i);
                Ok(PadGroup::new(pad.name, pad.index, pad.signals))
            }
            None => Err(PadError::Unavailable {
                name: name.to_string(),
                index,
            }),
        }
    }
}
