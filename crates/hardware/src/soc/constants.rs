//! Derived constant records.
//!
//! Constants are the flat `name = value` pairs handed to firmware headers and the
//! device-tree generator. The table is append-only and names are unique within a
//! session; values may repeat (both network addresses usually share octets).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::common::{CompositionError, Conflict, DottedQuad, Result};
use crate::soc::devices::video::VideoTiming;
use crate::soc::namespace::Namespace;

/// Scalar value of a constant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConstantValue {
    /// Integer constant.
    Int(i64),
    /// Floating-point constant (e.g. a pixel clock in Hz).
    Float(f64),
}

impl ConstantValue {
    /// Returns the integer value, if this is an integer constant.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(_) => None,
        }
    }

    /// Returns the value as a float, converting integers.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
        }
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for ConstantValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u8> for ConstantValue {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Insertion-ordered, uniquely named constants.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstantTable {
    records: Vec<(String, ConstantValue)>,
}

impl ConstantTable {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Validates `proposed` names against the table and each other.
    ///
    /// # Errors
    ///
    /// * [`CompositionError::MalformedInput`] for an empty name.
    /// * [`CompositionError::Collision`] in [`Namespace::Constant`] for a repeated name.
    pub fn check(&self, proposed: &[(String, ConstantValue)]) -> Result<()> {
        for (i, (name, _)) in proposed.iter().enumerate() {
            if name.is_empty() {
                return Err(CompositionError::malformed("constant name", ""));
            }
            if self.contains(name) || proposed[..i].iter().any(|(n, _)| n == name) {
                return Err(CompositionError::Collision {
                    namespace: Namespace::Constant,
                    conflict: Conflict::Name(name.clone()),
                });
            }
        }
        Ok(())
    }

    /// Appends every record of `proposed`, or none of them.
    ///
    /// # Errors
    ///
    /// Same as [`ConstantTable::check`].
    pub fn extend(&mut self, proposed: &[(String, ConstantValue)]) -> Result<()> {
        self.check(proposed)?;
        for (name, value) in proposed {
            tracing::debug!(%name, %value, "constant");
        }
        self.records.extend_from_slice(proposed);
        Ok(())
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<ConstantValue> {
        self.records.iter().find(|(n, _)| n == name).map(|&(_, v)| v)
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|(n, _)| n == name)
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no constant has been emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over `(name, value)` in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ConstantValue)> + '_ {
        self.records.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl Serialize for ConstantTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.records.iter().map(|(n, v)| (n, v)))
    }
}

/// Prefix of the video timing constants.
pub const VIDEO_PREFIX: &str = "litevideo";

/// Name of the flash boot address constant.
pub const FLASH_BOOT_ADDRESS: &str = "FLASH_BOOT_ADDRESS";

/// Nine records describing a video mode: pixel clock, then the horizontal and
/// vertical active/blanking/sync/front-porch fields.
pub fn video_timing_records(timing: &VideoTiming) -> Vec<(String, ConstantValue)> {
    let fields: [(&str, ConstantValue); 9] = [
        ("pix_clk", timing.pix_clk.into()),
        ("h_active", timing.h_active.into()),
        ("h_blanking", timing.h_blanking.into()),
        ("h_sync", timing.h_sync.into()),
        ("h_front_porch", timing.h_front_porch.into()),
        ("v_active", timing.v_active.into()),
        ("v_blanking", timing.v_blanking.into()),
        ("v_sync", timing.v_sync.into()),
        ("v_front_porch", timing.v_front_porch.into()),
    ];
    fields
        .into_iter()
        .map(|(field, value)| (format!("{VIDEO_PREFIX}_{field}"), value))
        .collect()
}

/// Eight records `LOCALIP1..4` then `REMOTEIP1..4`.
pub fn network_records(local: DottedQuad, remote: DottedQuad) -> Vec<(String, ConstantValue)> {
    let local = local.octets().into_iter().map(|o| ("LOCALIP", o));
    let remote = remote.octets().into_iter().map(|o| ("REMOTEIP", o));
    local
        .enumerate()
        .chain(remote.enumerate())
        .map(|(i, (prefix, octet))| (format!("{prefix}{}", i + 1), octet.into()))
        .collect()
}
