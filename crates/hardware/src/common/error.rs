//! Composition error definitions.
//!
//! Every failure the engine can report is a static configuration defect: two
//! peripherals asking for the same slot, a board that lacks the pads a peripheral
//! needs, or a textual input that does not parse. None of them are retried; the
//! orchestrator aborts the whole composition and reports the failing resource.

use std::fmt;

use crate::soc::namespace::Namespace;
use crate::soc::pads::PadError;
use crate::soc::registry::PeripheralKind;

/// The part of a claim that was already taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// The name is already present in the table (or twice in the proposal).
    Name(String),
    /// The value is already owned by another name (or proposed twice).
    Value(String),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name `{name}`"),
            Self::Value(value) => write!(f, "value {value}"),
        }
    }
}

fn index_suffix(index: &Option<u32>) -> String {
    index.map(|i| format!(" #{i}")).unwrap_or_default()
}

/// Errors raised while composing a platform.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    /// A proposed name or value is already claimed in a namespace.
    #[error("{namespace} collision on {conflict}")]
    Collision {
        /// Namespace in which the collision happened.
        namespace: Namespace,
        /// The conflicting name or value.
        conflict: Conflict,
    },

    /// Two memory regions would share addresses.
    #[error("memory region `{name}` overlaps region `{other}`")]
    Overlap {
        /// Region being added.
        name: String,
        /// Region already present.
        other: String,
    },

    /// No free slot is left for an automatically indexed claim.
    #[error("no free slot left in the {namespace} namespace")]
    Exhausted {
        /// Namespace that ran out of slots.
        namespace: Namespace,
    },

    /// The platform has no (more) pads matching a request.
    #[error("no pad `{name}`{} available on this platform", index_suffix(.index))]
    ResourceUnavailable {
        /// Pad group name.
        name: String,
        /// Pad index, if the request was indexed.
        index: Option<u32>,
    },

    /// A textual input or a size did not parse or resolve.
    #[error("malformed {what}: `{input}`")]
    MalformedInput {
        /// What was being parsed (e.g. "dotted-quad address").
        what: &'static str,
        /// The offending input.
        input: String,
    },

    /// A peripheral depends on a base-platform block that is not present.
    #[error("{peripheral} requires {collaborator}, which the base platform does not provide")]
    MissingCollaborator {
        /// The peripheral being attached.
        peripheral: PeripheralKind,
        /// The missing block.
        collaborator: &'static str,
    },

    /// I/O error while reading a board file or writing the hand-off.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while reading a board file or writing the hand-off.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompositionError {
    /// Builds a [`CompositionError::MalformedInput`].
    pub fn malformed(what: &'static str, input: impl Into<String>) -> Self {
        Self::MalformedInput {
            what,
            input: input.into(),
        }
    }

    /// Returns `true` for collisions in any namespace.
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

impl From<PadError> for CompositionError {
    fn from(err: PadError) -> Self {
        match err {
            PadError::Unavailable { name, index } => Self::ResourceUnavailable { name, index },
        }
    }
}

/// Result type for composition operations.
pub type Result<T> = std::result::Result<T, CompositionError>;
