//! Error rendering tests.

use linsoc_core::common::{CompositionError, Conflict};
use linsoc_core::soc::namespace::Namespace;
use linsoc_core::soc::pads::PadError;
use linsoc_core::soc::registry::PeripheralKind;

#[test]
fn collision_names_namespace_and_conflict() {
    let err = CompositionError::Collision {
        namespace: Namespace::Csr,
        conflict: Conflict::Name("leds".to_string()),
    };
    assert_eq!(err.to_string(), "CSR collision on name `leds`");
    assert!(err.is_collision());
}

#[test]
fn value_collision_message() {
    let err = CompositionError::Collision {
        namespace: Namespace::Memory,
        conflict: Conflict::Value("0xd0000000".to_string()),
    };
    assert_eq!(err.to_string(), "memory map collision on value 0xd0000000");
}

#[test]
fn unavailable_with_and_without_index() {
    let indexed = CompositionError::ResourceUnavailable {
        name: "user_led".to_string(),
        index: Some(0),
    };
    assert_eq!(indexed.to_string(), "no pad `user_led` #0 available on this platform");

    let single = CompositionError::ResourceUnavailable {
        name: "spi".to_string(),
        index: None,
    };
    assert_eq!(single.to_string(), "no pad `spi` available on this platform");
    assert!(!single.is_collision());
}

#[test]
fn pad_error_converts_to_unavailable() {
    let err: CompositionError = PadError::Unavailable {
        name: "i2c".to_string(),
        index: Some(3),
    }
    .into();
    assert!(matches!(
        err,
        CompositionError::ResourceUnavailable { ref name, index: Some(3) } if name == "i2c"
    ));
}

#[test]
fn malformed_message() {
    let err = CompositionError::malformed("video mode", "800x600");
    assert_eq!(err.to_string(), "malformed video mode: `800x600`");
}

#[test]
fn missing_collaborator_message() {
    let err = CompositionError::MissingCollaborator {
        peripheral: PeripheralKind::Framebuffer,
        collaborator: "an SDRAM crossbar",
    };
    assert_eq!(
        err.to_string(),
        "framebuffer requires an SDRAM crossbar, which the base platform does not provide"
    );
}

#[test]
fn exhausted_message() {
    let err = CompositionError::Exhausted {
        namespace: Namespace::Csr,
    };
    assert_eq!(err.to_string(), "no free slot left in the CSR namespace");
}
