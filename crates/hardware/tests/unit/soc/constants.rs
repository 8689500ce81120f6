//! Network and boot constant tests.

use linsoc_core::common::CompositionError;
use linsoc_core::config::{Config, SocConfig};
use linsoc_core::soc::Session;
use linsoc_core::soc::constants::{ConstantValue, FLASH_BOOT_ADDRESS};
use linsoc_core::soc::namespace::Namespace;
use pretty_assertions::assert_eq;

use crate::common::harness::{arty_config, arty_session, init_tracing};

#[test]
fn ethernet_emits_octets_local_then_remote() {
    let mut session = arty_session();
    let grant = session.configure_ethernet("10.0.0.1", "10.0.0.2").unwrap();

    assert_eq!(
        grant.constants,
        vec![
            "LOCALIP1", "LOCALIP2", "LOCALIP3", "LOCALIP4", "REMOTEIP1", "REMOTEIP2", "REMOTEIP3",
            "REMOTEIP4"
        ]
    );
    let values: Vec<_> = session
        .constants()
        .iter()
        .filter_map(|(_, v)| v.as_int())
        .collect();
    assert_eq!(values, vec![10, 0, 0, 1, 10, 0, 0, 2]);
    assert!(grant.csr.is_empty());
    assert_eq!(session.csr().len(), 7);
}

#[test]
fn malformed_local_address_emits_nothing() {
    let mut session = arty_session();
    let err = session.configure_ethernet("10.0.1", "10.0.0.2").unwrap_err();
    assert!(matches!(err, CompositionError::MalformedInput { .. }));
    assert!(session.constants().is_empty());
}

#[test]
fn malformed_remote_address_emits_nothing() {
    let mut session = arty_session();
    assert!(session.configure_ethernet("10.0.0.1", "10.0.0.300").is_err());
    assert!(session.constants().is_empty());
}

#[test]
fn ethernet_twice_is_a_constant_collision() {
    let mut session = arty_session();
    let _ = session.configure_ethernet("10.0.0.1", "10.0.0.2").unwrap();
    let err = session.configure_ethernet("10.0.0.3", "10.0.0.4").unwrap_err();
    assert!(matches!(err, CompositionError::Collision { namespace: Namespace::Constant, .. }));
    assert_eq!(session.constants().get("LOCALIP4"), Some(ConstantValue::Int(1)));
}

#[test]
fn boot_before_flash_emits_nothing() {
    let mut session = arty_session();
    assert_eq!(session.configure_boot().unwrap(), None);
    assert!(session.constants().is_empty());
}

#[test]
fn boot_after_flash_emits_boot_address() {
    let mut session = arty_session();
    let _ = session.add_spi_flash().unwrap();
    assert_eq!(session.configure_boot().unwrap(), Some(0x0040_0000));

    assert_eq!(session.constants().len(), 1);
    assert_eq!(
        session.constants().get(FLASH_BOOT_ADDRESS),
        Some(ConstantValue::Int(0x0040_0000))
    );
}

#[test]
fn boot_out_of_order_then_in_order() {
    let mut session = arty_session();
    assert_eq!(session.configure_boot().unwrap(), None);
    let _ = session.add_spi_flash().unwrap();
    assert!(session.configure_boot().unwrap().is_some());
    assert!(session.configure_boot().unwrap_err().is_collision());
}

#[test]
fn boot_address_follows_configuration() {
    init_tracing();
    let config = Config {
        soc: SocConfig {
            flash_boot_address: 0x0080_0000,
            ..SocConfig::default()
        },
        ..arty_config()
    };
    let mut session = Session::from_config(&config).unwrap();
    let _ = session.add_spi_flash().unwrap();
    assert_eq!(session.configure_boot().unwrap(), Some(0x0080_0000));
}

#[test]
fn boot_address_beyond_i64_is_malformed() {
    init_tracing();
    let config = Config {
        soc: SocConfig {
            flash_boot_address: u64::MAX,
            ..SocConfig::default()
        },
        ..arty_config()
    };
    let mut session = Session::from_config(&config).unwrap();
    let _ = session.add_spi_flash().unwrap();
    assert!(matches!(
        session.configure_boot(),
        Err(CompositionError::MalformedInput { what: "flash boot address", .. })
    ));
}

#[test]
fn constant_values_render() {
    assert_eq!(ConstantValue::Int(640).to_string(), "640");
    assert_eq!(ConstantValue::from(31.5e6), ConstantValue::Float(31.5e6));
    assert!((ConstantValue::Int(640).as_f64() - 640.0).abs() < f64::EPSILON);
    assert_eq!(ConstantValue::from(3_u32).as_int(), Some(3));
    assert_eq!(ConstantValue::Float(1.5).as_int(), None);
}
