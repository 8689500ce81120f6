//! Base platform seeding and session baseline tests.

use std::collections::BTreeMap;

use linsoc_core::common::{CompositionError, PhysAddr};
use linsoc_core::config::{BaseConfig, SocConfig};
use linsoc_core::soc::base::{BasePlatform, LAYER_CSR, LAYER_INTERRUPTS, LAYER_MEMORY};
use linsoc_core::soc::namespace::Namespace;
use linsoc_core::soc::pads::StaticPadProvider;
use linsoc_core::soc::regions::RegionKind;
use linsoc_core::soc::{Session, SessionState};

use crate::common::harness::{arty_session, init_tracing};

#[test]
fn stock_seed_holds_base_and_layer_entries() {
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let seed = base.seed().unwrap();

    assert_eq!(seed.csr.len(), 4 + LAYER_CSR.len());
    assert_eq!(seed.interrupts.len(), LAYER_INTERRUPTS.len());
    assert_eq!(seed.memory.len(), 3 + LAYER_MEMORY.len());
    assert_eq!(seed.csr.get("ctrl"), Some(0));
    assert_eq!(seed.csr.get("sdram"), Some(6));
    assert_eq!(seed.interrupts.get("timer0"), Some(1));
    assert_eq!(seed.memory.get("csr"), Some(PhysAddr::new(0xf000_0000)));

    // Seeding derives new tables; the base maps stay as configured.
    assert_eq!(base.csr_map.len(), 4);
}

#[test]
fn base_csr_clash_with_layer_is_fatal() {
    let mut config = BaseConfig::default();
    let _ = config.csr_map.insert("identifier".to_string(), 2);
    let base = BasePlatform::from_config(&config).unwrap();

    let err = base.seed().unwrap_err();
    assert!(matches!(err, CompositionError::Collision { namespace: Namespace::Csr, .. }));
}

#[test]
fn base_memory_clash_with_layer_is_fatal() {
    let mut config = BaseConfig::default();
    let _ = config.mem_map.insert("spiflash".to_string(), 0x3000_0000);
    let base = BasePlatform::from_config(&config).unwrap();
    assert!(base.seed().unwrap_err().is_collision());
}

#[test]
fn base_map_with_shared_value_is_rejected() {
    let mut config = BaseConfig::default();
    config.interrupt_map = BTreeMap::from([("a".to_string(), 4), ("b".to_string(), 4)]);
    assert!(BasePlatform::from_config(&config).unwrap_err().is_collision());
}

#[test]
fn begin_yields_emulator_ram_only() {
    let session = arty_session();

    assert_eq!(session.state(), SessionState::Seeded);
    assert_eq!(session.regions().len(), 1);
    let ram = session.regions().get("emulator_ram").unwrap();
    assert_eq!(ram.base, PhysAddr::new(0x2000_0000));
    assert_eq!(ram.size, 0x4000);
    assert_eq!(ram.kind, RegionKind::Cached);

    assert_eq!(session.csr().len(), 7);
    assert_eq!(session.interrupts().len(), 2);
    assert_eq!(session.memory().len(), 7);
    assert!(session.constants().is_empty());
    assert!(session.peripherals().is_empty());

    let slaves = session.bus().slaves();
    assert_eq!(slaves.len(), 1);
    assert_eq!(slaves[0].name, "emulator_ram");
    assert!(session.bus().route(PhysAddr::new(0x2000_3fff)).is_some());
    assert!(session.bus().route(PhysAddr::new(0x2000_4000)).is_none());
    assert_eq!(session.crossbar().map(|x| x.controller_width()), Some(128));
}

#[test]
fn csr_slots_below_seeded_index_is_malformed() {
    init_tracing();
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let soc = SocConfig {
        csr_slots: 4,
        ..SocConfig::default()
    };
    let err = Session::begin(base, soc, Box::new(StaticPadProvider::default())).unwrap_err();
    assert!(matches!(err, CompositionError::MalformedInput { what: "CSR index", .. }));
}

#[test]
fn csr_base_uses_page_stride() {
    let session = arty_session();
    assert_eq!(session.csr_base("ctrl"), Some(PhysAddr::new(0xf000_0000)));
    assert_eq!(session.csr_base("timer0"), Some(PhysAddr::new(0xf000_1800)));
    assert_eq!(session.csr_base("absent"), None);
}

#[test]
fn csr_window_is_reserved_but_not_a_region() {
    let session = arty_session();
    let window = session.allocator().csr_window().unwrap();
    assert_eq!(window.base, PhysAddr::new(0xf000_0000));
    assert_eq!(window.size, 32 * 0x800);
    assert_eq!(window.kind, RegionKind::Io);
    assert!(session.regions().get("csr").is_none());
}

#[test]
fn overflowing_csr_page_size_is_malformed() {
    init_tracing();
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let soc = SocConfig {
        csr_page_size: u64::MAX / 2,
        ..SocConfig::default()
    };
    let err = Session::begin(base, soc, Box::new(StaticPadProvider::default())).unwrap_err();
    assert!(matches!(err, CompositionError::MalformedInput { what: "CSR page size", .. }));
}

#[test]
fn csr_window_past_bus_end_is_malformed() {
    init_tracing();
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let soc = SocConfig {
        csr_page_size: 0x1000_0000,
        ..SocConfig::default()
    };
    let err = Session::begin(base, soc, Box::new(StaticPadProvider::default())).unwrap_err();
    assert!(matches!(err, CompositionError::MalformedInput { what: "region window", .. }));
}

#[test]
fn zero_csr_page_size_is_malformed() {
    init_tracing();
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let soc = SocConfig {
        csr_page_size: 0,
        ..SocConfig::default()
    };
    let err = Session::begin(base, soc, Box::new(StaticPadProvider::default())).unwrap_err();
    assert!(matches!(err, CompositionError::MalformedInput { what: "region window", .. }));
}

#[test]
fn emulator_ram_reaching_csr_window_overlaps() {
    init_tracing();
    let base = BasePlatform::from_config(&BaseConfig::default()).unwrap();
    let soc = SocConfig {
        emulator_ram_size: 0xd000_0001,
        ..SocConfig::default()
    };
    let err = Session::begin(base, soc, Box::new(StaticPadProvider::default())).unwrap_err();
    assert!(matches!(
        err,
        CompositionError::Overlap { ref name, ref other } if name == "emulator_ram" && other == "csr"
    ));
}

#[test]
fn csr_bases_stay_inside_the_window() {
    let session = arty_session();
    let window = session.allocator().csr_window().unwrap();
    for (name, _) in session.csr().iter() {
        let addr = session.csr_base(name).unwrap();
        assert!(window.contains(addr), "{name} at {addr}");
    }
    assert_eq!(session.allocator().csr_bank_base(31), Some(PhysAddr::new(0xf000_f800)));
    assert_eq!(session.allocator().csr_bank_base(32), None);
}
