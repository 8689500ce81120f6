//! Bus routing and crossbar port tests.

use linsoc_core::common::PhysAddr;
use linsoc_core::soc::interconnect::{Bus, Crossbar, PortMode, PortRequest};

#[test]
fn slaves_are_kept_in_address_order() {
    let mut bus = Bus::new();
    bus.add_slave("spiflash", PhysAddr::new(0xd000_0000), 0x100_0000);
    bus.add_slave("emulator_ram", PhysAddr::new(0x2000_0000), 0x4000);

    let names: Vec<_> = bus.slaves().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["emulator_ram", "spiflash"]);
}

#[test]
fn route_selects_decoding_slave() {
    let mut bus = Bus::new();
    bus.add_slave("emulator_ram", PhysAddr::new(0x2000_0000), 0x4000);

    assert_eq!(
        bus.route(PhysAddr::new(0x2000_0000)).map(|s| s.name.as_str()),
        Some("emulator_ram")
    );
    assert!(bus.route(PhysAddr::new(0x1fff_ffff)).is_none());
    assert!(bus.route(PhysAddr::new(0x2000_4000)).is_none());
}

#[test]
fn crossbar_numbers_ports_in_grant_order() {
    let mut crossbar = Crossbar::new(128);
    let request = |mode| PortRequest {
        mode,
        data_width: 32,
        clock_domain: "sys".to_string(),
        reverse: false,
    };

    let first = crossbar.get_port(request(PortMode::Both));
    let second = crossbar.get_port(request(PortMode::Read));

    assert_eq!(first.id, 0);
    assert_eq!(second.id, 1);
    assert_eq!(crossbar.ports().len(), 2);
    assert_eq!(crossbar.controller_width(), 128);
}

#[test]
fn port_serializes_flat() {
    let mut crossbar = Crossbar::new(128);
    let port = crossbar.get_port(PortRequest {
        mode: PortMode::Read,
        data_width: 32,
        clock_domain: "pix".to_string(),
        reverse: true,
    });
    let json = serde_json::to_value(&port).unwrap();
    assert_eq!(json["id"], 0);
    assert_eq!(json["mode"], "read");
    assert_eq!(json["clock_domain"], "pix");
    assert_eq!(json["reverse"], true);
}
