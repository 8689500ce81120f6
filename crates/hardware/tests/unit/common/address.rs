//! Physical address tests.

use linsoc_core::common::PhysAddr;
use linsoc_core::common::addr::BUS_ADDRESS_LIMIT;

#[test]
fn window_end_inside_bus() {
    let base = PhysAddr::new(0xd000_0000);
    assert_eq!(base.window_end(0x100_0000), Some(0xd100_0000));
}

#[test]
fn window_end_touching_limit() {
    let base = PhysAddr::new(0xf000_0000);
    assert_eq!(base.window_end(0x1000_0000), Some(BUS_ADDRESS_LIMIT));
}

#[test]
fn window_end_past_limit() {
    let base = PhysAddr::new(0xf000_0000);
    assert_eq!(base.window_end(0x1000_0001), None);
}

#[test]
fn window_end_overflow() {
    assert_eq!(PhysAddr::new(u64::MAX).window_end(1), None);
}

#[test]
fn checked_offset_adds_bytes() {
    assert_eq!(
        PhysAddr::new(0xf000_0000).checked_offset(0x3800),
        Some(PhysAddr::new(0xf000_3800))
    );
}

#[test]
fn checked_offset_stops_at_bus_limit() {
    let base = PhysAddr::new(0xf000_0000);
    assert_eq!(base.checked_offset(0x0fff_ffff), Some(PhysAddr::new(0xffff_ffff)));
    assert_eq!(base.checked_offset(0x1000_0000), None);
    assert_eq!(PhysAddr::new(u64::MAX).checked_offset(1), None);
}

#[test]
fn display_is_zero_padded_hex() {
    assert_eq!(PhysAddr::new(0x4000).to_string(), "0x00004000");
    assert_eq!(PhysAddr::from(0xb000_0000).to_string(), "0xb0000000");
}

#[test]
fn serializes_as_integer() {
    let json = serde_json::to_string(&PhysAddr::new(0x2000_0000)).unwrap();
    assert_eq!(json, "536870912");
}
