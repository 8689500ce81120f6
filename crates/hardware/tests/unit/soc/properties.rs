//! Property tests over random attachment sequences.
//!
//! Whatever the orchestrator asks for, and in whatever order, every table stays
//! free of duplicates and no two regions share an address. Failed attachments
//! leave the tables exactly as they were.

use std::collections::HashSet;
use std::fmt::Display;

use linsoc_core::soc::Session;
use linsoc_core::soc::namespace::NamespaceTable;
use proptest::prelude::*;

use crate::common::harness::arty_session;

#[derive(Clone, Debug)]
enum Step {
    Flash,
    Leds,
    Rgb,
    Switches,
    Spi,
    I2c(u32),
    Xadc,
    Framebuffer(usize),
    Icap,
    Ethernet([u8; 4], [u8; 4]),
    Boot,
}

const MODES: [&str; 4] = ["1920x1080_60Hz", "1280x720_60Hz", "640x480_75Hz", "800x600_60Hz"];

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Flash),
        Just(Step::Leds),
        Just(Step::Rgb),
        Just(Step::Switches),
        Just(Step::Spi),
        (0u32..4).prop_map(Step::I2c),
        Just(Step::Xadc),
        (0..MODES.len()).prop_map(Step::Framebuffer),
        Just(Step::Icap),
        (any::<[u8; 4]>(), any::<[u8; 4]>()).prop_map(|(l, r)| Step::Ethernet(l, r)),
        Just(Step::Boot),
    ]
}

fn apply(session: &mut Session, step: &Step) -> bool {
    let dotted = |o: [u8; 4]| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3]);
    match step {
        Step::Flash => session.add_spi_flash().is_ok(),
        Step::Leds => session.add_leds().is_ok(),
        Step::Rgb => session.add_rgb_led().is_ok(),
        Step::Switches => session.add_switches().is_ok(),
        Step::Spi => session.add_spi(8, 1e6).is_ok(),
        Step::I2c(i) => session.add_i2c(*i).is_ok(),
        Step::Xadc => session.add_xadc().is_ok(),
        Step::Framebuffer(m) => session.add_framebuffer(MODES[*m]).is_ok(),
        Step::Icap => session.add_icap_bitstream().is_ok(),
        Step::Ethernet(l, r) => session.configure_ethernet(&dotted(*l), &dotted(*r)).is_ok(),
        Step::Boot => session.configure_boot().is_ok(),
    }
}

fn assert_unique<V>(table: &NamespaceTable<V>)
where
    V: Copy + PartialEq + Eq + std::hash::Hash + Display,
{
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for (name, value) in table.iter() {
        assert!(names.insert(name.to_string()), "name {name} twice");
        assert!(values.insert(value), "value {value} twice");
    }
}

fn assert_consistent(session: &Session) {
    assert_unique(session.csr());
    assert_unique(session.interrupts());
    assert_unique(session.memory());

    let regions: Vec<_> = session.regions().iter().collect();
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a.name, b.name);
        }
    }

    let mut constants = HashSet::new();
    for (name, _) in session.constants().iter() {
        assert!(constants.insert(name.to_string()), "constant {name} twice");
    }
}

proptest! {
    #[test]
    fn tables_stay_collision_free(steps in prop::collection::vec(step(), 0..24)) {
        let mut session = arty_session();
        for step in &steps {
            let csr_before = session.csr().clone();
            let constants_before = session.constants().clone();
            if !apply(&mut session, step) {
                prop_assert_eq!(session.csr(), &csr_before);
                prop_assert_eq!(session.constants(), &constants_before);
            }
            assert_consistent(&session);
        }
    }

    #[test]
    fn automatic_csr_indices_fill_from_the_bottom(count in 1usize..3) {
        let mut session = arty_session();
        for i in 0..count {
            let _ = session.add_i2c(u32::try_from(i).unwrap()).unwrap();
        }
        let claimed: Vec<u32> = session.csr().iter().skip(7).map(|(_, v)| v).collect();
        let expected: Vec<u32> = (7..).take(count).collect();
        prop_assert_eq!(claimed, expected);
    }
}
