//! Dotted-quad parsing tests.

use std::net::Ipv4Addr;

use linsoc_core::common::{CompositionError, DottedQuad};
use rstest::rstest;

#[rstest]
#[case("10.0.0.1", [10, 0, 0, 1])]
#[case("192.168.1.50", [192, 168, 1, 50])]
#[case("255.255.255.255", [255, 255, 255, 255])]
#[case("0.0.0.0", [0, 0, 0, 0])]
#[case(" 10.0.0.2 ", [10, 0, 0, 2])]
fn parses_four_octets(#[case] input: &str, #[case] octets: [u8; 4]) {
    let quad: DottedQuad = input.parse().unwrap();
    assert_eq!(quad.octets(), octets);
}

#[rstest]
#[case("10.0.1")]
#[case("10.0.0.1.5")]
#[case("10.0.0.256")]
#[case("10..0.1")]
#[case("10.0.0.")]
#[case("+10.0.0.1")]
#[case("10.0.0.-1")]
#[case("a.b.c.d")]
#[case("")]
fn rejects_malformed(#[case] input: &str) {
    let err = input.parse::<DottedQuad>().unwrap_err();
    assert!(
        matches!(err, CompositionError::MalformedInput { what: "dotted-quad address", .. }),
        "{input:?} gave {err}"
    );
}

#[test]
fn converts_to_and_from_ipv4() {
    let quad: DottedQuad = "10.0.0.1".parse().unwrap();
    let addr: Ipv4Addr = quad.into();
    assert_eq!(addr, Ipv4Addr::new(10, 0, 0, 1));
    assert_eq!(DottedQuad::from(addr), quad);
    assert_eq!(quad.to_string(), "10.0.0.1");
}
