use linsoc_core::config::{Config, SocConfig};
use linsoc_core::soc::Session;
use linsoc_core::soc::base::BasePlatform;
use linsoc_core::soc::pads::{PadDefinition, StaticPadProvider};

/// First CSR index left free on the stock platform; 0..=6 are seeded.
pub const FIRST_FREE_CSR: u32 = 7;

/// Routes `tracing` output to the test harness; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Builds a pad definition.
pub fn pad(name: &str, index: Option<u32>, signals: &[&str]) -> PadDefinition {
    PadDefinition {
        name: name.to_string(),
        index,
        signals: signals.iter().map(ToString::to_string).collect(),
    }
}

/// Pads of a fully populated Arty-style board.
///
/// Four user LEDs, four switches, two RGB LEDs, two I2C buses, quad SPI flash,
/// one SPI header and a VGA connector.
pub fn arty_pads() -> Vec<PadDefinition> {
    let mut pads = vec![
        pad("spiflash4x", None, &["clk", "cs_n", "dq"]),
        pad("spi", None, &["clk", "cs_n", "mosi", "miso"]),
        pad("vga_out", None, &["hsync_n", "vsync_n", "r", "g", "b"]),
    ];
    for i in 0..4 {
        pads.push(pad("user_led", Some(i), &[]));
        pads.push(pad("user_sw", Some(i), &[]));
    }
    for i in 0..2 {
        pads.push(pad("rgb_led", Some(i), &["r", "g", "b"]));
        pads.push(pad("i2c", Some(i), &["scl", "sda"]));
    }
    pads
}

/// Default configuration with the Arty pads.
pub fn arty_config() -> Config {
    Config {
        pads: arty_pads(),
        ..Config::default()
    }
}

/// Session on the stock base platform with the Arty pads.
pub fn arty_session() -> Session {
    init_tracing();
    Session::from_config(&arty_config()).expect("stock platform seeds")
}

/// Session on the stock base platform with exactly `pads`.
pub fn session_with_pads(pads: Vec<PadDefinition>) -> Session {
    init_tracing();
    let config = Config::default();
    let base = BasePlatform::from_config(&config.base).expect("stock base platform");
    let pads = StaticPadProvider::new(pads).expect("distinct pad definitions");
    Session::begin(base, SocConfig::default(), Box::new(pads)).expect("stock platform seeds")
}
