//! Discrete outputs: GPIO banks and PWM channels.

use serde::Serialize;

use crate::soc::pads::PadGroup;

/// GPIO output bank driving every pad it was built from, concatenated in index order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GpioOut {
    /// Aggregated pads, bit 0 first.
    pub pads: Vec<PadGroup>,
    /// Total output width in bits.
    pub width: usize,
}

impl GpioOut {
    /// Builds a bank over `pads`; the width is the sum of the pad widths.
    pub fn new(pads: Vec<PadGroup>) -> Self {
        let width = pads.iter().map(PadGroup::width).sum();
        Self { pads, width }
    }
}

/// Colour channel of an RGB LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
}

impl Channel {
    /// All channels, in CSR allocation order.
    pub const ALL: [Self; 3] = [Self::R, Self::G, Self::B];

    /// Lowercase letter used in signal and CSR names.
    pub const fn letter(self) -> char {
        match self {
            Self::R => 'r',
            Self::G => 'g',
            Self::B => 'b',
        }
    }

    /// CSR bank name of this channel for RGB LED `index`, e.g. `rgb_led_r0`.
    pub fn csr_name(self, index: u32) -> String {
        format!("rgb_led_{}{index}", self.letter())
    }
}

/// One pulse-width modulated output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pwm {
    /// Driven channel.
    pub channel: Channel,
    /// Signal of the RGB pad group driven by this channel.
    pub signal: String,
}

/// RGB LED: three independent PWM outputs on one pad group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RgbLed {
    /// The `rgb_led` pad group.
    pub pads: PadGroup,
    /// Channels in R, G, B order.
    pub channels: [Pwm; 3],
}

impl RgbLed {
    /// Splits `pads` into one PWM per channel.
    pub fn new(pads: PadGroup) -> Self {
        let channels = Channel::ALL.map(|channel| Pwm {
            channel,
            signal: channel.letter().to_string(),
        });
        Self { pads, channels }
    }
}
