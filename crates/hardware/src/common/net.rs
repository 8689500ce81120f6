//! Dotted-quad network addresses.
//!
//! The firmware's network stack takes its local and remote addresses as eight
//! separate octet constants, so the composition only ever needs the four raw
//! octets. Parsing is strict: exactly four dot-separated decimal octets.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use super::error::CompositionError;

/// Four octets parsed from `a.b.c.d` notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DottedQuad(pub [u8; 4]);

impl DottedQuad {
    /// Returns the octets in textual order.
    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for DottedQuad {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CompositionError::malformed("dotted-quad address", s);

        let mut octets = [0u8; 4];
        let mut parts = s.trim().split('.');
        for octet in &mut octets {
            let part = parts.next().ok_or_else(malformed)?;
            // u8::from_str accepts a leading '+', which is not an octet.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            *octet = part.parse().map_err(|_| malformed())?;
        }
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self(octets))
    }
}

impl From<DottedQuad> for Ipv4Addr {
    fn from(quad: DottedQuad) -> Self {
        Self::from(quad.0)
    }
}

impl From<Ipv4Addr> for DottedQuad {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr.octets())
    }
}

impl fmt::Display for DottedQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}
