//! Panel addressing.
//!
//! Each panel reads an address from its 8 dip switches and only accepts
//! transmissions carrying that address (or the broadcast address). The
//! address travels as a single byte, exactly as given.

use crate::{Error, Result};
use std::str::FromStr;

/// Address of a physical panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PanelAddress(pub u8);

impl PanelAddress {
    /// Address accepted by every panel on the bus.
    pub const BROADCAST: PanelAddress = PanelAddress(0xFF);

    /// Default address of the top panel (all switches off).
    pub const TOP: PanelAddress = PanelAddress(0);

    /// Default address of the bottom panel (switch 1 on).
    pub const BOTTOM: PanelAddress = PanelAddress(1);

    /// Returns the byte sent on the wire.
    pub fn byte(&self) -> u8 {
        self.0
    }

    /// Returns true for the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<u8> for PanelAddress {
    fn from(value: u8) -> Self {
        PanelAddress(value)
    }
}

impl From<PanelAddress> for u8 {
    fn from(address: PanelAddress) -> Self {
        address.0
    }
}

impl FromStr for PanelAddress {
    type Err = Error;

    /// Accepts decimal (`3`), hex (`0x03`), dip-switch binary (`0b00000011`)
    /// or `broadcast`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_lowercase();
        let parsed = if trimmed == "broadcast" || trimmed == "all" {
            Ok(0xFF)
        } else if let Some(hex) = trimmed.strip_prefix("0x") {
            u8::from_str_radix(hex, 16)
        } else if let Some(bin) = trimmed.strip_prefix("0b") {
            u8::from_str_radix(bin, 2)
        } else {
            trimmed.parse::<u8>()
        };

        parsed
            .map(PanelAddress)
            .map_err(|_| Error::InvalidAddress(s.to_string()))
    }
}

impl std::fmt::Display for PanelAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_broadcast() {
            write!(f, "broadcast")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("0".parse::<PanelAddress>().unwrap(), PanelAddress(0));
        assert_eq!("17".parse::<PanelAddress>().unwrap(), PanelAddress(17));
        assert_eq!("0x1F".parse::<PanelAddress>().unwrap(), PanelAddress(0x1F));
        assert_eq!(
            "0b00000011".parse::<PanelAddress>().unwrap(),
            PanelAddress(3)
        );
        assert_eq!(
            "broadcast".parse::<PanelAddress>().unwrap(),
            PanelAddress::BROADCAST
        );
    }

    #[test]
    fn test_from_str_rejects_out_of_range() {
        assert!("256".parse::<PanelAddress>().is_err());
        assert!("-1".parse::<PanelAddress>().is_err());
        assert!("panel".parse::<PanelAddress>().is_err());
    }

    #[test]
    fn test_byte_is_not_reversed() {
        // Switch 1 on reads as binary 1; the byte goes out untouched.
        assert_eq!(PanelAddress::BOTTOM.byte(), 0x01);
        assert_eq!(PanelAddress(0b1000_0000).byte(), 0x80);
    }

    #[test]
    fn test_display() {
        assert_eq!(PanelAddress(5).to_string(), "5");
        assert_eq!(PanelAddress::BROADCAST.to_string(), "broadcast");
    }
}
