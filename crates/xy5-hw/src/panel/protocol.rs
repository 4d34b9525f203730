//! XY5 wire protocol definitions and encoding.
//!
//! Transmission structure:
//! - Header byte: 0x80
//! - Mode byte: 0x82 (refresh), 0x83 (data + refresh), 0x84 (data, no refresh)
//! - Panel address byte (0xFF = all panels)
//! - Data bytes, one per column (28 for a standard frame)
//! - Terminator byte: 0x8F
//!
//! Bit `k` of a data byte is dot `k` of that column counted from the top;
//! bit 7 is unused.

use super::framebuffer::{FrameShape, PixelBuffer};
use crate::{Error, PanelAddress, Result, PANEL_COLUMNS, PANEL_ROWS};
use std::str::FromStr;

/// Start of every transmission.
pub const HEADER: u8 = 0x80;

/// End of every transmission.
pub const TERMINATOR: u8 = 0x8F;

/// Header, mode and address bytes.
pub const PREAMBLE_SIZE: usize = 3;

/// Length of a transmission carrying one full panel.
pub const STANDARD_FRAME_LEN: usize = PREAMBLE_SIZE + PANEL_COLUMNS + 1;

/// Flip behaviour requested by a transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RefreshMode {
    /// Keep re-flipping the current image, no data.
    RefreshOnly = 0x82,
    /// New data, then keep refreshing. Stray dots get corrected.
    #[default]
    DataRefresh = 0x83,
    /// New data, flipped once.
    DataNoRefresh = 0x84,
}

impl RefreshMode {
    /// Converts a byte value to RefreshMode.
    pub fn from_byte(value: u8) -> Result<Self> {
        match value {
            0x82 => Ok(RefreshMode::RefreshOnly),
            0x83 => Ok(RefreshMode::DataRefresh),
            0x84 => Ok(RefreshMode::DataNoRefresh),
            _ => Err(Error::InvalidRefreshMode(value)),
        }
    }
}

impl FromStr for RefreshMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "refresh" | "refresh-only" => Ok(RefreshMode::RefreshOnly),
            "data-refresh" | "data_refresh" => Ok(RefreshMode::DataRefresh),
            "data-no-refresh" | "data_no_refresh" | "once" => Ok(RefreshMode::DataNoRefresh),
            _ => Err(Error::InvalidRefreshMode(0)),
        }
    }
}

impl std::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshMode::RefreshOnly => write!(f, "refresh"),
            RefreshMode::DataRefresh => write!(f, "data-refresh"),
            RefreshMode::DataNoRefresh => write!(f, "data-no-refresh"),
        }
    }
}

/// Packs one column of dots, top first, into a data byte.
///
/// The top dot lands in bit 0 and the bottom dot in bit 6.
#[inline]
pub fn pack_column(dots: [u8; PANEL_ROWS]) -> u8 {
    dots.iter()
        .enumerate()
        .fold(0u8, |byte, (row, &dot)| byte | ((dot & 1) << row))
}

/// Unpacks a data byte into dots, top first. Bit 7 is ignored.
#[inline]
pub fn decode_column(byte: u8) -> [u8; PANEL_ROWS] {
    let mut dots = [0u8; PANEL_ROWS];
    for (row, dot) in dots.iter_mut().enumerate() {
        *dot = (byte >> row) & 1;
    }
    dots
}

/// Encodes a 7x28 buffer into 28 column bytes, left to right.
pub fn encode_panel(buffer: &PixelBuffer) -> Result<[u8; PANEL_COLUMNS]> {
    if buffer.shape() != FrameShape::SinglePanel {
        return Err(Error::Shape {
            rows: buffer.rows(),
            columns: buffer.columns(),
        });
    }

    let mut data = [0u8; PANEL_COLUMNS];
    for (col, byte) in data.iter_mut().enumerate() {
        *byte = buffer.column(col).map_or(0, pack_column);
    }
    Ok(data)
}

/// One framed message for the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    pub mode: RefreshMode,
    pub address: PanelAddress,
    pub data: Vec<u8>,
}

impl Transmission {
    /// Creates a transmission with arbitrary data bytes.
    pub fn new(mode: RefreshMode, address: PanelAddress, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mode,
            address,
            data: data.into(),
        }
    }

    /// Creates a 28-column transmission from a 7x28 buffer.
    pub fn standard(
        mode: RefreshMode,
        address: PanelAddress,
        buffer: &PixelBuffer,
    ) -> Result<Self> {
        Ok(Self::new(mode, address, encode_panel(buffer)?))
    }

    /// Creates a refresh-only transmission.
    pub fn refresh(address: PanelAddress) -> Self {
        Self::new(RefreshMode::RefreshOnly, address, Vec::new())
    }

    /// Serializes to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PREAMBLE_SIZE + self.data.len() + 1);
        bytes.push(HEADER);
        bytes.push(self.mode as u8);
        bytes.push(self.address.byte());
        bytes.extend_from_slice(&self.data);
        bytes.push(TERMINATOR);
        bytes
    }

    /// Parses exactly one complete transmission.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PREAMBLE_SIZE + 1 {
            return Err(Error::MalformedTransmission(format!(
                "{} bytes is too short",
                bytes.len()
            )));
        }
        if bytes[0] != HEADER {
            return Err(Error::MalformedTransmission(format!(
                "expected header 0x80, got {:#04X}",
                bytes[0]
            )));
        }
        let last = bytes[bytes.len() - 1];
        if last != TERMINATOR {
            return Err(Error::MalformedTransmission(format!(
                "expected terminator 0x8F, got {:#04X}",
                last
            )));
        }
        let mode = RefreshMode::from_byte(bytes[1])
            .map_err(|_| Error::MalformedTransmission(format!("unknown mode {:#04X}", bytes[1])))?;

        Ok(Self {
            mode,
            address: PanelAddress(bytes[2]),
            data: bytes[PREAMBLE_SIZE..bytes.len() - 1].to_vec(),
        })
    }

    /// Decodes the data bytes back into a 7x28 buffer.
    ///
    /// Columns beyond 28 are dropped and missing ones stay blank.
    pub fn to_panel(&self) -> PixelBuffer {
        let mut buffer = PixelBuffer::single_panel();
        for (col, &byte) in self.data.iter().take(PANEL_COLUMNS).enumerate() {
            for (row, dot) in decode_column(byte).iter().enumerate() {
                buffer.set(row, col, *dot == 1);
            }
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pack_column() {
        assert_eq!(pack_column([1, 0, 0, 0, 0, 0, 0]), 0x01);
        assert_eq!(pack_column([0, 1, 0, 0, 0, 0, 0]), 0x02);
        assert_eq!(pack_column([0, 0, 0, 0, 0, 0, 1]), 0x40);
        assert_eq!(pack_column([1, 1, 1, 1, 1, 1, 1]), 0x7F);
        assert_eq!(pack_column([0, 0, 0, 0, 0, 0, 0]), 0x00);
    }

    #[test]
    fn test_encode_panel() {
        let mut buffer = PixelBuffer::single_panel();
        buffer.set(0, 0, true);
        for row in 0..7 {
            buffer.set(row, 27, true);
        }
        buffer.set(6, 13, true);

        let data = encode_panel(&buffer).unwrap();
        assert_eq!(data[0], 0x01);
        assert_eq!(data[13], 0x40);
        assert_eq!(data[27], 0x7F);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 3);
    }

    #[test]
    fn test_encode_panel_rejects_dual() {
        assert!(matches!(
            encode_panel(&PixelBuffer::dual_panel()),
            Err(Error::Shape {
                rows: 14,
                columns: 28
            })
        ));
    }

    #[test]
    fn test_standard_transmission() {
        let bytes = Transmission::standard(
            RefreshMode::DataRefresh,
            PanelAddress(5),
            &PixelBuffer::single_panel(),
        )
        .unwrap()
        .to_bytes();
        assert_eq!(bytes.len(), STANDARD_FRAME_LEN);
        assert_eq!(&bytes[..3], &[0x80, 0x83, 0x05]);
        assert!(bytes[3..31].iter().all(|&b| b == 0));
        assert_eq!(bytes[30], 0x8F);
    }

    #[test]
    fn test_refresh_mode_bytes() {
        assert_eq!(RefreshMode::RefreshOnly as u8, 0x82);
        assert_eq!(RefreshMode::DataRefresh as u8, 0x83);
        assert_eq!(RefreshMode::DataNoRefresh as u8, 0x84);
        assert_eq!(RefreshMode::from_byte(0x84).unwrap(), RefreshMode::DataNoRefresh);
        assert!(RefreshMode::from_byte(0x85).is_err());
        assert_eq!(
            "data-no-refresh".parse::<RefreshMode>().unwrap(),
            RefreshMode::DataNoRefresh
        );
    }

    #[test]
    fn test_refresh_transmission() {
        assert_eq!(
            Transmission::refresh(PanelAddress::BROADCAST).to_bytes(),
            vec![0x80, 0x82, 0xFF, 0x8F]
        );
    }

    #[test]
    fn test_parse() {
        let bytes = [0x80, 0x84, 0x02, 0x7F, 0x01, 0x8F];
        let parsed = Transmission::parse(&bytes).unwrap();
        assert_eq!(parsed.mode, RefreshMode::DataNoRefresh);
        assert_eq!(parsed.address, PanelAddress(2));
        assert_eq!(parsed.data, vec![0x7F, 0x01]);

        let panel = parsed.to_panel();
        assert_eq!(panel.count_set(), 8);
        assert_eq!(panel.get(0, 1), Some(true));
        assert_eq!(panel.get(1, 1), Some(false));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Transmission::parse(&[0x80, 0x83, 0x00]).is_err());
        assert!(Transmission::parse(&[0x81, 0x83, 0x00, 0x8F]).is_err());
        assert!(Transmission::parse(&[0x80, 0x83, 0x00, 0x00]).is_err());
        assert!(Transmission::parse(&[0x80, 0x99, 0x00, 0x8F]).is_err());
    }

    proptest! {
        #[test]
        fn packed_byte_is_weighted_sum(dots in prop::array::uniform7(0u8..=1)) {
            let expected: u32 = dots
                .iter()
                .enumerate()
                .map(|(row, &d)| (d as u32) << row)
                .sum();
            let byte = pack_column(dots);
            prop_assert_eq!(byte as u32, expected);
            prop_assert_eq!(byte & 0x80, 0);
            prop_assert_eq!(decode_column(byte), dots);
        }
    }
}
