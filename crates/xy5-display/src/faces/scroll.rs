//! Horizontally scrolling text, one message per panel.
//!
//! Glyphs are stored as ready-made column bytes (bit 0 = top dot), five
//! dots tall with a blank row above and below, so a message fits on either
//! panel. The scroller slides a 28-column window over the message and
//! sends the window bytes straight to the panel.

use anyhow::Result;
use std::time::Duration;
use xy5_hw::{PanelAddress, RefreshMode, Transmission, PANEL_COLUMNS};

use super::{Face, Frame};
use crate::config::ScrollConfig;

/// Column bytes for a character, or None if it has no glyph.
fn glyph_columns(c: char) -> Option<&'static [u8]> {
    let columns: &'static [u8] = match c {
        ' ' => &[0],
        '+' => &[24, 126, 126, 24, 0],
        '-' => &[24, 24, 24, 24, 0],
        '0' => &[62, 65, 65, 62, 0],
        '1' => &[0, 66, 127, 64, 0],
        '2' => &[98, 81, 73, 70, 0],
        '3' => &[34, 65, 73, 54, 0],
        '4' => &[56, 36, 34, 127, 32],
        '5' => &[79, 73, 73, 49, 0],
        '6' => &[62, 73, 73, 50, 0],
        '7' => &[3, 1, 1, 127, 0],
        '8' => &[54, 73, 73, 54, 0],
        '9' => &[38, 73, 73, 62, 0],
        'A' => &[0x3C, 0x0A, 0x0A, 0x3C],
        'B' => &[0x3E, 0x2A, 0x2A, 0x14],
        'C' => &[0x1C, 0x22, 0x22, 0x14],
        'D' => &[0x3E, 0x22, 0x22, 0x1C],
        'E' => &[0x3E, 0x2A, 0x2A],
        'F' => &[0x3E, 0x0A, 0x0A],
        'G' => &[0x1C, 0x22, 0x2A, 0x2A],
        'H' => &[0x3E, 0x08, 0x08, 0x3E],
        'I' => &[0x3E],
        'J' => &[0x10, 0x20, 0x20, 0x1E],
        'K' => &[0x3E, 0x08, 0x14, 0x22],
        'L' => &[0x3E, 0x20, 0x20],
        'M' => &[0x3E, 0x04, 0x08, 0x04, 0x3E],
        'N' => &[0x3E, 0x04, 0x08, 0x3E],
        'O' => &[0x1C, 0x22, 0x22, 0x1C],
        'P' => &[0x3E, 0x0A, 0x0A, 0x1C, 0x04],
        'Q' => &[0x1C, 0x22, 0x12, 0x2C],
        'R' => &[0x3E, 0x0A, 0x1A, 0x24],
        'S' => &[0x24, 0x2A, 0x2A, 0x12],
        'T' => &[0x02, 0x02, 0x3E, 0x02, 0x02],
        'U' => &[0x1E, 0x20, 0x20, 0x1E],
        'V' => &[0x06, 0x18, 0x20, 0x18, 0x06],
        'W' => &[0x1E, 0x20, 0x1E, 0x20, 0x1E],
        'X' => &[0x36, 0x08, 0x08, 0x36],
        'Y' => &[0x2E, 0x28, 0x28, 0x1E],
        'Z' => &[0x32, 0x2A, 0x2A, 0x26],
        _ => return None,
    };
    Some(columns)
}

/// Builds the column stream for a message.
///
/// Letters are upper-cased, characters without a glyph are dropped, and
/// every glyph is followed by one blank column. Short messages are padded
/// with spaces to at least a full panel width.
pub fn text_to_columns(text: &str) -> Vec<u8> {
    let mut columns = Vec::new();
    for c in text.chars().flat_map(char::to_uppercase) {
        if let Some(glyph) = glyph_columns(c) {
            columns.extend_from_slice(glyph);
            columns.push(0);
        }
    }

    let space = glyph_columns(' ').unwrap_or(&[0]);
    while columns.len() < PANEL_COLUMNS {
        columns.extend_from_slice(space);
    }
    columns
}

/// The 28 columns visible at frame `t`, wrapping around the message.
pub fn window(columns: &[u8], t: usize) -> [u8; PANEL_COLUMNS] {
    let mut visible = [0u8; PANEL_COLUMNS];
    if columns.is_empty() {
        return visible;
    }
    for (i, byte) in visible.iter_mut().enumerate() {
        *byte = columns[(t + i) % columns.len()];
    }
    visible
}

/// Two independent messages scrolling right to left.
pub struct ScrollFace {
    top: Vec<u8>,
    bottom: Vec<u8>,
    top_address: PanelAddress,
    bottom_address: PanelAddress,
    frame: usize,
    interval: Duration,
}

impl ScrollFace {
    /// Creates a scroller for the given messages and panels.
    pub fn new(
        config: &ScrollConfig,
        top_address: PanelAddress,
        bottom_address: PanelAddress,
    ) -> Self {
        Self {
            top: text_to_columns(&config.top_text),
            bottom: text_to_columns(&config.bottom_text),
            top_address,
            bottom_address,
            frame: 0,
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    fn transmission(&self, columns: &[u8], address: PanelAddress) -> Transmission {
        Transmission::new(
            RefreshMode::DataRefresh,
            address,
            window(columns, self.frame).to_vec(),
        )
    }
}

impl Face for ScrollFace {
    fn name(&self) -> &str {
        "scroll"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let frame = Frame::Transmissions(vec![
            self.transmission(&self.top, self.top_address),
            self.transmission(&self.bottom, self.bottom_address),
        ]);
        self.frame = self.frame.wrapping_add(1);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_fit_in_seven_dots() {
        let all = " +-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        for c in all.chars() {
            let glyph = glyph_columns(c).unwrap();
            assert!(glyph.iter().all(|&b| b < 0x80), "{:?}", c);
        }
    }

    #[test]
    fn test_text_to_columns() {
        let columns = text_to_columns("hi");
        assert_eq!(&columns[..7], &[0x3E, 0x08, 0x08, 0x3E, 0, 0x3E, 0]);
        assert_eq!(columns.len(), 28);
        assert!(columns[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        assert_eq!(text_to_columns("I!?I"), text_to_columns("II"));
    }

    #[test]
    fn test_long_text_is_not_padded() {
        let columns = text_to_columns("HELLO WORLD");
        // H4 E3 L3 L3 O4 space1 W5 O4 R4 L3 D4, each plus a spacer.
        assert_eq!(columns.len(), 38 + 11);
    }

    #[test]
    fn test_window_wraps() {
        let columns: Vec<u8> = (0..30).collect();
        let visible = window(&columns, 5);
        assert_eq!(visible[0], 5);
        assert_eq!(visible[24], 29);
        assert_eq!(visible[25], 0);
        assert_eq!(visible[27], 2);
        assert_eq!(window(&columns, 35), visible);
    }

    #[test]
    fn test_short_message_window_is_cyclic() {
        let columns = text_to_columns("+");
        let len = columns.len();
        for t in [0, 1, 13, len, len + 3, 5 * len + 1] {
            let visible = window(&columns, t);
            for (i, &byte) in visible.iter().enumerate() {
                assert_eq!(byte, columns[(t % len + i) % len]);
            }
        }
    }

    #[test]
    fn test_face_advances_one_column_per_frame() {
        let config = ScrollConfig {
            top_text: "AB".to_string(),
            bottom_text: "".to_string(),
            ..ScrollConfig::default()
        };
        let mut face = ScrollFace::new(&config, PanelAddress(0), PanelAddress(1));
        let columns = text_to_columns("AB");

        for t in 0..3 {
            let Frame::Transmissions(transmissions) = face.next_frame().unwrap() else {
                panic!("scroller must produce transmissions");
            };
            assert_eq!(transmissions.len(), 2);
            assert_eq!(transmissions[0].address, PanelAddress(0));
            assert_eq!(transmissions[0].data, window(&columns, t).to_vec());
            assert_eq!(transmissions[1].address, PanelAddress(1));
            assert!(transmissions[1].data.iter().all(|&b| b == 0));
            assert_eq!(transmissions[0].to_bytes().len(), 31);
        }
    }
}
