//! Digital clock face.
//!
//! Seven-segment style 5x3 digits across the top panel and AM/PM in the
//! bottom right corner, 12-hour time.

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime, Timelike};
use std::time::Duration;
use xy5_hw::PixelBuffer;

use super::{Face, Frame};
use crate::config::ClockConfig;

type Glyph = &'static [&'static [u8]];

const DIGITS: [Glyph; 10] = [
    &[&[1, 1, 1], &[1, 0, 1], &[1, 0, 1], &[1, 0, 1], &[1, 1, 1]],
    &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 0], &[0, 1, 0], &[1, 1, 1]],
    &[&[1, 1, 1], &[0, 0, 1], &[1, 1, 1], &[1, 0, 0], &[1, 1, 1]],
    &[&[1, 1, 1], &[0, 0, 1], &[1, 1, 1], &[0, 0, 1], &[1, 1, 1]],
    &[&[1, 0, 1], &[1, 0, 1], &[1, 1, 1], &[0, 0, 1], &[0, 0, 1]],
    &[&[1, 1, 1], &[1, 0, 0], &[1, 1, 1], &[0, 0, 1], &[1, 1, 1]],
    &[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1], &[1, 0, 1], &[1, 1, 1]],
    &[&[1, 1, 1], &[0, 0, 1], &[0, 0, 1], &[0, 0, 1], &[0, 0, 1]],
    &[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1], &[1, 0, 1], &[1, 1, 1]],
    &[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1], &[0, 0, 1], &[0, 0, 1]],
];

const COLON: Glyph = &[&[0, 0, 0], &[0, 1, 0], &[0, 0, 0], &[0, 1, 0], &[0, 0, 0]];

const LETTER_A: Glyph = &[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1], &[1, 0, 1]];

const LETTER_P: Glyph = &[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1], &[1, 0, 0]];

const LETTER_M: Glyph = &[
    &[1, 0, 0, 0, 1],
    &[1, 1, 0, 1, 1],
    &[1, 0, 1, 0, 1],
    &[1, 0, 0, 0, 1],
];

/// Row of the top edge of the time digits.
const TIME_ROW: usize = 2;

/// Columns for H H : M M.
const TIME_COLUMNS: [usize; 5] = [1, 5, 9, 13, 17];

/// Columns for H H : M M S S, squeezed to fit the seconds.
const TIME_COLUMNS_SECONDS: [usize; 7] = [1, 5, 8, 11, 15, 20, 24];

/// Top-left corner of the A/P letter; M follows four columns later.
const MERIDIEM_ROW: usize = 8;
const MERIDIEM_COLUMN: usize = 18;
const M_COLUMN: usize = 22;

/// Looks up the glyph for a clock character.
fn glyph(c: char) -> Option<Glyph> {
    match c {
        '0'..='9' => Some(DIGITS[c as usize - '0' as usize]),
        ':' => Some(COLON),
        'A' => Some(LETTER_A),
        'P' => Some(LETTER_P),
        'M' => Some(LETTER_M),
        _ => None,
    }
}

/// Draws the given time into a fresh 14x28 buffer.
pub fn render_clock(time: NaiveTime, show_seconds: bool, invert: bool) -> Result<PixelBuffer> {
    let (pm, hour) = time.hour12();
    let text = if show_seconds {
        format!("{:02}:{:02}{:02}", hour, time.minute(), time.second())
    } else {
        format!("{:02}:{:02}", hour, time.minute())
    };
    let columns: &[usize] = if show_seconds {
        &TIME_COLUMNS_SECONDS
    } else {
        &TIME_COLUMNS
    };

    let mut buffer = PixelBuffer::dual_panel();
    for (c, &col) in text.chars().zip(columns) {
        let pattern = glyph(c).with_context(|| format!("No clock glyph for {:?}", c))?;
        buffer.blit(pattern, TIME_ROW, col)?;
    }

    let meridiem = if pm { LETTER_P } else { LETTER_A };
    buffer.blit(meridiem, MERIDIEM_ROW, MERIDIEM_COLUMN)?;
    buffer.blit(LETTER_M, MERIDIEM_ROW, M_COLUMN)?;

    if invert {
        buffer.invert();
    }
    Ok(buffer)
}

/// Wall clock, repainted every interval.
pub struct ClockFace {
    show_seconds: bool,
    invert: bool,
    interval: Duration,
}

impl ClockFace {
    /// Creates a new clock face.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            show_seconds: config.show_seconds,
            invert: config.invert,
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

impl Face for ClockFace {
    fn name(&self) -> &str {
        "clock"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let now = Local::now().time();
        render_clock(now, self.show_seconds, self.invert).map(Frame::Pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    /// Reads back a w x h block as rows of 0/1.
    fn block(buffer: &PixelBuffer, row: usize, col: usize, h: usize, w: usize) -> Vec<Vec<u8>> {
        (row..row + h)
            .map(|r| {
                (col..col + w)
                    .map(|c| buffer.get(r, c).unwrap() as u8)
                    .collect()
            })
            .collect()
    }

    fn rows(glyph: Glyph) -> Vec<Vec<u8>> {
        glyph.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_render_afternoon() {
        let buffer = render_clock(time(15, 47, 0), false, false).unwrap();
        assert_eq!(block(&buffer, 2, 1, 5, 3), rows(DIGITS[0]));
        assert_eq!(block(&buffer, 2, 5, 5, 3), rows(DIGITS[3]));
        assert_eq!(block(&buffer, 2, 9, 5, 3), rows(COLON));
        assert_eq!(block(&buffer, 2, 13, 5, 3), rows(DIGITS[4]));
        assert_eq!(block(&buffer, 2, 17, 5, 3), rows(DIGITS[7]));
        assert_eq!(block(&buffer, 8, 18, 4, 3), rows(LETTER_P));
        assert_eq!(block(&buffer, 8, 22, 4, 5), rows(LETTER_M));

        // Nothing outside the glyph rows.
        for col in 0..28 {
            assert_eq!(buffer.get(0, col), Some(false));
            assert_eq!(buffer.get(13, col), Some(false));
        }
    }

    #[test]
    fn test_midnight_reads_twelve_am() {
        let buffer = render_clock(time(0, 5, 0), false, false).unwrap();
        assert_eq!(block(&buffer, 2, 1, 5, 3), rows(DIGITS[1]));
        assert_eq!(block(&buffer, 2, 5, 5, 3), rows(DIGITS[2]));
        assert_eq!(block(&buffer, 8, 18, 4, 3), rows(LETTER_A));
    }

    #[test]
    fn test_render_with_seconds() {
        let buffer = render_clock(time(9, 30, 58), true, false).unwrap();
        assert_eq!(block(&buffer, 2, 5, 5, 3), rows(DIGITS[9]));
        assert_eq!(block(&buffer, 2, 8, 5, 3), rows(COLON));
        assert_eq!(block(&buffer, 2, 11, 5, 3), rows(DIGITS[3]));
        assert_eq!(block(&buffer, 2, 15, 5, 3), rows(DIGITS[0]));
        assert_eq!(block(&buffer, 2, 20, 5, 3), rows(DIGITS[5]));
        assert_eq!(block(&buffer, 2, 24, 5, 3), rows(DIGITS[8]));
        assert_eq!(block(&buffer, 8, 18, 4, 3), rows(LETTER_A));
    }

    #[test]
    fn test_invert() {
        let plain = render_clock(time(12, 0, 0), false, false).unwrap();
        let inverted = render_clock(time(12, 0, 0), false, true).unwrap();
        assert_eq!(plain.count_set() + inverted.count_set(), 14 * 28);
        assert_eq!(inverted.get(0, 0), Some(true));
    }

    #[test]
    fn test_face_produces_dual_buffer() {
        let mut face = ClockFace::new(&ClockConfig::default());
        assert_eq!(face.interval(), Duration::from_secs(1));
        match face.next_frame().unwrap() {
            Frame::Pixels(buffer) => assert_eq!(buffer.rows(), 14),
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}
