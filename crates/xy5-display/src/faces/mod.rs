//! Face system for the flip-disc display.
//!
//! A face produces one frame per tick. Most faces draw a 14x28 buffer;
//! the scroller already has column bytes and hands over finished
//! transmissions instead.

#![allow(dead_code)]

mod clock;
mod life;
mod scroll;

pub use clock::ClockFace;
pub use life::LifeFace;
pub use scroll::ScrollFace;

use std::io::Write;
use std::time::Duration;
use xy5_hw::{PixelBuffer, Transmission, Xy5Driver};

/// One tick's worth of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A 14x28 buffer for the configured panel pair.
    Pixels(PixelBuffer),
    /// Pre-built transmissions, sent verbatim in order.
    Transmissions(Vec<Transmission>),
}

impl Frame {
    /// Sends the frame through the driver.
    pub fn show<L: Write>(&self, driver: &mut Xy5Driver<L>) -> xy5_hw::Result<()> {
        match self {
            Frame::Pixels(buffer) => driver.paint(buffer),
            Frame::Transmissions(transmissions) => {
                for transmission in transmissions {
                    driver.send_raw_transmission(&transmission.to_bytes())?;
                }
                Ok(())
            }
        }
    }
}

/// Trait for display faces.
pub trait Face: Send {
    /// Returns the name of the face.
    fn name(&self) -> &str;

    /// Time to wait between frames.
    fn interval(&self) -> Duration;

    /// Produces the next frame.
    fn next_frame(&mut self) -> anyhow::Result<Frame>;
}
