//! Terminal stand-in for the serial link.
//!
//! Decodes the transmissions a driver writes and draws the panels as text,
//! so faces can be watched without hardware attached.

use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::warn;
use xy5_hw::panel::{HEADER, PREAMBLE_SIZE, TERMINATOR};
use xy5_hw::{PixelBuffer, Transmission};

/// ANSI escape: cursor home, clear screen.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// A `Write` sink that renders XY5 transmissions.
pub struct TerminalPreview<W: Write> {
    out: W,
    pending: Vec<u8>,
    panels: BTreeMap<u8, PixelBuffer>,
    ansi: bool,
}

impl<W: Write> TerminalPreview<W> {
    /// Creates a preview that redraws in place using ANSI escapes.
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
            panels: BTreeMap::new(),
            ansi: true,
        }
    }

    /// Creates a preview that appends each redraw, no escapes.
    pub fn plain(out: W) -> Self {
        Self {
            ansi: false,
            ..Self::new(out)
        }
    }

    /// Returns the last image received per panel address.
    pub fn panels(&self) -> &BTreeMap<u8, PixelBuffer> {
        &self.panels
    }

    /// Returns the output sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Splits complete transmissions off the pending bytes.
    ///
    /// Framing starts at a header; the terminator is only looked for after
    /// the mode and address bytes, which may take any value.
    fn drain_transmissions(&mut self) -> io::Result<()> {
        loop {
            match self.pending.iter().position(|&b| b == HEADER) {
                Some(0) => {}
                Some(start) => {
                    let skipped: Vec<u8> = self.pending.drain(..start).collect();
                    warn!("Preview skipped {:02X?} before header", skipped);
                }
                None => {
                    if !self.pending.is_empty() {
                        warn!("Preview skipped {:02X?} without header", self.pending);
                        self.pending.clear();
                    }
                    return Ok(());
                }
            }

            let Some(offset) = self
                .pending
                .get(PREAMBLE_SIZE..)
                .and_then(|rest| rest.iter().position(|&b| b == TERMINATOR))
            else {
                return Ok(());
            };
            let end = PREAMBLE_SIZE + offset;

            let bytes: Vec<u8> = self.pending.drain(..=end).collect();
            match Transmission::parse(&bytes) {
                Ok(transmission) if transmission.data.is_empty() => {}
                Ok(transmission) => {
                    self.panels
                        .insert(transmission.address.byte(), transmission.to_panel());
                    self.render()?;
                }
                Err(e) => warn!("Preview dropped {:02X?}: {}", bytes, e),
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        if self.ansi {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        for (address, panel) in &self.panels {
            writeln!(self.out, "panel {}", address)?;
            write!(self.out, "{}", panel)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Write for TerminalPreview<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_transmissions()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
