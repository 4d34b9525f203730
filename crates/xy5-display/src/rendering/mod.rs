//! Rendering targets other than the serial port.

#![allow(dead_code)]

mod preview;

pub use preview::TerminalPreview;
