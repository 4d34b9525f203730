//! XY5 Flip-Disc Hardware Library
//!
//! Drives AlfaZeta XY5 flip-disc panels (7x28 bistable dots each) over a
//! serial link. Two stacked panels form the 14x28 display.

pub mod address;
pub mod error;
pub mod panel;

pub use address::PanelAddress;
pub use error::{Error, Result};
pub use panel::{
    open_serial_port, DriverConfig, FrameShape, PanelHalf, PixelBuffer, RefreshMode,
    Transmission, Xy5Driver,
};

/// Dots per column on a single panel.
pub const PANEL_ROWS: usize = 7;

/// Columns on a single panel.
pub const PANEL_COLUMNS: usize = 28;

/// Rows on the full two-panel display.
pub const DISPLAY_ROWS: usize = 2 * PANEL_ROWS;

/// Serial baud rate the panel controllers listen at.
pub const DEFAULT_BAUD_RATE: u32 = 57600;
