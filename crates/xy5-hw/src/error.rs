//! Error types for the XY5 hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building frames or talking to the panels.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial port could not be opened.
    #[error("Failed to open serial port {port}: {source}")]
    Connection {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// Pixel buffer is neither 7x28 nor 14x28, or is the wrong one of the two.
    #[error("Invalid pixel buffer shape: {rows}x{columns}")]
    Shape { rows: usize, columns: usize },

    /// Pixel buffer holds something other than 0 or 1.
    #[error("Pixel at ({row}, {col}) is {value}, expected 0 or 1")]
    ValueDomain { row: usize, col: usize, value: u8 },

    /// Character in a text bitmap that is not a pixel.
    #[error("Invalid pixel character: {0:?}")]
    InvalidPixel(char),

    /// Pattern does not fit inside the destination buffer.
    #[error("Pattern {rows}x{columns} at ({row}, {col}) exceeds the buffer")]
    BlitOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    /// Serial I/O error.
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown refresh mode byte or name.
    #[error("Invalid refresh mode: {0:#04X}")]
    InvalidRefreshMode(u8),

    /// Panel address could not be parsed.
    #[error("Invalid panel address: {0}")]
    InvalidAddress(String),

    /// Bytes do not form a complete transmission.
    #[error("Malformed transmission: {0}")]
    MalformedTransmission(String),
}
