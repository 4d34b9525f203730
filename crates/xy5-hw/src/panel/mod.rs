//! Flip-disc panel module.
//!
//! Frame buffers, the XY5 wire protocol and the serial driver.

mod device;

pub mod framebuffer;
pub mod protocol;

pub use device::{open_serial_port, DriverConfig, Xy5Driver};
pub use framebuffer::{FrameShape, PanelHalf, PixelBuffer};
pub use protocol::{
    decode_column, encode_panel, pack_column, RefreshMode, Transmission, HEADER,
    PREAMBLE_SIZE, STANDARD_FRAME_LEN, TERMINATOR,
};
