//! XY5 driver over a serial link.

use crate::{Error, PanelAddress, Result, DEFAULT_BAUD_RATE};
use std::io::Write;
use std::time::Duration;
use tokio_serial::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use super::framebuffer::{FrameShape, PanelHalf, PixelBuffer};
use super::protocol::{RefreshMode, Transmission};

/// Serial port used when nothing else is configured.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Connection settings, fixed for the lifetime of a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Serial port path.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Address of the top panel.
    pub top_address: PanelAddress,
    /// Address of the bottom panel.
    pub bottom_address: PanelAddress,
    /// How long a single write may block before failing.
    pub write_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            top_address: PanelAddress::TOP,
            bottom_address: PanelAddress::BOTTOM,
            write_timeout: Duration::from_secs(1),
        }
    }
}

/// Opens the serial port 8N1 at the configured baud rate.
pub fn open_serial_port(config: &DriverConfig) -> Result<Box<dyn SerialPort>> {
    let port = tokio_serial::new(&config.port, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(config.write_timeout)
        .open()
        .map_err(|source| {
            debug!("Failed to open {}: {}", config.port, source);
            Error::Connection {
                port: config.port.clone(),
                source,
            }
        })?;

    info!(
        "Serial port {} opened at {} baud",
        config.port, config.baud_rate
    );
    Ok(port)
}

/// Flip-disc display controller.
///
/// Owns the link exclusively. Two drivers writing to one port would
/// interleave bytes and break framing, so share a driver rather than the
/// port. The port is closed when the driver is dropped or closed.
pub struct Xy5Driver<L: Write = Box<dyn SerialPort>> {
    link: L,
    top_address: PanelAddress,
    bottom_address: PanelAddress,
}

impl Xy5Driver<Box<dyn SerialPort>> {
    /// Opens the configured serial port and blanks the display.
    pub fn open(config: &DriverConfig) -> Result<Self> {
        let port = open_serial_port(config)?;
        Self::new(port, config.top_address, config.bottom_address)
    }
}

impl<L: Write> Xy5Driver<L> {
    /// Wraps an open link and blanks both panels.
    pub fn new(link: L, top_address: PanelAddress, bottom_address: PanelAddress) -> Result<Self> {
        let mut driver = Self {
            link,
            top_address,
            bottom_address,
        };
        driver.clear()?;
        info!(
            "XY5 display ready (top={}, bottom={})",
            top_address, bottom_address
        );
        Ok(driver)
    }

    /// Returns the configured top panel address.
    pub fn top_address(&self) -> PanelAddress {
        self.top_address
    }

    /// Returns the configured bottom panel address.
    pub fn bottom_address(&self) -> PanelAddress {
        self.bottom_address
    }

    /// Returns the underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Consumes the driver, returning the link without closing it.
    pub fn into_inner(self) -> L {
        self.link
    }

    /// Writes bytes as-is. No framing checks are made.
    ///
    /// For callers that build their own transmissions, such as ones with a
    /// non-standard number of data bytes.
    pub fn send_raw_transmission(&mut self, bytes: &[u8]) -> Result<()> {
        debug!("Sending transmission: {:02X?}", bytes);
        self.link.write_all(bytes)?;
        self.link.flush()?;
        Ok(())
    }

    /// Serializes and sends one transmission.
    pub fn send_transmission(&mut self, transmission: &Transmission) -> Result<()> {
        self.send_raw_transmission(&transmission.to_bytes())
    }

    /// Paints a 7x28 buffer to one panel with data + refresh.
    pub fn paint_single_panel(
        &mut self,
        buffer: &PixelBuffer,
        address: PanelAddress,
    ) -> Result<()> {
        self.paint_single_panel_with_mode(buffer, address, RefreshMode::DataRefresh)
    }

    /// Paints a 7x28 buffer to one panel with an explicit mode.
    pub fn paint_single_panel_with_mode(
        &mut self,
        buffer: &PixelBuffer,
        address: PanelAddress,
        mode: RefreshMode,
    ) -> Result<()> {
        let transmission = Transmission::standard(mode, address, buffer)?;
        self.send_transmission(&transmission)
    }

    /// Paints a 14x28 buffer: rows 0-6 to `top`, then rows 7-13 to `bottom`.
    ///
    /// The two writes are independent. If the second one fails the top
    /// panel already shows the new frame.
    pub fn paint_dual_panel(
        &mut self,
        buffer: &PixelBuffer,
        top: PanelAddress,
        bottom: PanelAddress,
    ) -> Result<()> {
        if buffer.shape() != FrameShape::DualPanel {
            return Err(Error::Shape {
                rows: buffer.rows(),
                columns: buffer.columns(),
            });
        }

        let top_tx = Transmission::standard(
            RefreshMode::DataRefresh,
            top,
            &buffer.panel(PanelHalf::Top)?,
        )?;
        let bottom_tx = Transmission::standard(
            RefreshMode::DataRefresh,
            bottom,
            &buffer.panel(PanelHalf::Bottom)?,
        )?;

        self.send_transmission(&top_tx)?;
        self.send_transmission(&bottom_tx)
    }

    /// Paints a 14x28 buffer to the configured panels.
    pub fn paint(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.paint_dual_panel(buffer, self.top_address, self.bottom_address)
    }

    /// Flips every dot on both configured panels to hidden.
    pub fn clear(&mut self) -> Result<()> {
        self.paint(&PixelBuffer::dual_panel())
    }

    /// Asks a panel to re-flip what it already shows.
    pub fn refresh(&mut self, address: PanelAddress) -> Result<()> {
        self.send_transmission(&Transmission::refresh(address))
    }

    /// Flushes and releases the link.
    pub fn close(mut self) -> Result<()> {
        self.link.flush()?;
        info!("XY5 display link closed");
        Ok(())
    }
}
