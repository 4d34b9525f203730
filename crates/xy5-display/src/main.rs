//! XY5 Flip-Disc Control Tool
//!
//! Runs a clock, Game of Life or scrolling text on a 14x28 flip-disc
//! display, or pushes a single frame to it.

mod config;
mod faces;
mod rendering;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xy5_hw::{open_serial_port, PanelAddress, PixelBuffer, RefreshMode, Xy5Driver};

use config::Config;
use faces::{ClockFace, Face, LifeFace, ScrollFace};
use rendering::TerminalPreview;

/// Driver over whichever link was selected at startup.
type Display = Xy5Driver<Box<dyn Write + Send>>;

#[derive(Parser)]
#[command(name = "xy5ctl")]
#[command(about = "Control tool for AlfaZeta XY5 flip-disc displays")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port, overrides the configuration file
    #[arg(long)]
    port: Option<String>,

    /// Baud rate, overrides the configuration file
    #[arg(long)]
    baud: Option<u32>,

    /// Top panel address, overrides the configuration file
    #[arg(long)]
    top: Option<PanelAddress>,

    /// Bottom panel address, overrides the configuration file
    #[arg(long)]
    bottom: Option<PanelAddress>,

    /// Draw to the terminal instead of the serial port
    #[arg(long)]
    preview: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the time
    Clock {
        /// Show seconds
        #[arg(long)]
        seconds: bool,

        /// Dark digits on a lit background
        #[arg(long)]
        invert: bool,
    },
    /// Run Conway's Game of Life
    Life {
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Generations before reseeding
        #[arg(long)]
        max_steps: Option<u32>,

        /// Fraction of live cells in a new seed (0.0-1.0)
        #[arg(long)]
        density: Option<f64>,
    },
    /// Scroll a message on each panel
    Scroll {
        /// Top panel message
        top: Option<String>,

        /// Bottom panel message
        bottom: Option<String>,
    },
    /// Flip every dot to hidden
    Clear,
    /// Paint a bitmap file (7 or 14 lines of 28 `0`/`1` or `.`/`#`)
    Paint {
        /// Bitmap file
        file: PathBuf,

        /// Panel for a 7-line bitmap (default: top panel)
        #[arg(long)]
        address: Option<PanelAddress>,

        /// Refresh mode for a 7-line bitmap: data-refresh (default), data-no-refresh
        #[arg(long)]
        mode: Option<RefreshMode>,
    },
    /// Ask a panel to re-flip its current image
    Refresh {
        /// Panel address (default: broadcast)
        #[arg(long)]
        address: Option<PanelAddress>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the preview
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    if let Commands::Config = cli.command {
        print!(
            "{}",
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?
        );
        return Ok(());
    }

    let mut display = open_display(&config, cli.preview)?;

    let result = match cli.command {
        Commands::Clock { seconds, invert } => {
            let mut clock = config.clock.clone();
            clock.show_seconds |= seconds;
            clock.invert |= invert;
            run_face(&mut display, &mut ClockFace::new(&clock)).await
        }
        Commands::Life {
            seed,
            max_steps,
            density,
        } => {
            let mut life = config.life.clone();
            life.seed = seed.or(life.seed);
            life.max_steps = max_steps.unwrap_or(life.max_steps);
            life.density = density.unwrap_or(life.density);
            let mut checked = config.clone();
            checked.life = life;
            match checked.validate() {
                Ok(()) => run_face(&mut display, &mut LifeFace::new(&checked.life)).await,
                Err(e) => Err(e),
            }
        }
        Commands::Scroll { top, bottom } => {
            let mut scroll = config.scroll.clone();
            if let Some(text) = top {
                scroll.top_text = text;
            }
            if let Some(text) = bottom {
                scroll.bottom_text = text;
            }
            let mut face = ScrollFace::new(
                &scroll,
                display.top_address(),
                display.bottom_address(),
            );
            run_face(&mut display, &mut face).await
        }
        // Opening the display already blanked it.
        Commands::Clear => Ok(()),
        Commands::Paint {
            file,
            address,
            mode,
        } => paint_file(&mut display, &file, address, mode),
        Commands::Refresh { address } => display
            .refresh(address.unwrap_or(PanelAddress::BROADCAST))
            .context("Failed to send refresh"),
        // Printed before the display was opened.
        Commands::Config => Ok(()),
    };

    display.close().context("Failed to close display")?;
    result
}

/// Loads the configuration file, then applies command line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => Config::default(),
    };

    if let Some(port) = &cli.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud = baud;
    }
    if let Some(top) = cli.top {
        config.panels.top = top.byte();
    }
    if let Some(bottom) = cli.bottom {
        config.panels.bottom = bottom.byte();
    }
    config.validate()?;
    Ok(config)
}

/// Opens the serial link (or the terminal preview) and blanks the display.
fn open_display(config: &Config, preview: bool) -> Result<Display> {
    let driver_config = config.driver_config();
    let link: Box<dyn Write + Send> = if preview {
        info!("Previewing in the terminal");
        Box::new(TerminalPreview::new(std::io::stdout()))
    } else {
        Box::new(open_serial_port(&driver_config).context("Failed to open XY5 display")?)
    };

    Xy5Driver::new(
        link,
        driver_config.top_address,
        driver_config.bottom_address,
    )
    .context("Failed to blank display")
}

/// Paints one bitmap file.
fn paint_file(
    display: &mut Display,
    path: &Path,
    address: Option<PanelAddress>,
    mode: Option<RefreshMode>,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bitmap {}", path.display()))?;
    let buffer: PixelBuffer = text
        .parse()
        .with_context(|| format!("Invalid bitmap {}", path.display()))?;
    check_paint_options(&buffer, address, mode)?;

    if buffer.rows() == xy5_hw::PANEL_ROWS {
        let address = address.unwrap_or(display.top_address());
        display.paint_single_panel_with_mode(&buffer, address, mode.unwrap_or_default())?;
        info!("Painted {} to panel {}", path.display(), address);
    } else {
        display.paint(&buffer)?;
        info!("Painted {} to both panels", path.display());
    }
    Ok(())
}

/// Rejects `paint` options that would be ignored or produce a bad frame.
fn check_paint_options(
    buffer: &PixelBuffer,
    address: Option<PanelAddress>,
    mode: Option<RefreshMode>,
) -> Result<()> {
    if mode == Some(RefreshMode::RefreshOnly) {
        anyhow::bail!("refresh frames carry no data, use the refresh command instead");
    }
    if buffer.rows() != xy5_hw::PANEL_ROWS && (address.is_some() || mode.is_some()) {
        anyhow::bail!(
            "--address and --mode apply to 7-line bitmaps, {}-line bitmaps go to both panels",
            buffer.rows()
        );
    }
    Ok(())
}

/// Shows frames from a face until interrupted or a write fails.
async fn run_face(display: &mut Display, face: &mut dyn Face) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    info!("Running {} face every {:?}", face.name(), face.interval());

    loop {
        let frame = face
            .next_frame()
            .with_context(|| format!("Failed to render {} face", face.name()))?;
        frame
            .show(display)
            .with_context(|| format!("Failed to show {} frame", face.name()))?;

        tokio::select! {
            _ = tokio::time::sleep(face.interval()) => {}
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_options_single_panel() {
        let single = PixelBuffer::single_panel();
        assert!(check_paint_options(&single, None, None).is_ok());
        assert!(check_paint_options(
            &single,
            Some(PanelAddress(3)),
            Some(RefreshMode::DataNoRefresh)
        )
        .is_ok());
        assert!(check_paint_options(&single, None, Some(RefreshMode::RefreshOnly)).is_err());
    }

    #[test]
    fn test_paint_options_dual_panel() {
        let dual = PixelBuffer::dual_panel();
        assert!(check_paint_options(&dual, None, None).is_ok());
        assert!(check_paint_options(&dual, Some(PanelAddress(3)), None).is_err());
        assert!(check_paint_options(&dual, None, Some(RefreshMode::DataRefresh)).is_err());
    }
}
