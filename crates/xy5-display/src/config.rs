//! Configuration management.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use xy5_hw::{DriverConfig, PanelAddress};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Serial link configuration
    #[serde(default)]
    pub serial: SerialConfig,

    /// Panel addresses
    #[serde(default)]
    pub panels: PanelsConfig,

    /// Clock face configuration
    #[serde(default)]
    pub clock: ClockConfig,

    /// Game of Life configuration
    #[serde(default)]
    pub life: LifeConfig,

    /// Scrolling text configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

/// Serial link configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Serial port path
    #[serde(default = "default_port")]
    pub port: String,

    /// Baud rate
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Write timeout in milliseconds
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud: default_baud(),
            write_timeout_ms: default_write_timeout(),
        }
    }
}

/// Dip switch addresses of the two panels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelsConfig {
    /// Top panel address (0-255)
    #[serde(default = "default_top")]
    pub top: u8,

    /// Bottom panel address (0-255)
    #[serde(default = "default_bottom")]
    pub bottom: u8,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            bottom: default_bottom(),
        }
    }
}

/// Clock face configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockConfig {
    /// Show seconds after the minutes
    #[serde(default)]
    pub show_seconds: bool,

    /// Dark digits on a lit background
    #[serde(default)]
    pub invert: bool,

    /// Repaint interval in milliseconds
    #[serde(default = "default_clock_interval")]
    pub interval_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            show_seconds: false,
            invert: false,
            interval_ms: default_clock_interval(),
        }
    }
}

/// Game of Life configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifeConfig {
    /// Step interval in milliseconds
    #[serde(default = "default_life_interval")]
    pub interval_ms: u64,

    /// Fraction of cells alive in a fresh seed (0.0-1.0)
    #[serde(default = "default_density")]
    pub density: f64,

    /// Generations before reseeding
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Fixed RNG seed, random if unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_life_interval(),
            density: default_density(),
            max_steps: default_max_steps(),
            seed: None,
        }
    }
}

/// Scrolling text configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrollConfig {
    /// Frame interval in milliseconds
    #[serde(default = "default_scroll_interval")]
    pub interval_ms: u64,

    /// Message on the top panel
    #[serde(default = "default_top_text")]
    pub top_text: String,

    /// Message on the bottom panel
    #[serde(default = "default_bottom_text")]
    pub bottom_text: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_scroll_interval(),
            top_text: default_top_text(),
            bottom_text: default_bottom_text(),
        }
    }
}

// Default value functions
fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> u32 {
    xy5_hw::DEFAULT_BAUD_RATE
}

fn default_write_timeout() -> u64 {
    1000
}

fn default_top() -> u8 {
    0
}

fn default_bottom() -> u8 {
    1
}

fn default_clock_interval() -> u64 {
    1000
}

fn default_life_interval() -> u64 {
    500
}

fn default_density() -> f64 {
    0.3
}

fn default_max_steps() -> u32 {
    100
}

fn default_scroll_interval() -> u64 {
    100
}

fn default_top_text() -> String {
    "Hello              ".to_string()
}

fn default_bottom_text() -> String {
    "                 World".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.life.density) {
            anyhow::bail!(
                "life.density must be between 0.0 and 1.0, got {}",
                self.life.density
            );
        }
        if self.life.max_steps == 0 {
            anyhow::bail!("life.max_steps must be at least 1");
        }
        if self.panels.top == self.panels.bottom {
            warn!(
                "panels.top and panels.bottom share address {}, both halves go to it",
                self.panels.top
            );
        }
        Ok(())
    }

    /// Driver settings for the configured link and panels.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            port: self.serial.port.clone(),
            baud_rate: self.serial.baud,
            top_address: PanelAddress(self.panels.top),
            bottom_address: PanelAddress(self.panels.bottom),
            write_timeout: Duration::from_millis(self.serial.write_timeout_ms),
        }
    }
}
