//! Configuration management for Limit
//!
//! Loads the optional YAML configuration file. Every field has a default, so
//! an absent file or an empty document yields a working setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::paths::default_config_path;
use crate::theme::UiTheme;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub midi: MidiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// MIDI input and computed-message settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MidiConfig {
    /// Case-insensitive substring of the input port name; first port if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_port: Option<String>,
    /// Channel (1-16) for computed outgoing messages
    #[serde(default = "default_channel")]
    pub channel: u8,
    /// Velocity for computed note-on messages
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

/// Status panel geometry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_header_height")]
    pub header_height: i32,
    #[serde(default = "default_visualization_ratio")]
    pub visualization_ratio: f32,
    #[serde(default = "default_encoder_ratio")]
    pub encoder_ratio: f32,
}

fn default_channel() -> u8 {
    1
}

fn default_velocity() -> u8 {
    100
}

fn default_width() -> i32 {
    UiTheme::default().window_width
}

fn default_height() -> i32 {
    UiTheme::default().window_height
}

fn default_header_height() -> i32 {
    UiTheme::default().header_height
}

fn default_visualization_ratio() -> f32 {
    UiTheme::default().visualization_ratio
}

fn default_encoder_ratio() -> f32 {
    UiTheme::default().encoder_ratio
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            input_port: None,
            channel: default_channel(),
            velocity: default_velocity(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            header_height: default_header_height(),
            visualization_ratio: default_visualization_ratio(),
            encoder_ratio: default_encoder_ratio(),
        }
    }
}

impl MidiConfig {
    /// Zero-based channel for MIDI encoding
    pub fn channel_index(&self) -> u8 {
        self.channel.saturating_sub(1)
    }
}

impl UiConfig {
    /// Default theme with this configuration's geometry applied
    pub fn theme(&self) -> UiTheme {
        UiTheme {
            window_width: self.width,
            window_height: self.height,
            header_height: self.header_height,
            visualization_ratio: self.visualization_ratio,
            encoder_ratio: self.encoder_ratio,
            ..UiTheme::default()
        }
    }
}

impl AppConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let exists = fs::try_exists(path)
            .await
            .with_context(|| format!("Failed to access config file: {}", path.display()))?;
        if !exists {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path).await
    }

    /// Load the configuration for this run.
    ///
    /// A file named on the command line must exist. Without one, the default
    /// location is tried and may be absent.
    pub async fn load_selected(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => {
                info!("Configuration file: {}", path.display());
                Self::load(&path).await
            }
            None => {
                let path = default_config_path();
                info!("Configuration file: {}", path.display());
                Self::load_or_default(&path).await
            }
        }
    }

    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        if !(1..=16).contains(&self.midi.channel) {
            anyhow::bail!("MIDI channel must be 1-16, got {}", self.midi.channel);
        }
        if !(1..=127).contains(&self.midi.velocity) {
            anyhow::bail!("MIDI velocity must be 1-127, got {}", self.midi.velocity);
        }
        if let Some(port) = &self.midi.input_port {
            if port.trim().is_empty() {
                anyhow::bail!("MIDI input_port cannot be empty (omit it to use the first port)");
            }
        }

        let ui = &self.ui;
        if ui.width <= 0 || ui.height <= 0 {
            anyhow::bail!("UI size must be positive, got {}x{}", ui.width, ui.height);
        }
        if ui.header_height < 0 {
            anyhow::bail!("UI header_height cannot be negative");
        }
        for (name, ratio) in [
            ("visualization_ratio", ui.visualization_ratio),
            ("encoder_ratio", ui.encoder_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                anyhow::bail!("UI {} must be within 0.0-1.0, got {}", name, ratio);
            }
        }

        Ok(())
    }
}
