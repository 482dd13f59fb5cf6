//! Configuration for rendering and export.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock behaviour: a 1280x720 viewport and a 2x capture saved as
//! `english-literature-practical-benefits.pdf` in the working directory.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the exported document
pub const DEFAULT_FILE_NAME: &str = "english-literature-practical-benefits.pdf";

/// Upscaling factor applied to every capture
pub const DEFAULT_CAPTURE_SCALE: u32 = 2;

const MAX_CAPTURE_SCALE: u32 = 8;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dimensions of the rendering surface
    pub viewport: Viewport,
    /// Export routine settings
    pub export: ExportConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| Error::ConfigError(format!("Malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::ConfigError("viewport dimensions must be non-zero".into()));
        }
        if self.export.scale == 0 || self.export.scale > MAX_CAPTURE_SCALE {
            return Err(Error::ConfigError(format!(
                "capture scale must be between 1 and {}, got {}",
                MAX_CAPTURE_SCALE, self.export.scale
            )));
        }
        let file_name = &self.export.file_name;
        if file_name.trim().is_empty() {
            return Err(Error::ConfigError("export file name must not be empty".into()));
        }
        if file_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::ConfigError(format!(
                "export file name '{}' must not contain a path separator",
                file_name
            )));
        }
        if self.export.capture_timeout_ms == Some(0) {
            return Err(Error::ConfigError("capture timeout must be at least 1ms".into()));
        }
        Ok(())
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Settings consumed by the export routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name the saved document is given
    pub file_name: String,
    /// Directory the document is saved into
    pub output_dir: PathBuf,
    /// Capture upscaling factor
    pub scale: u32,
    /// Opaque colour painted behind every capture
    pub background: Rgb,
    /// Upper bound for a single capture; `None` waits indefinitely
    pub capture_timeout_ms: Option<u64>,
    /// Title written to the document info dictionary
    pub document_title: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            output_dir: PathBuf::from("."),
            scale: DEFAULT_CAPTURE_SCALE,
            background: Rgb::WHITE,
            capture_timeout_ms: None,
            document_title: Some(crate::slides::DECK.kicker.to_string()),
        }
    }
}

/// An opaque sRGB colour, serialised as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#').filter(|h| h.is_ascii())?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Rgb::parse_hex(value.trim()).ok_or_else(|| format!("invalid colour '{}'", value))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}
