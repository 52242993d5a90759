use crate::session::{Document, DEFAULT_BODY, DEFAULT_TITLE};
use crate::surface::MAX_SURFACE_DIMENSION;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SigningConfig {
    /// Document offered for signing when none is given on the command line.
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_body")]
    pub body: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            body: default_body(),
        }
    }
}

impl DocumentConfig {
    pub fn to_document(&self) -> Document {
        Document::new(self.title.clone(), self.body.clone())
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_body() -> String {
    DEFAULT_BODY.to_string()
}

/// Geometry and pen settings of the signature surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Fixed drawable height. Default: 200
    #[serde(default = "default_surface_height")]
    pub height: u32,
    /// Pen width in surface units. Default: 2
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            height: default_surface_height(),
            stroke_width: default_stroke_width(),
        }
    }
}

fn default_surface_height() -> u32 {
    200
}

fn default_stroke_width() -> f32 {
    2.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    /// Prefix of the signing link; the session id is appended.
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
    /// Simulate an unreachable counterpart: every share attempt fails.
    #[serde(default)]
    pub offline: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
            offline: false,
        }
    }
}

fn default_share_base_url() -> String {
    "https://sign.example.com/s/".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiptConfig {
    /// `chrono` format string for the session creation time shown on the
    /// receipt.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_timestamp_format() -> String {
    "%Y. %-m. %-d. %p %-I:%M:%S".to_string()
}

impl SigningConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        const DEFAULT_CONFIG_YAML: &str = include_str!("../signdesk.yaml");

        serde_yaml::from_str(DEFAULT_CONFIG_YAML)
            .expect("Failed to parse embedded signdesk.yaml - this is a bug in the signdesk.yaml file")
    }

    fn validate(&self) -> Result<()> {
        if self.surface.height == 0 {
            anyhow::bail!("surface.height must be greater than zero");
        }

        if self.surface.height > MAX_SURFACE_DIMENSION {
            anyhow::bail!(
                "surface.height must be at most {}, got {}",
                MAX_SURFACE_DIMENSION,
                self.surface.height
            );
        }

        if !(self.surface.stroke_width.is_finite() && self.surface.stroke_width > 0.0) {
            anyhow::bail!(
                "surface.stroke_width must be a positive number, got {}",
                self.surface.stroke_width
            );
        }

        if self.share.base_url.trim().is_empty() {
            anyhow::bail!("share.base_url must not be empty");
        }

        if self.receipt.timestamp_format.trim().is_empty() {
            anyhow::bail!("receipt.timestamp_format must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
