//! Pipeline policy.
//!
//! A [`Policy`] holds the knobs that shape every resize, crop and save. It
//! can be built in code or loaded from a TOML file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! preserve_ratio = true          # Keep the aspect ratio when resizing
//! enlarge_smaller_images = true  # Resize images smaller than the request
//! sharpen_images = false         # Sharpen before saving (for thumbnails)
//! jpg_quality = 85               # JPEG quality (0-100)
//! file_mode = 0o755              # Permission bits set on saved files
//! background = "#ffffff"         # Resize fill: "#RGB", "#RRGGBB" or "transparent"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BackgroundSpec, Quality, ResizeConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Behaviour switches for an [`Image`](crate::pipeline::Image) pipeline.
///
/// All fields have defaults. Config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Keep the source aspect ratio; box requests cover and center-crop.
    pub preserve_ratio: bool,
    /// When false, sources not larger than the request are left untouched.
    pub enlarge_smaller_images: bool,
    /// Apply the sharpening kernel at save time.
    pub sharpen_images: bool,
    /// JPEG quality, 0-100.
    pub jpg_quality: u32,
    /// Unix permission bits applied to the saved file.
    pub file_mode: u32,
    /// Fill for resize canvases.
    pub background: BackgroundSpec,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            preserve_ratio: true,
            enlarge_smaller_images: true,
            sharpen_images: false,
            jpg_quality: 85,
            file_mode: 0o755,
            background: BackgroundSpec::default(),
        }
    }
}

impl Policy {
    /// Parse and validate a TOML policy.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let policy: Policy = toml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges that the type system does not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jpg_quality > 100 {
            return Err(ConfigError::Validation(format!(
                "jpg_quality must be 0-100, got {}",
                self.jpg_quality
            )));
        }
        if self.file_mode > 0o7777 {
            return Err(ConfigError::Validation(format!(
                "file_mode must be at most 0o7777, got {:#o}",
                self.file_mode
            )));
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.jpg_quality)
    }

    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            preserve_ratio: self.preserve_ratio,
            enlarge_smaller_images: self.enlarge_smaller_images,
            background: self.background,
        }
    }
}
