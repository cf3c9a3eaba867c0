//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`pipeline`](crate::pipeline) controller (which
//! decides what the caller asked for) and the pixel stages in
//! [`operations`](super::operations).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (0–100, default 85). Clamped on construction.
//! - [`ImageKind`]: The three raster formats the pipeline reads and writes.
//! - [`ResizeRequest`]: Requested width and/or height; a missing side is derived.
//! - [`CropWindow`]: Half-open crop rectangle in source pixel coordinates.
//! - [`InvalidGeometry`]: Error for any non-positive width or height.

use std::path::Path;
use thiserror::Error;

/// A computed or requested size with a zero or negative side.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid geometry: {width}x{height}")]
pub struct InvalidGeometry {
    pub width: i64,
    pub height: i64,
}

/// Quality setting for lossy JPEG encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Raster formats understood by the decode and encode collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Gif,
    Jpeg,
    Png,
}

impl ImageKind {
    /// Map a file extension (case-insensitive, without the dot) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "gif" => Some(Self::Gif),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Kind implied by a path's extension, if it has a recognised one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the format stores a full alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, Self::Png)
    }
}

/// Requested output size. `None` on a side means "derive it from the other".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeRequest {
    /// Request only a width; the height follows the source.
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Request only a height; the width follows the source.
    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    /// Request an exact box.
    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Reject explicit zero sides. Absent sides are fine.
    pub fn validate(self) -> Result<Self, InvalidGeometry> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(InvalidGeometry {
                width: self.width.unwrap_or(0) as i64,
                height: self.height.unwrap_or(0) as i64,
            });
        }
        Ok(self)
    }
}

/// Half-open rectangle `[start_x, end_x) × [start_y, end_y)`.
///
/// Coordinates are signed: a window may reach past the source edges, in
/// which case the uncovered area keeps the background fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
}

impl CropWindow {
    pub fn new(start_x: i64, start_y: i64, end_x: i64, end_y: i64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Signed width, saturating at the `i64` range.
    pub fn width(&self) -> i64 {
        self.end_x.saturating_sub(self.start_x)
    }

    pub fn height(&self) -> i64 {
        self.end_y.saturating_sub(self.start_y)
    }

    /// Output size of the window, or an error if either side is non-positive.
    pub fn size(&self) -> Result<(u32, u32), InvalidGeometry> {
        let (w, h) = (self.width(), self.height());
        if w <= 0 || h <= 0 || w > u32::MAX as i64 || h > u32::MAX as i64 {
            return Err(InvalidGeometry {
                width: w,
                height: h,
            });
        }
        Ok((w as u32, h as u32))
    }
}
