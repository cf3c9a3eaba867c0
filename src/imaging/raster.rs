//! In-memory pixel buffer.
//!
//! Every stage works on RGBA8 regardless of the source format, so resample,
//! crop and sharpen have a single code path. Format-specific concerns (JPEG
//! has no alpha, GIF has one transparent palette entry) are carried as
//! metadata and handled by the encoder.

use super::color::ColorRgb;
use super::params::InvalidGeometry;
use image::{Rgba, RgbaImage};

/// The transparent palette entry of an indexed (GIF) source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransparentKey {
    pub index: u8,
    pub color: ColorRgb,
}

/// Owned, non-empty RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
    alpha: bool,
    transparent: Option<TransparentKey>,
}

impl Raster {
    /// Allocate a `width × height` raster filled with `pixel`.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Result<Self, InvalidGeometry> {
        if width == 0 || height == 0 {
            return Err(InvalidGeometry {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(pixel)),
            alpha: pixel[3] != 255,
            transparent: None,
        })
    }

    /// Wrap a decoded buffer. Fails on a zero-sized image.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, InvalidGeometry> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(InvalidGeometry {
                width: pixels.width() as i64,
                height: pixels.height() as i64,
            });
        }
        let alpha = pixels.pixels().any(|p| p.0[3] != 255);
        Ok(Self {
            pixels,
            alpha,
            transparent: None,
        })
    }

    pub fn with_transparent_key(mut self, key: Option<TransparentKey>) -> Self {
        self.transparent = key;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Re-derive the alpha flag from the pixels after a stage rewrote them.
    pub fn refresh_alpha(&mut self) {
        self.alpha = self.pixels.pixels().any(|p| p.0[3] != 255);
    }

    /// Whether the alpha channel must survive encoding.
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    pub fn transparent_key(&self) -> Option<TransparentKey> {
        self.transparent
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(pixel));
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }
}
