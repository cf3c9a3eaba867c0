//! Shared test utilities for the simple-thumb test suite.
//!
//! Provides synthetic rasters with easily predicted pixels and writers that
//! put real PNG, JPEG and GIF files on disk for the codec and pipeline tests.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("source.png");
//! write_png(&path, &gradient_raster(100, 100));
//! ```

use crate::imaging::Raster;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::borrow::Cow;
use std::path::Path;

// =========================================================================
// Synthetic rasters
// =========================================================================

/// Opaque raster where every pixel is distinct: R = x, G = y, B = x ^ y.
pub fn gradient_raster(width: u32, height: u32) -> Raster {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    });
    Raster::from_rgba(img).unwrap()
}

/// `size × size` raster split into four quadrants: TL, TR, BL, BR.
pub fn quadrant_raster(size: u32, colors: [[u8; 4]; 4]) -> Raster {
    let half = size / 2;
    let img = RgbaImage::from_fn(size, size, |x, y| {
        let idx = (x >= half) as usize + 2 * (y >= half) as usize;
        Rgba(colors[idx])
    });
    Raster::from_rgba(img).unwrap()
}

// =========================================================================
// Fixture writers
// =========================================================================

/// Write a raster losslessly as RGBA PNG.
pub fn write_png(path: &Path, raster: &Raster) {
    let file = std::fs::File::create(path).unwrap();
    image::codecs::png::PngEncoder::new(std::io::BufWriter::new(file))
        .write_image(
            raster.as_rgba().as_raw(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgba8,
        )
        .unwrap();
}

/// Write a small gradient JPEG with the given dimensions.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a `size × size` two-color GIF: left half red (index 0), right half
/// palette index 1 (green), which is marked transparent.
pub fn write_keyed_gif(path: &Path, size: u16) {
    let palette = [255, 0, 0, 0, 255, 0];
    let buffer: Vec<u8> = (0..size)
        .flat_map(|_| (0..size).map(move |x| (x >= size / 2) as u8))
        .collect();

    let mut file = std::fs::File::create(path).unwrap();
    let mut encoder = gif::Encoder::new(&mut file, size, size, &palette).unwrap();
    let frame = gif::Frame {
        width: size,
        height: size,
        buffer: Cow::Owned(buffer),
        transparent: Some(1),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame).unwrap();
}
