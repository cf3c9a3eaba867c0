//! # Simple Thumb
//!
//! A small, predictable image pipeline for web thumbnails: load a JPEG, PNG
//! or GIF, resize and crop it, optionally sharpen, and save it in the format
//! the target path names.
//!
//! ```no_run
//! use simple_thumb::{Image, ResizeRequest};
//!
//! let mut img = Image::open("content/portrait.jpg")?;
//! img.resize(ResizeRequest::exact(400, 500))?
//!     .crop(0, 0, 400, 450)?;
//! img.save_as("dist/portrait-thumb.png")?;
//! # Ok::<(), simple_thumb::ImageError>(())
//! ```
//!
//! # Architecture: One Source, One Working Image
//!
//! ```text
//! load      path      →  source raster   (decoded once, never modified)
//! resize    working   →  working         (plan, composite, optional cover-crop)
//! crop      working   →  working         (1:1 copy onto a transparent canvas)
//! save      working   →  file            (sharpened copy, encoded by extension)
//! ```
//!
//! Every stage is a pure function from raster to raster, so the geometry and
//! pixel work can be unit tested without touching the filesystem. Only the
//! [`Codec`](imaging::Codec) reads and writes bytes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | The [`Image`] controller: validation, stage sequencing, save |
//! | [`config`] | [`Policy`] switches and their TOML form |
//! | [`imaging`] | Geometry planning, compositing, cropping, sharpening and codecs |
//!
//! # Design Decisions
//!
//! ## Cover, Never Letterbox
//!
//! A box request with ratio preservation scales the source until it covers
//! the box, then center-crops the overflow. Thumbnails always come out at the
//! exact requested size with no padding bars.
//!
//! ## Transparency Follows the Target Format
//!
//! New canvases are filled according to the format the image will be saved
//! as. PNG gets a fully transparent canvas, GIF reuses the source's
//! transparent palette entry, and JPEG gets the configured background. A
//! transparent background on a format that can't carry it becomes white.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and encoding use the `image` crate, with the `gif` crate for the
//! palette details `image` does not expose. No system libraries are needed.

pub mod config;
pub mod imaging;
pub mod pipeline;

pub use config::{ConfigError, Policy};
pub use imaging::{BackgroundSpec, ColorRgb, ImageKind, ResizeRequest};
pub use pipeline::{Image, ImageError, PipelineState};

#[cfg(test)]
pub(crate) mod test_helpers;
