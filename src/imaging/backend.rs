//! Codec boundary: decoding files into rasters and encoding them back.
//!
//! The [`Codec`] trait is the only place the pipeline touches image bytes.
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image`
//! crate. Tests swap in a recording mock so the pipeline logic can be
//! exercised without encoding anything.

use super::params::{ImageKind, Quality};
use super::raster::Raster;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of a decode: the pixels plus the format they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub raster: Raster,
    pub kind: ImageKind,
}

/// Trait for codec backends.
///
/// `decode` must surface the transparent palette entry of GIF sources on
/// the returned raster. `encode` writes `raster` to `path` as `kind`;
/// `quality` only matters for JPEG.
pub trait Codec: Sync {
    fn decode(&self, path: &Path) -> Result<Decoded, CodecError>;

    fn encode(
        &self,
        raster: &Raster,
        kind: ImageKind,
        path: &Path,
        quality: Quality,
    ) -> Result<(), CodecError>;
}
