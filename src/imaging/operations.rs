//! High-level image operations.
//!
//! These functions combine calculations with the pixel stages. Each one
//! borrows its input raster and returns a new owned raster, so a failed
//! stage never disturbs the caller's current image.

use super::calculations::{ResizePlan, plan_resize};
use super::color::BackgroundSpec;
use super::compositor::composite;
use super::crop::crop;
use super::params::{CropWindow, ImageKind, InvalidGeometry, ResizeRequest};
use super::raster::Raster;
use super::sharpen::sharpen;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, InvalidGeometry>;

/// Configuration for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConfig {
    pub preserve_ratio: bool,
    pub enlarge_smaller_images: bool,
    /// Fill for the freshly allocated canvas.
    pub background: BackgroundSpec,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            preserve_ratio: true,
            enlarge_smaller_images: true,
            background: BackgroundSpec::default(),
        }
    }
}

/// Resize `input` as requested.
///
/// Box requests with ratio preservation scale to cover the box and then
/// center-crop; the crop is a separate pass over the scaled canvas.
pub fn resize_stage(
    input: &Raster,
    request: ResizeRequest,
    config: &ResizeConfig,
    target: ImageKind,
) -> Result<Raster> {
    let plan = plan_resize(
        input.dimensions(),
        request,
        config.preserve_ratio,
        config.enlarge_smaller_images,
    )?;

    match plan {
        ResizePlan::Unchanged => {
            tracing::debug!(
                width = input.width(),
                height = input.height(),
                "source not larger than request, resize skipped"
            );
            Ok(input.clone())
        }
        ResizePlan::Resample {
            width,
            height,
            crop: window,
        } => {
            tracing::debug!(width, height, ?window, ?target, "resampling");
            let scaled = composite(input, width, height, config.background, target)?;
            match window {
                Some(window) => crop(&scaled, window, target),
                None => Ok(scaled),
            }
        }
    }
}

/// Crop `input` to `window`.
pub fn crop_stage(input: &Raster, window: CropWindow, target: ImageKind) -> Result<Raster> {
    tracing::debug!(?window, ?target, "cropping");
    crop(input, window, target)
}

/// Produce the pixels that get encoded: a sharpened copy when requested.
pub fn finish_stage(input: &Raster, sharpen_image: bool) -> Raster {
    let mut output = input.clone();
    if sharpen_image {
        sharpen(&mut output);
    }
    output
}
