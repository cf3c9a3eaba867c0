//! Rectangular crop.
//!
//! The window is copied 1:1 through the same [`resample`] primitive the
//! compositor uses. The canvas is allocated with a transparent background,
//! so any part of the window outside the source keeps the target format's
//! transparent (or white) default instead of an arbitrary fill color.

use super::color::{BackgroundSpec, Fill};
use super::compositor::{Region, allocate, resample};
use super::params::{CropWindow, ImageKind, InvalidGeometry};
use super::raster::Raster;

/// Extract `window` from `source` into a new raster of exactly the window size.
pub fn crop(
    source: &Raster,
    window: CropWindow,
    target: ImageKind,
) -> Result<Raster, InvalidGeometry> {
    let (width, height) = window.size()?;
    let fill = Fill::resolve(
        BackgroundSpec::Transparent,
        target,
        source.transparent_key(),
    );
    let mut canvas = allocate(width, height, fill)?;
    resample(
        &mut canvas,
        Region::new(0, 0, width, height),
        source,
        Region::new(window.start_x, window.start_y, width, height),
        fill.blends(),
    );
    canvas.refresh_alpha();
    Ok(canvas)
}
