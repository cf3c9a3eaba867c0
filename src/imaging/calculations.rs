//! Pure calculation functions for resize geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropWindow, InvalidGeometry, ResizeRequest};

/// Outcome of planning a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Source is not larger than the request and enlarging is disabled.
    Unchanged,
    /// Resample to `width × height`, then optionally crop.
    Resample {
        width: u32,
        height: u32,
        crop: Option<CropWindow>,
    },
}

/// Turn a resize request into target dimensions and an optional crop window.
///
/// - Width only: height follows the source ratio (or stays at source height
///   when `preserve_ratio` is off).
/// - Height only: the mirror case.
/// - Both, ratio preserved: scale to cover the box, then center-crop to it.
/// - Both, ratio not preserved: stretch to the box.
/// - Neither: identity.
///
/// With `enlarge_smaller` off, a source that is not larger than the request
/// on either axis yields [`ResizePlan::Unchanged`]. "Larger" is measured
/// against the requested box when both sides are given, against the computed
/// target otherwise.
///
/// # Examples
/// ```
/// # use simple_thumb::imaging::{plan_resize, ResizePlan, ResizeRequest};
/// // 100x100 → width 10 keeps the square ratio
/// assert_eq!(
///     plan_resize((100, 100), ResizeRequest::width(10), true, true).unwrap(),
///     ResizePlan::Resample { width: 10, height: 10, crop: None },
/// );
/// ```
pub fn plan_resize(
    source: (u32, u32),
    request: ResizeRequest,
    preserve_ratio: bool,
    enlarge_smaller: bool,
) -> Result<ResizePlan, InvalidGeometry> {
    let request = request.validate()?;
    let (src_w, src_h) = source;

    let (target_w, target_h, crop) = match (request.width, request.height) {
        (Some(w), None) if preserve_ratio => {
            let ratio = src_h as f64 / src_w as f64;
            (w as i64, round_dim(w as f64 * ratio), None)
        }
        (None, Some(h)) if preserve_ratio => {
            let ratio = src_w as f64 / src_h as f64;
            (round_dim(h as f64 * ratio), h as i64, None)
        }
        (Some(w), None) => (w as i64, src_h as i64, None),
        (None, Some(h)) => (src_w as i64, h as i64, None),
        (Some(w), Some(h)) if preserve_ratio => {
            let (cover_w, cover_h) = calculate_cover_dimensions(source, (w, h));
            let crop = center_crop((cover_w, cover_h), (w, h));
            (cover_w, cover_h, Some(crop))
        }
        (Some(w), Some(h)) => (w as i64, h as i64, None),
        (None, None) => (src_w as i64, src_h as i64, None),
    };

    if target_w <= 0 || target_h <= 0 || target_w > u32::MAX as i64 || target_h > u32::MAX as i64
    {
        return Err(InvalidGeometry {
            width: target_w,
            height: target_h,
        });
    }

    if !enlarge_smaller {
        let larger = match (request.width, request.height) {
            (Some(w), Some(h)) => src_w > w || src_h > h,
            _ => src_w as i64 > target_w || src_h as i64 > target_h,
        };
        if !larger {
            return Ok(ResizePlan::Unchanged);
        }
    }

    Ok(ResizePlan::Resample {
        width: target_w as u32,
        height: target_h as u32,
        crop,
    })
}

/// Calculate dimensions that completely cover a box (resize before crop).
///
/// The smaller of the two source/box divisors wins, so one side matches the
/// box exactly and the other meets or exceeds it.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Box to cover (width, height)
pub fn calculate_cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (i64, i64) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = target;

    let scale_w = src_w as f64 / box_w as f64;
    let scale_h = src_h as f64 / box_h as f64;
    let scale = scale_w.min(scale_h);

    (
        round_dim(src_w as f64 / scale),
        round_dim(src_h as f64 / scale),
    )
}

/// Window of size `target` centered in `scaled`, flooring odd excess.
pub fn center_crop(scaled: (i64, i64), target: (u32, u32)) -> CropWindow {
    let (box_w, box_h) = (target.0 as i64, target.1 as i64);
    let start_x = (scaled.0 - box_w).div_euclid(2);
    let start_y = (scaled.1 - box_h).div_euclid(2);
    CropWindow::new(start_x, start_y, start_x + box_w, start_y + box_h)
}

/// Round half-up to the nearest whole pixel.
fn round_dim(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
