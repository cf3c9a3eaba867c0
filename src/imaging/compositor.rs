//! Canvas allocation and area-weighted resampling.
//!
//! [`composite`] allocates the output canvas, fills it according to the
//! resolved [`Fill`], and resamples the whole source into it. The same
//! [`resample`] primitive backs the cropper, where it runs at 1:1 scale.
//!
//! ## Resampling
//!
//! Each destination pixel maps to a rectangular footprint in the source.
//! Every source pixel overlapping that footprint contributes in proportion
//! to the overlapping area. This averages correctly when shrinking and
//! degrades to smooth replication when enlarging. Color is averaged
//! alpha-weighted so fully transparent pixels do not darken their
//! neighbours. Footprints that fall outside the source contribute nothing,
//! and destination pixels with no contribution keep the fill.

use super::color::{BackgroundSpec, Fill};
use super::params::{ImageKind, InvalidGeometry};
use super::raster::Raster;

/// Axis-aligned rectangle in pixel units. The origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full extent of a raster.
    pub fn of(raster: &Raster) -> Self {
        Self::new(0, 0, raster.width(), raster.height())
    }
}

/// Allocate a new canvas and resample `source` into it at `width × height`.
pub fn composite(
    source: &Raster,
    width: u32,
    height: u32,
    background: BackgroundSpec,
    target: ImageKind,
) -> Result<Raster, InvalidGeometry> {
    let fill = Fill::resolve(background, target, source.transparent_key());
    let mut canvas = allocate(width, height, fill)?;
    let dst = Region::of(&canvas);
    resample(&mut canvas, dst, source, Region::of(source), fill.blends());
    canvas.refresh_alpha();
    Ok(canvas)
}

/// Allocate a canvas pre-filled for the given fill.
pub fn allocate(width: u32, height: u32, fill: Fill) -> Result<Raster, InvalidGeometry> {
    let canvas = Raster::filled(width, height, fill.pixel())?;
    Ok(match fill {
        Fill::Keyed(key) => canvas.with_transparent_key(Some(key)),
        Fill::Solid(_) | Fill::Clear => canvas,
    })
}

/// Source pixels contributing to one destination column or row.
struct Taps {
    dst: u32,
    taps: Vec<(u32, f64)>,
}

/// Compute per-axis contributions for mapping `src_len` source pixels
/// starting at `src_start` onto `dst_len` destination pixels starting at
/// `dst_start`. Indices outside `[0, dst_limit)` / `[0, src_limit)` are dropped.
fn axis_taps(
    dst_start: i64,
    dst_len: u32,
    dst_limit: u32,
    src_start: i64,
    src_len: u32,
    src_limit: u32,
) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    let mut out = Vec::with_capacity(dst_len as usize);

    for i in 0..dst_len as i64 {
        let d = dst_start + i;
        if d < 0 || d >= dst_limit as i64 {
            continue;
        }

        let lo = src_start as f64 + i as f64 * scale;
        let hi = lo + scale;
        let first = (lo.floor() as i64).max(0);
        let last = (hi.ceil() as i64).min(src_limit as i64);

        let taps: Vec<(u32, f64)> = (first..last)
            .filter_map(|s| {
                let overlap = hi.min((s + 1) as f64) - lo.max(s as f64);
                (overlap > 0.0).then_some((s as u32, overlap))
            })
            .collect();

        if !taps.is_empty() {
            out.push(Taps { dst: d as u32, taps });
        }
    }

    out
}

/// Resample `src_region` of `src` into `dst_region` of `dst`.
///
/// With `blend` the averaged pixel is composited over the existing canvas
/// pixel; without it the averaged pixel replaces it, alpha included.
pub fn resample(dst: &mut Raster, dst_region: Region, src: &Raster, src_region: Region, blend: bool) {
    if dst_region.width == 0 || dst_region.height == 0 {
        return;
    }

    let columns = axis_taps(
        dst_region.x,
        dst_region.width,
        dst.width(),
        src_region.x,
        src_region.width,
        src.width(),
    );
    let rows = axis_taps(
        dst_region.y,
        dst_region.height,
        dst.height(),
        src_region.y,
        src_region.height,
        src.height(),
    );

    let source = src.as_rgba();
    let canvas = dst.as_rgba_mut();

    for row in &rows {
        for col in &columns {
            let mut weight = 0.0;
            let mut alpha = 0.0;
            let mut premul = [0.0f64; 3];
            let mut plain = [0.0f64; 3];

            for &(sy, wy) in &row.taps {
                for &(sx, wx) in &col.taps {
                    let w = wx * wy;
                    let p = source.get_pixel(sx, sy).0;
                    let a = p[3] as f64;
                    weight += w;
                    alpha += w * a;
                    for c in 0..3 {
                        premul[c] += w * a * p[c] as f64;
                        plain[c] += w * p[c] as f64;
                    }
                }
            }

            let mut color = [0.0f64; 4];
            for c in 0..3 {
                color[c] = if alpha > 0.0 {
                    premul[c] / alpha
                } else {
                    plain[c] / weight
                };
            }
            color[3] = alpha / weight;

            let out = canvas.get_pixel_mut(col.dst, row.dst);
            out.0 = if blend {
                over(color, out.0)
            } else {
                color.map(to_channel)
            };
        }
    }
}

/// Composite `top` (unpremultiplied, 0–255 floats) over `bottom`.
fn over(top: [f64; 4], bottom: [u8; 4]) -> [u8; 4] {
    let a = top[3] / 255.0;
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = to_channel(top[c] * a + bottom[c] as f64 * (1.0 - a));
    }
    out[3] = to_channel(top[3] + bottom[3] as f64 * (1.0 - a));
    out
}

fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::color::ColorRgb;
    use crate::imaging::raster::TransparentKey;
    use crate::test_helpers::{gradient_raster, quadrant_raster};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn white() -> BackgroundSpec {
        BackgroundSpec::Opaque(ColorRgb::WHITE)
    }

    #[test]
    fn output_has_requested_size() {
        let src = gradient_raster(40, 30);
        let out = composite(&src, 17, 9, white(), ImageKind::Jpeg).unwrap();
        assert_eq!(out.dimensions(), (17, 9));
    }

    #[test]
    fn zero_size_is_rejected() {
        let src = gradient_raster(4, 4);
        assert!(composite(&src, 0, 4, white(), ImageKind::Png).is_err());
    }

    #[test]
    fn same_size_is_pixel_identical() {
        let src = gradient_raster(23, 11);
        let out = composite(&src, 23, 11, white(), ImageKind::Png).unwrap();
        assert_eq!(out.as_rgba(), src.as_rgba());
    }

    #[test]
    fn halving_averages_blocks_exactly() {
        let src = quadrant_raster(4, [RED, GREEN, BLUE, BLACK]);
        let out = composite(&src, 2, 2, white(), ImageKind::Png).unwrap();
        assert_eq!(out.pixel(0, 0), RED);
        assert_eq!(out.pixel(1, 0), GREEN);
        assert_eq!(out.pixel(0, 1), BLUE);
        assert_eq!(out.pixel(1, 1), BLACK);
    }

    #[test]
    fn shrinking_averages_neighbours() {
        let mut src = Raster::filled(2, 1, BLACK).unwrap();
        src.put_pixel(1, 0, [255, 255, 255, 255]);
        let out = composite(&src, 1, 1, white(), ImageKind::Png).unwrap();
        assert_eq!(out.pixel(0, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn non_integer_ratio_weights_by_area() {
        // 3 source columns onto 2: middle column is split half/half.
        let mut src = Raster::filled(3, 1, BLACK).unwrap();
        src.put_pixel(1, 0, [90, 90, 90, 255]);
        src.put_pixel(2, 0, [150, 150, 150, 255]);
        let out = composite(&src, 2, 1, white(), ImageKind::Png).unwrap();
        // (0 * 1.0 + 90 * 0.5) / 1.5 = 30; (90 * 0.5 + 150 * 1.0) / 1.5 = 130
        assert_eq!(out.pixel(0, 0), [30, 30, 30, 255]);
        assert_eq!(out.pixel(1, 0), [130, 130, 130, 255]);
    }

    #[test]
    fn enlarging_replicates_flat_color() {
        let src = Raster::filled(1, 1, BLUE).unwrap();
        let out = composite(&src, 5, 3, white(), ImageKind::Png).unwrap();
        assert!(out.as_rgba().pixels().all(|p| p.0 == BLUE));
    }

    #[test]
    fn solid_background_shows_through_transparency() {
        let src = Raster::filled(2, 2, [10, 20, 30, 0]).unwrap();
        let red = BackgroundSpec::Opaque(ColorRgb::new(255, 0, 0));
        let out = composite(&src, 2, 2, red, ImageKind::Png).unwrap();
        assert_eq!(out.pixel(0, 0), RED);
        assert!(!out.has_alpha());
    }

    #[test]
    fn half_transparent_pixel_blends_with_background() {
        let src = Raster::filled(1, 1, [0, 0, 0, 51]).unwrap();
        let out = composite(&src, 1, 1, white(), ImageKind::Jpeg).unwrap();
        // 0 * 0.2 + 255 * 0.8 = 204
        assert_eq!(out.pixel(0, 0), [204, 204, 204, 255]);
    }

    #[test]
    fn transparent_png_keeps_alpha() {
        let src = Raster::filled(4, 4, [10, 20, 30, 0]).unwrap();
        let out = composite(&src, 2, 2, BackgroundSpec::Transparent, ImageKind::Png).unwrap();
        assert!(out.has_alpha());
        assert_eq!(out.pixel(1, 1), [10, 20, 30, 0]);
    }

    #[test]
    fn transparent_gif_carries_source_key() {
        let key = TransparentKey {
            index: 0,
            color: ColorRgb::new(0, 255, 0),
        };
        let src = Raster::filled(4, 4, RED)
            .unwrap()
            .with_transparent_key(Some(key));
        let out = composite(&src, 2, 2, BackgroundSpec::Transparent, ImageKind::Gif).unwrap();
        assert_eq!(out.transparent_key(), Some(key));
        assert_eq!(out.pixel(0, 0), RED);
    }

    #[test]
    fn transparent_gif_without_key_is_white() {
        let src = Raster::filled(2, 2, [0, 0, 0, 0]).unwrap();
        let out = composite(&src, 2, 2, BackgroundSpec::Transparent, ImageKind::Gif).unwrap();
        assert_eq!(out.transparent_key(), None);
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn transparent_pixels_do_not_darken_average() {
        let mut src = Raster::filled(2, 1, [0, 0, 0, 0]).unwrap();
        src.put_pixel(1, 0, [200, 100, 50, 255]);
        let out = composite(&src, 1, 1, BackgroundSpec::Transparent, ImageKind::Png).unwrap();
        assert_eq!(out.pixel(0, 0), [200, 100, 50, 128]);
    }

    #[test]
    fn resample_outside_source_keeps_fill() {
        let src = Raster::filled(2, 2, RED).unwrap();
        let mut dst = allocate(4, 4, Fill::Solid(ColorRgb::WHITE)).unwrap();
        resample(&mut dst, Region::new(0, 0, 4, 4), &src, Region::new(-2, -2, 4, 4), true);
        assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(dst.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(dst.pixel(2, 2), RED);
        assert_eq!(dst.pixel(3, 3), RED);
    }
}
