//! Fixed 3×3 sharpening convolution.
//!
//! The kernel is normalised by the sum of its weights, so flat areas are
//! left unchanged and only edges are boosted. Neighbours past the border
//! are sampled from the nearest edge pixel. Alpha is never touched.

use super::raster::Raster;

const KERNEL: [[f64; 3]; 3] = [[-1.2, -1.0, -1.2], [-1.0, 20.0, -1.0], [-1.2, -1.0, -1.2]];
const OFFSET: f64 = 0.0;

fn divisor() -> f64 {
    KERNEL.iter().flatten().sum()
}

/// Sharpen every color channel of `raster` in place.
pub fn sharpen(raster: &mut Raster) {
    let source = raster.as_rgba().clone();
    let (width, height) = source.dimensions();
    let divisor = divisor();
    let clamp_x = |x: i64| x.clamp(0, width as i64 - 1) as u32;
    let clamp_y = |y: i64| y.clamp(0, height as i64 - 1) as u32;

    let canvas = raster.as_rgba_mut();
    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f64; 3];
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let sx = clamp_x(x as i64 + kx as i64 - 1);
                    let sy = clamp_y(y as i64 + ky as i64 - 1);
                    let p = source.get_pixel(sx, sy).0;
                    for c in 0..3 {
                        sum[c] += weight * p[c] as f64;
                    }
                }
            }

            let out = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                out.0[c] = (sum[c] / divisor + OFFSET).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_raster;

    #[test]
    fn divisor_is_weight_sum() {
        assert!((divisor() - 11.2).abs() < 1e-9);
    }

    #[test]
    fn flat_image_is_unchanged() {
        let mut raster = Raster::filled(5, 4, [90, 140, 210, 255]).unwrap();
        let before = raster.clone();
        sharpen(&mut raster);
        assert_eq!(raster, before);
    }

    #[test]
    fn boosts_center_of_bright_spot() {
        let mut raster = Raster::filled(3, 3, [50, 50, 50, 255]).unwrap();
        raster.put_pixel(1, 1, [100, 100, 100, 255]);
        sharpen(&mut raster);
        // (20 * 100 - 8.8 * 50) / 11.2 = 139.29
        assert_eq!(raster.pixel(1, 1), [139, 139, 139, 255]);
        // corner, edge-clamped: (1000 - 180 - 200 - 120) / 11.2 = 44.64
        assert_eq!(raster.pixel(0, 0), [45, 45, 45, 255]);
    }

    #[test]
    fn clamps_to_channel_range() {
        let mut raster = Raster::filled(3, 3, [0, 0, 0, 255]).unwrap();
        raster.put_pixel(1, 1, [255, 255, 255, 255]);
        sharpen(&mut raster);
        assert_eq!(raster.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(raster.pixel(0, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn single_pixel_uses_itself_as_neighbours() {
        let mut raster = Raster::filled(1, 1, [33, 66, 99, 255]).unwrap();
        sharpen(&mut raster);
        assert_eq!(raster.pixel(0, 0), [33, 66, 99, 255]);
    }

    #[test]
    fn alpha_is_untouched() {
        let mut raster = gradient_raster(6, 6);
        raster.put_pixel(2, 2, [255, 0, 0, 17]);
        raster.put_pixel(4, 1, [0, 0, 0, 0]);
        let before = raster.clone();
        sharpen(&mut raster);
        for (a, b) in raster.as_rgba().pixels().zip(before.as_rgba().pixels()) {
            assert_eq!(a.0[3], b.0[3]);
        }
    }

    #[test]
    fn channels_are_independent() {
        let mut raster = Raster::filled(3, 3, [50, 0, 200, 255]).unwrap();
        raster.put_pixel(1, 1, [100, 0, 200, 255]);
        sharpen(&mut raster);
        assert_eq!(raster.pixel(1, 1), [139, 0, 200, 255]);
    }
}
