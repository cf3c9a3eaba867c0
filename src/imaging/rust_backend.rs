//! Pure Rust codec with no system library dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::ImageReader::with_guessed_format` (magic bytes) |
//! | Decode (JPEG, PNG, GIF) | `image` crate decoders, converted to RGBA8 |
//! | GIF transparent entry | `gif::Decoder` first frame + palette |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA when alpha is present) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, alpha flattened onto white |
//! | Encode → GIF | `gif::Encoder`, transparent entry placed at the source key's index |

use super::backend::{Codec, CodecError, Decoded};
use super::color::ColorRgb;
use super::params::{ImageKind, Quality};
use super::raster::{Raster, TransparentKey};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Pure Rust codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the transparent palette entry of a GIF's first frame, if it has one.
fn read_gif_key(path: &Path) -> Result<Option<TransparentKey>, CodecError> {
    let decode_err =
        |e: gif::DecodingError| CodecError::Decode(format!("Failed to read GIF {}: {e}", path.display()));

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(BufReader::new(File::open(path)?))
        .map_err(decode_err)?;

    let global = decoder.global_palette().map(<[u8]>::to_vec);
    let Some(frame) = decoder.read_next_frame().map_err(decode_err)? else {
        return Ok(None);
    };
    let Some(index) = frame.transparent else {
        return Ok(None);
    };

    let start = index as usize * 3;
    let palette = frame.palette.as_deref().or(global.as_deref());
    Ok(palette
        .and_then(|p| p.get(start..start + 3))
        .map(|rgb| TransparentKey {
            index,
            color: ColorRgb::new(rgb[0], rgb[1], rgb[2]),
        }))
}

/// Composite every pixel over white and drop the alpha channel.
fn flatten_onto_white(raster: &Raster) -> RgbImage {
    let rgba = raster.as_rgba();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y).0;
        let a = p[3] as f64 / 255.0;
        let mix = |c: u8| (c as f64 * a + 255.0 * (1.0 - a)).round() as u8;
        image::Rgb([mix(p[0]), mix(p[1]), mix(p[2])])
    })
}

/// Build an indexed GIF frame from `raster`.
///
/// GIF transparency is binary: anything under half opacity becomes the one
/// transparent palette entry. When the raster carries a source key, that
/// entry takes the key's color and sits at the key's palette index.
fn gif_frame(raster: &Raster) -> Result<gif::Frame<'static>, CodecError> {
    let (width, height) = raster.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(CodecError::Encode(format!(
            "{width}x{height} exceeds the GIF size limit"
        )));
    };

    let key = raster.transparent_key();
    let clear = key.map_or([0, 0, 0, 0], |k| [k.color.r, k.color.g, k.color.b, 0]);
    let mut data = raster.as_rgba().as_raw().clone();
    for px in data.chunks_exact_mut(4) {
        if px[3] < 128 {
            px.copy_from_slice(&clear);
        } else {
            px[3] = 255;
        }
    }

    let mut frame = gif::Frame::from_rgba_speed(w, h, &mut data, 10);
    if let (Some(key), Some(current)) = (key, frame.transparent) {
        place_transparent_entry(&mut frame, current, key);
    }
    Ok(frame)
}

/// Move the transparent entry from `current` to `key.index`, swapping
/// whatever was there, and give it the key's color.
fn place_transparent_entry(frame: &mut gif::Frame<'_>, current: u8, key: TransparentKey) {
    let Some(palette) = frame.palette.as_mut() else {
        return;
    };
    let (from, to) = (current as usize * 3, key.index as usize * 3);
    if palette.len() < to + 3 {
        palette.resize(to + 3, 0);
    }
    for c in 0..3 {
        palette.swap(from + c, to + c);
    }
    palette[to..to + 3].copy_from_slice(&[key.color.r, key.color.g, key.color.b]);

    if current != key.index {
        for idx in frame.buffer.to_mut().iter_mut() {
            if *idx == current {
                *idx = key.index;
            } else if *idx == key.index {
                *idx = current;
            }
        }
    }
    frame.transparent = Some(key.index);
}

impl Codec for RustCodec {
    fn decode(&self, path: &Path) -> Result<Decoded, CodecError> {
        // Sniff magic bytes only; the extension says nothing about the content.
        let reader = ImageReader::new(BufReader::new(File::open(path)?)).with_guessed_format()?;
        let kind = match reader.format() {
            Some(ImageFormat::Gif) => ImageKind::Gif,
            Some(ImageFormat::Jpeg) => ImageKind::Jpeg,
            Some(ImageFormat::Png) => ImageKind::Png,
            other => {
                return Err(CodecError::UnsupportedFormat(format!(
                    "{} ({})",
                    path.display(),
                    other.map_or("unknown".to_string(), |f| format!("{f:?}"))
                )));
            }
        };

        let img = reader.decode().map_err(|e| {
            CodecError::Decode(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        let raster = Raster::from_rgba(img.to_rgba8())
            .map_err(|e| CodecError::Decode(format!("{}: {e}", path.display())))?;

        let raster = match kind {
            ImageKind::Gif => raster.with_transparent_key(read_gif_key(path)?),
            ImageKind::Jpeg | ImageKind::Png => raster,
        };

        Ok(Decoded { raster, kind })
    }

    fn encode(
        &self,
        raster: &Raster,
        kind: ImageKind,
        path: &Path,
        quality: Quality,
    ) -> Result<(), CodecError> {
        let (width, height) = raster.dimensions();
        let mut writer = BufWriter::new(File::create(path)?);

        let image_err = |e: image::ImageError| {
            CodecError::Encode(format!("{kind:?} encode failed for {}: {e}", path.display()))
        };

        match kind {
            ImageKind::Png => {
                let encoder = PngEncoder::new(&mut writer);
                if raster.has_alpha() {
                    encoder
                        .write_image(
                            raster.as_rgba().as_raw(),
                            width,
                            height,
                            ExtendedColorType::Rgba8,
                        )
                        .map_err(image_err)?;
                } else {
                    let rgb = flatten_onto_white(raster);
                    encoder
                        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                        .map_err(image_err)?;
                }
            }
            ImageKind::Jpeg => {
                // The JPEG encoder's quality scale starts at 1.
                let q = quality.value().clamp(1, 100) as u8;
                let rgb = flatten_onto_white(raster);
                JpegEncoder::new_with_quality(&mut writer, q)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(image_err)?;
            }
            ImageKind::Gif => {
                let gif_err = |e: gif::EncodingError| {
                    CodecError::Encode(format!("GIF encode failed for {}: {e}", path.display()))
                };
                let frame = gif_frame(raster)?;
                let mut encoder = gif::Encoder::new(&mut writer, frame.width, frame.height, &[])
                    .map_err(gif_err)?;
                encoder.write_frame(&frame).map_err(gif_err)?;
                encoder.into_inner()?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
