//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` codecs behind the [`Codec`] trait |
//! | **GIF transparency** | `gif` decoder, first-frame transparent index |
//! | **Resize** | area-weighted resampling onto a filled canvas |
//! | **Crop** | 1:1 copy onto a transparent canvas |
//! | **Sharpen** | fixed 3×3 convolution at save time |
//!
//! The module is split into:
//! - **Calculations**: pure dimension math for resize requests (unit testable)
//! - **Parameters**: requests, crop windows, formats and quality
//! - **Raster / Color**: the in-memory image and fill colors
//! - **Compositor / Crop / Sharpen**: pixel stages, each a pure function
//! - **Backend**: [`Codec`] trait + [`RustCodec`]
//! - **Operations**: stage functions combining calculations with pixel work
//!
//! ```
//! use simple_thumb::imaging::{plan_resize, ResizePlan, ResizeRequest};
//!
//! let plan = plan_resize((800, 600), ResizeRequest::exact(400, 500), true, true).unwrap();
//! assert!(matches!(plan, ResizePlan::Resample { width: 667, height: 500, crop: Some(_) }));
//! ```

pub mod backend;
mod calculations;
mod color;
pub mod compositor;
pub mod crop;
pub mod operations;
mod params;
mod raster;
pub mod rust_backend;
pub mod sharpen;

pub use backend::{Codec, CodecError, Decoded};
pub use calculations::{ResizePlan, plan_resize};
pub use color::{BackgroundSpec, ColorError, ColorRgb, Fill};
pub use compositor::{Region, composite};
pub use crop::crop;
pub use operations::{ResizeConfig, crop_stage, finish_stage, resize_stage};
pub use params::{CropWindow, ImageKind, InvalidGeometry, Quality, ResizeRequest};
pub use raster::{Raster, TransparentKey};
pub use rust_backend::RustCodec;
pub use sharpen::sharpen;
