//! The image controller: load, resize, crop, save.
//!
//! [`Image`] sequences the imaging stages. It decodes the source once, keeps
//! it read-only, and holds the latest stage output as the working image:
//!
//! ```text
//! load ──▶ [resize | crop]* ──▶ save
//! Loaded        Ready           Saved
//! ```
//!
//! Every stage reads the current working image (the source until a stage
//! has run) and returns a new raster, which replaces the working image only
//! when the stage succeeds. A failed call leaves the controller exactly as
//! it was.
//!
//! ## Target Format
//!
//! Transparency handling depends on the format the image will be written
//! as, so the controller tracks a target format from the start: the target
//! path's extension if one was given at load, else the source path's
//! extension, else the decoded format. `save` dispatches on the extension
//! of the path it actually writes to.

use crate::config::Policy;
use crate::imaging::{
    Codec, CodecError, CropWindow, ImageKind, InvalidGeometry, Raster, ResizeRequest, RustCodec,
    crop_stage, finish_stage, resize_stage,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image source path \"{}\" does not exist", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Image source path \"{}\" is not readable", .0.display())]
    SourceUnreadable(PathBuf),
    #[error("Image target path \"{}\" must be writable", .0.display())]
    TargetUnwritable(PathBuf),
    #[error("Source image is an unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometry),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(CodecError),
}

impl From<CodecError> for ImageError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedFormat(msg) => ImageError::UnsupportedFormat(msg),
            CodecError::Io(io) => ImageError::Io(io),
            other => ImageError::Codec(other),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Source decoded, no stage has run yet.
    Loaded,
    /// At least one resize or crop has produced a working image.
    Ready,
    /// The working image has been encoded at least once.
    Saved,
}

/// Input for the next stage.
#[derive(Debug, Clone)]
enum Working {
    Source,
    Derived(Raster),
}

/// A decoded image and the policy used to transform and save it.
///
/// Instances share nothing, so separate images can be processed on separate
/// threads. A single instance is not meant to be driven from two threads.
pub struct Image<C: Codec = RustCodec> {
    codec: C,
    policy: Policy,
    source_path: PathBuf,
    target_path: Option<PathBuf>,
    source: Raster,
    source_kind: ImageKind,
    working: Working,
    state: PipelineState,
}

impl Image<RustCodec> {
    /// Open `path` with the built-in codec and the default policy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(RustCodec::new(), path.as_ref(), Policy::default())
    }
}

impl<C: Codec> Image<C> {
    /// Validate and decode `path`.
    pub fn load(codec: C, path: &Path, policy: Policy) -> Result<Self> {
        Self::load_with_target(codec, path, None, policy)
    }

    /// Validate and decode `source`, remembering `target` as the default
    /// save location. Saving over the source requires it to be writable.
    pub fn load_with_target(
        codec: C,
        source: &Path,
        target: Option<&Path>,
        policy: Policy,
    ) -> Result<Self> {
        validate_source(source)?;
        if let Some(target) = target {
            check_in_place_writable(source, target)?;
        }

        let decoded = codec.decode(source)?;
        tracing::debug!(
            path = %source.display(),
            kind = ?decoded.kind,
            width = decoded.raster.width(),
            height = decoded.raster.height(),
            "loaded source image"
        );

        Ok(Self {
            codec,
            policy,
            source_path: source.to_path_buf(),
            target_path: target.map(Path::to_path_buf),
            source: decoded.raster,
            source_kind: decoded.kind,
            working: Working::Source,
            state: PipelineState::Loaded,
        })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Adjust the policy between stages.
    pub fn policy_mut(&mut self) -> &mut Policy {
        &mut self.policy
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn source(&self) -> &Raster {
        &self.source
    }

    pub fn source_kind(&self) -> ImageKind {
        self.source_kind
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The image the next stage reads and `save` writes.
    pub fn current(&self) -> &Raster {
        match &self.working {
            Working::Source => &self.source,
            Working::Derived(raster) => raster,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current().dimensions()
    }

    /// Format whose transparency rules apply to new canvases.
    pub fn target_kind(&self) -> ImageKind {
        self.target_path
            .as_deref()
            .and_then(ImageKind::from_path)
            .or_else(|| ImageKind::from_path(&self.source_path))
            .unwrap_or(self.source_kind)
    }

    /// Resize the working image.
    ///
    /// ```no_run
    /// # use simple_thumb::{Image, ResizeRequest};
    /// let mut img = Image::open("photo.jpg")?;
    /// img.resize(ResizeRequest::exact(400, 500))?;
    /// img.save_as("thumb.jpg")?;
    /// # Ok::<(), simple_thumb::ImageError>(())
    /// ```
    pub fn resize(&mut self, request: ResizeRequest) -> Result<&mut Self> {
        let output = resize_stage(
            self.current(),
            request,
            &self.policy.resize_config(),
            self.target_kind(),
        )?;
        self.replace_working(output);
        Ok(self)
    }

    /// Crop the working image to `[start_x, end_x) × [start_y, end_y)`.
    pub fn crop(&mut self, start_x: i64, start_y: i64, end_x: i64, end_y: i64) -> Result<&mut Self> {
        let window = CropWindow::new(start_x, start_y, end_x, end_y);
        let output = crop_stage(self.current(), window, self.target_kind())?;
        self.replace_working(output);
        Ok(self)
    }

    /// Encode the working image.
    ///
    /// Writes to `target`, else the target given at load, else over the
    /// source. The format follows the destination's extension and falls back
    /// to the source format. Returns the path written.
    pub fn save(&mut self, target: Option<&Path>) -> Result<PathBuf> {
        let path = target
            .map(Path::to_path_buf)
            .or_else(|| self.target_path.clone())
            .unwrap_or_else(|| self.source_path.clone());
        check_in_place_writable(&self.source_path, &path)?;

        let kind = ImageKind::from_path(&path).unwrap_or(self.source_kind);
        let pixels = finish_stage(self.current(), self.policy.sharpen_images);
        self.codec
            .encode(&pixels, kind, &path, self.policy.quality())?;
        set_file_mode(&path, self.policy.file_mode)?;

        tracing::debug!(
            path = %path.display(),
            ?kind,
            width = pixels.width(),
            height = pixels.height(),
            sharpened = self.policy.sharpen_images,
            "saved image"
        );
        self.state = PipelineState::Saved;
        Ok(path)
    }

    /// Encode the working image to `path`.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        self.save(Some(path.as_ref()))
    }

    fn replace_working(&mut self, output: Raster) {
        self.working = Working::Derived(output);
        self.state = PipelineState::Ready;
    }
}

fn validate_source(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ImageError::SourceNotFound(path.to_path_buf()));
    }
    if File::open(path).is_err() {
        return Err(ImageError::SourceUnreadable(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ImageError::UnsupportedFormat(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    Ok(())
}

fn check_in_place_writable(source: &Path, target: &Path) -> Result<()> {
    if same_file(source, target) && !is_writable(source) {
        return Err(ImageError::TargetUnwritable(source.to_path_buf()));
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn is_writable(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}

#[cfg(unix)]
fn set_file_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
