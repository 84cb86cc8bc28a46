//! Producing a single variant: decode, orient, resize, encode.
//!
//! Sources are decoded once with their EXIF orientation applied, so every
//! width is cut from pixels that already face the right way. Widths never
//! exceed the oriented source width.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Extension of every generated variant.
pub const VARIANT_EXTENSION: &str = "webp";

/// Error while reading or encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// Source could not be opened
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Source content could not be decoded
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Source decoded to zero pixels
    #[error("{0} has zero width or height")]
    Empty(PathBuf),
    /// WebP encoder rejected the image
    #[error("cannot encode variant of {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// A decoded, orientation-corrected source image.
#[derive(Debug)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    /// Decode `path` and apply its embedded orientation.
    pub fn open(path: &Path) -> Result<Self, VariantError> {
        let decode_err =
            |source: image::ImageError| VariantError::Decode { path: path.to_path_buf(), source };

        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| VariantError::Read { path: path.to_path_buf(), source })?;
        let mut decoder = reader.into_decoder().map_err(decode_err)?;
        let orientation = decoder.orientation().map_err(decode_err)?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        image.apply_orientation(orientation);

        Self::from_image(path, image)
    }

    /// Wrap an already decoded image.
    pub fn from_image(path: &Path, image: DynamicImage) -> Result<Self, VariantError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(VariantError::Empty(path.to_path_buf()));
        }
        Ok(Self { path: path.to_path_buf(), image })
    }

    /// Oriented width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Oriented height.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Resize and encode one variant for a configured target width.
    pub fn variant(&self, target: u32, quality: u8) -> Result<EncodedVariant, VariantError> {
        let width = effective_width(target, self.width());
        let rendered = render_variant(&self.image, width);
        let data = encode_webp(&rendered, quality).map_err(|message| VariantError::Encode {
            path: self.path.clone(),
            message,
        })?;
        Ok(EncodedVariant { width: rendered.width(), height: rendered.height(), data })
    }
}

/// Encoded WebP bytes plus their pixel dimensions.
#[derive(Debug, Clone)]
pub struct EncodedVariant {
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// WebP file contents
    pub data: Vec<u8>,
}

/// `min(target, source_width)`: variants are never enlarged.
pub fn effective_width(target: u32, source_width: u32) -> u32 {
    target.min(source_width)
}

/// Height that keeps the source aspect ratio at `width`, at least 1.
pub fn scaled_height(source_width: u32, source_height: u32, width: u32) -> u32 {
    if source_width == 0 {
        return source_height.max(1);
    }
    let h = (f64::from(source_height) * f64::from(width) / f64::from(source_width)).round();
    (h as u32).max(1)
}

/// File name of a variant: `<base>-<width>.webp`.
pub fn variant_file_name(base: &str, width: u32) -> String {
    format!("{}-{}.{}", base, width, VARIANT_EXTENSION)
}

/// Resize to `width`, preserving aspect ratio. Returns the source untouched
/// when it is already that wide or narrower.
pub fn render_variant(image: &DynamicImage, width: u32) -> Cow<'_, DynamicImage> {
    let (src_w, src_h) = image.dimensions();
    if width >= src_w {
        return Cow::Borrowed(image);
    }
    let height = scaled_height(src_w, src_h, width);
    Cow::Owned(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Encode lossy WebP at `quality` (1-100).
///
/// libwebp takes 8-bit RGB or RGBA only, so other layouts are converted.
pub fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let converted: Cow<'_, DynamicImage> = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        other if other.color().has_alpha() => {
            Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
        }
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    };

    let encoder = webp::Encoder::from_image(&converted).map_err(|e| e.to_string())?;
    let memory =
        encoder.encode_simple(false, f32::from(quality)).map_err(|e| format!("{:?}", e))?;
    Ok(memory.to_vec())
}
