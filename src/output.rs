//! Saving renders to disk, converting format if necessary.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use image::ImageFormat;

use crate::data_uri;
use crate::error::StudioError;

/// File format for saved renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// PNG, lossless.
    Png,
    /// JPEG.
    Jpeg,
    /// WebP.
    Webp,
}

impl OutputFormat {
    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

/// Filename for a render saved without an explicit path.
#[must_use]
pub fn auto_filename(format: OutputFormat) -> String {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("style-studio-render-{timestamp}.{}", format.extension())
}

/// Use the explicit path, or an auto-generated name in the working directory.
#[must_use]
pub fn resolve_output_path(explicit: Option<&Path>, format: OutputFormat) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(auto_filename(format)),
    }
}

/// Decode a data-URI render and write it to `output_path` as `format`.
///
/// # Errors
///
/// Returns an error if the data-URI cannot be decoded, the image cannot be
/// converted, or the file cannot be written.
pub fn save_render(uri: &str, format: OutputFormat, output_path: &Path) -> Result<(), StudioError> {
    let (mime_type, bytes) = data_uri::decode(uri)?;
    save_image(&bytes, &mime_type, format, output_path)
}

/// Write raw image bytes, re-encoding when `source_mime` differs from `format`.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    format: OutputFormat,
    output_path: &Path,
) -> Result<(), StudioError> {
    if source_mime == format.mime_type() {
        std::fs::write(output_path, data).map_err(StudioError::Io)
    } else {
        convert_and_save(data, format, output_path)
    }
}

fn convert_and_save(data: &[u8], format: OutputFormat, output_path: &Path) -> Result<(), StudioError> {
    let img = image::load_from_memory(data)
        .map_err(|e| StudioError::ImageConversion(format!("Failed to decode image: {e}")))?;

    // JPEG has no alpha channel.
    let img = if format == OutputFormat::Jpeg { image::DynamicImage::ImageRgb8(img.to_rgb8()) } else { img };

    img.save_with_format(output_path, format.image_format()).map_err(|e| {
        StudioError::ImageConversion(format!("Failed to save as {}: {e}", format.extension()))
    })
}
