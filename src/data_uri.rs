//! Data-URI parsing, formatting and loading images from disk.

use std::path::Path;

use base64::Engine;

use crate::error::StudioError;
use crate::ports::InlineImage;

/// MIME type assumed when a payload carries no data-URI prefix.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// Split a data-URI into its MIME type and base64 payload.
///
/// A string without a `data:<mime>;base64,` prefix is taken as a raw base64
/// payload of [`DEFAULT_MIME`].
#[must_use]
pub fn to_inline_image(uri: &str) -> InlineImage {
    match split_prefix(uri) {
        Some((mime, data)) => InlineImage { mime_type: mime.to_string(), data: data.to_string() },
        None => InlineImage { mime_type: DEFAULT_MIME.to_string(), data: uri.to_string() },
    }
}

/// Format a MIME type and base64 payload as a data-URI.
#[must_use]
pub fn format(mime_type: &str, data: &str) -> String {
    format!("data:{mime_type};base64,{data}")
}

/// Decode the payload of a data-URI into raw bytes.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64.
pub fn decode(uri: &str) -> Result<(String, Vec<u8>), StudioError> {
    let image = to_inline_image(uri);
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(image.data.trim())
        .map_err(|e| StudioError::InvalidArgument(format!("Image data is not valid base64: {e}")))?;
    Ok((image.mime_type, bytes))
}

/// Read an image file and encode it as a data-URI.
///
/// Only JPEG, PNG, GIF and WebP are accepted; the format is detected from
/// the file contents, not its extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a supported image.
pub fn from_file(path: &Path) -> Result<String, StudioError> {
    let bytes = std::fs::read(path)?;
    let detected = image::guess_format(&bytes).map_err(|_| {
        StudioError::InvalidArgument(format!("{} is not a recognizable image", path.display()))
    })?;
    let mime = match detected {
        image::ImageFormat::Jpeg => "image/jpeg",
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Gif => "image/gif",
        image::ImageFormat::WebP => "image/webp",
        other => {
            return Err(StudioError::InvalidArgument(format!(
                "Unsupported image type {other:?} for {}. Valid: jpeg, png, gif, webp",
                path.display()
            )));
        }
    };
    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format(mime, &data))
}

fn split_prefix(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, data) = rest.split_once(";base64,")?;
    if mime.is_empty() || mime.contains(',') {
        return None;
    }
    Some((mime, data))
}
