//! Normalise generated images to PNG.
//!
//! Cell files are always named `*.png`, but the hosted model may return
//! WebP or JPEG. Anything that is not already PNG is decoded and re-encoded.

use std::io::Cursor;

use image::ImageFormat;

use crate::error::GenerationError;

/// Return `bytes` unchanged if they are a PNG, otherwise re-encode them.
/// Bytes that are not a recognised image are rejected.
pub fn ensure_png(bytes: Vec<u8>) -> Result<Vec<u8>, GenerationError> {
    let format = image::guess_format(&bytes)?;
    if format == ImageFormat::Png {
        return Ok(bytes);
    }

    tracing::debug!(?format, "Re-encoding generated image as PNG");
    let decoded = image::load_from_memory_with_format(&bytes, format)?;
    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
