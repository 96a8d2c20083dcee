//! Loading and saving images as RGB [`ByteBuffer`]s.
//!
//! Any format the `image` crate was built with is accepted on load. Output is
//! always written as uncompressed 24-bit BMP, so a save followed by a load
//! returns the same bytes.

use crate::error::CodecError;
use crate::file_io::{read_mapped, write_mapped, FileOperationResult};
use image::{ImageFormat, RgbImage};
use log::debug;
use pixel_mask_transform_core::{ByteBuffer, TransformError};
use std::io::Cursor;
use std::path::Path;

/// Loads the image at `path` and converts it to 8-bit RGB.
///
/// Alpha channels are dropped and higher bit depths are reduced to 8 bits.
///
/// # Errors
///
/// - [`crate::FileOperationError::Io`] if the file cannot be opened or mapped
/// - [`CodecError::DecodeFailure`] if the contents are not a readable image
/// - [`CodecError::InvalidDimensions`] if the image has no pixels
pub fn load_image(path: &Path) -> FileOperationResult<ByteBuffer> {
    let image = read_mapped(path, |bytes| {
        image::load_from_memory(bytes).map_err(|source| {
            CodecError::DecodeFailure {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    })?;

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!("loaded {} ({width}x{height})", path.display());

    ByteBuffer::new(width, height, rgb.into_raw()).map_err(|_| {
        CodecError::InvalidDimensions {
            path: path.to_path_buf(),
            width,
            height,
        }
        .into()
    })
}

/// Encodes `buffer` as a 24-bit BMP file in memory.
///
/// `path` is only used for error reporting.
pub fn encode_bmp(buffer: &ByteBuffer, path: &Path) -> FileOperationResult<Vec<u8>> {
    let image = RgbImage::from_raw(buffer.width(), buffer.height(), buffer.as_slice().to_vec())
        .ok_or(TransformError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
            len: buffer.len(),
        })?;

    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, ImageFormat::Bmp)
        .map_err(|source| CodecError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(encoded.into_inner())
}

/// Saves `buffer` to `path` as a 24-bit BMP, replacing any existing file.
///
/// # Returns
///
/// The number of bytes written.
pub fn save_image(buffer: &ByteBuffer, path: &Path) -> FileOperationResult<usize> {
    let encoded = encode_bmp(buffer, path)?;
    write_mapped(path, &encoded)?;
    debug!(
        "saved {} ({}x{}, {} bytes)",
        path.display(),
        buffer.width(),
        buffer.height(),
        encoded.len()
    );
    Ok(encoded.len())
}
