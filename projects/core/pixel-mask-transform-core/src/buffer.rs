//! Owned pixel buffer in flat RGB888 layout.

use crate::error::TransformError;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

/// Number of bytes per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Pixel data of one image: `width * height * 3` bytes, row-major, no padding.
///
/// The length is fixed at construction. Transforms that keep the length mutate
/// the buffer in place through [`ByteBuffer::as_mut_slice`]; everything else
/// goes through the bounds-checked accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ByteBuffer {
    /// Wraps existing pixel bytes.
    ///
    /// # Errors
    ///
    /// - [`TransformError::InvalidDimensions`] if either dimension is zero, the
    ///   byte count overflows, or `bytes.len() != width * height * 3`
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, TransformError> {
        match expected_len(width, height) {
            Some(len) if len == bytes.len() => Ok(Self {
                width,
                height,
                bytes,
            }),
            _ => Err(TransformError::InvalidDimensions {
                width,
                height,
                len: bytes.len(),
            }),
        }
    }

    /// Allocates a buffer of the given dimensions with every byte set to 0.
    ///
    /// # Errors
    ///
    /// - [`TransformError::InvalidDimensions`] if either dimension is zero or the
    ///   byte count overflows
    pub fn zeroed(width: u32, height: u32) -> Result<Self, TransformError> {
        let len = expected_len(width, height).ok_or(TransformError::InvalidDimensions {
            width,
            height,
            len: 0,
        })?;

        Ok(Self {
            width,
            height,
            bytes: vec![0u8; len],
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.bytes.len() / CHANNELS
    }

    /// Number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; a buffer holds at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads the byte at `index`.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if `index >= self.len()`
    pub fn get(&self, index: usize) -> Result<u8, TransformError> {
        self.bytes
            .get(index)
            .copied()
            .ok_or(TransformError::OutOfRange {
                offset: index,
                len: 1,
                capacity: self.bytes.len(),
            })
    }

    /// Writes the byte at `index`.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if `index >= self.len()`
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), TransformError> {
        let capacity = self.bytes.len();
        let slot = self.bytes.get_mut(index).ok_or(TransformError::OutOfRange {
            offset: index,
            len: 1,
            capacity,
        })?;
        *slot = value;
        Ok(())
    }

    /// The `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if the region does not fit
    pub fn region(&self, offset: usize, len: usize) -> Result<&[u8], TransformError> {
        let range = checked_region(offset, len, self.bytes.len())?;
        Ok(&self.bytes[range])
    }

    /// Mutable view of the `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if the region does not fit
    pub fn region_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8], TransformError> {
        let range = checked_region(offset, len, self.bytes.len())?;
        Ok(&mut self.bytes[range])
    }

    /// All bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// All bytes, mutably. The length cannot change through this view.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Releases the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }

    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

/// Validates that `offset..offset + len` lies inside `0..capacity`.
pub(crate) fn checked_region(
    offset: usize,
    len: usize,
    capacity: usize,
) -> Result<Range<usize>, TransformError> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(offset..end),
        _ => Err(TransformError::OutOfRange {
            offset,
            len,
            capacity,
        }),
    }
}
