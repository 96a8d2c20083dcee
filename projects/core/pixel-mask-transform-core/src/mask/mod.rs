//! Seed-addressed masking.
//!
//! A [`MaskRecord`] describes a region of `3 * triplets.len()` bytes that starts
//! at byte offset `seed` of some target buffer. Masking adds a mask buffer to the
//! recorded samples (mod 256) and writes the result into that region; unmasking
//! subtracts the mask from whatever the region currently holds.
//!
//! All functions validate the region and the mask length before writing, so a
//! failed call leaves the target untouched.

mod masker;

pub use masker::*;

use crate::buffer::{checked_region, ByteBuffer, CHANNELS};
use crate::error::TransformError;
use alloc::vec::Vec;

/// One RGB correction value.
pub type Triplet = [u8; 3];

/// A seed offset plus the ordered correction triplets that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MaskRecord {
    /// Byte offset of the region inside the target buffer.
    pub seed: usize,
    /// Correction values, one per pixel of the region.
    pub triplets: Vec<Triplet>,
}

impl MaskRecord {
    /// Creates a record from a seed and its triplets.
    pub fn new(seed: usize, triplets: Vec<Triplet>) -> Self {
        Self { seed, triplets }
    }

    /// Number of triplets, i.e. pixels covered by the region.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.triplets.len()
    }

    /// Length of the region in bytes.
    #[inline]
    pub fn region_len(&self) -> usize {
        self.triplets.len() * CHANNELS
    }

    /// The triplets flattened to `R, G, B, R, G, B, ...`.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        self.triplets.as_flattened()
    }

    /// Records the current contents of `pixels` pixels of `source`, starting at `seed`.
    ///
    /// Applying the returned record with [`apply_correction`] writes
    /// `region + mask` over the same region, which [`reverse_correction`] undoes.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if the region does not fit in `source`
    pub fn capture(source: &ByteBuffer, seed: usize, pixels: usize) -> Result<Self, TransformError> {
        let region = source.region(seed, region_len_checked(seed, pixels, source.len())?)?;
        Ok(Self::new(seed, to_triplets(region)))
    }

    /// Builds the record a producer publishes for a masked image: each sample is
    /// `source[seed + k] + mask[k]` (mod 256).
    ///
    /// [`matches`] returns `true` for `source` against the returned record.
    ///
    /// # Errors
    ///
    /// - [`TransformError::OutOfRange`] if the region does not fit in `source`
    /// - [`TransformError::MaskTooShort`] if `mask` is shorter than the region
    pub fn from_masked(
        source: &ByteBuffer,
        mask: &ByteBuffer,
        seed: usize,
        pixels: usize,
    ) -> Result<Self, TransformError> {
        let len = region_len_checked(seed, pixels, source.len())?;
        let region = source.region(seed, len)?;
        let mask = mask_region(mask, len)?;

        let triplets = region
            .chunks_exact(CHANNELS)
            .zip(mask.chunks_exact(CHANNELS))
            .map(|(sample, m)| {
                [
                    sample[0].wrapping_add(m[0]),
                    sample[1].wrapping_add(m[1]),
                    sample[2].wrapping_add(m[2]),
                ]
            })
            .collect();

        Ok(Self::new(seed, triplets))
    }
}

fn to_triplets(bytes: &[u8]) -> Vec<Triplet> {
    bytes
        .chunks_exact(CHANNELS)
        .map(|rgb| [rgb[0], rgb[1], rgb[2]])
        .collect()
}

/// `pixels * 3`, reported as [`TransformError::OutOfRange`] when it overflows.
fn region_len_checked(seed: usize, pixels: usize, capacity: usize) -> Result<usize, TransformError> {
    pixels
        .checked_mul(CHANNELS)
        .ok_or(TransformError::OutOfRange {
            offset: seed,
            len: usize::MAX,
            capacity,
        })
}

/// Validates the record's region against `target_len` and the mask length.
pub(crate) fn validate(
    target_len: usize,
    mask: &ByteBuffer,
    record: &MaskRecord,
) -> Result<core::ops::Range<usize>, TransformError> {
    let range = checked_region(record.seed, record.region_len(), target_len)?;
    mask_region(mask, record.region_len())?;
    Ok(range)
}

/// The first `len` bytes of `mask`.
pub(crate) fn mask_region(mask: &ByteBuffer, len: usize) -> Result<&[u8], TransformError> {
    mask.as_slice()
        .get(..len)
        .ok_or(TransformError::MaskTooShort {
            needed: len,
            actual: mask.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn samples_are_flattened_in_order() {
        let record = MaskRecord::new(0, vec![[1, 2, 3], [4, 5, 6]]);
        assert_eq!(record.samples(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(record.region_len(), 6);
        assert_eq!(record.pixel_count(), 2);
    }

    #[test]
    fn capture_copies_region() {
        let source = sequential_buffer(4, 2);
        let record = MaskRecord::capture(&source, 5, 2).unwrap();

        assert_eq!(record.seed, 5);
        assert_eq!(record.triplets, vec![[5, 6, 7], [8, 9, 10]]);
    }

    #[test]
    fn capture_rejects_region_past_end() {
        let source = sequential_buffer(4, 2); // 24 bytes
        assert_eq!(
            MaskRecord::capture(&source, 20, 2),
            Err(TransformError::OutOfRange {
                offset: 20,
                len: 6,
                capacity: 24
            })
        );
        assert!(MaskRecord::capture(&source, 0, usize::MAX).is_err());
    }

    #[test]
    fn from_masked_adds_mask_with_wraparound() {
        let source = ByteBuffer::new(1, 2, vec![250, 1, 2, 3, 4, 5]).unwrap();
        let mask = ByteBuffer::new(1, 2, vec![10, 10, 10, 10, 10, 10]).unwrap();

        let record = MaskRecord::from_masked(&source, &mask, 0, 2).unwrap();
        assert_eq!(record.triplets, vec![[4, 11, 12], [13, 14, 15]]);
    }

    #[test]
    fn from_masked_rejects_short_mask() {
        let source = sequential_buffer(4, 4);
        let mask = sequential_buffer(1, 1);

        assert_eq!(
            MaskRecord::from_masked(&source, &mask, 0, 2),
            Err(TransformError::MaskTooShort {
                needed: 6,
                actual: 3
            })
        );
    }
}
