//! Elementary byte transforms.
//!
//! Every function here is total: it is defined for every byte value and every
//! bit count, and the only failure is [`xor_buffer`] being handed two slices of
//! different lengths. Nothing allocates.
//!
//! Rotations reduce the bit count modulo 8, so `rotate_right(x, 11)` is
//! `rotate_right(x, 3)`. Shifts are logical and zero-filling; a shift by 8 or
//! more clears the byte. Shifts discard bits and have no inverse, so any data
//! recovered after a shift only retains the bits that stayed in the window.

use crate::error::TransformError;

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// Buffers shorter than this are processed on the calling thread.
#[cfg(feature = "multithreaded")]
const PARALLEL_THRESHOLD: usize = 256 * 1024;

/// Bytes handed to each rayon task.
#[cfg(feature = "multithreaded")]
const PARALLEL_CHUNK: usize = 64 * 1024;

/// Circular rotation of `byte` by `n % 8` bits towards the least significant bit.
#[inline(always)]
pub const fn rotate_right(byte: u8, n: u32) -> u8 {
    byte.rotate_right(n % 8)
}

/// Circular rotation of `byte` by `n % 8` bits towards the most significant bit.
#[inline(always)]
pub const fn rotate_left(byte: u8, n: u32) -> u8 {
    byte.rotate_left(n % 8)
}

/// Logical left shift, zero-filling. Returns 0 for `n >= 8`.
#[inline(always)]
pub const fn shift_left(byte: u8, n: u32) -> u8 {
    if n >= 8 {
        0
    } else {
        byte << n
    }
}

/// Logical right shift, zero-filling. Returns 0 for `n >= 8`.
#[inline(always)]
pub const fn shift_right(byte: u8, n: u32) -> u8 {
    if n >= 8 {
        0
    } else {
        byte >> n
    }
}

/// XORs every byte with `key`. Applying it twice with the same key is a no-op.
pub fn xor_key(bytes: &mut [u8], key: u8) {
    map_in_place(bytes, move |b| b ^ key);
}

/// XORs `target` with `other` byte by byte, writing into `target`.
///
/// # Errors
///
/// - [`TransformError::LengthMismatch`] if the lengths differ; `target` is left untouched
pub fn xor_buffer(target: &mut [u8], other: &[u8]) -> Result<(), TransformError> {
    if target.len() != other.len() {
        return Err(TransformError::LengthMismatch {
            expected: target.len(),
            actual: other.len(),
        });
    }

    zip_in_place(target, other, |a, b| a ^ b);
    Ok(())
}

/// Rotates every byte right by `n % 8` bits.
pub fn rotate_right_slice(bytes: &mut [u8], n: u32) {
    map_in_place(bytes, move |b| rotate_right(b, n));
}

/// Rotates every byte left by `n % 8` bits.
pub fn rotate_left_slice(bytes: &mut [u8], n: u32) {
    map_in_place(bytes, move |b| rotate_left(b, n));
}

/// Shifts every byte left by `n` bits. Lossy.
pub fn shift_left_slice(bytes: &mut [u8], n: u32) {
    map_in_place(bytes, move |b| shift_left(b, n));
}

/// Shifts every byte right by `n` bits. Lossy.
pub fn shift_right_slice(bytes: &mut [u8], n: u32) {
    map_in_place(bytes, move |b| shift_right(b, n));
}

/// Overwrites each RGB pixel with a grey ramp: all three channels of pixel `p`
/// become `(3 * p) mod 256`, the truncated offset of its first byte.
///
/// Trailing bytes that do not form a whole pixel are left as they are.
/// The previous contents are lost.
pub fn fill_gradient(bytes: &mut [u8]) {
    for (pixel, rgb) in bytes.chunks_exact_mut(crate::CHANNELS).enumerate() {
        rgb.fill(pixel.wrapping_mul(crate::CHANNELS) as u8);
    }
}

#[cfg(not(feature = "multithreaded"))]
#[inline]
fn map_in_place(bytes: &mut [u8], op: impl Fn(u8) -> u8) {
    for byte in bytes.iter_mut() {
        *byte = op(*byte);
    }
}

#[cfg(feature = "multithreaded")]
fn map_in_place(bytes: &mut [u8], op: impl Fn(u8) -> u8 + Send + Sync) {
    if bytes.len() < PARALLEL_THRESHOLD {
        for byte in bytes.iter_mut() {
            *byte = op(*byte);
        }
        return;
    }

    bytes.par_chunks_mut(PARALLEL_CHUNK).for_each(|chunk| {
        for byte in chunk.iter_mut() {
            *byte = op(*byte);
        }
    });
}

#[cfg(not(feature = "multithreaded"))]
#[inline]
fn zip_in_place(target: &mut [u8], other: &[u8], op: impl Fn(u8, u8) -> u8) {
    for (a, &b) in target.iter_mut().zip(other) {
        *a = op(*a, b);
    }
}

#[cfg(feature = "multithreaded")]
fn zip_in_place(target: &mut [u8], other: &[u8], op: impl Fn(u8, u8) -> u8 + Send + Sync) {
    if target.len() < PARALLEL_THRESHOLD {
        for (a, &b) in target.iter_mut().zip(other) {
            *a = op(*a, b);
        }
        return;
    }

    target
        .par_chunks_mut(PARALLEL_CHUNK)
        .zip(other.par_chunks(PARALLEL_CHUNK))
        .for_each(|(dst, src)| {
            for (a, &b) in dst.iter_mut().zip(src) {
                *a = op(*a, b);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case::by_zero(0b1001_0110, 0, 0b1001_0110)]
    #[case::by_one(0b0000_0001, 1, 0b1000_0000)]
    #[case::by_three(0b0000_0111, 3, 0b1110_0000)]
    #[case::by_seven(0b1000_0000, 7, 0b0000_0001)]
    #[case::by_eight_wraps(0b1001_0110, 8, 0b1001_0110)]
    #[case::by_eleven_wraps(0b0000_0111, 11, 0b1110_0000)]
    fn rotate_right_known_values(#[case] input: u8, #[case] n: u32, #[case] expected: u8) {
        assert_eq!(rotate_right(input, n), expected);
        assert_eq!(rotate_left(expected, n), input);
    }

    #[rstest]
    #[case::left_by_one(0b1100_0001, 1, 0b1000_0010, 0b0110_0000)]
    #[case::by_four(0xAB, 4, 0xB0, 0x0A)]
    #[case::by_seven(0xFF, 7, 0x80, 0x01)]
    #[case::by_eight(0xFF, 8, 0x00, 0x00)]
    #[case::by_huge(0xFF, u32::MAX, 0x00, 0x00)]
    fn shifts_zero_fill(#[case] input: u8, #[case] n: u32, #[case] left: u8, #[case] right: u8) {
        assert_eq!(shift_left(input, n), left);
        assert_eq!(shift_right(input, n), right);
    }

    #[test]
    fn shift_loses_high_bits() {
        // Shifting back does not restore the bit that left the window.
        assert_eq!(shift_right(shift_left(0b1000_0001, 1), 1), 0b0000_0001);
    }

    #[test]
    fn rotate_right_by_three_matches_manual_form() {
        for x in 0..=u8::MAX {
            assert_eq!(rotate_right(x, 3), (x >> 3) | (x << 5));
        }
    }

    #[test]
    fn xor_buffer_rejects_length_mismatch() {
        let mut target = [1u8, 2, 3];
        let result = xor_buffer(&mut target, &[1, 2]);

        assert_eq!(
            result,
            Err(TransformError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(target, [1, 2, 3]);
    }

    #[test]
    fn xor_buffer_known_values() {
        let mut target = [0x00u8, 0xFF, 0x0F, 0xAA];
        xor_buffer(&mut target, &[0xFF, 0xFF, 0xF0, 0xAA]).unwrap();
        assert_eq!(target, [0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn slice_forms_apply_to_every_byte() {
        let mut bytes: Vec<u8> = (0..=255).collect();
        rotate_right_slice(&mut bytes, 3);
        for (x, &b) in bytes.iter().enumerate() {
            assert_eq!(b, rotate_right(x as u8, 3));
        }

        shift_left_slice(&mut bytes, 2);
        shift_right_slice(&mut bytes, 1);
        rotate_left_slice(&mut bytes, 5);
        xor_key(&mut bytes, 0x5A);
        for (x, &b) in bytes.iter().enumerate() {
            let expected = rotate_left(shift_right(shift_left(rotate_right(x as u8, 3), 2), 1), 5);
            assert_eq!(b, expected ^ 0x5A);
        }
    }

    #[test]
    fn fill_gradient_sets_all_channels_of_a_pixel() {
        let mut bytes = vec![0xEEu8; 3 * 100];
        fill_gradient(&mut bytes);

        assert_eq!(&bytes[0..3], &[0, 0, 0]);
        assert_eq!(&bytes[3..6], &[3, 3, 3]);
        // Pixel 86 starts at byte 258, which truncates to 2.
        assert_eq!(&bytes[258..261], &[2, 2, 2]);
    }

    #[test]
    fn fill_gradient_leaves_partial_pixel() {
        let mut bytes = vec![0xEEu8; 5];
        fill_gradient(&mut bytes);
        assert_eq!(bytes, [0, 0, 0, 0xEE, 0xEE]);
    }

    #[cfg(feature = "multithreaded")]
    #[test]
    fn parallel_path_matches_per_byte_reference() {
        // Above the threshold and not a multiple of the chunk size.
        let len = 300 * 1024 + 7;
        assert!(len > PARALLEL_THRESHOLD && len % PARALLEL_CHUNK != 0);
        let original: Vec<u8> = (0..len).map(|i| (i * 31 + i / 251) as u8).collect();
        let other: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();

        let mut bytes = original.clone();
        rotate_right_slice(&mut bytes, 3);
        xor_key(&mut bytes, 0xA5);
        xor_buffer(&mut bytes, &other).unwrap();

        for (i, &b) in bytes.iter().enumerate() {
            let expected = rotate_right(original[i], 3) ^ 0xA5 ^ other[i];
            assert_eq!(b, expected, "byte {i}");
        }
    }

    proptest! {
        #[test]
        fn xor_key_is_self_inverse(bytes in prop::collection::vec(any::<u8>(), 0..512), key in any::<u8>()) {
            let mut encoded = bytes.clone();
            xor_key(&mut encoded, key);
            xor_key(&mut encoded, key);
            prop_assert_eq!(encoded, bytes);
        }

        #[test]
        fn rotations_invert_each_other(x in any::<u8>(), n in any::<u32>()) {
            prop_assert_eq!(rotate_left(rotate_right(x, n), n), x);
            prop_assert_eq!(rotate_right(rotate_left(x, n), n), x);
        }

        #[test]
        fn xor_buffer_round_trips(
            pair in (0usize..512).prop_flat_map(|len| (
                prop::collection::vec(any::<u8>(), len),
                prop::collection::vec(any::<u8>(), len),
            ))
        ) {
            let (original, other) = pair;
            let mut encoded = original.clone();
            xor_buffer(&mut encoded, &other).unwrap();
            xor_buffer(&mut encoded, &other).unwrap();
            prop_assert_eq!(encoded, original);
        }
    }
}
