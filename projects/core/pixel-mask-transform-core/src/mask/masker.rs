use super::{mask_region, validate, MaskRecord};
use crate::buffer::ByteBuffer;
use crate::error::TransformError;

/// Writes the masked samples into `target`: for every `k` in the region,
/// `target[seed + k] = (samples[k] + mask[k]) mod 256`.
///
/// # Errors
///
/// - [`TransformError::OutOfRange`] if `seed + 3 * triplets` exceeds `target.len()`
/// - [`TransformError::MaskTooShort`] if `mask` is shorter than the region
///
/// Both are checked before the first write.
pub fn apply_correction(
    target: &mut ByteBuffer,
    mask: &ByteBuffer,
    record: &MaskRecord,
) -> Result<(), TransformError> {
    let range = validate(target.len(), mask, record)?;
    let mask = mask_region(mask, record.region_len())?;

    let region = &mut target.as_mut_slice()[range];
    for ((dst, &sample), &m) in region.iter_mut().zip(record.samples()).zip(mask) {
        *dst = sample.wrapping_add(m);
    }

    Ok(())
}

/// Undoes [`apply_correction`]: for every `k` in the region,
/// `target[seed + k] = (target[seed + k] - mask[k]) mod 256`.
///
/// The bytes resident in `target` are treated as the masked samples; the
/// record only supplies the seed and the region length.
///
/// # Errors
///
/// Same as [`apply_correction`], also checked before the first write.
pub fn reverse_correction(
    target: &mut ByteBuffer,
    mask: &ByteBuffer,
    record: &MaskRecord,
) -> Result<(), TransformError> {
    let range = validate(target.len(), mask, record)?;
    let mask = mask_region(mask, record.region_len())?;

    let region = &mut target.as_mut_slice()[range];
    for (dst, &m) in region.iter_mut().zip(mask) {
        *dst = dst.wrapping_sub(m);
    }

    Ok(())
}

/// Whether masking the region of `target` reproduces the recorded samples,
/// i.e. `target[seed + k] + mask[k] == samples[k]` (mod 256) for every `k`.
///
/// # Errors
///
/// Same bounds checks as [`apply_correction`].
pub fn matches(
    target: &ByteBuffer,
    mask: &ByteBuffer,
    record: &MaskRecord,
) -> Result<bool, TransformError> {
    let range = validate(target.len(), mask, record)?;
    let mask = mask_region(mask, record.region_len())?;

    Ok(target.as_slice()[range]
        .iter()
        .zip(mask)
        .zip(record.samples())
        .all(|((&t, &m), &sample)| t.wrapping_add(m) == sample))
}
