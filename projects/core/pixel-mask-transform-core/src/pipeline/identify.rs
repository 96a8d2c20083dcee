//! Identifying which transform produced an encoded buffer.
//!
//! A producer publishes the masking result of an intermediate image (see
//! [`crate::MaskRecord::from_masked`]) alongside the encoded output. Undoing
//! each candidate step on a copy of the encoded buffer and checking the copy
//! against that record tells which candidate was applied.

use super::{MaskOperation, PipelineStep};
use crate::buffer::ByteBuffer;
use crate::error::TransformError;
use crate::mask::matches;
use log::{debug, trace};

/// Returns the index of the first candidate whose inverse, applied to a copy of
/// `encoded`, yields a buffer that agrees with `check`.
///
/// Candidates without an inverse, and candidates whose inverse fails on this
/// buffer (e.g. an XOR reference of the wrong size), are skipped. Returns
/// `Ok(None)` when no candidate matches.
///
/// # Errors
///
/// - [`TransformError::OutOfRange`] / [`TransformError::MaskTooShort`] if the
///   check record cannot be evaluated against a buffer of this size
pub fn identify_inverse(
    encoded: &ByteBuffer,
    candidates: &[PipelineStep],
    check: &MaskOperation,
) -> Result<Option<usize>, TransformError> {
    for (index, candidate) in candidates.iter().enumerate() {
        if !candidate.is_invertible() {
            trace!("candidate {index} ({}) has no inverse", candidate.name());
            continue;
        }

        let mut restored = encoded.clone();
        if let Err(e) = candidate.inverse(&mut restored) {
            debug!("candidate {index} ({}) not applicable: {e}", candidate.name());
            continue;
        }

        if matches(&restored, &check.mask, &check.record)? {
            debug!("candidate {index} ({}) matches mask record", candidate.name());
            return Ok(Some(index));
        }
    }

    Ok(None)
}
