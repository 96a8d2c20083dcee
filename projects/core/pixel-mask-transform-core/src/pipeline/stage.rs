//! Pipeline steps and their forward/inverse operations.

use crate::buffer::ByteBuffer;
use crate::error::TransformError;
use crate::mask::{apply_correction, reverse_correction, MaskRecord};
use crate::ops;

/// An elementary transform over a whole buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformStage {
    /// XOR every byte with a key. Self-inverse.
    XorKey(u8),
    /// XOR with a reference buffer of the same length. Self-inverse.
    XorBuffer(ByteBuffer),
    /// Rotate every byte right by `n % 8` bits. Inverse of [`TransformStage::RotateLeft`].
    RotateRight(u32),
    /// Rotate every byte left by `n % 8` bits. Inverse of [`TransformStage::RotateRight`].
    RotateLeft(u32),
    /// Shift every byte left by `n` bits. Lossy, has no inverse.
    ShiftLeft(u32),
    /// Shift every byte right by `n` bits. Lossy, has no inverse.
    ShiftRight(u32),
    /// Replace every pixel with the grey ramp of [`ops::fill_gradient`]. Has no inverse.
    Gradient,
}

impl TransformStage {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TransformStage::XorKey(_) => "xor-key",
            TransformStage::XorBuffer(_) => "xor-buffer",
            TransformStage::RotateRight(_) => "rotate-right",
            TransformStage::RotateLeft(_) => "rotate-left",
            TransformStage::ShiftLeft(_) => "shift-left",
            TransformStage::ShiftRight(_) => "shift-right",
            TransformStage::Gradient => "gradient",
        }
    }

    /// Whether [`TransformStage::inverse`] can undo [`TransformStage::forward`].
    pub fn is_invertible(&self) -> bool {
        !matches!(
            self,
            TransformStage::ShiftLeft(_) | TransformStage::ShiftRight(_) | TransformStage::Gradient
        )
    }

    /// Applies the stage to `buffer` in place.
    ///
    /// # Errors
    ///
    /// - [`TransformError::LengthMismatch`] for [`TransformStage::XorBuffer`] with a
    ///   reference of a different length
    pub fn forward(&self, buffer: &mut ByteBuffer) -> Result<(), TransformError> {
        let bytes = buffer.as_mut_slice();
        match self {
            TransformStage::XorKey(key) => ops::xor_key(bytes, *key),
            TransformStage::XorBuffer(reference) => ops::xor_buffer(bytes, reference.as_slice())?,
            TransformStage::RotateRight(n) => ops::rotate_right_slice(bytes, *n),
            TransformStage::RotateLeft(n) => ops::rotate_left_slice(bytes, *n),
            TransformStage::ShiftLeft(n) => ops::shift_left_slice(bytes, *n),
            TransformStage::ShiftRight(n) => ops::shift_right_slice(bytes, *n),
            TransformStage::Gradient => ops::fill_gradient(bytes),
        }
        Ok(())
    }

    /// Undoes [`TransformStage::forward`] in place.
    ///
    /// # Errors
    ///
    /// - [`TransformError::NotInvertible`] for shifts and the gradient fill
    /// - [`TransformError::LengthMismatch`] as for [`TransformStage::forward`]
    pub fn inverse(&self, buffer: &mut ByteBuffer) -> Result<(), TransformError> {
        let bytes = buffer.as_mut_slice();
        match self {
            TransformStage::XorKey(key) => ops::xor_key(bytes, *key),
            TransformStage::XorBuffer(reference) => ops::xor_buffer(bytes, reference.as_slice())?,
            TransformStage::RotateRight(n) => ops::rotate_left_slice(bytes, *n),
            TransformStage::RotateLeft(n) => ops::rotate_right_slice(bytes, *n),
            TransformStage::ShiftLeft(_)
            | TransformStage::ShiftRight(_)
            | TransformStage::Gradient => {
                return Err(TransformError::NotInvertible { stage: self.name() })
            }
        }
        Ok(())
    }
}

/// A seed-addressed masking step: the record to apply and the mask buffer it is
/// combined with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOperation {
    /// Seed and correction triplets.
    pub record: MaskRecord,
    /// Mask buffer, at least `record.region_len()` bytes long.
    pub mask: ByteBuffer,
}

impl MaskOperation {
    /// Pairs a record with its mask buffer.
    pub fn new(record: MaskRecord, mask: ByteBuffer) -> Self {
        Self { record, mask }
    }
}

/// One entry of a [`crate::Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStep {
    /// An elementary whole-buffer transform.
    Transform(TransformStage),
    /// Masking of a sub-region; forward is [`apply_correction`], inverse is [`reverse_correction`].
    Mask(MaskOperation),
}

impl PipelineStep {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::Transform(stage) => stage.name(),
            PipelineStep::Mask(_) => "mask",
        }
    }

    /// Whether the step can be undone.
    pub fn is_invertible(&self) -> bool {
        match self {
            PipelineStep::Transform(stage) => stage.is_invertible(),
            PipelineStep::Mask(_) => true,
        }
    }

    /// Applies the step to `buffer` in place.
    pub fn forward(&self, buffer: &mut ByteBuffer) -> Result<(), TransformError> {
        match self {
            PipelineStep::Transform(stage) => stage.forward(buffer),
            PipelineStep::Mask(op) => apply_correction(buffer, &op.mask, &op.record),
        }
    }

    /// Undoes the step in place.
    pub fn inverse(&self, buffer: &mut ByteBuffer) -> Result<(), TransformError> {
        match self {
            PipelineStep::Transform(stage) => stage.inverse(buffer),
            PipelineStep::Mask(op) => reverse_correction(buffer, &op.mask, &op.record),
        }
    }
}

impl From<TransformStage> for PipelineStep {
    fn from(stage: TransformStage) -> Self {
        PipelineStep::Transform(stage)
    }
}

impl From<MaskOperation> for PipelineStep {
    fn from(op: MaskOperation) -> Self {
        PipelineStep::Mask(op)
    }
}
