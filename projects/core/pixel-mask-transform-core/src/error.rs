//! Error types for buffer, masking and pipeline operations.

use core::convert::Infallible;
use core::fmt::Debug;
use thiserror::Error;

/// Errors raised by a single transform or masking operation.
///
/// None of these are clamped or recovered from internally: an operation that
/// returns one of them has not modified its target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The dimensions are zero, overflow, or disagree with the byte count.
    #[error("Invalid dimensions: {width}x{height} with {len} bytes. Length must equal width * height * 3.")]
    InvalidDimensions {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Number of bytes supplied
        len: usize,
    },

    /// Two buffers that must be the same length are not.
    #[error("Length mismatch: expected {expected} bytes, got {actual} bytes.")]
    LengthMismatch {
        /// Length of the target buffer
        expected: usize,
        /// Length of the other buffer
        actual: usize,
    },

    /// A byte or region lies (partly) outside the buffer.
    #[error("Out of range: {len} byte(s) at offset {offset} do not fit in a buffer of {capacity} bytes.")]
    OutOfRange {
        /// First byte of the region
        offset: usize,
        /// Length of the region
        len: usize,
        /// Length of the buffer
        capacity: usize,
    },

    /// The mask buffer has fewer bytes than the region being patched.
    #[error("Mask too short: region needs {needed} bytes, but the mask only has {actual} bytes.")]
    MaskTooShort {
        /// Region length in bytes
        needed: usize,
        /// Mask length in bytes
        actual: usize,
    },

    /// An inverse was requested for a stage that discards information.
    #[error("The {stage} stage has no inverse.")]
    NotInvertible {
        /// Name of the stage
        stage: &'static str,
    },
}

/// Errors raised while running a [`crate::Pipeline`].
///
/// `E` is the error type of the per-step observer passed to
/// [`crate::Pipeline::encode_with`] / [`crate::Pipeline::decode_with`].
#[derive(Debug, Error)]
pub enum PipelineError<E = Infallible>
where
    E: Debug,
{
    /// Decode was requested but a step cannot be undone. Raised before any step runs.
    #[error("Step {index} ({stage}) has no inverse, the pipeline cannot be decoded.")]
    NotInvertible {
        /// Index of the first offending step
        index: usize,
        /// Name of the offending step
        stage: &'static str,
    },

    /// A step failed. Steps before it have already been applied.
    #[error("Step {index} ({stage}) failed: {source}")]
    Stage {
        /// Index of the failing step
        index: usize,
        /// Name of the failing step
        stage: &'static str,
        /// The underlying error
        #[source]
        source: TransformError,
    },

    /// The observer rejected an intermediate buffer.
    #[error("Step observer failed: {0:?}")]
    Observer(E),
}

impl<E: Debug> PipelineError<E> {
    /// Separates observer errors from pipeline errors.
    ///
    /// Returns [`Err`] with the observer's own error, or [`Ok`] with the same
    /// pipeline error re-typed to carry no observer.
    pub fn split_observer(self) -> Result<PipelineError, E> {
        match self {
            PipelineError::Observer(e) => Err(e),
            PipelineError::NotInvertible { index, stage } => {
                Ok(PipelineError::NotInvertible { index, stage })
            }
            PipelineError::Stage {
                index,
                stage,
                source,
            } => Ok(PipelineError::Stage {
                index,
                stage,
                source,
            }),
        }
    }
}
