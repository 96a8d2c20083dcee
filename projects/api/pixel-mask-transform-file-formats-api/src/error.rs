//! Error types for codec, mask file and variant operations.

use crate::file_io::FileOperationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the image codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file is not an image the codec understands.
    #[error("Could not decode image {}: {source}", .path.display())]
    DecodeFailure {
        /// File that failed to decode
        path: PathBuf,
        /// Codec error
        #[source]
        source: image::ImageError,
    },

    /// The buffer could not be encoded as BMP.
    #[error("Could not encode image {}: {source}", .path.display())]
    EncodeFailure {
        /// File that was being written
        path: PathBuf,
        /// Codec error
        #[source]
        source: image::ImageError,
    },

    /// The image decoded fine but has no pixels.
    #[error("Image {} has unusable dimensions {width}x{height}", .path.display())]
    InvalidDimensions {
        /// File that was decoded
        path: PathBuf,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

/// Errors raised while reading a mask text file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskFileError {
    /// The file holds no tokens at all.
    #[error("Mask file is empty, expected a seed")]
    MissingSeed,

    /// A token is not a valid seed or colour component.
    #[error("Malformed mask file at line {line}: '{token}' {reason}")]
    MalformedMaskFile {
        /// 1-based line number
        line: usize,
        /// The offending token
        token: String,
        /// What was expected instead
        reason: &'static str,
    },

    /// The file is not valid UTF-8 text.
    #[error("Mask file is not valid UTF-8 text")]
    InvalidEncoding,
}

/// A variant or plan failed. Names the plan and the file being processed.
#[derive(Debug, Error)]
#[error("{stage} failed on {}: {source}", .input.display())]
pub struct RunError {
    /// Name of the plan that failed
    pub stage: &'static str,
    /// The input file being processed when it failed
    pub input: PathBuf,
    /// The underlying error
    #[source]
    pub source: FileOperationError,
}

impl RunError {
    /// Creates a new error for `stage` failing on `input`.
    pub fn new(stage: &'static str, input: impl Into<PathBuf>, source: impl Into<FileOperationError>) -> Self {
        Self {
            stage,
            input: input.into(),
            source: source.into(),
        }
    }
}
