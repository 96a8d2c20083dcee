//! Error types for file I/O operations.

use crate::error::{CodecError, MaskFileError};
use pixel_mask_transform_core::{PipelineError, TransformError};
use thiserror::Error;

/// Result type for file operations
pub type FileOperationResult<T> = Result<T, FileOperationError>;

/// Errors that can occur during file operations.
///
/// File operations can fail due to I/O errors (file not found, permission denied, etc.),
/// codec or mask file errors (unreadable content), or transform errors (invalid data).
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// I/O operation failed
    #[error("I/O operation failed: {0}")]
    Io(#[from] FileIoError),

    /// Image could not be decoded or encoded
    #[error("{0}")]
    Codec(#[from] CodecError),

    /// Mask file could not be parsed
    #[error("{0}")]
    MaskFile(#[from] MaskFileError),

    /// Transform or masking operation failed
    #[error("Transform operation failed: {0}")]
    Transform(#[from] TransformError),

    /// Pipeline failed
    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Specific backend-related errors that can occur during file I/O operations.
#[derive(Debug, Error)]
pub enum LightweightMmapError {
    /// Error opening file handle
    #[error("Failed to open file handle: {0}")]
    FileHandle(#[from] lightweight_mmap::handles::HandleOpenError),

    /// Error creating memory mapping
    #[error("Failed to create memory mapping: {0}")]
    MemoryMapping(#[from] lightweight_mmap::mmap::MmapError),
}

/// File I/O errors that can occur with different backends
#[derive(Debug, Error)]
pub enum FileIoError {
    /// Error from lightweight-mmap backend
    #[error("lightweight-mmap error: {0}")]
    LightweightMmap(#[from] LightweightMmapError),

    /// Error from std I/O operations
    #[error("I/O error: {0}")]
    Std(#[from] std::io::Error),
}

// Direct From implementations for specific error types used with ? operator in file operations
impl From<lightweight_mmap::handles::HandleOpenError> for FileOperationError {
    fn from(e: lightweight_mmap::handles::HandleOpenError) -> Self {
        Self::Io(FileIoError::LightweightMmap(
            LightweightMmapError::FileHandle(e),
        ))
    }
}

impl From<lightweight_mmap::mmap::MmapError> for FileOperationError {
    fn from(e: lightweight_mmap::mmap::MmapError) -> Self {
        Self::Io(FileIoError::LightweightMmap(
            LightweightMmapError::MemoryMapping(e),
        ))
    }
}

impl From<std::io::Error> for FileOperationError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(FileIoError::Std(e))
    }
}
