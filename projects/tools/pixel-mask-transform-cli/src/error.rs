use pixel_mask_transform_file_formats_api::{FileOperationError, RunError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: FileOperationError,
    },
    #[error("{failed} of {total} variant(s) did not complete")]
    VariantsFailed { failed: usize, total: usize },
}
