#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod file_io;
pub mod layout;
pub mod mask_file;
pub mod plan;
pub mod runner;

pub use codec::{load_image, save_image};
pub use error::{CodecError, MaskFileError, RunError};
pub use file_io::{FileOperationError, FileOperationResult};
pub use layout::{FileLayout, FileLayoutBuilder, FileRole};
pub use mask_file::{format_mask_text, load_mask_file, parse_mask_text, save_mask_file};
pub use plan::{Direction, MaskUse, Plan, PlannedStage, StageSpec, Variant};
pub use runner::{run_plan, run_variant, run_variants, RunReport, VariantOutcome};

// Re-export the core types callers need to inspect results.
pub use pixel_mask_transform_core::{ByteBuffer, MaskRecord, PipelineError, TransformError};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
