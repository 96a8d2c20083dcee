#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod error;
pub mod mask;
pub mod ops;
pub mod pipeline;

pub use buffer::{ByteBuffer, CHANNELS};
pub use error::{PipelineError, TransformError};
pub use mask::{MaskRecord, Triplet};
pub use pipeline::{identify_inverse, MaskOperation, Pipeline, PipelineStep, TransformStage};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
