//! Common test imports and utilities for file format tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

pub use rstest::rstest;
pub use std::path::{Path, PathBuf};
pub use tempfile::{tempdir, TempDir};

use crate::ByteBuffer;

/// Builds a `width` x `height` buffer filled with a cheap pseudo-random pattern.
pub fn noise_buffer(width: u32, height: u32, salt: u8) -> ByteBuffer {
    let len = width as usize * height as usize * 3;
    let bytes = (0..len)
        .map(|x| ((x as u32).wrapping_mul(2654435761) >> 13) as u8 ^ salt)
        .collect();
    ByteBuffer::new(width, height, bytes).unwrap()
}
