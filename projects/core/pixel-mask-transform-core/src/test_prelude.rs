//! Common test imports and utilities for core tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// Re-export commonly used alloc types for tests
pub use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

// External crates commonly used in tests
pub use proptest::prelude::*;
pub use rstest::rstest;

use crate::ByteBuffer;

/// Builds a `width` x `height` buffer whose bytes count up from 0, wrapping at 256.
pub fn sequential_buffer(width: u32, height: u32) -> ByteBuffer {
    let len = width as usize * height as usize * crate::CHANNELS;
    let bytes = (0..len).map(|x| (x % 256) as u8).collect();
    ByteBuffer::new(width, height, bytes).unwrap()
}

/// Builds a `width` x `height` buffer filled with a cheap pseudo-random pattern.
pub fn noise_buffer(width: u32, height: u32, salt: u8) -> ByteBuffer {
    let len = width as usize * height as usize * crate::CHANNELS;
    let bytes = (0..len)
        .map(|x| ((x as u32).wrapping_mul(2654435761) >> 13) as u8 ^ salt)
        .collect();
    ByteBuffer::new(width, height, bytes).unwrap()
}
