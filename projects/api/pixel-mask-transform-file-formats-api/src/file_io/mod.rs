//! File I/O operations for images and mask files.
//!
//! Files are read through a read-only memory mapping and written through a
//! preallocated read-write mapping, using `lightweight-mmap`. Each call opens,
//! maps, reads or writes, and releases the file before returning.

mod error;
pub use error::*;

mod lightweight_mmap_impl;

// Public API lives in there.
// If adding alternative implementation, you need to swap it out.
pub use lightweight_mmap_impl::*;
