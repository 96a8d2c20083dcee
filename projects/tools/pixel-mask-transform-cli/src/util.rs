use bytesize::ByteSize;
use core::fmt;
use core::time::Duration;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonicalizes a CLI directory argument. The directory must already exist,
/// since it holds the input images.
///
/// # Arguments
///
/// * `value` - The path string to canonicalize
///
/// # Returns
///
/// A canonicalized PathBuf on success, or a String error message on failure.
pub fn canonicalize_cli_path(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);
    if !path.is_dir() {
        return Err(format!("Not a directory: {value}"));
    }

    fs::canonicalize(path).map_err(|e| format!("Invalid path: {e}"))
}

/// Bytes written per second, formatted like `12.3 MiB/s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput(u64);

impl Throughput {
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            Self((bytes as f64 / secs) as u64)
        } else {
            Self(0)
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", ByteSize(self.0))
    }
}
