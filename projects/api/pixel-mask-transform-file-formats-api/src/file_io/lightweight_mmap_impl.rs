//! File I/O implementation using lightweight-mmap.

use crate::file_io::{FileOperationError, FileOperationResult};
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use log::{trace, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Maps `path` read-only and hands its contents to `read`.
///
/// The mapping is released before this function returns. Empty files are
/// passed to `read` as an empty slice without being mapped.
///
/// # Arguments
///
/// * `path` - The file to read
/// * `read` - Consumes the file contents
///
/// # Returns
///
/// Whatever `read` returns, or the error that prevented opening the file.
pub fn read_mapped<T>(
    path: &Path,
    read: impl FnOnce(&[u8]) -> FileOperationResult<T>,
) -> FileOperationResult<T> {
    let handle = ReadOnlyFileHandle::open(path)?;
    let size = handle.size()? as usize;
    trace!("read {} ({size} bytes)", path.display());

    if size == 0 {
        return read(&[]);
    }

    let mapping = ReadOnlyMmap::new(&handle, 0, size)?;
    read(mapping.as_slice())
}

/// Writes `data` to `path`, replacing any existing file.
///
/// # Arguments
///
/// * `path` - Path to the output file (will be created). The output directory must exist.
/// * `data` - The complete file contents
///
/// # Returns
///
/// Result indicating success or error
pub fn write_mapped(path: &Path, data: &[u8]) -> FileOperationResult<()> {
    // A preallocated handle does not shrink an existing, longer file.
    remove_if_exists(path)?;

    trace!("write {} ({} bytes)", path.display(), data.len());
    if data.is_empty() {
        fs::File::create(path)?;
        return Ok(());
    }

    let handle = ReadWriteFileHandle::create_preallocated(path, data.len() as i64)?;
    let mapped = match ReadWriteMmap::new(&handle, 0, data.len()).map_err(FileOperationError::from) {
        Ok(mut mapping) => {
            mapping.as_mut_slice().copy_from_slice(data);
            Ok(())
        }
        Err(e) => Err(e),
    };
    if let Err(e) = mapped {
        // The preallocated file is full length but zero filled.
        drop(handle);
        return discard_on_error(path, Err(e));
    }
    Ok(())
}

/// Deletes `path`. A file that does not exist is not an error.
pub fn remove_if_exists(path: &Path) -> FileOperationResult<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Passes `result` through, deleting `path` first if it is an error.
///
/// The original error is returned even if the deletion fails.
fn discard_on_error<T>(path: &Path, result: FileOperationResult<T>) -> FileOperationResult<T> {
    if result.is_err() {
        if let Err(e) = remove_if_exists(path) {
            warn!("could not remove incomplete file {}: {e}", path.display());
        }
    }
    result
}
