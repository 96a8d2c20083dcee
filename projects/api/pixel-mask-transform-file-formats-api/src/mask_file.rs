//! Reading and writing mask text files.
//!
//! A mask file is a sequence of whitespace separated integers. The first one is
//! the seed (a byte offset into the target buffer), every following group of
//! three is one `R G B` correction triplet:
//!
//! ```text
//! 5
//! 10 20 30
//! 40 50 60
//! ```
//!
//! Line breaks carry no meaning beyond separating tokens. A trailing group with
//! fewer than three components is dropped.

use crate::error::MaskFileError;
use crate::file_io::{read_mapped, write_mapped, FileOperationResult};
use core::fmt::Write;
use log::{debug, warn};
use pixel_mask_transform_core::{MaskRecord, Triplet};
use std::path::Path;

/// Parses mask file contents in a single forward pass.
///
/// # Errors
///
/// - [`MaskFileError::MissingSeed`] if `text` holds no tokens
/// - [`MaskFileError::MalformedMaskFile`] for a negative or non-numeric seed, or
///   a component that is not an integer in `0..=255`
pub fn parse_mask_text(text: &str) -> Result<MaskRecord, MaskFileError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(line, content)| content.split_whitespace().map(move |t| (line + 1, t)));

    let (line, token) = tokens.next().ok_or(MaskFileError::MissingSeed)?;
    let seed = token
        .parse::<usize>()
        .map_err(|_| malformed(line, token, "is not a non-negative seed offset"))?;

    let mut triplets: Vec<Triplet> = Vec::new();
    let mut pending: Triplet = [0; 3];
    let mut filled = 0;
    for (line, token) in tokens {
        pending[filled] = token
            .parse::<u8>()
            .map_err(|_| malformed(line, token, "is not a colour component in 0..=255"))?;
        filled += 1;
        if filled == pending.len() {
            triplets.push(pending);
            filled = 0;
        }
    }

    if filled != 0 {
        warn!("mask file ends with an incomplete triplet, ignoring {filled} trailing value(s)");
    }

    debug!("parsed mask: seed {seed}, {} triplet(s)", triplets.len());
    Ok(MaskRecord::new(seed, triplets))
}

fn malformed(line: usize, token: &str, reason: &'static str) -> MaskFileError {
    MaskFileError::MalformedMaskFile {
        line,
        token: token.to_string(),
        reason,
    }
}

/// Formats `record` as mask file text: the seed on the first line, then one
/// triplet per line.
pub fn format_mask_text(record: &MaskRecord) -> String {
    let mut text = format!("{}\n", record.seed);
    for [r, g, b] in &record.triplets {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{r} {g} {b}");
    }
    text
}

/// Loads and parses the mask file at `path`.
///
/// # Errors
///
/// - [`crate::FileOperationError::Io`] if the file cannot be read
/// - [`MaskFileError::InvalidEncoding`] if it is not UTF-8 text
/// - Anything [`parse_mask_text`] rejects
pub fn load_mask_file(path: &Path) -> FileOperationResult<MaskRecord> {
    read_mapped(path, |bytes| {
        let text = core::str::from_utf8(bytes).map_err(|_| MaskFileError::InvalidEncoding)?;
        Ok(parse_mask_text(text)?)
    })
}

/// Writes `record` to `path` in the format read by [`load_mask_file`].
///
/// # Returns
///
/// The number of bytes written.
pub fn save_mask_file(record: &MaskRecord, path: &Path) -> FileOperationResult<usize> {
    let text = format_mask_text(record);
    write_mapped(path, text.as_bytes())?;
    Ok(text.len())
}
