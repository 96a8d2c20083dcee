//! Well-known file names the variants read and write.
//!
//! Every variant works on a fixed set of files inside one directory. The names
//! are fixed by default and only configurable through [`FileLayoutBuilder`],
//! for tests and for embedding the runner in other tools.

use derive_enum_all_values::AllValues;
use std::path::{Path, PathBuf};

/// The part a file plays in the variant chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum FileRole {
    /// The untouched input image.
    Original,
    /// Output of the `modify` variant.
    Modified,
    /// Output of the `rotate` variant.
    Rotated,
    /// Reference image XOR-ed into the rotated image.
    XorReference,
    /// Output of the `xor` variant.
    XorResult,
    /// Mask image combined with the mask file triplets.
    MaskImage,
    /// Mask text file (seed and triplets).
    MaskFile,
    /// Output of the `reconstruct` variant.
    Reconstructed,
}

impl FileRole {
    /// File name used when the layout does not override it.
    pub const fn default_name(self) -> &'static str {
        match self {
            FileRole::Original => "I_O.bmp",
            FileRole::Modified => "I_D.bmp",
            FileRole::Rotated => "P2.bmp",
            FileRole::XorReference => "I_M.bmp",
            FileRole::XorResult => "P3.bmp",
            FileRole::MaskImage => "M.bmp",
            FileRole::MaskFile => "M1.txt",
            FileRole::Reconstructed => "I_R.bmp",
        }
    }

    /// Human readable description, for reports.
    pub const fn description(self) -> &'static str {
        match self {
            FileRole::Original => "original image",
            FileRole::Modified => "modified image",
            FileRole::Rotated => "rotated image",
            FileRole::XorReference => "XOR reference image",
            FileRole::XorResult => "XOR result",
            FileRole::MaskImage => "mask image",
            FileRole::MaskFile => "mask file",
            FileRole::Reconstructed => "reconstructed image",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

const ROLE_COUNT: usize = FileRole::all_values().len();

/// Directory and file names for one run of the variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLayout {
    dir: PathBuf,
    names: [String; ROLE_COUNT],
}

impl Default for FileLayout {
    /// The default names, relative to the current directory.
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl FileLayout {
    /// The default names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: core::array::from_fn(|i| FileRole::all_values()[i].default_name().to_string()),
        }
    }

    /// Directory all files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for `role`.
    pub fn name(&self, role: FileRole) -> &str {
        &self.names[role.index()]
    }

    /// Full path for `role`.
    pub fn path(&self, role: FileRole) -> PathBuf {
        self.dir.join(self.name(role))
    }
}

/// Builder for a [`FileLayout`] with overridden directory or names.
#[derive(Debug, Clone, Default)]
pub struct FileLayoutBuilder {
    dir: Option<PathBuf>,
    names: Vec<(FileRole, String)>,
}

impl FileLayoutBuilder {
    /// Create a new builder starting from the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory holding the files. Defaults to the current directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Override the file name used for `role`.
    pub fn name(mut self, role: FileRole, name: impl Into<String>) -> Self {
        self.names.push((role, name.into()));
        self
    }

    /// Build the layout. Later overrides of the same role win.
    pub fn build(self) -> FileLayout {
        let mut layout = match self.dir {
            Some(dir) => FileLayout::in_dir(dir),
            None => FileLayout::default(),
        };
        for (role, name) in self.names {
            layout.names[role.index()] = name;
        }
        layout
    }
}
