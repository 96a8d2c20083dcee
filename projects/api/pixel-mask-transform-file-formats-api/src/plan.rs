//! Declarative descriptions of the program variants.
//!
//! A [`Plan`] names its input, the stages to run, which intermediates to keep
//! and where the result goes, all in terms of [`FileRole`]s. It holds no
//! buffers; [`crate::run_plan`] resolves the roles against a
//! [`crate::FileLayout`] and loads whatever the stages reference.
//!
//! The four [`Variant`]s build on one another:
//!
//! | Variant       | Input  | Stages                                          | Output |
//! |---------------|--------|-------------------------------------------------|--------|
//! | `modify`      | `I_O`  | gradient                                        | `I_D`  |
//! | `rotate`      | `I_O`  | gradient (→ `I_D`), rotate right 3              | `P2`   |
//! | `xor`         | `I_O`  | gradient (→ `I_D`), rotate right 3 (→ `P2`), XOR `I_M` | `P3` |
//! | `reconstruct` | `P3`   | undo XOR `I_M`, undo rotate right 3             | `I_R`  |

use crate::layout::FileRole;
use core::fmt;
use core::str::FromStr;
use derive_enum_all_values::AllValues;

/// Rotation applied by the `rotate` variant.
pub const ROTATE_BITS: u32 = 3;

/// A stage whose operands are files rather than buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSpec {
    /// XOR every byte with a key.
    XorKey(u8),
    /// XOR with the image stored under the given role.
    XorImage(FileRole),
    /// Rotate every byte right.
    RotateRight(u32),
    /// Rotate every byte left.
    RotateLeft(u32),
    /// Shift every byte left.
    ShiftLeft(u32),
    /// Shift every byte right.
    ShiftRight(u32),
    /// Replace every pixel with the grey ramp.
    Gradient,
    /// Seed-addressed masking with a mask file and a mask image.
    Mask {
        /// Role of the mask text file
        record: FileRole,
        /// Role of the mask image
        mask: FileRole,
    },
}

/// A stage, and optionally the role its result is saved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStage {
    /// The stage to run
    pub stage: StageSpec,
    /// Where to save the buffer after this stage ran
    pub save_as: Option<FileRole>,
}

/// Whether a plan runs its stages forward or undoes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward operations, in order.
    Encode,
    /// Inverse operations, in reverse order.
    Decode,
}

/// What a plan does with the mask file after writing its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskUse {
    /// Leave the mask file alone.
    Ignore,
    /// Load the mask file and check its recorded masking result against the
    /// output, using the mask image. Skipped with a warning if either file is
    /// missing.
    Verify,
}

/// A complete, file-level description of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Name used in logs and errors
    pub name: &'static str,
    /// Image the stages run on
    pub input: FileRole,
    /// Whether to encode or decode
    pub direction: Direction,
    /// Stages in encode order
    pub stages: Vec<PlannedStage>,
    /// Where the final buffer is saved
    pub output: FileRole,
    /// What to do with the mask file
    pub mask: MaskUse,
}

impl Plan {
    /// A plan with no stages that encodes `input` into `output`.
    pub fn encode(name: &'static str, input: FileRole, output: FileRole) -> Self {
        Self {
            name,
            input,
            direction: Direction::Encode,
            stages: Vec::new(),
            output,
            mask: MaskUse::Ignore,
        }
    }

    /// A plan with no stages that decodes `input` into `output`.
    pub fn decode(name: &'static str, input: FileRole, output: FileRole) -> Self {
        Self {
            direction: Direction::Decode,
            ..Self::encode(name, input, output)
        }
    }

    /// Appends a stage.
    pub fn stage(mut self, stage: StageSpec) -> Self {
        self.stages.push(PlannedStage {
            stage,
            save_as: None,
        });
        self
    }

    /// Appends a stage whose result is also saved under `role`.
    pub fn stage_saved(mut self, stage: StageSpec, role: FileRole) -> Self {
        self.stages.push(PlannedStage {
            stage,
            save_as: Some(role),
        });
        self
    }

    /// Sets what to do with the mask file.
    pub fn mask(mut self, mask: MaskUse) -> Self {
        self.mask = mask;
        self
    }

    /// Every role the plan reads, in the order it first needs them.
    pub fn inputs(&self) -> Vec<FileRole> {
        let mut roles = vec![self.input];
        for planned in &self.stages {
            match planned.stage {
                StageSpec::XorImage(role) => roles.push(role),
                StageSpec::Mask { record, mask } => roles.extend([record, mask]),
                _ => {}
            }
        }
        roles
    }

    /// Every role the plan writes: saved intermediates in stage order, then the output.
    pub fn outputs(&self) -> Vec<FileRole> {
        let mut roles: Vec<FileRole> = self.stages.iter().filter_map(|s| s.save_as).collect();
        roles.push(self.output);
        roles
    }
}

/// The preset variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum Variant {
    /// Overwrite every pixel with a grey ramp.
    Modify,
    /// Modify, then rotate every byte right by [`ROTATE_BITS`].
    Rotate,
    /// Rotate, then XOR with the reference image.
    Xor,
    /// Undo the XOR and the rotation, recovering the modified image.
    Reconstruct,
}

impl Variant {
    /// Name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Modify => "modify",
            Variant::Rotate => "rotate",
            Variant::Xor => "xor",
            Variant::Reconstruct => "reconstruct",
        }
    }

    /// The plan this variant runs.
    pub fn plan(self) -> Plan {
        use FileRole::*;
        match self {
            Variant::Modify => Plan::encode(self.name(), Original, Modified).stage(StageSpec::Gradient),
            Variant::Rotate => Plan::encode(self.name(), Original, Rotated)
                .stage_saved(StageSpec::Gradient, Modified)
                .stage(StageSpec::RotateRight(ROTATE_BITS)),
            Variant::Xor => Plan::encode(self.name(), Original, XorResult)
                .stage_saved(StageSpec::Gradient, Modified)
                .stage_saved(StageSpec::RotateRight(ROTATE_BITS), Rotated)
                .stage(StageSpec::XorImage(XorReference)),
            Variant::Reconstruct => Plan::decode(self.name(), XorResult, Reconstructed)
                .stage(StageSpec::RotateRight(ROTATE_BITS))
                .stage(StageSpec::XorImage(XorReference))
                .mask(MaskUse::Verify),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Variant::all_values()
            .iter()
            .copied()
            .find(|v| v.name() == lower)
            .ok_or_else(|| {
                let names: Vec<_> = Variant::all_values().iter().map(|v| v.name()).collect();
                format!("Unknown variant: {s}. Valid options: {}", names.join(", "))
            })
    }
}
