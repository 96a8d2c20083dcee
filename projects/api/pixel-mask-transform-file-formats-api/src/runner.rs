//! Running plans against files on disk.

use crate::codec::{load_image, save_image};
use crate::error::RunError;
use crate::file_io::{remove_if_exists, FileOperationError};
use crate::layout::{FileLayout, FileRole};
use crate::mask_file::load_mask_file;
use crate::plan::{Direction, MaskUse, Plan, StageSpec, Variant};
use log::{debug, info, warn};
use pixel_mask_transform_core::mask::matches;
use pixel_mask_transform_core::{
    ByteBuffer, MaskOperation, MaskRecord, Pipeline, PipelineStep, TransformStage,
};
use std::path::PathBuf;
use std::time::Instant;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Name of the plan that ran
    pub name: &'static str,
    /// The final output file
    pub output: PathBuf,
    /// Every file written, with its size in bytes. The output comes last.
    pub written: Vec<(PathBuf, usize)>,
    /// The mask record that was checked, if any
    pub mask: Option<MaskRecord>,
    /// Whether the output agrees with the mask record. [`None`] when no check ran.
    pub verified: Option<bool>,
}

impl RunReport {
    /// Total number of bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.written.iter().map(|(_, len)| *len as u64).sum()
    }
}

/// How one variant of a [`run_variants`] call ended.
#[derive(Debug)]
pub enum VariantOutcome {
    /// The variant ran to completion.
    Completed(RunReport),
    /// The variant failed.
    Failed(RunError),
    /// The variant did not run because an earlier variant failed to produce `input`.
    Skipped {
        /// The first input the variant needs that is not up to date
        input: FileRole,
    },
}

/// Runs `variants` in order against the files in `layout`.
///
/// A failure does not stop the run. Files written by a failed or skipped
/// variant are treated as out of date, and a later variant that reads one of
/// them is skipped instead of run. The stale output of a skipped variant is
/// removed.
pub fn run_variants(variants: &[Variant], layout: &FileLayout) -> Vec<(Variant, VariantOutcome)> {
    let mut stale: Vec<FileRole> = Vec::new();
    let mut outcomes = Vec::with_capacity(variants.len());

    for &variant in variants {
        let plan = variant.plan();
        let blocked = plan.inputs().into_iter().find(|role| stale.contains(role));
        let outcome = match blocked {
            Some(input) => {
                warn!(
                    "skipping {variant}: {} was not produced",
                    layout.path(input).display()
                );
                match clear_outputs(&plan, layout) {
                    Ok(()) => VariantOutcome::Skipped { input },
                    Err(e) => VariantOutcome::Failed(e),
                }
            }
            None => {
                let start = Instant::now();
                let result = run_plan(&plan, layout);
                debug!("{variant} took {:.2?}", start.elapsed());
                match result {
                    Ok(report) => VariantOutcome::Completed(report),
                    Err(e) => VariantOutcome::Failed(e),
                }
            }
        };

        let written = plan.outputs();
        match &outcome {
            VariantOutcome::Completed(_) => stale.retain(|role| !written.contains(role)),
            _ => stale.extend(written),
        }
        outcomes.push((variant, outcome));
    }

    outcomes
}

/// Runs the plan of `variant` against the files in `layout`.
pub fn run_variant(variant: Variant, layout: &FileLayout) -> Result<RunReport, RunError> {
    run_plan(&variant.plan(), layout)
}

/// Runs `plan` against the files in `layout`.
///
/// Files the plan writes but does not read are removed first, so a failed run
/// never leaves an earlier run's output in place. The input and every file a
/// stage references are then loaded. Intermediates marked with
/// [`crate::PlannedStage::save_as`] are written as soon as their stage has
/// run; the output is written once every stage succeeded.
///
/// # Errors
///
/// A [`RunError`] naming the plan and the file involved:
/// - an out of date output could not be removed
/// - the input, or a file a stage references, could not be loaded
/// - a stage failed (the error names the input image)
/// - an intermediate or the output could not be saved
/// - the mask check could not be evaluated
pub fn run_plan(plan: &Plan, layout: &FileLayout) -> Result<RunReport, RunError> {
    clear_outputs(plan, layout)?;
    let input_path = layout.path(plan.input);
    let input = load_image(&input_path).map_err(|e| RunError::new(plan.name, &input_path, e))?;
    let pipeline = resolve_stages(plan, layout)?;

    let mut written = Vec::new();
    let observer = |index: usize,
                    _: &PipelineStep,
                    buffer: &ByteBuffer|
     -> Result<(), (PathBuf, FileOperationError)> {
        let Some(role) = plan.stages[index].save_as else {
            return Ok(());
        };
        let path = layout.path(role);
        match save_image(buffer, &path) {
            Ok(len) => {
                written.push((path, len));
                Ok(())
            }
            Err(e) => Err((path, e)),
        }
    };

    let result = match plan.direction {
        Direction::Encode => pipeline.encode_with(input, observer),
        Direction::Decode => pipeline.decode_with(input, observer),
    };
    let output = result.map_err(|e| match e.split_observer() {
        Ok(pipeline_error) => RunError::new(plan.name, &input_path, pipeline_error),
        Err((path, save_error)) => RunError::new(plan.name, path, save_error),
    })?;

    let output_path = layout.path(plan.output);
    let len = save_image(&output, &output_path)
        .map_err(|e| RunError::new(plan.name, &output_path, e))?;
    written.push((output_path.clone(), len));

    let (mask, verified) = match plan.mask {
        MaskUse::Ignore => (None, None),
        MaskUse::Verify => match verify_mask(plan, layout, &output)? {
            Some((record, verified)) => (Some(record), Some(verified)),
            None => (None, None),
        },
    };

    info!(
        "{} wrote {} ({} file(s))",
        plan.name,
        output_path.display(),
        written.len()
    );
    Ok(RunReport {
        name: plan.name,
        output: output_path,
        written,
        mask,
        verified,
    })
}

/// Removes every file `plan` writes, except those it also reads.
fn clear_outputs(plan: &Plan, layout: &FileLayout) -> Result<(), RunError> {
    let inputs = plan.inputs();
    for role in plan.outputs() {
        if inputs.contains(&role) {
            continue;
        }
        let path = layout.path(role);
        remove_if_exists(&path).map_err(|e| RunError::new(plan.name, &path, e))?;
    }
    Ok(())
}

/// Loads the files each stage references and builds the core pipeline.
fn resolve_stages(plan: &Plan, layout: &FileLayout) -> Result<Pipeline, RunError> {
    let load = |role: FileRole| {
        let path = layout.path(role);
        debug!("{} loads {} ({})", plan.name, path.display(), role.description());
        load_image(&path).map_err(|e| RunError::new(plan.name, &path, e))
    };

    let mut pipeline = Pipeline::new();
    for planned in &plan.stages {
        let step: PipelineStep = match planned.stage {
            StageSpec::XorKey(key) => TransformStage::XorKey(key).into(),
            StageSpec::XorImage(role) => TransformStage::XorBuffer(load(role)?).into(),
            StageSpec::RotateRight(n) => TransformStage::RotateRight(n).into(),
            StageSpec::RotateLeft(n) => TransformStage::RotateLeft(n).into(),
            StageSpec::ShiftLeft(n) => TransformStage::ShiftLeft(n).into(),
            StageSpec::ShiftRight(n) => TransformStage::ShiftRight(n).into(),
            StageSpec::Gradient => TransformStage::Gradient.into(),
            StageSpec::Mask { record, mask } => {
                let path = layout.path(record);
                let record =
                    load_mask_file(&path).map_err(|e| RunError::new(plan.name, &path, e))?;
                MaskOperation::new(record, load(mask)?).into()
            }
        };
        pipeline.push(step);
    }

    Ok(pipeline)
}

/// Checks `output` against the mask file. Returns [`None`] if the mask file or
/// the mask image does not exist.
fn verify_mask(
    plan: &Plan,
    layout: &FileLayout,
    output: &ByteBuffer,
) -> Result<Option<(MaskRecord, bool)>, RunError> {
    let record_path = layout.path(FileRole::MaskFile);
    let mask_path = layout.path(FileRole::MaskImage);
    for path in [&record_path, &mask_path] {
        if !path.exists() {
            warn!("{} not found, skipping mask check", path.display());
            return Ok(None);
        }
    }

    let record =
        load_mask_file(&record_path).map_err(|e| RunError::new(plan.name, &record_path, e))?;
    let mask = load_image(&mask_path).map_err(|e| RunError::new(plan.name, &mask_path, e))?;
    let verified = matches(output, &mask, &record)
        .map_err(|e| RunError::new(plan.name, &record_path, FileOperationError::from(e)))?;

    if verified {
        info!("{} output agrees with {}", plan.name, record_path.display());
    } else {
        warn!("{} output does not agree with {}", plan.name, record_path.display());
    }
    Ok(Some((record, verified)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FileLayoutBuilder;
    use crate::mask_file::save_mask_file;
    use crate::test_prelude::*;
    use pixel_mask_transform_core::{PipelineError, TransformError};

    fn seeded_dir(width: u32, height: u32) -> (TempDir, FileLayout) {
        let dir = tempdir().unwrap();
        let layout = FileLayout::in_dir(dir.path());
        save_image(&noise_buffer(width, height, 0x21), &layout.path(FileRole::Original)).unwrap();
        save_image(
            &noise_buffer(width, height, 0x84),
            &layout.path(FileRole::XorReference),
        )
        .unwrap();
        (dir, layout)
    }

    #[test]
    fn modify_writes_gradient() {
        let (_dir, layout) = seeded_dir(4, 2);

        let report = run_variant(Variant::Modify, &layout).unwrap();

        let modified = load_image(&layout.path(FileRole::Modified)).unwrap();
        let expected: Vec<u8> = (0..8u8).flat_map(|p| [p * 3; 3]).collect();
        assert_eq!(modified.as_slice(), expected.as_slice());
        assert_eq!(report.output, layout.path(FileRole::Modified));
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.verified, None);
    }

    #[test]
    fn xor_saves_intermediates_before_output() {
        let (_dir, layout) = seeded_dir(3, 3);

        let report = run_variant(Variant::Xor, &layout).unwrap();

        let paths: Vec<_> = report.written.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![
                layout.path(FileRole::Modified),
                layout.path(FileRole::Rotated),
                layout.path(FileRole::XorResult),
            ]
        );
        assert_eq!(
            report.bytes_written(),
            report.written.iter().map(|(_, n)| *n as u64).sum::<u64>()
        );
    }

    #[test]
    fn missing_input_names_the_file() {
        let dir = tempdir().unwrap();
        let layout = FileLayout::in_dir(dir.path());

        let err = run_variant(Variant::Modify, &layout).unwrap_err();

        assert_eq!(err.stage, "modify");
        assert_eq!(err.input, layout.path(FileRole::Original));
        assert!(!layout.path(FileRole::Modified).exists());
    }

    #[test]
    fn missing_reference_names_the_reference() {
        let (_dir, layout) = seeded_dir(2, 2);
        std::fs::remove_file(layout.path(FileRole::XorReference)).unwrap();

        let err = run_variant(Variant::Xor, &layout).unwrap_err();

        assert_eq!(err.input, layout.path(FileRole::XorReference));
        assert!(!layout.path(FileRole::Modified).exists());
    }

    #[test]
    fn mismatched_reference_fails_without_output() {
        let (_dir, layout) = seeded_dir(4, 4);
        save_image(&noise_buffer(2, 2, 0), &layout.path(FileRole::XorReference)).unwrap();

        let err = run_variant(Variant::Xor, &layout).unwrap_err();

        assert_eq!(err.input, layout.path(FileRole::Original));
        assert!(matches!(
            err.source,
            FileOperationError::Pipeline(PipelineError::Stage {
                index: 2,
                source: TransformError::LengthMismatch { .. },
                ..
            })
        ));
        assert!(!layout.path(FileRole::XorResult).exists());
    }

    #[test]
    fn decoding_a_lossy_plan_is_refused() {
        let (_dir, layout) = seeded_dir(2, 2);
        let plan = Plan::decode("custom", FileRole::Original, FileRole::Reconstructed)
            .stage(StageSpec::ShiftLeft(1));

        let err = run_plan(&plan, &layout).unwrap_err();

        assert!(matches!(
            err.source,
            FileOperationError::Pipeline(PipelineError::NotInvertible { index: 0, .. })
        ));
    }

    #[test]
    fn mask_stage_round_trips_through_files() {
        let dir = tempdir().unwrap();
        let layout = FileLayoutBuilder::new()
            .dir(dir.path())
            .name(FileRole::Rotated, "masked.bmp")
            .build();
        let original = noise_buffer(6, 6, 0x42);
        save_image(&original, &layout.path(FileRole::Original)).unwrap();
        save_image(&noise_buffer(6, 6, 0x24), &layout.path(FileRole::MaskImage)).unwrap();
        let record = MaskRecord::capture(&original, 12, 10).unwrap();
        save_mask_file(&record, &layout.path(FileRole::MaskFile)).unwrap();

        let stage = StageSpec::Mask {
            record: FileRole::MaskFile,
            mask: FileRole::MaskImage,
        };
        let encode = Plan::encode("mask", FileRole::Original, FileRole::Rotated).stage(stage);
        let decode = Plan::decode("unmask", FileRole::Rotated, FileRole::Reconstructed).stage(stage);
        run_plan(&encode, &layout).unwrap();
        run_plan(&decode, &layout).unwrap();

        assert_ne!(load_image(&layout.path(FileRole::Rotated)).unwrap(), original);
        assert_eq!(load_image(&layout.path(FileRole::Reconstructed)).unwrap(), original);
    }

    #[test]
    fn verify_is_skipped_without_mask_files() {
        let (_dir, layout) = seeded_dir(2, 2);
        run_variant(Variant::Xor, &layout).unwrap();

        let report = run_variant(Variant::Reconstruct, &layout).unwrap();

        assert_eq!(report.mask, None);
        assert_eq!(report.verified, None);
    }

    #[test]
    fn malformed_mask_file_fails_verification() {
        let (_dir, layout) = seeded_dir(2, 2);
        run_variant(Variant::Xor, &layout).unwrap();
        save_image(&noise_buffer(2, 2, 1), &layout.path(FileRole::MaskImage)).unwrap();
        std::fs::write(layout.path(FileRole::MaskFile), "seed 1 2 3").unwrap();

        let err = run_variant(Variant::Reconstruct, &layout).unwrap_err();

        assert_eq!(err.input, layout.path(FileRole::MaskFile));
        assert!(matches!(err.source, FileOperationError::MaskFile(_)));
    }

    #[test]
    fn failed_run_removes_previous_output() {
        let (_dir, layout) = seeded_dir(4, 4);
        run_variant(Variant::Xor, &layout).unwrap();
        assert!(layout.path(FileRole::XorResult).exists());

        save_image(&noise_buffer(6, 6, 0x21), &layout.path(FileRole::Original)).unwrap();
        run_variant(Variant::Xor, &layout).unwrap_err();

        assert!(!layout.path(FileRole::XorResult).exists());
    }

    #[test]
    fn dependents_of_a_failed_variant_are_skipped() {
        let (_dir, layout) = seeded_dir(4, 4);
        let first = run_variants(Variant::all_values(), &layout);
        assert!(first
            .iter()
            .all(|(_, outcome)| matches!(outcome, VariantOutcome::Completed(_))));
        assert!(layout.path(FileRole::Reconstructed).exists());

        // The reference no longer matches the original, so xor fails.
        save_image(&noise_buffer(6, 6, 0x21), &layout.path(FileRole::Original)).unwrap();
        let second = run_variants(Variant::all_values(), &layout);

        assert!(matches!(second[0], (Variant::Modify, VariantOutcome::Completed(_))));
        assert!(matches!(second[1], (Variant::Rotate, VariantOutcome::Completed(_))));
        assert!(matches!(second[2], (Variant::Xor, VariantOutcome::Failed(_))));
        assert!(matches!(
            second[3],
            (
                Variant::Reconstruct,
                VariantOutcome::Skipped {
                    input: FileRole::XorResult
                }
            )
        ));
        assert!(!layout.path(FileRole::XorResult).exists());
        assert!(!layout.path(FileRole::Reconstructed).exists());
    }

    #[test]
    fn missing_original_fails_every_reader() {
        let (_dir, layout) = seeded_dir(3, 3);
        std::fs::remove_file(layout.path(FileRole::Original)).unwrap();

        let outcomes = run_variants(&[Variant::Modify, Variant::Xor, Variant::Reconstruct], &layout);

        assert!(matches!(outcomes[0].1, VariantOutcome::Failed(_)));
        // Xor reads the original itself, fails on it, and takes reconstruct down with it.
        assert!(matches!(outcomes[1].1, VariantOutcome::Failed(_)));
        assert!(matches!(
            outcomes[2].1,
            VariantOutcome::Skipped {
                input: FileRole::XorResult
            }
        ));
    }
}
