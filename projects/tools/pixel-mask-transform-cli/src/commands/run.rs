use crate::error::CliError;
use crate::util::{canonicalize_cli_path, Throughput};
use argh::FromArgs;
use bytesize::ByteSize;
use log::debug;
use pixel_mask_transform_file_formats_api::{
    run_variants, FileLayout, RunReport, Variant, VariantOutcome,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(FromArgs, Debug)]
/// Run one variant, or all of them in order
#[argh(subcommand, name = "run")]
pub struct RunCmd {
    /// variant to run: modify, rotate, xor, reconstruct, all
    #[argh(positional)]
    pub variant: VariantSelection,

    /// directory holding the images and mask file [default: current directory]
    #[argh(option, default = "PathBuf::from(\".\")", from_str_fn(canonicalize_cli_path))]
    pub dir: PathBuf,
}

/// Which variants a `run` invocation executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSelection {
    One(Variant),
    All,
}

impl VariantSelection {
    fn variants(self) -> Vec<Variant> {
        match self {
            VariantSelection::One(variant) => vec![variant],
            VariantSelection::All => Variant::all_values().to_vec(),
        }
    }
}

impl std::str::FromStr for VariantSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Variant>()
            .map(Self::One)
            .map_err(|e| format!("{e}, all"))
    }
}

pub fn handle_run_command(cmd: RunCmd) -> Result<(), CliError> {
    let layout = FileLayout::in_dir(&cmd.dir);
    let variants = cmd.variant.variants();
    println!("Working directory: {}\n", layout.dir().display());

    debug!("running {variants:?}");
    let start = Instant::now();
    let mut bytes_written = 0;
    let mut failed = 0;
    // A failure is reported and the next variant still runs, unless it reads a file the failure left stale.
    for (variant, outcome) in run_variants(&variants, &layout) {
        match outcome {
            VariantOutcome::Completed(report) => {
                bytes_written += report.bytes_written();
                print_report(&report);
            }
            VariantOutcome::Failed(e) => {
                failed += 1;
                eprintln!("{variant}: {e}");
            }
            VariantOutcome::Skipped { input } => {
                failed += 1;
                eprintln!(
                    "{variant}: skipped, {} was not produced",
                    layout.path(input).display()
                );
            }
        }
    }

    let elapsed = start.elapsed();
    println!("\n=== Run Complete ===");
    println!("Time taken: {elapsed:.2?}");
    println!("Data written: {}", ByteSize(bytes_written));
    println!("Throughput: {}", Throughput::new(bytes_written, elapsed));

    if failed > 0 {
        return Err(CliError::VariantsFailed {
            failed,
            total: variants.len(),
        });
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("[{}]", report.name);
    for (path, len) in &report.written {
        println!("  saved {} ({})", path.display(), ByteSize(*len as u64));
    }
    if let Some(record) = &report.mask {
        let outcome = match report.verified {
            Some(true) => "matches",
            _ => "does NOT match",
        };
        println!(
            "  output {outcome} mask record (seed {}, {} pixel(s))",
            record.seed,
            record.pixel_count()
        );
    }
}
