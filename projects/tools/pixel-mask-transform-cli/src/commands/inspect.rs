use crate::error::CliError;
use crate::util::canonicalize_cli_path;
use argh::FromArgs;
use pixel_mask_transform_file_formats_api::{load_mask_file, FileLayout, FileRole};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Print the seed and triplets of the mask file
#[argh(subcommand, name = "inspect")]
pub struct InspectCmd {
    /// directory holding the mask file [default: current directory]
    #[argh(option, default = "PathBuf::from(\".\")", from_str_fn(canonicalize_cli_path))]
    pub dir: PathBuf,
}

pub fn handle_inspect_command(cmd: InspectCmd) -> Result<(), CliError> {
    let layout = FileLayout::in_dir(&cmd.dir);
    let path = layout.path(FileRole::MaskFile);
    let record = load_mask_file(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;

    println!("Mask file: {}", path.display());
    println!("Seed: {}", record.seed);
    for (i, [r, g, b]) in record.triplets.iter().enumerate() {
        println!("Pixel {i}: ({r}, {g}, {b})");
    }
    println!("{} pixel(s)", record.pixel_count());

    Ok(())
}
