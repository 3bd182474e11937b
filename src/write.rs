use std::{
    error::Error,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::sample::SampleResult;

pub const DEFAULT_OUTPUT_NAME: &str = "results";

const HEADER: &str = "voxels vessel,voxels background,fraction";

/// `name` with `.csv` appended unless it already has that extension.
pub fn output_path(name: Option<&str>) -> PathBuf {
    let name = name.unwrap_or(DEFAULT_OUTPUT_NAME);
    if name.to_ascii_lowercase().ends_with(".csv") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.csv"))
    }
}

pub fn write_results<W: Write>(
    mut writer: W,
    results: &[SampleResult],
) -> Result<(), Box<dyn Error + Sync + Send>> {
    writeln!(writer, "{HEADER}")?;
    for result in results {
        // shortest round-trip form with at least one decimal: 12.5, 100.0
        writeln!(
            writer,
            "{},{},{:?}",
            result.vessel_voxels, result.background_voxels, result.fraction_percent
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_results_file(
    filename: &Path,
    results: &[SampleResult],
) -> Result<(), Box<dyn Error + Sync + Send>> {
    let out_file = File::create(filename)?;
    write_results(BufWriter::new(out_file), results)
}
