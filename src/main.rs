use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{error, info};

use sampling_box::{bounds::validate_positive, coords, read, sampling, write};

/// Calculate volume fractions for sample areas in a volume image.
#[derive(Parser, Debug)]
struct Args {
    /// Input volume (.nrrd, .nhdr or 16 bit .mrc)
    volume_path: PathBuf,
    /// .csv file containing sampling locations, one x,y,z triple per line
    csv_path: PathBuf,
    /// Edge length of sample box
    #[arg(allow_negative_numbers = true)]
    box_size: i64,
    /// Output file, results are written to results.csv if not given
    #[arg(short, long)]
    output: Option<String>,
}

fn sample(args: Args, multi_progress: &MultiProgress) -> Result<(), Box<dyn Error + Sync + Send>> {
    validate_positive(args.box_size)?;

    let volume = read::read_volume(&args.volume_path)?;
    let coordinates = coords::read_coordinates(&args.csv_path)?;
    info!("{} sampling positions", coordinates.len());

    let results = sampling::run(&volume, &coordinates, args.box_size, multi_progress)?;

    let out_path = write::output_path(args.output.as_deref());
    info!("writing output to {out_path:?}");
    write::write_results_file(&out_path, &results)?;

    Ok(())
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    let logger = env_logger::Builder::from_env(env).build();
    let level = logger.filter();
    let multi_progress = MultiProgress::new();
    if LogWrapper::new(multi_progress.clone(), logger).try_init().is_ok() {
        log::set_max_level(level);
    }

    let args = Args::parse();

    match sample(args, &multi_progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
