use std::time::Instant;

use indicatif::{MultiProgress, ParallelProgressIterator, ProgressBar};
use log::{debug, info};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    bounds::{validate_box_fits, validate_coordinate_in_volume, validate_positive},
    error::SamplingError,
    sample::{SampleResult, analyze, extract_sample_box},
    volume::{Coordinate, Volume},
};

/// Samples a box around every coordinate and returns one result per
/// coordinate, in input order.
///
/// All coordinates are checked before any box is analyzed, so an invalid
/// coordinate anywhere in the list fails the run without doing any work and
/// the error always names the first offending coordinate.
pub fn run(
    volume: &Volume,
    coordinates: &[Coordinate],
    box_edge_length: i64,
    multi_progress: &MultiProgress,
) -> Result<Vec<SampleResult>, SamplingError> {
    let t0 = Instant::now();

    let edge_length = validate_positive(box_edge_length)?;
    let shape = volume.shape();
    debug!(
        "box edge length {box_edge_length}, effective extent {}",
        edge_length.extent()
    );

    for coordinate in coordinates {
        debug!("checking coordinates {coordinate}");
        validate_coordinate_in_volume(coordinate, &shape)?;
        validate_box_fits(coordinate, edge_length, &shape)?;
    }

    let progress = multi_progress.add(ProgressBar::new(coordinates.len() as u64));

    // collecting an indexed parallel iterator keeps the input order
    let res: Result<Vec<SampleResult>, SamplingError> = coordinates
        .par_iter()
        .progress_with(progress.clone())
        .map(|coordinate| {
            let sample_box = extract_sample_box(volume, coordinate, edge_length)?;
            debug!("analyzing sample box around {coordinate}");
            analyze(&sample_box)
        })
        .collect();

    progress.finish();
    multi_progress.remove(&progress);

    let results = res?;
    info!("sampled {} boxes in {:?}", results.len(), t0.elapsed());

    Ok(results)
}
