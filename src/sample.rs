use log::info;
use ndarray::{ArrayView3, s};

use crate::{
    bounds::{BoxEdgeLength, validate_box_fits},
    error::SamplingError,
    volume::{Coordinate, Shape, Volume},
};

/// Read-only view of the voxels around one sampling position.
pub type SampleBox<'a> = ArrayView3<'a, i64>;

/// Voxel counts of one sample box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResult {
    pub vessel_voxels: u64,
    pub background_voxels: u64,
    /// Share of vessel voxels in percent, rounded to two decimals.
    pub fraction_percent: f64,
}

impl SampleResult {
    pub fn from_counts(vessel_voxels: u64, background_voxels: u64) -> Option<Self> {
        let total = vessel_voxels + background_voxels;
        if total == 0 {
            return None;
        }
        let fraction = vessel_voxels as f64 / total as f64 * 100.0;
        Some(Self {
            vessel_voxels,
            background_voxels,
            fraction_percent: round_to_hundredths(fraction),
        })
    }

    pub fn total_voxels(&self) -> u64 {
        self.vessel_voxels + self.background_voxels
    }
}

// Formatting rounds the exact binary value, exact ties go to the even
// neighbour: 1.5625 -> 1.56, 0.025000000000000001 -> 0.03. Scaling by 100
// first would turn near-ties into exact ones.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Cuts `[c - half, c + half)` out of every axis, with `half = edge // 2`.
pub fn extract_sample_box<'a>(
    volume: &'a Volume,
    coordinate: &Coordinate,
    edge_length: BoxEdgeLength,
) -> Result<SampleBox<'a>, SamplingError> {
    validate_box_fits(coordinate, edge_length, &volume.shape())?;

    let half = edge_length.half();
    let [lo_x, lo_y, lo_z] = coordinate.axes().map(|c| (c - half) as usize);
    let [hi_x, hi_y, hi_z] = coordinate.axes().map(|c| (c + half) as usize);

    Ok(volume
        .data()
        .slice(s![lo_x..hi_x, lo_y..hi_y, lo_z..hi_z]))
}

/// Counts non-zero (vessel) and zero (background) voxels. Label identity
/// beyond zero/non-zero is not kept.
pub fn analyze(sample_box: &SampleBox<'_>) -> Result<SampleResult, SamplingError> {
    let (vessel, background) = sample_box
        .iter()
        .fold((0u64, 0u64), |(vessel, background), &label| {
            if label != 0 {
                (vessel + 1, background)
            } else {
                (vessel, background + 1)
            }
        });

    info!("In the sample there are {vessel} voxels of vessels and {background} voxels of background.");

    SampleResult::from_counts(vessel, background).ok_or_else(|| {
        let (nx, ny, nz) = sample_box.dim();
        SamplingError::EmptySampleBox {
            extent: Shape([nx, ny, nz]),
        }
    })
}
