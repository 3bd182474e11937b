//! Checks run before any voxel is touched.

use log::debug;

use crate::{
    error::SamplingError,
    volume::{Coordinate, Shape},
};

/// Edge length of a sample box, known to be positive.
///
/// Boxes are built from `half() = edge // 2` voxels on either side of the
/// center, so an odd edge length yields a box one voxel shorter than asked
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxEdgeLength(i64);

impl BoxEdgeLength {
    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn half(&self) -> i64 {
        self.0 / 2
    }

    /// Actual number of voxels along each axis of the resulting box.
    pub fn extent(&self) -> usize {
        (2 * self.half()) as usize
    }
}

pub fn validate_positive(value: i64) -> Result<BoxEdgeLength, SamplingError> {
    if value <= 0 {
        return Err(SamplingError::InvalidParameter(value));
    }
    Ok(BoxEdgeLength(value))
}

/// Accepts a component equal to the extent (`>` rather than `>=`). Such a
/// coordinate is then rejected by [`validate_box_fits`] for any box with
/// voxels in it.
pub fn validate_coordinate_in_volume(
    coordinate: &Coordinate,
    shape: &Shape,
) -> Result<(), SamplingError> {
    for (c, n) in coordinate.axes().into_iter().zip(shape.0) {
        if c < 0 || c > n as i64 {
            return Err(SamplingError::OutOfBounds {
                coordinate: *coordinate,
                shape: *shape,
            });
        }
    }
    Ok(())
}

pub fn validate_box_fits(
    coordinate: &Coordinate,
    edge_length: BoxEdgeLength,
    shape: &Shape,
) -> Result<(), SamplingError> {
    let half = edge_length.half();
    for (c, n) in coordinate.axes().into_iter().zip(shape.0) {
        let fits = match (c.checked_sub(half), c.checked_add(half)) {
            (Some(lo), Some(hi)) => lo >= 0 && hi <= n as i64,
            _ => false,
        };
        if !fits {
            debug!("box around {coordinate} leaves the volume: {c} +/- {half} vs. extent {n}");
            return Err(SamplingError::BoxOutOfBounds {
                coordinate: *coordinate,
                edge_length: edge_length.get(),
                shape: *shape,
            });
        }
    }
    Ok(())
}
