use std::{io, path::PathBuf};

use thiserror::Error;

use crate::volume::{Coordinate, Shape};

/// Failures of the sampling pipeline. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("the supplied box edge length {0} is 0 or negative, only numbers greater than 0 are allowed")]
    InvalidParameter(i64),

    #[error(
        "the supplied coordinates {coordinate} are outside the sample area, \
         choose coordinates inside the sample area with dimensions {shape}"
    )]
    OutOfBounds { coordinate: Coordinate, shape: Shape },

    #[error(
        "the supplied box edge length {edge_length} leads to a sample box outside the sample area \
         with dimensions {shape}, choose a smaller box edge length or different coordinates \
         (current coordinates are {coordinate})"
    )]
    BoxOutOfBounds {
        coordinate: Coordinate,
        edge_length: i64,
        shape: Shape,
    },

    #[error("the sample box with dimensions {extent} contains no voxels")]
    EmptySampleBox { extent: Shape },
}

/// Failures while loading volumes or coordinate lists.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid NRRD file: {0}")]
    Nrrd(String),

    #[error(transparent)]
    Mrc(#[from] mrc::Error),

    #[error("voxel data does not match the volume dimensions: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("unsupported volume format: {0:?} (expected .nrrd, .nhdr or .mrc)")]
    UnsupportedFormat(PathBuf),

    #[error("{path:?}, line {line}: {message}")]
    Coordinates {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl ReadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
