//! Estimates the local share of labeled (vessel) voxels in a segmented 3D
//! image by analyzing cubic sample boxes around a list of positions.

pub mod bounds;
pub mod coords;
pub mod error;
pub mod nrrd;
pub mod read;
pub mod sample;
pub mod sampling;
pub mod volume;
pub mod write;

pub use error::{ReadError, SamplingError};
pub use sample::SampleResult;
pub use sampling::run;
pub use volume::{Coordinate, Shape, Volume};
