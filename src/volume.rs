use std::fmt;

use ndarray::{Array3, ShapeBuilder, ShapeError};

/// Extents of a volume along x, y and z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape(pub [usize; 3]);

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [nx, ny, nz] = self.0;
        write!(f, "({nx}, {ny}, {nz})")
    }
}

/// A voxel position. Components are signed so that negative input can be
/// rejected by the bounds checks instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Coordinate {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn axes(&self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A labeled 3D image, indexed as `[x, y, z]`. A label of 0 is background.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<i64>,
}

impl Volume {
    pub fn new(data: Array3<i64>) -> Self {
        Self { data }
    }

    /// Builds a volume from voxels stored with x varying fastest, which is
    /// the layout of both NRRD and MRC files.
    pub fn from_x_fastest(shape: Shape, values: Vec<i64>) -> Result<Self, ShapeError> {
        let [nx, ny, nz] = shape.0;
        let data = Array3::from_shape_vec((nx, ny, nz).f(), values)?;
        Ok(Self { data })
    }

    pub fn shape(&self) -> Shape {
        let (nx, ny, nz) = self.data.dim();
        Shape([nx, ny, nz])
    }

    pub fn data(&self) -> &Array3<i64> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_fastest_layout() {
        // 2x3x2, value encodes its own flat index
        let values: Vec<i64> = (0..12).collect();
        let volume = Volume::from_x_fastest(Shape([2, 3, 2]), values).unwrap();

        assert_eq!(volume.shape(), Shape([2, 3, 2]));
        assert_eq!(volume.data()[[1, 0, 0]], 1);
        assert_eq!(volume.data()[[0, 1, 0]], 2);
        assert_eq!(volume.data()[[0, 0, 1]], 6);
        assert_eq!(volume.data()[[1, 2, 1]], 11);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let res = Volume::from_x_fastest(Shape([2, 2, 2]), vec![0; 7]);
        assert!(res.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape([10, 20, 30]).to_string(), "(10, 20, 30)");
        assert_eq!(Coordinate::new(5, -1, 3).to_string(), "[5, -1, 3]");
    }
}
