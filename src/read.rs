use std::path::Path;

use log::{debug, info};
use mrc::MrcMmap;

use crate::{
    error::ReadError,
    nrrd::read_nrrd,
    volume::{Shape, Volume},
};

/// Loads a labeled volume, picking the reader from the file extension.
pub fn read_volume(path: &Path) -> Result<Volume, ReadError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    info!("reading {path:?}");
    let volume = match extension.as_deref() {
        Some("nrrd" | "nhdr") => read_nrrd(path)?,
        Some("mrc") => read_mrc(path)?,
        _ => return Err(ReadError::UnsupportedFormat(path.to_owned())),
    };
    info!("dimensions of sample area: {}", volume.shape());

    Ok(volume)
}

/// Reads a 16 bit MRC stack. Sections are stored x fastest, like NRRD.
pub fn read_mrc(path: &Path) -> Result<Volume, ReadError> {
    let data = MrcMmap::open(path)?;
    let view = data.read_view()?;

    let (nx, ny, nz) = view.dimensions();
    let ints = view.data.as_i16_slice()?;
    debug!("len of slice: {}", ints.len());

    let values: Vec<i64> = ints.iter().map(|&v| v as i64).collect();
    Ok(Volume::from_x_fastest(Shape([nx, ny, nz]), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension() {
        let res = read_volume(Path::new("volume.tif"));
        assert!(matches!(res, Err(ReadError::UnsupportedFormat(_))));
        let res = read_volume(Path::new("volume"));
        assert!(matches!(res, Err(ReadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LABELS.NRRD");
        let mut bytes =
            b"NRRD0004\ntype: uint8\ndimension: 3\nsizes: 1 1 2\nencoding: raw\n\n".to_vec();
        bytes.extend_from_slice(&[0, 4]);
        std::fs::write(&path, bytes).unwrap();

        let volume = read_volume(&path).unwrap();
        assert_eq!(volume.shape(), Shape([1, 1, 2]));
    }

    #[test]
    fn test_missing_file() {
        let res = read_volume(Path::new("/nonexistent/labels.nrrd"));
        assert!(matches!(res, Err(ReadError::Io { .. })));
    }
}
