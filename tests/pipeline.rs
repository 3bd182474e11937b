use std::{fs, io::Write, path::Path};

use flate2::{Compression, write::GzEncoder};
use indicatif::{MultiProgress, ProgressDrawTarget};
use sampling_box::{SamplingError, coords, read, sampling, write};

/// Writes a gzip encoded uint8 NRRD volume, x fastest.
fn write_nrrd(path: &Path, (nx, ny, nz): (usize, usize, usize), voxel: impl Fn(usize, usize, usize) -> u8) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                encoder.write_all(&[voxel(x, y, z)]).unwrap();
            }
        }
    }
    let mut bytes = format!(
        "NRRD0004\n# written by the pipeline test\ntype: uint8\ndimension: 3\nsizes: {nx} {ny} {nz}\nencoding: gzip\n\n"
    )
    .into_bytes();
    bytes.extend(encoder.finish().unwrap());
    fs::write(path, bytes).unwrap();
}

fn hidden() -> MultiProgress {
    MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
}

#[test]
fn test_files_to_results() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("vessels.nrrd");
    let csv_path = dir.path().join("positions.csv");

    // a vessel running along z at x = 5, y in {5, 6}, with label 2
    write_nrrd(&volume_path, (12, 10, 8), |x, y, _| {
        if x == 5 && (y == 5 || y == 6) { 2 } else { 0 }
    });
    fs::write(&csv_path, "5,5,4\n2,2,2\n6,6,3\n").unwrap();

    let volume = read::read_volume(&volume_path).unwrap();
    let coordinates = coords::read_coordinates(&csv_path).unwrap();
    let results = sampling::run(&volume, &coordinates, 4, &hidden()).unwrap();

    let out_path = dir.path().join(write::output_path(Some("fractions")));
    write::write_results_file(&out_path, &results).unwrap();

    // box around (5, 5, 4): 2 vessel voxels per z slice, 4 slices
    // box around (6, 6, 3): x in [4, 8), y in [4, 8) -> again 2 per slice
    assert_eq!(
        fs::read_to_string(&out_path).unwrap(),
        "voxels vessel,voxels background,fraction\n\
         8,56,12.5\n\
         0,64,0.0\n\
         8,56,12.5\n"
    );
}

#[test]
fn test_invalid_coordinate_fails_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("vessels.nrrd");
    let csv_path = dir.path().join("positions.csv");

    write_nrrd(&volume_path, (10, 10, 10), |x, y, z| ((x + y + z) % 2) as u8);
    fs::write(&csv_path, "5,5,5\n9,5,5\n").unwrap();

    let volume = read::read_volume(&volume_path).unwrap();
    let coordinates = coords::read_coordinates(&csv_path).unwrap();
    let err = sampling::run(&volume, &coordinates, 4, &hidden()).unwrap_err();

    assert!(matches!(err, SamplingError::BoxOutOfBounds { .. }));
    let msg = err.to_string();
    assert!(msg.contains("(10, 10, 10)"), "{msg}");
    assert!(msg.contains("[9, 5, 5]"), "{msg}");
}

#[test]
fn test_odd_edge_length_on_checkerboard() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("checker.nrrd");
    write_nrrd(&volume_path, (10, 10, 10), |x, y, z| ((x + y + z) % 2) as u8);

    let volume = read::read_volume(&volume_path).unwrap();
    let coordinates = [sampling_box::Coordinate::new(5, 5, 5)];
    let results = sampling::run(&volume, &coordinates, 5, &hidden()).unwrap();

    // 5 is truncated to a 4x4x4 box, half of a checkerboard is set
    assert_eq!(results[0].total_voxels(), 64);
    assert_eq!(results[0].vessel_voxels, 32);
    assert_eq!(results[0].fraction_percent, 50.0);
}
