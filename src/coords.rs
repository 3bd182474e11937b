use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{error::ReadError, volume::Coordinate};

/// Reads sampling positions, one `x,y,z` record per line. There is no
/// header row; blank lines are skipped.
pub fn read_coordinates(path: &Path) -> Result<Vec<Coordinate>, ReadError> {
    let file = File::open(path).map_err(|e| ReadError::io(path, e))?;
    parse_coordinates(BufReader::new(file), path)
}

pub fn parse_coordinates<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Coordinate>, ReadError> {
    let mut coordinates = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ReadError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let coordinate = parse_record(&line).map_err(|message| ReadError::Coordinates {
            path: path.to_owned(),
            line: idx + 1,
            message,
        })?;
        coordinates.push(coordinate);
    }
    Ok(coordinates)
}

fn parse_record(line: &str) -> Result<Coordinate, String> {
    let fields = line
        .split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<i64>()
                .map_err(|_| format!("{field:?} is not an integer"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match fields[..] {
        [x, y, z] => Ok(Coordinate::new(x, y, z)),
        _ => Err(format!("expected 3 fields, found {}", fields.len())),
    }
}
