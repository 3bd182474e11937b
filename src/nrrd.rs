//! Reader for 3D integer NRRD volumes, attached (`.nrrd`) or detached
//! (`.nhdr` plus data file).

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use log::debug;

use crate::{
    error::ReadError,
    volume::{Shape, Volume},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
}

impl ElementType {
    fn parse(name: &str) -> Result<Self, ReadError> {
        let ty = match name {
            "signed char" | "int8" | "int8_t" => Self::Int8,
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => Self::Uint8,
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                Self::Int16
            }
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                Self::Uint16
            }
            "int" | "signed int" | "int32" | "int32_t" => Self::Int32,
            "uint" | "unsigned int" | "uint32" | "uint32_t" => Self::Uint32,
            "longlong" | "long long" | "long long int" | "signed long long"
            | "signed long long int" | "int64" | "int64_t" => Self::Int64,
            "ulonglong" | "unsigned long long" | "unsigned long long int" | "uint64"
            | "uint64_t" => Self::Uint64,
            "float" | "double" => {
                return Err(invalid(format!(
                    "element type {name:?} is not supported, voxel labels must be integers"
                )));
            }
            _ => return Err(invalid(format!("unknown element type {name:?}"))),
        };
        Ok(ty)
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 => 4,
            Self::Int64 | Self::Uint64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Gzip,
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NrrdHeader {
    pub element_type: ElementType,
    pub sizes: Shape,
    pub endian: Option<Endian>,
    pub encoding: Encoding,
    /// Detached data file as written in the header, not yet resolved.
    pub data_file: Option<PathBuf>,
}

impl NrrdHeader {
    /// `None` if the product of the sizes does not fit into `usize`.
    pub fn voxel_count(&self) -> Option<usize> {
        self.sizes.0.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }
}

const MAX_RESERVED_VOXELS: usize = 1 << 24;

fn invalid(msg: impl Into<String>) -> ReadError {
    ReadError::Nrrd(msg.into())
}

pub fn read_nrrd(path: &Path) -> Result<Volume, ReadError> {
    let file = File::open(path).map_err(|e| ReadError::io(path, e))?;
    read_nrrd_from(BufReader::new(file), path)
}

/// Reads a volume from `reader`. `path` is used in error messages and to
/// resolve a detached data file.
pub fn read_nrrd_from<R: BufRead>(mut reader: R, path: &Path) -> Result<Volume, ReadError> {
    let header = parse_header(&mut reader, path)?;
    debug!("NRRD header of {path:?}: {header:?}");

    let values = match &header.data_file {
        Some(data_file) => {
            let data_path = match path.parent() {
                Some(dir) if data_file.is_relative() => dir.join(data_file),
                _ => data_file.clone(),
            };
            let file = File::open(&data_path).map_err(|e| ReadError::io(&data_path, e))?;
            read_values(&header, BufReader::new(file), &data_path)?
        }
        None => read_values(&header, reader, path)?,
    };

    Ok(Volume::from_x_fastest(header.sizes, values)?)
}

pub fn parse_header<R: BufRead>(reader: &mut R, path: &Path) -> Result<NrrdHeader, ReadError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| ReadError::io(path, e))?;
    if !line.starts_with("NRRD") {
        return Err(invalid("missing NRRD magic"));
    }

    let mut element_type = None;
    let mut dimension = None;
    let mut sizes = None;
    let mut endian = None;
    let mut encoding = None;
    let mut data_file = None;

    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .map_err(|e| ReadError::io(path, e))?;
        let content = line.trim_end_matches(['\r', '\n']);
        if n == 0 || content.is_empty() {
            break;
        }
        if content.starts_with('#') {
            continue;
        }
        let Some((field, value)) = content.split_once(": ") else {
            if content.contains(":=") {
                continue;
            }
            return Err(invalid(format!("malformed header line {content:?}")));
        };
        let value = value.trim();

        match field {
            "type" => element_type = Some(ElementType::parse(value)?),
            "dimension" => {
                dimension = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("invalid dimension {value:?}")))?,
                )
            }
            "sizes" => sizes = Some(parse_sizes(value)?),
            "endian" => {
                endian = Some(match value {
                    "little" => Endian::Little,
                    "big" => Endian::Big,
                    _ => return Err(invalid(format!("invalid endian {value:?}"))),
                })
            }
            "encoding" => {
                encoding = Some(match value {
                    "raw" => Encoding::Raw,
                    "gzip" | "gz" => Encoding::Gzip,
                    "ascii" | "text" | "txt" => Encoding::Ascii,
                    _ => return Err(invalid(format!("encoding {value:?} is not supported"))),
                })
            }
            "data file" | "datafile" => {
                if value == "LIST" || value.split_whitespace().count() != 1 {
                    return Err(invalid(format!(
                        "only a single detached data file is supported, got {value:?}"
                    )));
                }
                data_file = Some(PathBuf::from(value));
            }
            "line skip" | "lineskip" | "byte skip" | "byteskip" => {
                if value != "0" {
                    return Err(invalid(format!("{field} {value} is not supported")));
                }
            }
            _ => debug!("ignoring NRRD field {field:?}"),
        }
    }

    match dimension {
        Some(3) => {}
        Some(d) => return Err(invalid(format!("expected a 3D volume, got dimension {d}"))),
        None => return Err(invalid("missing field \"dimension\"")),
    }
    let element_type = element_type.ok_or_else(|| invalid("missing field \"type\""))?;
    let sizes = sizes.ok_or_else(|| invalid("missing field \"sizes\""))?;
    let encoding = encoding.ok_or_else(|| invalid("missing field \"encoding\""))?;
    if endian.is_none() && element_type.size() > 1 && encoding != Encoding::Ascii {
        return Err(invalid("missing field \"endian\""));
    }

    Ok(NrrdHeader {
        element_type,
        sizes,
        endian,
        encoding,
        data_file,
    })
}

fn parse_sizes(value: &str) -> Result<Shape, ReadError> {
    let sizes = value
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(format!("invalid sizes {value:?}")))?;
    let shape = match sizes[..] {
        [nx, ny, nz] if nx > 0 && ny > 0 && nz > 0 => Shape([nx, ny, nz]),
        _ => return Err(invalid(format!("expected three positive sizes, got {value:?}"))),
    };
    if sizes.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n)).is_none() {
        return Err(invalid(format!("sizes overflow: {value:?}")));
    }
    Ok(shape)
}

fn read_values<R: Read>(
    header: &NrrdHeader,
    reader: R,
    path: &Path,
) -> Result<Vec<i64>, ReadError> {
    let count = header
        .voxel_count()
        .ok_or_else(|| invalid(format!("sizes overflow: {}", header.sizes)))?;
    let res = match header.encoding {
        Encoding::Ascii => return read_ascii(reader, count, path),
        Encoding::Raw => read_binary(header, reader, count),
        Encoding::Gzip => read_binary(header, GzDecoder::new(reader), count),
    };
    res.map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            invalid(format!("{path:?} ends before all {count} voxels were read"))
        }
        _ => ReadError::io(path, e),
    })
}

fn read_binary<R: Read>(header: &NrrdHeader, reader: R, count: usize) -> io::Result<Vec<i64>> {
    match header.endian {
        Some(Endian::Big) => decode::<BigEndian, _>(reader, header.element_type, count),
        // single byte types carry no endian field
        Some(Endian::Little) | None => {
            decode::<LittleEndian, _>(reader, header.element_type, count)
        }
    }
}

fn decode<B: ByteOrder, R: Read>(
    mut reader: R,
    element_type: ElementType,
    count: usize,
) -> io::Result<Vec<i64>> {
    // the count comes from the file, grow past this as data actually arrives
    let mut values = Vec::with_capacity(count.min(MAX_RESERVED_VOXELS));
    for _ in 0..count {
        let value = match element_type {
            ElementType::Int8 => reader.read_i8()? as i64,
            ElementType::Uint8 => reader.read_u8()? as i64,
            ElementType::Int16 => reader.read_i16::<B>()? as i64,
            ElementType::Uint16 => reader.read_u16::<B>()? as i64,
            ElementType::Int32 => reader.read_i32::<B>()? as i64,
            ElementType::Uint32 => reader.read_u32::<B>()? as i64,
            ElementType::Int64 => reader.read_i64::<B>()?,
            ElementType::Uint64 => {
                let value = reader.read_u64::<B>()?;
                i64::try_from(value).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("label {value} does not fit into a signed 64 bit integer"),
                    )
                })?
            }
        };
        values.push(value);
    }
    Ok(values)
}

fn read_ascii<R: Read>(mut reader: R, count: usize, path: &Path) -> Result<Vec<i64>, ReadError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| ReadError::io(path, e))?;

    let values = text
        .split_whitespace()
        .take(count)
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| invalid(format!("invalid voxel value {s:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() < count {
        return Err(invalid(format!(
            "{path:?} holds {} of {count} voxels",
            values.len()
        )));
    }
    Ok(values)
}
