//! Minimal reader for MATLAB level 5 MAT files.
//!
//! Numeric arrays are widened to `f64` and kept column-major in a
//! [`DMatrix`]. Cell arrays are kept as nested [`MatArray`]s. Other classes
//! (char, struct, sparse, objects) are recorded by class id only.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use nalgebra::DMatrix;

use crate::error::{DatasetError, Result};

const HEADER_LEN: usize = 128;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

const MX_CELL: u8 = 1;
const MX_DOUBLE: u8 = 6;
const MX_UINT64: u8 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum MatArray {
    Numeric(DMatrix<f64>),
    /// Cells in column-major order.
    Cell {
        rows: usize,
        cols: usize,
        cells: Vec<MatArray>,
    },
    Unsupported { class: u8 },
}

impl MatArray {
    pub fn as_numeric(&self) -> Option<&DMatrix<f64>> {
        match self {
            MatArray::Numeric(m) => Some(m),
            _ => None,
        }
    }

    /// Cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&MatArray> {
        match self {
            MatArray::Cell { rows, cols, cells } if row < *rows && col < *cols => {
                cells.get(col * rows + row)
            }
            _ => None,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            MatArray::Numeric(m) => m.shape(),
            MatArray::Cell { rows, cols, .. } => (*rows, *cols),
            MatArray::Unsupported { .. } => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatFile {
    pub description: String,
    variables: HashMap<String, MatArray>,
}

impl MatFile {
    pub fn open(path: &Path) -> Result<MatFile> {
        if !path.is_file() {
            return Err(DatasetError::MissingPath(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<MatFile> {
        if bytes.len() < HEADER_LEN {
            return Err(DatasetError::annotation("file shorter than MAT header"));
        }
        let description = String::from_utf8_lossy(&bytes[..116])
            .trim_end_matches(['\0', ' '])
            .to_string();
        if description.starts_with("MATLAB 7.3") {
            return Err(DatasetError::annotation(
                "MAT 7.3 (HDF5) files are not supported",
            ));
        }
        let big_endian = match &bytes[126..128] {
            b"IM" => false,
            b"MI" => true,
            _ => return Err(DatasetError::annotation("bad MAT endian indicator")),
        };

        let mut reader = Reader::new(&bytes[HEADER_LEN..], big_endian);
        let mut variables = HashMap::new();
        while !reader.is_empty() {
            if let Some((name, array)) = reader.read_variable()? {
                log::trace!("mat variable {} {:?}", name, array.shape());
                variables.insert(name, array);
            }
        }
        Ok(MatFile {
            description,
            variables,
        })
    }

    pub fn get(&self, name: &str) -> Option<&MatArray> {
        self.variables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    big_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], big_endian: bool) -> Self {
        Reader {
            buf,
            pos: 0,
            big_endian,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| DatasetError::annotation("unexpected end of MAT data"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(to_u32(b, self.big_endian))
    }

    /// Reads one data element tag and its payload.
    fn element(&mut self) -> Result<(u32, &'a [u8])> {
        let first = self.u32()?;
        if first >> 16 != 0 {
            // small data element: payload packed into the tag's second word
            let data_type = first & 0xFFFF;
            let len = (first >> 16) as usize;
            if len > 4 {
                return Err(DatasetError::annotation("bad small data element"));
            }
            let data = self.take(4)?;
            return Ok((data_type, &data[..len]));
        }
        let len = self.u32()? as usize;
        let data = self.take(len)?;
        if first != MI_COMPRESSED {
            let pad = (8 - self.pos % 8) % 8;
            self.pos = (self.pos + pad).min(self.buf.len());
        }
        Ok((first, data))
    }

    fn read_variable(&mut self) -> Result<Option<(String, MatArray)>> {
        let (data_type, data) = self.element()?;
        match data_type {
            MI_COMPRESSED => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(data)
                    .read_to_end(&mut inflated)
                    .map_err(|e| DatasetError::annotation(format!("inflate failed: {e}")))?;
                let mut inner = Reader::new(&inflated, self.big_endian);
                inner.read_variable()
            }
            MI_MATRIX => parse_matrix(data, self.big_endian).map(Some),
            other => {
                log::debug!("skipping top level MAT element of type {}", other);
                Ok(None)
            }
        }
    }
}

fn parse_matrix(data: &[u8], big_endian: bool) -> Result<(String, MatArray)> {
    if data.is_empty() {
        return Ok((String::new(), MatArray::Numeric(DMatrix::zeros(0, 0))));
    }
    let mut r = Reader::new(data, big_endian);

    let (flags_type, flags) = r.element()?;
    if flags_type != MI_UINT32 || flags.len() < 8 {
        return Err(DatasetError::annotation("missing array flags"));
    }
    let flags_word = to_u32(&flags[..4], big_endian);
    let class = (flags_word & 0xFF) as u8;

    let (dims_type, dims) = r.element()?;
    let dims: Vec<usize> = numeric_values(dims_type, dims, big_endian)?
        .into_iter()
        .map(|d| d as usize)
        .collect();
    if dims.len() < 2 {
        return Err(DatasetError::annotation("array has fewer than two dimensions"));
    }
    let rows = dims[0];
    let cols = dims[1..].iter().try_fold(1usize, |acc, d| acc.checked_mul(*d));
    let (cols, count) = cols
        .and_then(|cols| Some((cols, cols.checked_mul(rows)?)))
        .ok_or_else(|| DatasetError::annotation(format!("array dimensions overflow: {dims:?}")))?;

    let (_, name) = r.element()?;
    let name = String::from_utf8_lossy(name).into_owned();

    let array = match class {
        MX_CELL => {
            // every cell carries at least an 8-byte tag
            if count > r.remaining() / 8 {
                return Err(DatasetError::annotation(format!(
                    "cell array '{}' claims {}x{} cells in {} bytes",
                    name,
                    rows,
                    cols,
                    r.remaining()
                )));
            }
            let mut cells = Vec::with_capacity(count);
            for _ in 0..count {
                let (cell_type, cell_data) = r.element()?;
                if cell_type != MI_MATRIX {
                    return Err(DatasetError::annotation("cell element is not a matrix"));
                }
                cells.push(parse_matrix(cell_data, big_endian)?.1);
            }
            MatArray::Cell { rows, cols, cells }
        }
        MX_DOUBLE..=MX_UINT64 => {
            let (real_type, real) = r.element()?;
            let values = numeric_values(real_type, real, big_endian)?;
            if values.len() != count {
                return Err(DatasetError::annotation(format!(
                    "variable '{}' has {} values for shape {}x{}",
                    name,
                    values.len(),
                    rows,
                    cols
                )));
            }
            MatArray::Numeric(DMatrix::from_vec(rows, cols, values))
        }
        other => MatArray::Unsupported { class: other },
    };
    Ok((name, array))
}

fn to_u32(b: &[u8], big_endian: bool) -> u32 {
    let b: [u8; 4] = [b[0], b[1], b[2], b[3]];
    if big_endian {
        u32::from_be_bytes(b)
    } else {
        u32::from_le_bytes(b)
    }
}

macro_rules! decode {
    ($data:expr, $big:expr, $ty:ty) => {
        $data
            .chunks_exact(std::mem::size_of::<$ty>())
            .map(|c| {
                let mut b = [0u8; std::mem::size_of::<$ty>()];
                b.copy_from_slice(c);
                (if $big {
                    <$ty>::from_be_bytes(b)
                } else {
                    <$ty>::from_le_bytes(b)
                }) as f64
            })
            .collect::<Vec<f64>>()
    };
}

/// Widens a numeric payload of any MAT storage type to `f64`.
fn numeric_values(data_type: u32, data: &[u8], big_endian: bool) -> Result<Vec<f64>> {
    let values = match data_type {
        MI_INT8 => decode!(data, big_endian, i8),
        MI_UINT8 => decode!(data, big_endian, u8),
        MI_INT16 => decode!(data, big_endian, i16),
        MI_UINT16 => decode!(data, big_endian, u16),
        MI_INT32 => decode!(data, big_endian, i32),
        MI_UINT32 => decode!(data, big_endian, u32),
        MI_SINGLE => decode!(data, big_endian, f32),
        MI_DOUBLE => decode!(data, big_endian, f64),
        MI_INT64 => decode!(data, big_endian, i64),
        MI_UINT64 => decode!(data, big_endian, u64),
        other => {
            return Err(DatasetError::annotation(format!(
                "unsupported numeric storage type {other}"
            )));
        }
    };
    Ok(values)
}
