/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Read and write matrices in the binary matrix format.
//!
//! Two versions of the format exist. All header fields are little-endian.
//!
//! - Version 0 ([`Version::Packed`]):
//!   - `height` (u64)
//!   - `width` (u64)
//!   - Payload: `height × width` elements of `T` in column-major order, no padding.
//! - Version 1 ([`Version::Strided`]):
//!   - `height` (u64)
//!   - `width` (u64)
//!   - `ldim` (i64)
//!   - Payload: `height × width` elements of `T` in column-major order, no padding.
//!
//! The stream does not record its version; the reader must know which version was used.
//! Version 1 readers reconstruct the matrix with the stored leading dimension.

use std::io::{Read, Write};

use thiserror::Error;

use crate::matrix::{DenseMatrix, MatrixError};

/// Binary format version. See the [module docs](self).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// `[height][width][elements]`.
    Packed = 0,
    /// `[height][width][ldim][elements]`.
    #[default]
    Strided = 1,
}

#[derive(Debug, Clone, Copy, Error)]
#[error("unknown binary matrix format version {0}")]
pub struct UnknownVersion(pub u32);

impl TryFrom<u32> for Version {
    type Error = UnknownVersion;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Packed),
            1 => Ok(Self::Strided),
            other => Err(UnknownVersion(other)),
        }
    }
}

/// Header of a binary matrix stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    height: u64,
    width: u64,
    ldim: Option<i64>,
}

impl Metadata {
    /// Describe `matrix` in the given `version`.
    pub fn new<T: Copy>(matrix: &DenseMatrix<T>, version: Version) -> Result<Self, SaveBinError> {
        let overflow = || SaveBinError::DimensionOverflow {
            height: matrix.height(),
            width: matrix.width(),
        };
        let height = matrix.height().try_into().map_err(|_| overflow())?;
        let width = matrix.width().try_into().map_err(|_| overflow())?;
        let ldim = match version {
            Version::Packed => None,
            Version::Strided => Some(matrix.ldim().try_into().map_err(|_| overflow())?),
        };
        Ok(Self {
            height,
            width,
            ldim,
        })
    }

    /// Number of rows as a `u64`.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Number of columns as a `u64`.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// The stored leading dimension, if any.
    pub fn ldim(&self) -> Option<i64> {
        self.ldim
    }

    /// Deserialize the header of a `version` stream.
    pub fn read<R>(reader: &mut R, version: Version) -> std::io::Result<Self>
    where
        R: Read + ?Sized,
    {
        let height = read_u64(reader)?;
        let width = read_u64(reader)?;
        let ldim = match version {
            Version::Packed => None,
            Version::Strided => Some(i64::from_le_bytes(read_bytes(reader)?)),
        };
        Ok(Self {
            height,
            width,
            ldim,
        })
    }

    /// Serialize the header. Returns the number of bytes written.
    pub fn write<W>(&self, writer: &mut W) -> std::io::Result<usize>
    where
        W: Write + ?Sized,
    {
        writer.write_all(&self.height.to_le_bytes())?;
        writer.write_all(&self.width.to_le_bytes())?;
        let mut bytes = 2 * std::mem::size_of::<u64>();
        if let Some(ldim) = self.ldim {
            writer.write_all(&ldim.to_le_bytes())?;
            bytes += std::mem::size_of::<i64>();
        }
        Ok(bytes)
    }
}

fn read_bytes<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<[u8; 8]> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_u64<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<u64> {
    read_bytes(reader).map(u64::from_le_bytes)
}

/// Write `matrix` in the requested `version` of the binary format.
///
/// Returns the total number of bytes written.
pub fn serialize<T, W>(
    matrix: &DenseMatrix<T>,
    writer: &mut W,
    version: Version,
) -> Result<usize, SaveBinError>
where
    T: bytemuck::Pod,
    W: Write + ?Sized,
{
    let mut bytes = Metadata::new(matrix, version)?.write(writer)?;
    for column in matrix.column_iter() {
        writer.write_all(bytemuck::must_cast_slice::<T, u8>(column))?;
        bytes += std::mem::size_of_val(column);
    }
    Ok(bytes)
}

/// Read a matrix stored in the given `version` of the binary format.
pub fn deserialize<T, R>(
    reader: &mut R,
    version: Version,
) -> Result<DenseMatrix<T>, ReadBinError>
where
    T: bytemuck::Pod,
    R: Read + ?Sized,
{
    let metadata = Metadata::read(reader, version)?;
    let overflow = || ReadBinError::Overflow {
        height: metadata.height(),
        width: metadata.width(),
        type_size: std::mem::size_of::<T>(),
    };

    let height: usize = metadata.height().try_into().map_err(|_| overflow())?;
    let width: usize = metadata.width().try_into().map_err(|_| overflow())?;
    height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(std::mem::size_of::<T>()))
        .ok_or_else(overflow)?;

    let mut matrix = match metadata.ldim() {
        None => DenseMatrix::new(height, width)?,
        // An empty matrix stored by `new` legitimately carries `ldim == 0`.
        Some(0) if height == 0 => DenseMatrix::new(height, width)?,
        Some(ldim) => {
            let ldim: usize = ldim
                .try_into()
                .map_err(|_| ReadBinError::InvalidLeadingDimension { ldim })?;
            DenseMatrix::with_ldim(height, width, ldim)?
        }
    };

    for j in 0..width {
        reader.read_exact(bytemuck::must_cast_slice_mut::<T, u8>(
            matrix.column_slice_mut(j),
        ))?;
    }
    Ok(matrix)
}

/// Error type for [`deserialize`].
#[derive(Debug, Error)]
pub enum ReadBinError {
    /// `height * width * size_of::<T>()` overflows `usize`.
    #[error(
        "header dimensions overflow: {height} rows × {width} cols × {type_size} bytes overflows"
    )]
    Overflow {
        height: u64,
        width: u64,
        type_size: usize,
    },

    /// The stored leading dimension is negative.
    #[error("invalid leading dimension {ldim} in header")]
    InvalidLeadingDimension { ldim: i64 },

    /// The header describes a matrix that cannot be constructed.
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// Underlying IO failure, including a truncated payload.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error type for [`serialize`].
#[derive(Debug, Error)]
pub enum SaveBinError {
    /// Matrix dimensions cannot be represented in the binary header.
    #[error("dimensions overflow the header: {height} rows × {width} cols")]
    DimensionOverflow { height: usize, width: usize },

    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use num_complex::{Complex32, Complex64};
    use rstest::rstest;

    use super::*;
    use crate::matrix::build_matrix;

    fn round_trip<T>(matrix: &DenseMatrix<T>, version: Version) -> DenseMatrix<T>
    where
        T: bytemuck::Pod,
    {
        let mut buf = Vec::new();
        let written = serialize(matrix, &mut buf, version).unwrap();
        assert_eq!(written, buf.len());
        let mut cursor = Cursor::new(&buf);
        let loaded = deserialize(&mut cursor, version).unwrap();
        assert_eq!(cursor.position() as usize, buf.len(), "trailing bytes");
        loaded
    }

    #[rstest]
    fn round_trip_real(#[values(Version::Packed, Version::Strided)] version: Version) {
        let m = build_matrix(3, 4, |i, j| (i + 10 * j) as f32).unwrap();
        let loaded = round_trip(&m, version);
        assert_eq!(loaded, m);

        let m = build_matrix(13, 2, |i, j| (i as f64).sqrt() - j as f64).unwrap();
        assert_eq!(round_trip(&m, version), m);
    }

    #[rstest]
    fn round_trip_complex(#[values(Version::Packed, Version::Strided)] version: Version) {
        let m = build_matrix(5, 5, |i, j| Complex64::new(i as f64, -(j as f64))).unwrap();
        assert_eq!(round_trip(&m, version), m);

        let m = build_matrix(2, 7, |i, j| Complex32::new(0.5 * i as f32, j as f32)).unwrap();
        assert_eq!(round_trip(&m, version), m);
    }

    #[rstest]
    fn round_trip_empty(#[values(Version::Packed, Version::Strided)] version: Version) {
        let m = DenseMatrix::<f64>::default();
        assert_eq!(round_trip(&m, version), m);

        let m = DenseMatrix::<f64>::new(0, 3).unwrap();
        assert_eq!(round_trip(&m, version).shape(), (0, 3));
    }

    #[test]
    fn test_packed_layout() {
        let m = build_matrix(2, 2, |i, j| (1 + i + 2 * j) as u32).unwrap();
        let mut buf = Vec::new();
        let written = serialize(&m, &mut buf, Version::Packed).unwrap();
        assert_eq!(written, 16 + 4 * 4);

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&2u64.to_le_bytes());
        for x in [1u32, 2, 3, 4] {
            expected.extend_from_slice(&x.to_le_bytes());
        }
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_strided_preserves_ldim() {
        let mut m = DenseMatrix::<f64>::with_ldim(3, 2, 5).unwrap();
        m.for_each_mut(|i, j, x| *x = (i * j) as f64);

        let mut buf = Vec::new();
        let written = serialize(&m, &mut buf, Version::Strided).unwrap();
        // Padding is not written.
        assert_eq!(written, 24 + 6 * 8);
        assert_eq!(&buf[16..24], &5i64.to_le_bytes());

        let loaded: DenseMatrix<f64> =
            deserialize(&mut Cursor::new(&buf), Version::Strided).unwrap();
        assert_eq!(loaded.ldim(), 5);
        assert_eq!(loaded, m);
    }

    #[test]
    fn test_truncated_payload() {
        let m = build_matrix(4, 4, |i, j| (i + j) as f64).unwrap();
        let mut buf = Vec::new();
        serialize(&m, &mut buf, Version::Packed).unwrap();
        buf.truncate(buf.len() - 1);
        let err = deserialize::<f64, _>(&mut Cursor::new(&buf), Version::Packed).unwrap_err();
        assert!(matches!(err, ReadBinError::Io(_)), "{err:?}");
    }

    #[test]
    fn test_overflow() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&u64::MAX.to_le_bytes());
        buf.extend_from_slice(&2u64.to_le_bytes());
        let err = deserialize::<f64, _>(&mut Cursor::new(&buf), Version::Packed).unwrap_err();
        assert!(matches!(err, ReadBinError::Overflow { .. }), "{err:?}");
    }

    #[test]
    fn test_bad_ldim() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&4u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&(-1i64).to_le_bytes());
        let err = deserialize::<f64, _>(&mut Cursor::new(&buf), Version::Strided).unwrap_err();
        assert!(
            matches!(err, ReadBinError::InvalidLeadingDimension { ldim: -1 }),
            "{err:?}"
        );

        let mut buf = Vec::new();
        buf.extend_from_slice(&4u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&2i64.to_le_bytes());
        let err = deserialize::<f64, _>(&mut Cursor::new(&buf), Version::Strided).unwrap_err();
        assert!(
            matches!(
                err,
                ReadBinError::Matrix(MatrixError::LeadingDimensionTooSmall { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_version_from_u32() {
        assert_eq!(Version::try_from(0).unwrap(), Version::Packed);
        assert_eq!(Version::try_from(1).unwrap(), Version::Strided);
        assert!(Version::try_from(2).is_err());
        assert_eq!(Version::default(), Version::Strided);
    }
}
