/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Read and write matrices as whitespace separated text.
//!
//! The text format is row-major: each value is followed by a TAB and each row by a
//! newline. Reading consumes `height * width` whitespace separated tokens in row-major
//! order, so any mix of spaces, TABs, and newlines is accepted.
//!
//! Real values are written in scientific notation with 20 significant digits. Complex
//! values are written as `(re,im)`; a bare real token is accepted for a complex element
//! and is read with a zero imaginary part.

use std::io::{BufRead, Read, Write};

use num_complex::Complex;
use thiserror::Error;

use crate::matrix::{DenseMatrix, MatrixError};

/// Number of digits after the decimal point when writing. Together with the leading
/// digit this gives 20 significant digits.
const PRECISION: usize = 19;

/// Element types that have a text representation.
pub trait TextElement: Copy + bytemuck::Zeroable {
    /// Write `self` to `writer` without any separator.
    fn write_text<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()>;

    /// Parse a single whitespace-free token.
    fn parse_text(token: &str) -> Option<Self>;
}

macro_rules! real_text_element {
    ($T:ty) => {
        impl TextElement for $T {
            fn write_text<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
                write!(writer, "{:.*e}", PRECISION, self)
            }

            fn parse_text(token: &str) -> Option<Self> {
                token.parse().ok()
            }
        }

        impl TextElement for Complex<$T> {
            fn write_text<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
                write!(
                    writer,
                    "({:.*e},{:.*e})",
                    PRECISION, self.re, PRECISION, self.im
                )
            }

            fn parse_text(token: &str) -> Option<Self> {
                match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
                    Some(inner) => {
                        let (re, im) = inner.split_once(',')?;
                        Some(Complex::new(re.trim().parse().ok()?, im.trim().parse().ok()?))
                    }
                    None => Some(Complex::new(token.parse().ok()?, 0.0)),
                }
            }
        }
    };
}

real_text_element!(f32);
real_text_element!(f64);

/// Error type for [`read_text`] and [`read_text_auto`].
#[derive(Debug, Error)]
pub enum ReadTextError {
    /// The input ran out before `height * width` values were read.
    #[error("expected {expected} values for a {height}x{width} matrix but found only {found}")]
    UnexpectedEof {
        height: usize,
        width: usize,
        expected: usize,
        found: usize,
    },

    /// A token could not be parsed as the requested element type.
    #[error("could not parse {token:?} as the element at ({row}, {col})")]
    InvalidToken {
        token: String,
        row: usize,
        col: usize,
    },

    /// A row of the input has a different number of values than the first row.
    #[error("row {row} has {found} values but the first row has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write `matrix` in row-major text form.
pub fn write_text<T, W>(matrix: &DenseMatrix<T>, writer: &mut W) -> std::io::Result<()>
where
    T: TextElement,
    W: Write + ?Sized,
{
    for i in 0..matrix.height() {
        for x in matrix.row(i) {
            x.write_text(writer)?;
            writer.write_all(b"\t")?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Read a `height x width` matrix from the first `height * width` whitespace separated
/// tokens of `reader`, interpreted in row-major order.
///
/// Any input past the last required token is ignored.
pub fn read_text<T, R>(
    reader: &mut R,
    height: usize,
    width: usize,
) -> Result<DenseMatrix<T>, ReadTextError>
where
    T: TextElement,
    R: Read + ?Sized,
{
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let mut matrix = DenseMatrix::new(height, width)?;
    let mut tokens = contents.split_whitespace();
    let expected = height * width;
    for row in 0..height {
        for col in 0..width {
            let token = tokens.next().ok_or(ReadTextError::UnexpectedEof {
                height,
                width,
                expected,
                found: row * width + col,
            })?;
            matrix[(row, col)] = parse(token, row, col)?;
        }
    }
    Ok(matrix)
}

/// Read a matrix whose shape is implied by the layout of the text: the width is the
/// number of values on the first non-empty line and the height is the number of
/// non-empty lines.
///
/// Every non-empty line must have the same number of values.
pub fn read_text_auto<T, R>(reader: R) -> Result<DenseMatrix<T>, ReadTextError>
where
    T: TextElement,
    R: BufRead,
{
    let mut values: Vec<T> = Vec::new();
    let mut width = None;
    let mut height = 0;
    for line in reader.lines() {
        let line = line?;
        let start = values.len();
        for (col, token) in line.split_whitespace().enumerate() {
            values.push(parse(token, height, col)?);
        }
        let found = values.len() - start;
        if found == 0 {
            continue;
        }
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(ReadTextError::RaggedRow {
                    row: height,
                    expected,
                    found,
                })
            }
            Some(_) => {}
        }
        height += 1;
    }

    let width = width.unwrap_or(0);
    let mut matrix = DenseMatrix::new(height, width)?;
    matrix.for_each_mut(|i, j, x| *x = values[j + width * i]);
    Ok(matrix)
}

fn parse<T: TextElement>(token: &str, row: usize, col: usize) -> Result<T, ReadTextError> {
    T::parse_text(token).ok_or_else(|| ReadTextError::InvalidToken {
        token: token.to_owned(),
        row,
        col,
    })
}

///////////
// Tests //
///////////
