/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::io::{BufRead, Write};

use tcm_matrix::{
    io::{deserialize, serialize},
    text::{read_text_auto, write_text, TextElement},
    DenseMatrix,
};
use tracing::info;

use super::{CMDResult, StreamFormat, BINARY_VERSION};

/// Read one matrix from `input` in the `from` format.
pub fn load_stream<T, R>(input: &mut R, from: StreamFormat) -> CMDResult<DenseMatrix<T>>
where
    T: TextElement + bytemuck::Pod,
    R: BufRead,
{
    let matrix = match from {
        StreamFormat::Text => read_text_auto(input)?,
        StreamFormat::Bin => deserialize(input, BINARY_VERSION)?,
    };
    Ok(matrix)
}

/// Write `matrix` to `output` in the `to` format.
pub fn save_stream<T, W>(matrix: &DenseMatrix<T>, output: &mut W, to: StreamFormat) -> CMDResult<()>
where
    T: TextElement + bytemuck::Pod,
    W: Write,
{
    match to {
        StreamFormat::Text => write_text(matrix, output)?,
        StreamFormat::Bin => {
            serialize(matrix, output, BINARY_VERSION)?;
        }
    }
    output.flush()?;
    Ok(())
}

/// Copy one matrix from `input` to `output`, converting between formats.
pub fn convert<T, R, W>(
    input: &mut R,
    output: &mut W,
    from: StreamFormat,
    to: StreamFormat,
) -> CMDResult<()>
where
    T: TextElement + bytemuck::Pod,
    R: BufRead,
    W: Write,
{
    info!("Reading a {:?} matrix...", from);
    let matrix: DenseMatrix<T> = load_stream(input, from)?;
    info!(
        "Writing a {}x{} matrix as {:?}...",
        matrix.height(),
        matrix.width(),
        to
    );
    save_stream(&matrix, output, to)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use num_complex::Complex32;
    use rstest::rstest;
    use tcm_matrix::build_matrix;

    use super::*;

    #[test]
    fn test_text_to_bin_and_back() {
        let text = "1\t2\t3\t\n4\t5\t6\t\n";
        let mut bin = Vec::new();
        convert::<f64, _, _>(
            &mut Cursor::new(text),
            &mut bin,
            StreamFormat::Text,
            StreamFormat::Bin,
        )
        .unwrap();

        let m: DenseMatrix<f64> = deserialize(&mut Cursor::new(&bin), BINARY_VERSION).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(0, 2)], 3.0);

        let mut out = Vec::new();
        convert::<f64, _, _>(
            &mut Cursor::new(&bin),
            &mut out,
            StreamFormat::Bin,
            StreamFormat::Text,
        )
        .unwrap();
        let back: DenseMatrix<f64> =
            read_text_auto(Cursor::new(String::from_utf8(out).unwrap())).unwrap();
        assert_eq!(back, m);
    }

    #[rstest]
    #[case(StreamFormat::Text)]
    #[case(StreamFormat::Bin)]
    fn test_identity_conversion(#[case] format: StreamFormat) {
        let m = build_matrix(3, 2, |i, j| Complex32::new(i as f32 + 0.5, -(j as f32))).unwrap();
        let mut first = Vec::new();
        save_stream(&m, &mut first, format).unwrap();

        let mut second = Vec::new();
        convert::<Complex32, _, _>(&mut Cursor::new(&first), &mut second, format, format)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ragged_text_is_rejected() {
        let result = convert::<f32, _, _>(
            &mut Cursor::new("1 2\n3\n"),
            &mut Vec::new(),
            StreamFormat::Text,
            StreamFormat::Bin,
        );
        assert!(result.is_err());
    }
}
