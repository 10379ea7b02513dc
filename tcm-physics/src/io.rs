/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Readers for the plain-text inputs of the drivers.

use std::io::Read;

use tcm_linalg::RealField;
use tcm_matrix::{
    text::{read_text, ReadTextError, TextElement},
    DenseMatrix,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not parse {token:?} (value {index}) as a number")]
    InvalidNumber { token: String, index: usize },

    #[error("expected x, y and z for every position but found {count} values")]
    IncompleteTriple { count: usize },

    #[error("found {count} values which is not the number of elements of a square matrix")]
    NotSquare { count: usize },

    #[error("could not convert {0:?} to a 3D vector, expected \"(x, y, z)\"")]
    InvalidWavevector(String),

    #[error(transparent)]
    Text(#[from] ReadTextError),
}

/// Read site positions given as whitespace separated `x y z` triples.
pub fn read_positions<R, I>(mut reader: I) -> Result<Vec<[R; 3]>, InputError>
where
    R: RealField,
    I: Read,
{
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let values = contents
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| parse_real::<R>(token, index))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() % 3 != 0 {
        return Err(InputError::IncompleteTriple {
            count: values.len(),
        });
    }
    Ok(values.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// Read a square matrix given as whitespace separated values in row-major order. The
/// size is deduced from the number of values.
pub fn read_hamiltonian<T, I>(mut reader: I) -> Result<DenseMatrix<T>, InputError>
where
    T: TextElement,
    I: Read,
{
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let count = contents.split_whitespace().count();
    let n = (0..=count).find(|n| n * n >= count).unwrap_or(count);
    if n * n != count {
        return Err(InputError::NotSquare { count });
    }
    Ok(read_text(&mut contents.as_bytes(), n, n)?)
}

/// Parse a wave vector written as `(x, y, z)`. Surrounding whitespace is ignored.
pub fn parse_wavevector<R: RealField>(s: &str) -> Result<[R; 3], InputError> {
    let invalid = || InputError::InvalidWavevector(s.to_owned());
    let inner = s
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut parts = inner.split(',').map(|p| p.trim().parse::<f64>());
    let mut next = || match parts.next() {
        Some(Ok(x)) => Ok(R::from_f64(x)),
        _ => Err(invalid()),
    };
    let v = [next()?, next()?, next()?];
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(v)
}

fn parse_real<R: RealField>(token: &str, index: usize) -> Result<R, InputError> {
    token
        .parse::<f64>()
        .map(R::from_f64)
        .map_err(|_| InputError::InvalidNumber {
            token: token.to_owned(),
            index,
        })
}

///////////
// Tests //
///////////
