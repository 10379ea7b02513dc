/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::io::{Read, Write};

use tcm_linalg::{dense, Field};
use tcm_matrix::{
    io::{deserialize, serialize},
    text::TextElement,
    DenseMatrix,
};
use tcm_physics::io::read_hamiltonian;
use tracing::info;

use super::{CMDResult, StreamFormat, ToolError, BINARY_VERSION};

/// Eigenvalues and eigenvectors of a Hamiltonian.
#[derive(Debug)]
pub struct Eigensystem<T: Field> {
    /// Ascending energies as an `N x 1` column.
    pub energies: DenseMatrix<T::Real>,
    /// Column `i` is the state with energy `energies[i]`.
    pub states: DenseMatrix<T>,
}

/// Diagonalize the Hermitian matrix `hamiltonian`, reading only its upper triangle.
pub fn solve<T: Field>(mut hamiltonian: DenseMatrix<T>) -> CMDResult<Eigensystem<T>> {
    if !hamiltonian.is_square() {
        return Err(ToolError::InvalidArgument(format!(
            "the Hamiltonian must be square, got a {}x{} matrix",
            hamiltonian.height(),
            hamiltonian.width()
        )));
    }
    let n = hamiltonian.height();
    let mut energies = DenseMatrix::new(n, 1)?;
    let mut states = DenseMatrix::new(n, n)?;
    info!("Diagonalizing a {}x{} Hamiltonian...", n, n);
    dense::heevr(&mut hamiltonian, &mut energies, Some(&mut states))?;
    Ok(Eigensystem { energies, states })
}

/// Read a Hamiltonian from `input`, diagonalize it and write the binary energies and
/// states to the two outputs.
pub fn solve_stream<T, R, W1, W2>(
    mut input: R,
    format: StreamFormat,
    energies_output: &mut W1,
    states_output: &mut W2,
) -> CMDResult<()>
where
    T: Field + TextElement,
    R: Read,
    W1: Write,
    W2: Write,
{
    info!("Reading Hamiltonian...");
    let hamiltonian: DenseMatrix<T> = match format {
        StreamFormat::Bin => deserialize(&mut input, BINARY_VERSION)?,
        StreamFormat::Text => read_hamiltonian(input)?,
    };
    let system = solve(hamiltonian)?;

    info!("Saving results...");
    serialize(&system.energies, energies_output, BINARY_VERSION)?;
    energies_output.flush()?;
    serialize(&system.states, states_output, BINARY_VERSION)?;
    states_output.flush()?;
    info!("Done!");
    Ok(())
}
