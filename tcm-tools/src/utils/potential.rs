/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::io::{Read, Write};

use tcm_linalg::Field;
use tcm_matrix::io::serialize;
use tcm_physics::{coulomb, io::read_positions, Constants};
use tracing::info;

use super::{CMDResult, BINARY_VERSION};

/// Read site positions from `input` and write the binary Coulomb matrix to `output`.
pub fn make_potential<T, R, W>(input: R, output: &mut W, constants: &Constants) -> CMDResult<()>
where
    T: Field,
    R: Read,
    W: Write,
{
    let positions = read_positions::<T::Real, _>(input)?;
    info!("Calculating the Coulomb matrix of {} sites...", positions.len());
    let v = coulomb::make::<T>(&positions, constants)?;
    serialize(&v, output, BINARY_VERSION)?;
    output.flush()?;
    Ok(())
}
