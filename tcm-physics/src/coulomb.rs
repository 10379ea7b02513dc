/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Bare Coulomb interaction between lattice sites.

use tcm_linalg::{Field, RealField};
use tcm_matrix::{build_matrix, DenseMatrix};
use tracing::debug;

use crate::{
    constants::{ELEMENTARY_CHARGE, PI, SELF_INTERACTION_POTENTIAL, VACUUM_PERMITTIVITY},
    Constants, PhysicsError,
};

const NAME: &str = "tcm_physics::coulomb::make";

/// Euclidean distance between two points.
pub fn distance<R: RealField>(v: &[R; 3], w: &[R; 3]) -> R {
    v.iter()
        .zip(w.iter())
        .map(|(a, b)| (*a - *b).powi(2))
        .fold(R::zero(), |acc, x| acc + x)
        .sqrt()
}

/// Build the `N x N` Coulomb matrix of the sites at `positions`:
///
/// ```text
/// V_ij = e / (4 π ε0 |r_i - r_j|)    for i != j
/// V_ii = V0
/// ```
///
/// where `e`, `π`, `ε0` and `V0` are the constants `elementary-charge`, `pi`,
/// `vacuum-permittivity` and `self-interaction-potential`. The matrix is real and
/// symmetric; for complex `T` the imaginary parts are zero.
pub fn make<T: Field>(
    positions: &[[T::Real; 3]],
    constants: &Constants,
) -> Result<DenseMatrix<T>, PhysicsError> {
    debug!("Calculating V...");
    let e: T::Real = constants.require_as(NAME, ELEMENTARY_CHARGE)?;
    let pi: T::Real = constants.require_as(NAME, PI)?;
    let eps0: T::Real = constants.require_as(NAME, VACUUM_PERMITTIVITY)?;
    let v0: T::Real = constants.require_as(NAME, SELF_INTERACTION_POTENTIAL)?;

    let scale = <T::Real as RealField>::from_f64(4.0) * pi * eps0;
    let n = positions.len();
    let v = build_matrix(n, n, |i, j| {
        let x = if i == j {
            v0
        } else {
            e / (scale * distance(&positions[i], &positions[j]))
        };
        T::from_real(x)
    })?;
    debug!("Successfully calculated V.");
    Ok(v)
}

///////////
// Tests //
///////////
