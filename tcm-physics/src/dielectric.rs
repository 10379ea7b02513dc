/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Polarizability and dielectric matrix in the random phase approximation.
//!
//! All routines take the single-particle energies `E` as an `N x 1` column and the
//! single-particle states `Psi` as an `N x N` matrix whose column `i` is the state with
//! energy `E[i]`. The frequency `omega` is complex; a small positive imaginary part
//! (the `tau` constant in the drivers) keeps the denominators of `G` away from zero.

use num_complex::Complex;
use tcm_linalg::{dense, ComplexField, Operator};
use tcm_matrix::{build_matrix, DenseMatrix};
use tracing::debug;

use crate::{
    constants::{BOLTZMANN_CONSTANT, CHEMICAL_POTENTIAL, TEMPERATURE},
    occupation::fermi_dirac,
    Constants, PhysicsError,
};

fn check_inputs<C: ComplexField>(energies: &DenseMatrix<C::Real>, states: &DenseMatrix<C>) {
    assert!(
        energies.is_column(),
        "energies must be a column, got a {}x{} matrix",
        energies.height(),
        energies.width()
    );
    assert!(
        states.is_square() && states.height() == energies.height(),
        "expected {n}x{n} states, got a {}x{} matrix",
        states.height(),
        states.width(),
        n = energies.height()
    );
}

/// Build the `N x N` matrix
///
/// ```text
/// G_ij = (f_i - f_j) / (E_i - E_j - omega)
/// ```
///
/// where `f_i` is the Fermi-Dirac occupation of `E_i`. Requires the constants
/// `temperature`, `chemical-potential` and `boltzmann-constant`.
///
/// # Panics
///
/// Panics if `energies` is not a column.
pub fn g_matrix<C: ComplexField>(
    omega: C,
    energies: &DenseMatrix<C::Real>,
    constants: &Constants,
) -> Result<DenseMatrix<C>, PhysicsError> {
    const NAME: &str = "tcm_physics::dielectric::g_matrix";
    debug!("Calculating G for omega = {}...", omega);
    let t = constants.require_as(NAME, TEMPERATURE)?;
    let mu = constants.require_as(NAME, CHEMICAL_POTENTIAL)?;
    let kb = constants.require_as(NAME, BOLTZMANN_CONSTANT)?;
    assert!(
        energies.is_column(),
        "energies must be a column, got a {}x{} matrix",
        energies.height(),
        energies.width()
    );

    let e = energies.column_slice(0);
    let f: Vec<C::Real> = e.iter().map(|&ei| fermi_dirac(ei, t, mu, kb)).collect();
    let n = e.len();
    let g = build_matrix(n, n, |i, j| {
        C::from_real(f[i] - f[j]) / (C::from_real(e[i] - e[j]) - omega)
    })?;
    debug!("Successfully calculated G.");
    Ok(g)
}

/// Build the polarizability matrix
///
/// ```text
/// A_i    = Psi(a, i) * conj(Psi(b, i))
/// chi_ab = 2 * <A, G^T A>
/// ```
///
/// with `G` from [`g_matrix`] and `<x, y> = sum_i conj(x_i) y_i`.
///
/// # Panics
///
/// Panics if `energies` is not a column or `states` is not square of matching size.
pub fn chi_matrix<C: ComplexField>(
    omega: C,
    energies: &DenseMatrix<C::Real>,
    states: &DenseMatrix<C>,
    constants: &Constants,
) -> Result<DenseMatrix<C>, PhysicsError> {
    debug!("Calculating chi for omega = {}...", omega);
    check_inputs(energies, states);
    let n = energies.height();
    let g = g_matrix(omega, energies, constants)?;

    let mut a = DenseMatrix::<C>::new(n, 1)?;
    let mut temp = DenseMatrix::<C>::new(n, 1)?;
    let two = C::one() + C::one();
    let mut chi = DenseMatrix::<C>::new(n, n)?;
    for col in 0..n {
        for row in 0..n {
            a.column_mut(0)
                .zip(states.row(row).zip(states.row(col)))
                .for_each(|(ai, (x, y))| *ai = *x * y.conj());
            dense::gemv(Operator::Transpose, C::one(), &g, &a, C::zero(), &mut temp);
            chi[(row, col)] = two * dense::dot(&a, &temp);
        }
    }
    debug!("Successfully calculated chi.");
    Ok(chi)
}

/// Build the dielectric matrix `epsilon = I - V chi` with `chi` from [`chi_matrix`] and
/// the Coulomb matrix `V`.
///
/// # Panics
///
/// Panics if the shapes of `energies`, `states` and `potential` do not match.
pub fn dielectric_matrix<C: ComplexField>(
    omega: C,
    energies: &DenseMatrix<C::Real>,
    states: &DenseMatrix<C>,
    potential: &DenseMatrix<C>,
    constants: &Constants,
) -> Result<DenseMatrix<C>, PhysicsError> {
    debug!("Calculating epsilon for omega = {}...", omega);
    check_inputs(energies, states);
    let n = energies.height();
    assert!(
        potential.shape() == (n, n),
        "expected a {n}x{n} potential, got a {}x{} matrix",
        potential.height(),
        potential.width()
    );

    let chi = chi_matrix(omega, energies, states, constants)?;
    let mut epsilon = DenseMatrix::<C>::zeros(n, n)?;
    for i in 0..n {
        epsilon[(i, i)] = C::one();
    }
    dense::gemm(
        Operator::None,
        Operator::None,
        -C::one(),
        potential,
        &chi,
        C::one(),
        &mut epsilon,
    );
    debug!("Successfully calculated epsilon.");
    Ok(epsilon)
}

/// The dielectric matrix at one frequency together with its eigen-decomposition.
#[derive(Debug)]
pub struct Spectrum<C: ComplexField> {
    /// `epsilon(omega)`.
    pub matrix: DenseMatrix<C>,
    /// The `N x 1` column of eigenvalues, in no particular order.
    pub eigenvalues: DenseMatrix<Complex<C::Real>>,
    /// Column `j` is the right eigenvector belonging to `eigenvalues[j]`.
    pub eigenvectors: DenseMatrix<Complex<C::Real>>,
}

/// Compute [`dielectric_matrix`] and its eigenvalues and right eigenvectors.
pub fn dielectric_spectrum<C: ComplexField>(
    omega: C,
    energies: &DenseMatrix<C::Real>,
    states: &DenseMatrix<C>,
    potential: &DenseMatrix<C>,
    constants: &Constants,
) -> Result<Spectrum<C>, PhysicsError> {
    let matrix = dielectric_matrix(omega, energies, states, potential, constants)?;
    let n = matrix.height();

    debug!("Diagonalizing epsilon...");
    let mut scratch = matrix.try_clone()?;
    let mut eigenvalues = DenseMatrix::new(n, 1)?;
    let mut eigenvectors = DenseMatrix::new(n, n)?;
    dense::geev(&mut scratch, &mut eigenvalues, Some(&mut eigenvectors))?;
    debug!("Successfully diagonalized epsilon.");

    Ok(Spectrum {
        matrix,
        eigenvalues,
        eigenvectors,
    })
}

///////////
// Tests //
///////////
