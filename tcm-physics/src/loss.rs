/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Projection of the dielectric spectrum onto plane waves.

use tcm_linalg::{blas, ComplexField, RealField};
use tcm_matrix::{build_matrix, DenseMatrix, MatrixError};

/// The plane wave `q_r = (2π)^(-3/2) exp(i k·r)` sampled at every site `r` in
/// `positions`, returned as a column.
pub fn momentum_eigenvector<R: RealField>(
    k: &[R; 3],
    positions: &[[R; 3]],
    pi: R,
) -> Result<DenseMatrix<R::Complex>, MatrixError> {
    let two = R::one() + R::one();
    let norm = (two * pi).powf(R::from_f64(-1.5));
    build_matrix(positions.len(), 1, |i, _| {
        let r = &positions[i];
        let phase = k[0] * r[0] + k[1] * r[1] + k[2] * r[2];
        R::Complex::from_parts(norm * phase.cos(), norm * phase.sin())
    })
}

/// Given the eigenvalues `λ_i` and right eigenvectors `v_i` of the dielectric matrix,
/// compute
///
/// ```text
/// c_i      = |<q, v_i>|^2
/// ε        = sum_i c_i λ_i
/// ε^(-1)   = sum_i c_i / λ_i
/// ```
///
/// and return `(ε, ε^(-1))`. The loss function is `-Im ε^(-1)`.
///
/// # Panics
///
/// Panics if `eigenvalues` is not a column, `eigenvectors` is not square, or `q`,
/// `eigenvalues` and `eigenvectors` do not share the same height.
pub fn loss_function<C: ComplexField>(
    q: &DenseMatrix<C>,
    eigenvalues: &DenseMatrix<C>,
    eigenvectors: &DenseMatrix<C>,
) -> (C, C) {
    assert!(eigenvalues.is_column(), "eigenvalues must be a column");
    assert!(eigenvectors.is_square(), "eigenvectors must be square");
    let n = eigenvalues.height();
    assert!(
        eigenvectors.height() == n && q.is_column() && q.height() == n,
        "expected a column q and {n}x{n} eigenvectors, got {}x{} and {}x{}",
        q.height(),
        q.width(),
        eigenvectors.height(),
        eigenvectors.width()
    );
    if n == 0 {
        return (C::zero(), C::zero());
    }

    let q = q.column_slice(0);
    eigenvalues
        .column_slice(0)
        .iter()
        .zip(eigenvectors.column_iter())
        .fold((C::zero(), C::zero()), |(eps, inv), (&lambda, v)| {
            let c = C::from_real(blas::dot(n, q, 1, v, 1).norm_sqr());
            (eps + c * lambda, inv + c / lambda)
        })
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::{Complex32, Complex64};
    use num_traits::Zero;

    use super::*;

    #[test]
    fn plane_wave_values() {
        let pi = std::f64::consts::PI;
        let positions = [[0.0, 0.0, 0.0], [1.0, 2.0, 0.0], [0.5, 0.0, 4.0]];
        let k = [pi / 2.0, 0.0, 0.25];
        let q = momentum_eigenvector(&k, &positions, pi).unwrap();
        assert_eq!(q.shape(), (3, 1));

        let norm = (2.0 * pi).powf(-1.5);
        for (i, r) in positions.iter().enumerate() {
            let phase = k[0] * r[0] + k[1] * r[1] + k[2] * r[2];
            let expected = Complex64::from_polar(norm, phase);
            assert_relative_eq!(q[(i, 0)].re, expected.re, epsilon = 1e-15);
            assert_relative_eq!(q[(i, 0)].im, expected.im, epsilon = 1e-15);
            assert_relative_eq!(q[(i, 0)].norm(), norm, max_relative = 1e-14);
        }
    }

    #[test]
    fn standard_basis() {
        // With v_i = e_i the coefficients are |q_i|^2.
        let q = build_matrix(3, 1, |i, _| Complex64::new(i as f64 + 1.0, 1.0)).unwrap();
        let lambdas = [
            Complex64::new(2.0, 0.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(1.0, -1.0),
        ];
        let w = build_matrix(3, 1, |i, _| lambdas[i]).unwrap();
        let v = build_matrix(3, 3, |i, j| {
            if i == j {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::zero()
            }
        })
        .unwrap();

        let (eps, inv) = loss_function(&q, &w, &v);
        let c = [2.0, 5.0, 10.0];
        let expected_eps: Complex64 = c.iter().zip(lambdas).map(|(c, l)| *c * l).sum();
        let expected_inv: Complex64 = c.iter().zip(lambdas).map(|(c, l)| *c / l).sum();
        assert_relative_eq!(eps.re, expected_eps.re, max_relative = 1e-14);
        assert_relative_eq!(eps.im, expected_eps.im, max_relative = 1e-14);
        assert_relative_eq!(inv.re, expected_inv.re, max_relative = 1e-14);
        assert_relative_eq!(inv.im, expected_inv.im, max_relative = 1e-14);
    }

    #[test]
    fn unit_eigenvalues_give_the_norm_of_q() {
        let pi = std::f32::consts::PI;
        let positions: Vec<[f32; 3]> = (0..4).map(|i| [i as f32, 0.0, 0.0]).collect();
        let q = momentum_eigenvector(&[0.3, 0.0, 0.0], &positions, pi).unwrap();
        let w = build_matrix(4, 1, |_, _| Complex32::new(1.0, 0.0)).unwrap();
        let v = build_matrix(4, 4, |i, j| {
            if i == j {
                Complex32::new(1.0, 0.0)
            } else {
                Complex32::zero()
            }
        })
        .unwrap();

        let (eps, inv) = loss_function(&q, &w, &v);
        let expected = 4.0 * (2.0 * pi).powf(-3.0);
        assert_relative_eq!(eps.re, expected, max_relative = 1e-5);
        assert_relative_eq!(inv.re, expected, max_relative = 1e-5);
        assert_eq!(eps.im, 0.0);
    }

    #[test]
    fn empty() {
        let q = DenseMatrix::<Complex64>::new(0, 1).unwrap();
        let w = DenseMatrix::<Complex64>::new(0, 1).unwrap();
        let v = DenseMatrix::<Complex64>::new(0, 0).unwrap();
        assert_eq!(loss_function(&q, &w, &v), (Complex64::zero(), Complex64::zero()));
    }

    #[test]
    #[should_panic(expected = "eigenvectors must be square")]
    fn rectangular_eigenvectors() {
        let q = DenseMatrix::<Complex64>::new(2, 1).unwrap();
        let w = DenseMatrix::<Complex64>::new(2, 1).unwrap();
        let v = DenseMatrix::<Complex64>::new(2, 3).unwrap();
        let _ = loss_function(&q, &w, &v);
    }
}
