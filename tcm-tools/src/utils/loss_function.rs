/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{fs::File, io::BufReader, path::Path};

use tcm_linalg::RealField;
use tcm_matrix::DenseMatrix;
use tcm_physics::{
    io::{parse_wavevector, read_positions},
    loss::{loss_function, momentum_eigenvector},
};
use tracing::info;

use super::{load_matrix, CMDResult, ToolError};

/// `(ε, ε^(-1))` for the plane wave with wave vector `q` over the sites at `positions`,
/// given the eigenvalues and eigenvectors of the dielectric matrix.
///
/// Returns [`ToolError::InvalidArgument`] unless `eigenvalues` is an `N x 1` column and
/// `eigenstates` is `N x N`, where `N` is the number of sites.
pub fn compute_loss<R: RealField>(
    q: &[R; 3],
    positions: &[[R; 3]],
    eigenvalues: &DenseMatrix<R::Complex>,
    eigenstates: &DenseMatrix<R::Complex>,
) -> CMDResult<(R::Complex, R::Complex)> {
    let n = positions.len();
    if eigenvalues.shape() != (n, 1) {
        return Err(ToolError::InvalidArgument(format!(
            "expected {n}x1 eigenvalues for {n} sites, got a {}x{} matrix",
            eigenvalues.height(),
            eigenvalues.width()
        )));
    }
    if eigenstates.shape() != (n, n) {
        return Err(ToolError::InvalidArgument(format!(
            "expected {n}x{n} eigenstates for {n} sites, got a {}x{} matrix",
            eigenstates.height(),
            eigenstates.width()
        )));
    }
    let plane_wave = momentum_eigenvector(q, positions, R::from_f64(std::f64::consts::PI))?;
    Ok(loss_function(&plane_wave, eigenvalues, eigenstates))
}

/// File-based variant of [`compute_loss`]: `q` is written as `(x, y, z)`, `positions` is
/// a text file of `x y z` triples and the spectrum is stored in the binary format.
pub fn compute_loss_from_files<R: RealField>(
    q: &str,
    positions: &Path,
    eigenvalues: &Path,
    eigenstates: &Path,
) -> CMDResult<(R::Complex, R::Complex)> {
    let q = parse_wavevector::<R>(q)?;
    let positions = read_positions::<R, _>(BufReader::new(File::open(positions)?))?;
    let eigenvalues = load_matrix(eigenvalues)?;
    let eigenstates = load_matrix(eigenstates)?;
    info!("Projecting {} eigenvalues onto q = {:?}...", positions.len(), q);
    compute_loss(&q, &positions, &eigenvalues, &eigenstates)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use rstest::rstest;
    use tcm_matrix::build_matrix;

    use super::*;
    use crate::utils::save_matrix;

    #[test]
    fn test_identity_spectrum() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let w = build_matrix(3, 1, |_, _| Complex64::new(2.0, 0.0)).unwrap();
        let v = build_matrix(3, 3, |i, j| {
            Complex64::new(if i == j { 1.0 } else { 0.0 }, 0.0)
        })
        .unwrap();

        let (eps, inv) = compute_loss::<f64>(&[0.7, 0.0, 0.0], &positions, &w, &v).unwrap();
        let norm = 3.0 * (2.0 * std::f64::consts::PI).powf(-3.0);
        assert_relative_eq!(eps.re, 2.0 * norm, max_relative = 1e-12);
        assert_relative_eq!(inv.re, 0.5 * norm, max_relative = 1e-12);
    }

    #[rstest]
    #[case(4, 1, 3)]
    #[case(3, 2, 3)]
    #[case(3, 1, 4)]
    fn test_mismatched_spectrum(
        #[case] values: usize,
        #[case] columns: usize,
        #[case] states: usize,
    ) {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let w = DenseMatrix::<Complex64>::zeros(values, columns).unwrap();
        let v = DenseMatrix::<Complex64>::zeros(states, states).unwrap();
        let result = compute_loss::<f64>(&[0.7, 0.0, 0.0], &positions, &w, &v);
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));
    }

    #[test]
    fn test_mismatched_files() {
        let dir = std::env::temp_dir().join(format!("tcm-tools-loss-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let positions = dir.join("positions.txt");
        let eigenvalues = dir.join("w.bin");
        let eigenstates = dir.join("z.bin");
        std::fs::write(&positions, "0 0 0\n1 0 0\n2 0 0\n").unwrap();
        save_matrix(&eigenvalues, &DenseMatrix::<Complex64>::zeros(4, 1).unwrap()).unwrap();
        save_matrix(&eigenstates, &DenseMatrix::<Complex64>::zeros(4, 4).unwrap()).unwrap();

        let result =
            compute_loss_from_files::<f64>("(1, 0, 0)", &positions, &eigenvalues, &eigenstates);
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_wavevector() {
        let result = compute_loss_from_files::<f64>(
            "1, 2, 3",
            Path::new("positions.txt"),
            Path::new("w.bin"),
            Path::new("z.bin"),
        );
        assert!(result.is_err());
    }
}
