/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::{Path, PathBuf};

use tcm_linalg::{ComplexField, RealField};
use tcm_matrix::DenseMatrix;
use tcm_physics::{constants::TAU, dielectric, timing::TimingSink, Constants};
use tracing::info;

use super::{save_matrix, CMDResult, FrequencySweep, ToolError};

/// Inputs of a dielectric function sweep, all stored in the binary matrix format.
#[derive(Debug)]
pub struct DielectricInputs<R: RealField> {
    /// Single-particle energies as an `N x 1` column.
    pub energies: DenseMatrix<R>,
    /// Single-particle states as the columns of an `N x N` matrix.
    pub states: DenseMatrix<R::Complex>,
    /// The `N x N` Coulomb matrix.
    pub potential: DenseMatrix<R::Complex>,
}

impl<R: RealField> DielectricInputs<R> {
    /// Bundle the inputs, checking that `energies` is an `N x 1` column and that
    /// `states` and `potential` are both `N x N`.
    pub fn new(
        energies: DenseMatrix<R>,
        states: DenseMatrix<R::Complex>,
        potential: DenseMatrix<R::Complex>,
    ) -> CMDResult<Self> {
        let n = energies.height();
        if !energies.is_column() {
            return Err(ToolError::InvalidArgument(format!(
                "energies must be an N x 1 column, got a {}x{} matrix",
                n,
                energies.width()
            )));
        }
        for (name, m) in [("states", &states), ("potential", &potential)] {
            if m.shape() != (n, n) {
                return Err(ToolError::InvalidArgument(format!(
                    "expected {n}x{n} {name} to match {n} energies, got a {}x{} matrix",
                    m.height(),
                    m.width()
                )));
            }
        }
        Ok(Self {
            energies,
            states,
            potential,
        })
    }

    pub fn load(energies: &Path, states: &Path, potential: &Path) -> CMDResult<Self> {
        Self::new(
            super::load_matrix(energies)?,
            super::load_matrix(states)?,
            super::load_matrix(potential)?,
        )
    }
}

/// The three files written for one frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub matrix: PathBuf,
    pub eigenvalues: PathBuf,
    pub eigenstates: PathBuf,
}

impl OutputFiles {
    /// `<base>.<omega>.{matrix,eigenvalues,eigenstates}.bin`, with `omega` printed with
    /// six decimals.
    pub fn new(base: &str, omega: f64) -> Self {
        let path = |kind: &str| PathBuf::from(format!("{base}.{omega:.6}.{kind}.bin"));
        Self {
            matrix: path("matrix"),
            eigenvalues: path("eigenvalues"),
            eigenstates: path("eigenstates"),
        }
    }
}

/// Compute the dielectric matrix and its spectrum at the frequencies `indices` of
/// `sweep`, writing the results next to `output_base`.
///
/// The imaginary part of every frequency is the `tau` constant. Time spent in each stage
/// is accumulated in `sink`. Returns the files written, in the order of `indices`.
pub fn run_sweep<R: RealField>(
    inputs: &DielectricInputs<R>,
    sweep: &FrequencySweep,
    indices: &[usize],
    constants: &Constants,
    output_base: &str,
    sink: &TimingSink,
) -> CMDResult<Vec<OutputFiles>> {
    let tau: R = constants.require_as("tcm_tools::dielectric_function::run_sweep", TAU)?;
    let mut written = Vec::with_capacity(indices.len());
    for &i in indices {
        let re = sweep.at(i);
        let omega = R::Complex::from_parts(R::from_f64(re), tau);
        info!("Processing omega = {}...", omega);

        let spectrum = sink.measure("dielectric_spectrum", || {
            dielectric::dielectric_spectrum(
                omega,
                &inputs.energies,
                &inputs.states,
                &inputs.potential,
                constants,
            )
        })?;

        let files = OutputFiles::new(output_base, re);
        sink.measure("write", || -> CMDResult<()> {
            save_matrix(&files.matrix, &spectrum.matrix)?;
            save_matrix(&files.eigenvalues, &spectrum.eigenvalues)?;
            save_matrix(&files.eigenstates, &spectrum.eigenvectors)
        })?;
        written.push(files);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use tcm_matrix::build_matrix;

    use super::*;
    use crate::utils::load_matrix;

    #[test]
    fn test_output_names() {
        let files = OutputFiles::new("out/eps", 0.25);
        assert_eq!(files.matrix, PathBuf::from("out/eps.0.250000.matrix.bin"));
        assert_eq!(files.eigenvalues, PathBuf::from("out/eps.0.250000.eigenvalues.bin"));
        assert_eq!(files.eigenstates, PathBuf::from("out/eps.0.250000.eigenstates.bin"));
    }

    #[test]
    fn test_mismatched_inputs() {
        let states = || DenseMatrix::<Complex64>::zeros(3, 3).unwrap();

        // Energies stored as a row.
        let result = DielectricInputs::<f64>::new(
            DenseMatrix::zeros(1, 3).unwrap(),
            states(),
            states(),
        );
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));

        // Four energies against three states.
        let result = DielectricInputs::<f64>::new(
            DenseMatrix::zeros(4, 1).unwrap(),
            states(),
            states(),
        );
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));

        // Potential of the wrong size.
        let result = DielectricInputs::<f64>::new(
            DenseMatrix::zeros(3, 1).unwrap(),
            states(),
            DenseMatrix::zeros(2, 2).unwrap(),
        );
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));
    }

    #[test]
    fn test_mismatched_files() {
        let dir = std::env::temp_dir().join(format!("tcm-tools-eps-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let energies = dir.join("energies.bin");
        let states = dir.join("states.bin");
        save_matrix(&energies, &DenseMatrix::<f64>::zeros(4, 1).unwrap()).unwrap();
        save_matrix(&states, &DenseMatrix::<Complex64>::zeros(3, 3).unwrap()).unwrap();

        let result = DielectricInputs::<f64>::load(&energies, &states, &states);
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sweep_without_interaction() {
        let dir = std::env::temp_dir().join(format!("tcm-tools-eps-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let base = dir.join("eps").display().to_string();

        let s = std::f64::consts::FRAC_1_SQRT_2;
        let inputs = DielectricInputs::<f64>::new(
            build_matrix(2, 1, |i, _| [0.1, 0.7][i]).unwrap(),
            build_matrix(2, 2, |i, j| {
                Complex64::new(if i == 1 && j == 1 { -s } else { s }, 0.0)
            })
            .unwrap(),
            DenseMatrix::zeros(2, 2).unwrap(),
        )
        .unwrap();
        let sweep = FrequencySweep::new(0.0, 0.5, 0.25).unwrap();
        let sink = TimingSink::new();
        let files = run_sweep(
            &inputs,
            &sweep,
            &[0, 2],
            &Constants::default(),
            &base,
            &sink,
        )
        .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[1], OutputFiles::new(&base, 0.5));
        for f in files.iter() {
            let eps: DenseMatrix<Complex64> = load_matrix(&f.matrix).unwrap();
            let w: DenseMatrix<Complex64> = load_matrix(&f.eigenvalues).unwrap();
            let z: DenseMatrix<Complex64> = load_matrix(&f.eigenstates).unwrap();
            assert_eq!(eps.shape(), (2, 2));
            assert_eq!(eps[(0, 0)], Complex64::new(1.0, 0.0));
            assert_eq!(eps[(0, 1)], Complex64::new(0.0, 0.0));
            assert_eq!(z.shape(), (2, 2));
            for j in 0..2 {
                assert_abs_diff_eq!(w[(j, 0)].re, 1.0, epsilon = 1e-12);
            }
        }
        assert!(sink.get("dielectric_spectrum").is_some());
        assert!(sink.get("write").is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
