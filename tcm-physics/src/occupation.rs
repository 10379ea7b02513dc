/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use tcm_linalg::RealField;

/// Beyond this magnitude `exp` over- or underflows in single precision as well, so the
/// distribution is clamped to exactly `0` or `1`.
const CUTOFF: f64 = 700.0;

/// Fermi-Dirac occupation of a state with energy `e` at temperature `t`, chemical
/// potential `mu` and Boltzmann constant `kb`:
///
/// ```text
/// f(e) = 1 / (exp((e - mu) / (kb t)) + 1)
/// ```
pub fn fermi_dirac<R: RealField>(e: R, t: R, mu: R, kb: R) -> R {
    let arg = (e - mu) / (kb * t);
    if arg > R::from_f64(CUTOFF) {
        R::zero()
    } else if arg < R::from_f64(-CUTOFF) {
        R::one()
    } else {
        R::one() / (arg.exp() + R::one())
    }
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const KB: f64 = 8.6173303E-5;

    #[test]
    fn half_filled_at_the_chemical_potential() {
        assert_eq!(fermi_dirac(0.4, 300.0, 0.4, KB), 0.5);
        assert_eq!(fermi_dirac(0.4f32, 300.0, 0.4, KB as f32), 0.5);
    }

    #[test]
    fn clamped_tails() {
        // (e - mu) / (kb t) is roughly 1.2e4 here.
        assert_eq!(fermi_dirac(1.0, 1.0, 0.0, KB), 0.0);
        assert_eq!(fermi_dirac(-1.0, 1.0, 0.0, KB), 1.0);
        assert_eq!(fermi_dirac(1.0f32, 1.0, 0.0, KB as f32), 0.0);
        assert_eq!(fermi_dirac(-1.0f32, 1.0, 0.0, KB as f32), 1.0);
    }

    #[test]
    fn particle_hole_symmetry() {
        let t = 300.0;
        let mu = 0.4;
        for de in [0.001, 0.01, 0.025, 0.1] {
            let above = fermi_dirac(mu + de, t, mu, KB);
            let below = fermi_dirac(mu - de, t, mu, KB);
            assert_relative_eq!(above + below, 1.0, epsilon = 1e-12);
            assert!(above < 0.5 && below > 0.5);
        }
    }

    #[test]
    fn matches_closed_form() {
        let arg: f64 = 2.5;
        let expected = 1.0 / (arg.exp() + 1.0);
        assert_relative_eq!(fermi_dirac(arg, 1.0, 0.0, 1.0), expected, max_relative = 1e-15);
    }
}
