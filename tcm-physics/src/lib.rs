/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

//! Response functions of tight-binding models.
//!
//! Starting from the single-particle energies `E` and states `Psi` of a Hamiltonian and
//! the Coulomb interaction `V` between sites, this crate assembles the occupation
//! weights `G(ω)`, the polarizability `χ(ω)` and the dielectric matrix
//! `ε(ω) = I - V χ(ω)`, and projects the spectrum of `ε` onto plane waves to obtain the
//! loss function. Physical constants are supplied through [`Constants`].
//!
//! The numeric routines are single threaded and carry no global state. Timing is
//! opt-in through [`timing::TimingSink`].

pub mod constants;
pub mod coulomb;
pub mod dielectric;
pub mod io;
pub mod loss;
pub mod occupation;
pub mod timing;

pub use constants::{Constants, ConstantsError};

use tcm_linalg::LapackError;
use tcm_matrix::MatrixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error(transparent)]
    Constants(#[from] ConstantsError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Lapack(#[from] LapackError),
}
