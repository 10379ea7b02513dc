/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

//! A uniform, statically dispatched facade over BLAS and LAPACK for the four native
//! fields `f32`, `f64`, `Complex32` and `Complex64`.
//!
//! The raw layer ([`blas`], [`lapack`]) mirrors the Fortran calling conventions on
//! column-major slices. The [`dense`] layer accepts [`DenseMatrix`](tcm_matrix::DenseMatrix)
//! arguments and checks their shapes before forwarding.
//!
//! # Backend
//!
//! The native routines are provided by OpenBLAS by default. Enable the `intel-mkl`
//! feature (with default features disabled) to link Intel MKL instead.
//!
//! # Thread safety
//!
//! None of the routines here synchronize. Calling them concurrently on distinct
//! matrices is only sound if the linked backend is itself thread safe, which is the
//! caller's responsibility to configure.

// Declare the backend crates as `extern` so the C and Fortran symbols they provide are
// linked in for `cblas` and `lapack`.
#[cfg(any(feature = "openblas-static", feature = "openblas-system"))]
extern crate openblas_src as _;

#[cfg(feature = "intel-mkl")]
extern crate intel_mkl_src as _;

pub mod blas;
pub mod common;
pub mod dense;
pub mod field;
pub mod lapack;

pub use common::Operator;
pub use field::{ComplexField, Field, RealField};
pub use lapack::LapackError;

// Make the reference implementation available for internal testing.
#[cfg(test)]
mod reference;
