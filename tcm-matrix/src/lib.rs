/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

//! Aligned, column-major dense matrices.
//!
//! [`DenseMatrix`] owns an [`alloc::AlignedBuffer`] and exposes the
//! `(pointer, ldim, height, width)` view that native BLAS and LAPACK routines consume.
//! The [`text`] and [`io`] modules provide the text and binary on-disk formats.

pub mod alloc;
pub mod io;
pub mod num;
pub mod strided;
pub mod text;

mod matrix;
pub use matrix::{build_matrix, DenseMatrix, MatrixError};
