/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Safe entry points for the LAPACK eigensolvers on column-major slices.
//!
//! Every routine follows the same two-phase protocol: a workspace query with
//! `lwork == -1`, allocation of the reported optimal workspace, the actual call, and the
//! translation of the returned `info` into a [`LapackError`]. Workspaces are local to a
//! single call and never pooled.
//!
//! All routines treat `n == 0` as success and write nothing.

use num_complex::Complex;
use thiserror::Error;

use crate::{
    blas::{blas_int, matrix_length},
    field::{Field, RealField},
};

/// Error type for the LAPACK routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LapackError {
    /// The routine reported `info == -index`.
    #[error("argument #{index} to {routine} had an illegal value")]
    InvalidArgument { routine: &'static str, index: i32 },

    /// The routine reported a positive `info`.
    #[error("call to {routine} did not converge (info = {info})")]
    ConvergenceFailure { routine: &'static str, info: i32 },

    /// The workspace could not be allocated.
    #[error("failed to allocate the workspace for {routine}")]
    AllocationFailure { routine: &'static str },
}

impl LapackError {
    /// Translate a native `info` code.
    pub fn check(routine: &'static str, info: i32) -> Result<(), Self> {
        match info {
            0 => Ok(()),
            i if i < 0 => Err(Self::InvalidArgument {
                routine,
                index: -i,
            }),
            info => Err(Self::ConvergenceFailure { routine, info }),
        }
    }
}

/// Scratch buffers handed to a native routine.
struct Workspace<T: Field> {
    work: Vec<T>,
    lwork: i32,
    rwork: Vec<T::Real>,
    iwork: Vec<i32>,
}

impl<T: Field> Workspace<T> {
    fn allocate(
        routine: &'static str,
        lwork: usize,
        lrwork: usize,
        liwork: usize,
    ) -> Result<Self, LapackError> {
        Ok(Self {
            work: try_filled(routine, lwork.max(1), T::zero())?,
            lwork: blas_int(lwork.max(1)),
            rwork: try_filled(routine, lrwork.max(1), <T::Real as num_traits::Zero>::zero())?,
            iwork: try_filled(routine, liwork.max(1), 0)?,
        })
    }

    fn lrwork(&self) -> i32 {
        blas_int(self.rwork.len())
    }

    fn liwork(&self) -> i32 {
        blas_int(self.iwork.len())
    }
}

fn try_filled<X: Clone>(
    routine: &'static str,
    len: usize,
    value: X,
) -> Result<Vec<X>, LapackError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| LapackError::AllocationFailure { routine })?;
    v.resize(len, value);
    Ok(v)
}

/// Resolve an optional `n x n` output matrix into the `(job, buffer, ld)` triple expected
/// by the native routines. A missing output is replaced by a one-element `dummy`.
fn output_side<'a, T>(
    n: usize,
    v: Option<&'a mut [T]>,
    ld: usize,
    dummy: &'a mut [T],
    name: &str,
) -> (u8, &'a mut [T], usize) {
    match v {
        Some(v) => {
            debug_assert!(ld >= n, "expected leading dimension of `{name}` >= {n}, got {ld}");
            assert!(
                v.len() >= matrix_length(n, n, ld),
                "matrix `{name}` is too short"
            );
            (b'V', v, ld)
        }
        None => (b'N', dummy, 1),
    }
}

/// Convert a workspace size reported through a floating point slot, rounding up so that
/// a size that is not exactly representable in single precision is never undercut.
fn reported_size(size: f64) -> usize {
    if size.is_nan() || size < 1.0 {
        0
    } else {
        size.ceil() as usize
    }
}

/// Run the two-phase protocol for `routine`.
///
/// `call` receives the workspace and the `info` slot. It is invoked once with
/// `workspace.lwork == -1` to query the optimal sizes and once more with buffers of those
/// sizes. `rwork` always holds at least `min_rwork` elements, for routines that need a
/// fixed-size real workspace that the query does not report.
fn two_phase<T, F>(routine: &'static str, min_rwork: usize, mut call: F) -> Result<(), LapackError>
where
    T: Field,
    F: FnMut(&mut Workspace<T>, &mut i32),
{
    let mut info = 0;
    let mut query = Workspace::<T>::allocate(routine, 1, min_rwork, 1)?;
    query.lwork = -1;
    call(&mut query, &mut info);
    LapackError::check(routine, info)?;

    // Sizes are reported through the first element of each buffer.
    let lwork = reported_size(query.work[0].real().into_f64()).max(1);
    let lrwork = reported_size(query.rwork[0].into_f64()).max(min_rwork);
    let liwork = query.iwork[0].max(1) as usize;

    let mut workspace = Workspace::<T>::allocate(routine, lwork, lrwork, liwork)?;
    call(&mut workspace, &mut info);
    LapackError::check(routine, info)
}

/// Compute all eigenvalues, and optionally eigenvectors, of the `n x n` symmetric
/// (real) or Hermitian (complex) matrix `a` with leading dimension `lda`.
///
/// Only the upper triangle of `a` is read. The lower triangle is never symmetrized, so
/// the caller is responsible for a meaningful upper triangle. The contents of `a` are
/// destroyed.
///
/// The eigenvalues are written to `w[..n]` in ascending order. If `z` is provided, the
/// corresponding orthonormal eigenvectors are written to its columns (leading dimension
/// `ldz`).
///
/// Uses ?SYEVR for real fields and ?HEEVR for complex fields.
///
/// # Panics
///
/// Panics if a slice is too short for the described matrix. In debug builds, also panics
/// if `lda < n` or `ldz < n`.
pub fn symmetric_eigen_all<T: Field>(
    n: usize,
    a: &mut [T],
    lda: usize,
    w: &mut [T::Real],
    z: Option<&mut [T]>,
    ldz: usize,
) -> Result<(), LapackError> {
    if n == 0 {
        return Ok(());
    }
    debug_assert!(lda >= n, "expected lda >= {n}, got {lda}");
    assert!(a.len() >= matrix_length(n, n, lda), "matrix `a` is too short");
    assert!(w.len() >= n, "`w` must hold {n} eigenvalues");

    let mut dummy = [T::zero()];
    let (jobz, z, ldz) = output_side(n, z, ldz, &mut dummy, "z");

    let routine = T::SYEVR;
    let mut isuppz = try_filled(routine, 2 * n, 0)?;
    let mut found = 0;
    two_phase::<T, _>(routine, 0, |ws, info| {
        let (lrwork, liwork) = (ws.lrwork(), ws.liwork());
        // SAFETY: `a`, `w`, `z` and `isuppz` have been checked against `n` and their
        // leading dimensions. The workspace sizes match their buffers.
        unsafe {
            T::xsyevr(
                jobz,
                b'U',
                blas_int(n),
                a,
                blas_int(lda),
                &mut found,
                w,
                z,
                blas_int(ldz),
                &mut isuppz,
                &mut ws.work,
                ws.lwork,
                &mut ws.rwork,
                lrwork,
                &mut ws.iwork,
                liwork,
                info,
            )
        }
    })
}

/// Compute the eigenvalues, and optionally the eigenvectors, of the `n x n` symmetric
/// or Hermitian matrix `a` with leading dimension `lda`.
///
/// Only the upper triangle of `a` is read. The eigenvalues are written to `w[..n]` in
/// ascending order. If `compute_vectors` is `true`, `a` is overwritten with the
/// orthonormal eigenvectors. Otherwise its contents are destroyed.
///
/// Uses ?SYEV for real fields and ?HEEV for complex fields.
///
/// # Panics
///
/// Panics if a slice is too short for the described matrix. In debug builds, also panics
/// if `lda < n`.
pub fn symmetric_eigen_simple<T: Field>(
    n: usize,
    a: &mut [T],
    lda: usize,
    w: &mut [T::Real],
    compute_vectors: bool,
) -> Result<(), LapackError> {
    if n == 0 {
        return Ok(());
    }
    debug_assert!(lda >= n, "expected lda >= {n}, got {lda}");
    assert!(a.len() >= matrix_length(n, n, lda), "matrix `a` is too short");
    assert!(w.len() >= n, "`w` must hold {n} eigenvalues");

    let jobz = if compute_vectors { b'V' } else { b'N' };
    let min_rwork = if T::IS_COMPLEX { 3 * n - 2 } else { 0 };
    two_phase::<T, _>(T::SYEV, min_rwork, |ws, info| {
        // SAFETY: `a` and `w` have been checked against `n` and `lda`. `rwork` holds at
        // least `3n - 2` elements for complex fields.
        unsafe {
            T::xsyev(
                jobz,
                b'U',
                blas_int(n),
                a,
                blas_int(lda),
                w,
                &mut ws.work,
                ws.lwork,
                &mut ws.rwork,
                info,
            )
        }
    })
}

/// Compute the eigenvalues, and optionally the left and right eigenvectors, of the
/// general `n x n` matrix `a` with leading dimension `lda`.
///
/// The eigenvalues are written to `w[..n]` in no particular order. For real fields the
/// native routine reports real and imaginary parts separately and they are combined
/// here.
///
/// Eigenvectors use the native layout. For complex fields column `j` of `vl`/`vr` is
/// the eigenvector of `w[j]`. For real fields a complex conjugate pair
/// `w[j], w[j + 1]` (with `w[j].im > 0`) is stored as the real part in column `j` and
/// the imaginary part in column `j + 1`. [`crate::dense::geev`] unpacks this into
/// complex columns.
///
/// The contents of `a` are destroyed. Uses ?GEEV.
///
/// # Panics
///
/// Panics if a slice is too short for the described matrix. In debug builds, also panics
/// if a leading dimension is smaller than `n`.
#[allow(clippy::too_many_arguments)]
pub fn general_eigen<T: Field>(
    n: usize,
    a: &mut [T],
    lda: usize,
    w: &mut [Complex<T::Real>],
    vl: Option<&mut [T]>,
    ldvl: usize,
    vr: Option<&mut [T]>,
    ldvr: usize,
) -> Result<(), LapackError> {
    if n == 0 {
        return Ok(());
    }
    debug_assert!(lda >= n, "expected lda >= {n}, got {lda}");
    assert!(a.len() >= matrix_length(n, n, lda), "matrix `a` is too short");
    assert!(w.len() >= n, "`w` must hold {n} eigenvalues");

    let mut dummy_l = [T::zero()];
    let mut dummy_r = [T::zero()];
    let (jobvl, vl, ldvl) = output_side(n, vl, ldvl, &mut dummy_l, "vl");
    let (jobvr, vr, ldvr) = output_side(n, vr, ldvr, &mut dummy_r, "vr");

    two_phase::<T, _>(T::GEEV, 2 * n, |ws, info| {
        // SAFETY: `a`, `w`, `vl` and `vr` have been checked against `n` and their leading
        // dimensions. `rwork` holds at least `2n` elements.
        unsafe {
            T::xgeev(
                jobvl,
                jobvr,
                blas_int(n),
                a,
                blas_int(lda),
                w,
                vl,
                blas_int(ldvl),
                vr,
                blas_int(ldvr),
                &mut ws.work,
                ws.lwork,
                &mut ws.rwork,
                info,
            )
        }
    })
}

///////////
// Tests //
///////////
