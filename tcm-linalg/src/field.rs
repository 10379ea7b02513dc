/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The numeric fields understood by the native backend.
//!
//! [`Field`] is sealed and implemented for exactly `f32`, `f64`, `Complex32` and
//! `Complex64`. Every BLAS and LAPACK primitive has one implementation per field, chosen
//! at compile time. There is no fallback for other element types.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_complex::{Complex, Complex32, Complex64};
use num_traits::{Float, One, Zero};

mod sealed {
    pub trait Sealed {}
}

/// A real or complex scalar with native BLAS and LAPACK support.
///
/// The `x*` associated functions are thin forwards to the native routines and are not
/// meant to be called directly. Use the safe entry points in [`crate::blas`] and
/// [`crate::lapack`] instead.
pub trait Field:
    sealed::Sealed
    + bytemuck::Pod
    + Default
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Sum
{
    /// The underlying real field. `Self::Real == Self` for real fields.
    type Real: RealField;

    /// Whether the field is complex.
    const IS_COMPLEX: bool;

    /// Human readable name, as accepted by the command-line tools.
    const NAME: &'static str;

    #[doc(hidden)]
    const SYEVR: &'static str;
    #[doc(hidden)]
    const SYEV: &'static str;
    #[doc(hidden)]
    const GEEV: &'static str;

    /// Embed a real number.
    fn from_real(x: Self::Real) -> Self;

    /// Complex conjugate. The identity for real fields.
    fn conj(self) -> Self;

    /// Real part.
    fn real(self) -> Self::Real;

    /// Imaginary part. Always zero for real fields.
    fn imag(self) -> Self::Real;

    /// `|self|²`.
    fn norm_sqr(self) -> Self::Real;

    /// Widen to a complex number over the same real field.
    fn to_complex(self) -> Complex<Self::Real> {
        Complex::new(self.real(), self.imag())
    }

    /// Return `true` if neither the real nor the imaginary part is infinite or NaN.
    fn is_finite_value(self) -> bool {
        self.real().is_finite() && self.imag().is_finite()
    }

    /// ?DOT / ?DOTC.
    ///
    /// # Safety
    ///
    /// `x` and `y` must hold `n` elements at strides `incx` and `incy`.
    #[doc(hidden)]
    unsafe fn xdot(n: i32, x: &[Self], incx: i32, y: &[Self], incy: i32) -> Self;

    /// ?AXPY.
    ///
    /// # Safety
    ///
    /// `x` and `y` must hold `n` elements at strides `incx` and `incy`.
    #[doc(hidden)]
    unsafe fn xaxpy(n: i32, alpha: Self, x: &[Self], incx: i32, y: &mut [Self], incy: i32);

    /// ?GEMV in column-major layout.
    ///
    /// # Safety
    ///
    /// The slices must be large enough for the described matrix and vectors.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    unsafe fn xgemv(
        trans: cblas::Transpose,
        m: i32,
        n: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        x: &[Self],
        incx: i32,
        beta: Self,
        y: &mut [Self],
        incy: i32,
    );

    /// ?GEMM in column-major layout.
    ///
    /// # Safety
    ///
    /// The slices must be large enough for the described matrices.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    unsafe fn xgemm(
        transa: cblas::Transpose,
        transb: cblas::Transpose,
        m: i32,
        n: i32,
        k: i32,
        alpha: Self,
        a: &[Self],
        lda: i32,
        b: &[Self],
        ldb: i32,
        beta: Self,
        c: &mut [Self],
        ldc: i32,
    );

    /// ?SYEVR / ?HEEVR computing all eigenvalues. `rwork` and `lrwork` are ignored by
    /// real fields.
    ///
    /// # Safety
    ///
    /// The slices must satisfy the size requirements of the native routine, or `lwork`
    /// must be `-1` for a workspace query.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    unsafe fn xsyevr(
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        m: &mut i32,
        w: &mut [Self::Real],
        z: &mut [Self],
        ldz: i32,
        isuppz: &mut [i32],
        work: &mut [Self],
        lwork: i32,
        rwork: &mut [Self::Real],
        lrwork: i32,
        iwork: &mut [i32],
        liwork: i32,
        info: &mut i32,
    );

    /// ?SYEV / ?HEEV. `rwork` must hold `max(1, 3n - 2)` elements for complex fields and
    /// is ignored by real fields.
    ///
    /// # Safety
    ///
    /// See [`Field::xsyevr`].
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    unsafe fn xsyev(
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        w: &mut [Self::Real],
        work: &mut [Self],
        lwork: i32,
        rwork: &mut [Self::Real],
        info: &mut i32,
    );

    /// ?GEEV. `rwork` must hold `2n` elements. Complex fields use it as the native real
    /// workspace, real fields use it for the real and imaginary parts of the eigenvalues
    /// before combining them into `w`.
    ///
    /// # Safety
    ///
    /// See [`Field::xsyevr`].
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    unsafe fn xgeev(
        jobvl: u8,
        jobvr: u8,
        n: i32,
        a: &mut [Self],
        lda: i32,
        w: &mut [Complex<Self::Real>],
        vl: &mut [Self],
        ldvl: i32,
        vr: &mut [Self],
        ldvr: i32,
        work: &mut [Self],
        lwork: i32,
        rwork: &mut [Self::Real],
        info: &mut i32,
    );
}

/// A real [`Field`]: `f32` or `f64`.
pub trait RealField: Field<Real = Self> + PartialOrd + Float {
    /// The complex field over `Self`.
    type Complex: ComplexField<Real = Self>;

    /// Convert from `f64`, rounding to the nearest representable value.
    fn from_f64(x: f64) -> Self;

    /// Widen to `f64`.
    fn into_f64(self) -> f64;
}

/// A complex [`Field`]: `Complex32` or `Complex64`.
pub trait ComplexField: Field {
    /// Construct from the real and imaginary parts.
    fn from_parts(re: Self::Real, im: Self::Real) -> Self;

    /// Narrow a complex number over the same real field.
    fn from_complex(z: Complex<Self::Real>) -> Self {
        Self::from_parts(z.re, z.im)
    }
}

macro_rules! real_field {
    (
        $T:ty,
        $name:literal,
        complex = $C:ty,
        $dot:ident,
        $axpy:ident,
        $gemv:ident,
        $gemm:ident,
        $syevr:ident,
        $syev:ident,
        $geev:ident
    ) => {
        impl sealed::Sealed for $T {}

        impl Field for $T {
            type Real = $T;

            const IS_COMPLEX: bool = false;
            const NAME: &'static str = $name;
            const SYEVR: &'static str = stringify!($syevr);
            const SYEV: &'static str = stringify!($syev);
            const GEEV: &'static str = stringify!($geev);

            #[inline]
            fn from_real(x: Self::Real) -> Self {
                x
            }

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn real(self) -> Self::Real {
                self
            }

            #[inline]
            fn imag(self) -> Self::Real {
                0.0
            }

            #[inline]
            fn norm_sqr(self) -> Self::Real {
                self * self
            }

            unsafe fn xdot(n: i32, x: &[Self], incx: i32, y: &[Self], incy: i32) -> Self {
                cblas::$dot(n, x, incx, y, incy)
            }

            unsafe fn xaxpy(
                n: i32,
                alpha: Self,
                x: &[Self],
                incx: i32,
                y: &mut [Self],
                incy: i32,
            ) {
                cblas::$axpy(n, alpha, x, incx, y, incy)
            }

            unsafe fn xgemv(
                trans: cblas::Transpose,
                m: i32,
                n: i32,
                alpha: Self,
                a: &[Self],
                lda: i32,
                x: &[Self],
                incx: i32,
                beta: Self,
                y: &mut [Self],
                incy: i32,
            ) {
                cblas::$gemv(
                    cblas::Layout::ColumnMajor,
                    trans,
                    m,
                    n,
                    alpha,
                    a,
                    lda,
                    x,
                    incx,
                    beta,
                    y,
                    incy,
                )
            }

            unsafe fn xgemm(
                transa: cblas::Transpose,
                transb: cblas::Transpose,
                m: i32,
                n: i32,
                k: i32,
                alpha: Self,
                a: &[Self],
                lda: i32,
                b: &[Self],
                ldb: i32,
                beta: Self,
                c: &mut [Self],
                ldc: i32,
            ) {
                cblas::$gemm(
                    cblas::Layout::ColumnMajor,
                    transa,
                    transb,
                    m,
                    n,
                    k,
                    alpha,
                    a,
                    lda,
                    b,
                    ldb,
                    beta,
                    c,
                    ldc,
                )
            }

            unsafe fn xsyevr(
                jobz: u8,
                uplo: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                m: &mut i32,
                w: &mut [Self::Real],
                z: &mut [Self],
                ldz: i32,
                isuppz: &mut [i32],
                work: &mut [Self],
                lwork: i32,
                _rwork: &mut [Self::Real],
                _lrwork: i32,
                iwork: &mut [i32],
                liwork: i32,
                info: &mut i32,
            ) {
                lapack::$syevr(
                    jobz, b'A', uplo, n, a, lda, 0.0, 0.0, 0, 0, 0.0, m, w, z, ldz, isuppz,
                    work, lwork, iwork, liwork, info,
                )
            }

            unsafe fn xsyev(
                jobz: u8,
                uplo: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                w: &mut [Self::Real],
                work: &mut [Self],
                lwork: i32,
                _rwork: &mut [Self::Real],
                info: &mut i32,
            ) {
                lapack::$syev(jobz, uplo, n, a, lda, w, work, lwork, info)
            }

            unsafe fn xgeev(
                jobvl: u8,
                jobvr: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                w: &mut [Complex<Self::Real>],
                vl: &mut [Self],
                ldvl: i32,
                vr: &mut [Self],
                ldvr: i32,
                work: &mut [Self],
                lwork: i32,
                rwork: &mut [Self::Real],
                info: &mut i32,
            ) {
                let (wr, wi) = rwork.split_at_mut(n.max(0) as usize);
                lapack::$geev(
                    jobvl, jobvr, n, a, lda, wr, wi, vl, ldvl, vr, ldvr, work, lwork, info,
                );
                if lwork != -1 && *info == 0 {
                    std::iter::zip(wr.iter(), wi.iter())
                        .zip(w.iter_mut())
                        .for_each(|((&re, &im), w)| *w = Complex::new(re, im));
                }
            }
        }

        impl RealField for $T {
            type Complex = $C;

            #[inline]
            fn from_f64(x: f64) -> Self {
                x as $T
            }

            #[inline]
            fn into_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

macro_rules! complex_field {
    (
        $T:ty,
        $R:ty,
        $name:literal,
        $dot:ident,
        $axpy:ident,
        $gemv:ident,
        $gemm:ident,
        $syevr:ident,
        $syev:ident,
        $geev:ident
    ) => {
        impl sealed::Sealed for $T {}

        impl Field for $T {
            type Real = $R;

            const IS_COMPLEX: bool = true;
            const NAME: &'static str = $name;
            const SYEVR: &'static str = stringify!($syevr);
            const SYEV: &'static str = stringify!($syev);
            const GEEV: &'static str = stringify!($geev);

            #[inline]
            fn from_real(x: Self::Real) -> Self {
                Complex::new(x, 0.0)
            }

            #[inline]
            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            #[inline]
            fn real(self) -> Self::Real {
                self.re
            }

            #[inline]
            fn imag(self) -> Self::Real {
                self.im
            }

            #[inline]
            fn norm_sqr(self) -> Self::Real {
                Complex::norm_sqr(&self)
            }

            #[inline]
            fn to_complex(self) -> Complex<Self::Real> {
                self
            }

            unsafe fn xdot(n: i32, x: &[Self], incx: i32, y: &[Self], incy: i32) -> Self {
                let mut result = [Complex::new(0.0, 0.0)];
                cblas::$dot(n, x, incx, y, incy, &mut result);
                result[0]
            }

            unsafe fn xaxpy(
                n: i32,
                alpha: Self,
                x: &[Self],
                incx: i32,
                y: &mut [Self],
                incy: i32,
            ) {
                cblas::$axpy(n, alpha, x, incx, y, incy)
            }

            unsafe fn xgemv(
                trans: cblas::Transpose,
                m: i32,
                n: i32,
                alpha: Self,
                a: &[Self],
                lda: i32,
                x: &[Self],
                incx: i32,
                beta: Self,
                y: &mut [Self],
                incy: i32,
            ) {
                cblas::$gemv(
                    cblas::Layout::ColumnMajor,
                    trans,
                    m,
                    n,
                    alpha,
                    a,
                    lda,
                    x,
                    incx,
                    beta,
                    y,
                    incy,
                )
            }

            unsafe fn xgemm(
                transa: cblas::Transpose,
                transb: cblas::Transpose,
                m: i32,
                n: i32,
                k: i32,
                alpha: Self,
                a: &[Self],
                lda: i32,
                b: &[Self],
                ldb: i32,
                beta: Self,
                c: &mut [Self],
                ldc: i32,
            ) {
                cblas::$gemm(
                    cblas::Layout::ColumnMajor,
                    transa,
                    transb,
                    m,
                    n,
                    k,
                    alpha,
                    a,
                    lda,
                    b,
                    ldb,
                    beta,
                    c,
                    ldc,
                )
            }

            unsafe fn xsyevr(
                jobz: u8,
                uplo: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                m: &mut i32,
                w: &mut [Self::Real],
                z: &mut [Self],
                ldz: i32,
                isuppz: &mut [i32],
                work: &mut [Self],
                lwork: i32,
                rwork: &mut [Self::Real],
                lrwork: i32,
                iwork: &mut [i32],
                liwork: i32,
                info: &mut i32,
            ) {
                lapack::$syevr(
                    jobz, b'A', uplo, n, a, lda, 0.0, 0.0, 0, 0, 0.0, m, w, z, ldz, isuppz,
                    work, lwork, rwork, lrwork, iwork, liwork, info,
                )
            }

            unsafe fn xsyev(
                jobz: u8,
                uplo: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                w: &mut [Self::Real],
                work: &mut [Self],
                lwork: i32,
                rwork: &mut [Self::Real],
                info: &mut i32,
            ) {
                lapack::$syev(jobz, uplo, n, a, lda, w, work, lwork, rwork, info)
            }

            unsafe fn xgeev(
                jobvl: u8,
                jobvr: u8,
                n: i32,
                a: &mut [Self],
                lda: i32,
                w: &mut [Complex<Self::Real>],
                vl: &mut [Self],
                ldvl: i32,
                vr: &mut [Self],
                ldvr: i32,
                work: &mut [Self],
                lwork: i32,
                rwork: &mut [Self::Real],
                info: &mut i32,
            ) {
                lapack::$geev(
                    jobvl, jobvr, n, a, lda, w, vl, ldvl, vr, ldvr, work, lwork, rwork, info,
                )
            }
        }

        impl ComplexField for $T {
            #[inline]
            fn from_parts(re: Self::Real, im: Self::Real) -> Self {
                Complex::new(re, im)
            }
        }
    };
}

real_field!(
    f32,
    "float",
    complex = Complex32,
    sdot,
    saxpy,
    sgemv,
    sgemm,
    ssyevr,
    ssyev,
    sgeev
);
real_field!(
    f64,
    "double",
    complex = Complex64,
    ddot,
    daxpy,
    dgemv,
    dgemm,
    dsyevr,
    dsyev,
    dgeev
);
complex_field!(
    Complex32, f32, "cfloat", cdotc_sub, caxpy, cgemv, cgemm, cheevr, cheev, cgeev
);
complex_field!(
    Complex64, f64, "cdouble", zdotc_sub, zaxpy, zgemv, zgemm, zheevr, zheev, zgeev
);

///////////
// Tests //
///////////
