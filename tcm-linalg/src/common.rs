/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

/// Indicate how a matrix operand should be interpreted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Use a provided matrix directly.
    None,
    /// Use the transpose of a matrix.
    Transpose,
    /// Use the conjugate transpose of a matrix. Identical to `Transpose` for real fields.
    ConjugateTranspose,
}

impl Operator {
    /// Return whether the operator swaps rows and columns.
    pub fn is_transpose(&self) -> bool {
        match self {
            Self::None => false,
            Self::Transpose | Self::ConjugateTranspose => true,
        }
    }

    /// Forward one of the arguments, depending on whether `self` transposes.
    pub fn forward<T>(&self, if_none: T, if_transpose: T) -> T {
        if self.is_transpose() {
            if_transpose
        } else {
            if_none
        }
    }

    /// Call exactly one of the arguments depending on whether `self` transposes and
    /// return the result.
    pub fn call<F, G, T>(&self, if_none: F, if_transpose: G) -> T
    where
        F: FnOnce() -> T,
        G: FnOnce() -> T,
    {
        if self.is_transpose() {
            if_transpose()
        } else {
            if_none()
        }
    }

    /// Return the character code used by the Fortran interface.
    pub fn as_char(&self) -> u8 {
        match self {
            Self::None => b'N',
            Self::Transpose => b'T',
            Self::ConjugateTranspose => b'C',
        }
    }

    pub(crate) fn to_cblas(self) -> cblas::Transpose {
        match self {
            Self::None => cblas::Transpose::None,
            Self::Transpose => cblas::Transpose::Ordinary,
            Self::ConjugateTranspose => cblas::Transpose::Conjugate,
        }
    }
}
