/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use num_complex::{Complex32, Complex64};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use thiserror::Error;

use crate::{common::Operator, field::Field};

/// Naive column-major matrix-matrix product used to check the native `gemm`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm<T: Field>(
    op_a: Operator,
    op_b: Operator,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let element = |op: Operator, x: &[T], ld: usize, i: usize, j: usize| match op {
        Operator::None => x[i + ld * j],
        Operator::Transpose => x[j + ld * i],
        Operator::ConjugateTranspose => x[j + ld * i].conj(),
    };

    for j in 0..n {
        for i in 0..m {
            let mut temp = T::zero();
            for l in 0..k {
                temp += element(op_a, a, lda, i, l) * element(op_b, b, ldb, l, j);
            }
            c[i + ldc * j] = alpha * temp + beta * c[i + ldc * j];
        }
    }
}

/// Fields that can be filled with standard normal samples.
pub(crate) trait Random: Field {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;

    fn vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| Self::sample(rng)).collect()
    }
}

impl Random for f32 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}

impl Random for f64 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardNormal.sample(rng)
    }
}

impl Random for Complex32 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Complex32::new(StandardNormal.sample(rng), StandardNormal.sample(rng))
    }
}

impl Random for Complex64 {
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Complex64::new(StandardNormal.sample(rng), StandardNormal.sample(rng))
    }
}

/// A test-problem for GEMM with densely packed column-major operands.
#[derive(Debug)]
pub(crate) struct TestProblem {
    op_a: Operator,
    op_b: Operator,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: Vec<f64>,
    b: Vec<f64>,
    beta: f64,
    c: Vec<f64>,
    expected: Vec<f64>,
}

#[derive(Debug, Error)]
#[error("mismatch in test problem. got {:?}, expected {:?}", got, expected)]
pub(crate) struct ReferenceError {
    got: Vec<f64>,
    expected: Vec<f64>,
}

pub(crate) trait GemmFunction:
    Fn(
    Operator,
    Operator,
    usize,
    usize,
    usize,
    f64,
    &[f64],
    usize,
    &[f64],
    usize,
    f64,
    &mut [f64],
    usize,
)
{
}

impl<F> GemmFunction for F where
    F: Fn(
        Operator,
        Operator,
        usize,
        usize,
        usize,
        f64,
        &[f64],
        usize,
        &[f64],
        usize,
        f64,
        &mut [f64],
        usize,
    )
{
}

impl TestProblem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        op_a: Operator,
        op_b: Operator,
        m: usize,
        n: usize,
        k: usize,
        alpha: f64,
        a: Vec<f64>,
        b: Vec<f64>,
        beta: f64,
        c: Vec<f64>,
        expected: Vec<f64>,
    ) -> Self {
        assert_eq!(a.len(), m * k);
        assert_eq!(b.len(), n * k);
        assert_eq!(c.len(), m * n);
        assert_eq!(expected.len(), m * n);
        Self {
            op_a,
            op_b,
            m,
            n,
            k,
            alpha,
            a,
            b,
            beta,
            c,
            expected,
        }
    }

    pub(crate) fn check<F: GemmFunction>(&self, f: F) -> Result<(), ReferenceError> {
        let lda = self.op_a.forward(self.m, self.k);
        let ldb = self.op_b.forward(self.k, self.n);

        let mut result = self.c.clone();
        f(
            self.op_a,
            self.op_b,
            self.m,
            self.n,
            self.k,
            self.alpha,
            &self.a,
            lda,
            &self.b,
            ldb,
            self.beta,
            &mut result,
            self.m,
        );

        if result == self.expected {
            Ok(())
        } else {
            Err(ReferenceError {
                got: result,
                expected: self.expected.clone(),
            })
        }
    }
}

/// Return a basic set of test-problems to check that a GEMM implementation passes a rough
/// sanity check of the API.
pub(crate) fn test_gemm_problems() -> Vec<TestProblem> {
    let m = 2;
    let n = 3;
    let k = 4;

    // Matrix A:
    //  7  1  6  8
    //  6  2  6  1
    let a = vec![7.0, 6.0, 1.0, 2.0, 6.0, 6.0, 8.0, 1.0];
    let at = vec![7.0, 1.0, 6.0, 8.0, 6.0, 2.0, 6.0, 1.0];

    // Matrix B:
    //  1  9  6
    //  8  7  5
    //  6  4  3
    //  4  7  6
    let b = vec![1.0, 8.0, 6.0, 4.0, 9.0, 7.0, 4.0, 7.0, 6.0, 5.0, 3.0, 6.0];
    let bt = vec![1.0, 9.0, 6.0, 8.0, 7.0, 5.0, 6.0, 4.0, 3.0, 4.0, 7.0, 6.0];

    // Matrix C:
    //  3  3  3
    //  0  1  9
    let c = vec![3.0, 0.0, 3.0, 1.0, 3.0, 9.0];

    // 0 * C + 1 * A * B
    let c0_1ab = vec![83.0, 62.0, 150.0, 99.0, 113.0, 70.0];
    // 0 * C + 2 * A * B
    let c0_2ab = vec![166.0, 124.0, 300.0, 198.0, 226.0, 140.0];

    // 2 * C + 1 * A * B
    let c2_1ab = vec![89.0, 62.0, 156.0, 101.0, 119.0, 88.0];
    // 2 * C + 2 * A * B
    let c2_2ab = vec![172.0, 124.0, 306.0, 200.0, 232.0, 158.0];

    // 1 * C + 1 * A * B
    let c1_1ab = vec![86.0, 62.0, 153.0, 100.0, 116.0, 79.0];
    // 1 * C + 2 * A * B
    let c1_2ab = vec![169.0, 124.0, 303.0, 199.0, 229.0, 149.0];

    let mut problems = Vec::new();
    let make_problem = |op_a: Operator, op_b: Operator, alpha: f64, beta: f64, expected| {
        let a_ = op_a.call(|| a.clone(), || at.clone());
        let b_ = op_b.call(|| b.clone(), || bt.clone());
        TestProblem::new(
            op_a,
            op_b,
            m,
            n,
            k,
            alpha,
            a_,
            b_,
            beta,
            c.clone(),
            expected,
        )
    };

    let mut on_operator_combinations = |alpha: f64, beta: f64, expected: Vec<f64>| {
        for op_a in [Operator::None, Operator::Transpose, Operator::ConjugateTranspose] {
            for op_b in [Operator::None, Operator::Transpose] {
                problems.push(make_problem(op_a, op_b, alpha, beta, expected.clone()));
            }
        }
    };

    on_operator_combinations(1.0, 0.0, c0_1ab);
    on_operator_combinations(2.0, 0.0, c0_2ab);

    on_operator_combinations(1.0, 2.0, c2_1ab);
    on_operator_combinations(2.0, 2.0, c2_2ab);

    on_operator_combinations(1.0, 1.0, c1_1ab);
    on_operator_combinations(2.0, 1.0, c1_2ab);

    assert_eq!(problems.len(), 36);
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_implementation() {
        let problems = test_gemm_problems();
        for (i, problem) in problems.iter().enumerate() {
            let result = problem.check(gemm::<f64>);
            if let Err(err) = result {
                panic!("{} on iteration {}. Problem: {:?}", err, i, problem);
            }
        }
    }
}
