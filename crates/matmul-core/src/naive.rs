//! Triple-loop O(n^3) multiplication.
//!
//! Also the base case the recursive strategies fall back to. The parallel
//! form hands each output row to the worker pool as an independent task;
//! every task writes only its own row, and the inner sum always runs in
//! ascending `k`, so both forms return identical matrices.

use rayon::prelude::*;
use tracing::debug;

use crate::arith::OverflowPolicy;
use crate::error::MatmulError;
use crate::matrix::{Element, Matrix, MatrixView};
use crate::multiplier::{validate_operands, MatrixMultiplier};
use crate::options::Options;
use crate::pool::WorkerPool;

/// Direct triple-loop multiplier.
#[derive(Debug, Clone, Default)]
pub struct NaiveMultiplier {
    overflow: OverflowPolicy,
    pool: WorkerPool,
}

impl NaiveMultiplier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a multiplier using the overflow policy and thread cap in `opts`.
    pub fn with_options(opts: &Options) -> Result<Self, MatmulError> {
        Ok(Self {
            overflow: opts.overflow,
            pool: WorkerPool::new(opts.max_threads)?,
        })
    }
}

impl MatrixMultiplier for NaiveMultiplier {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        debug!(n = a.size(), "naive multiply");
        multiply_views(a.view(), b.view(), self.overflow)
    }

    fn multiply_parallel(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        debug!(n = a.size(), threads = self.pool.num_threads(), "naive row-parallel multiply");
        let policy = self.overflow;
        self.pool
            .install(|| multiply_views_parallel(a.view(), b.view(), policy))
    }

    fn name(&self) -> &'static str {
        "Naive"
    }
}

/// Sequential product of two equal-size views.
pub(crate) fn multiply_views(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    let n = a.size();
    let mut out = Matrix::zeros(n);
    if n == 0 {
        return Ok(out);
    }
    for (i, row) in out.as_mut_slice().chunks_exact_mut(n).enumerate() {
        fill_row(a, b, i, row, policy)?;
    }
    Ok(out)
}

/// Row-parallel product; must run inside the caller's pool.
pub(crate) fn multiply_views_parallel(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    let n = a.size();
    let mut out = Matrix::zeros(n);
    if n == 0 {
        return Ok(out);
    }
    out.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .try_for_each(|(i, row)| fill_row(a, b, i, row, policy))?;
    Ok(out)
}

/// Write row `i` of `A * B` into `row`.
fn fill_row(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    i: usize,
    row: &mut [Element],
    policy: OverflowPolicy,
) -> Result<(), MatmulError> {
    let a_row = a.row(i);
    for (j, dst) in row.iter_mut().enumerate() {
        let mut sum: Element = 0;
        for (k, &x) in a_row.iter().enumerate() {
            sum = policy.mul_add(sum, x, b.at(k, j))?;
        }
        *dst = sum;
    }
    Ok(())
}
