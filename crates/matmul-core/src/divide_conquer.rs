//! Eight-way recursive block multiplication.
//!
//! ```text
//! C11 = A11*B11 + A12*B21    C12 = A11*B12 + A12*B22
//! C21 = A21*B11 + A22*B21    C22 = A21*B12 + A22*B22
//! ```
//!
//! The parallel form computes the four output quadrants as four tasks via
//! nested `rayon::join`; each task runs the sequential recursion.

use tracing::{debug, trace};

use crate::arith::{add_views, OverflowPolicy};
use crate::constants::{DNC_BASE_CASE, DNC_FAN_OUT};
use crate::error::MatmulError;
use crate::matrix::{Matrix, MatrixView};
use crate::multiplier::{validate_fan_out, validate_halving, validate_operands, MatrixMultiplier};
use crate::naive::multiply_views;
use crate::options::Options;
use crate::pool::WorkerPool;
use crate::quadrant::{combine, Quadrants};

/// Recursive divide-and-conquer multiplier.
#[derive(Debug, Clone)]
pub struct DivideAndConquerMultiplier {
    parallel_threshold: usize,
    overflow: OverflowPolicy,
    pool: WorkerPool,
}

impl DivideAndConquerMultiplier {
    #[must_use]
    pub fn new() -> Self {
        let opts = Options::default();
        Self {
            parallel_threshold: opts.parallel_dnc_threshold,
            overflow: opts.overflow,
            pool: WorkerPool::global(),
        }
    }

    /// Create a multiplier from `opts` (zero thresholds take their defaults).
    pub fn with_options(opts: &Options) -> Result<Self, MatmulError> {
        let opts = opts.clone().normalize();
        Ok(Self {
            parallel_threshold: opts.parallel_dnc_threshold,
            overflow: opts.overflow,
            pool: WorkerPool::new(opts.max_threads)?,
        })
    }

    /// Size at or below which the parallel form uses the triple loop.
    #[must_use]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

impl Default for DivideAndConquerMultiplier {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixMultiplier for DivideAndConquerMultiplier {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        validate_halving(a.size(), DNC_BASE_CASE)?;
        debug!(n = a.size(), "divide-and-conquer multiply");
        multiply_recursive(a.view(), b.view(), self.overflow)
    }

    fn multiply_parallel(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        let n = a.size();
        validate_fan_out(n, self.parallel_threshold, DNC_BASE_CASE)?;
        debug!(n, threshold = self.parallel_threshold, "divide-and-conquer parallel multiply");

        if n <= self.parallel_threshold {
            return multiply_views(a.view(), b.view(), self.overflow);
        }
        let policy = self.overflow;
        self.pool
            .install(|| multiply_fan_out(a.view(), b.view(), policy))
    }

    fn name(&self) -> &'static str {
        "DivideAndConquer"
    }
}

/// Sequential recursion down to the scalar product.
pub(crate) fn multiply_recursive(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    match a.size() {
        0 => return Ok(Matrix::zeros(0)),
        1 => return Matrix::from_vec(1, vec![policy.mul(a.at(0, 0), b.at(0, 0))?]),
        _ => {}
    }

    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    combine(Quadrants {
        top_left: block_sum(qa.top_left, qb.top_left, qa.top_right, qb.bottom_left, policy)?,
        top_right: block_sum(qa.top_left, qb.top_right, qa.top_right, qb.bottom_right, policy)?,
        bottom_left: block_sum(qa.bottom_left, qb.top_left, qa.bottom_right, qb.bottom_left, policy)?,
        bottom_right: block_sum(
            qa.bottom_left,
            qb.top_right,
            qa.bottom_right,
            qb.bottom_right,
            policy,
        )?,
    })
}

/// One level of four-way fan-out; each quadrant task recurses sequentially.
fn multiply_fan_out(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    trace!(n = a.size(), tasks = DNC_FAN_OUT, "forking quadrant tasks");

    let ((c11, c12), (c21, c22)) = rayon::join(
        || {
            rayon::join(
                || block_sum(qa.top_left, qb.top_left, qa.top_right, qb.bottom_left, policy),
                || block_sum(qa.top_left, qb.top_right, qa.top_right, qb.bottom_right, policy),
            )
        },
        || {
            rayon::join(
                || block_sum(qa.bottom_left, qb.top_left, qa.bottom_right, qb.bottom_left, policy),
                || {
                    block_sum(
                        qa.bottom_left,
                        qb.top_right,
                        qa.bottom_right,
                        qb.bottom_right,
                        policy,
                    )
                },
            )
        },
    );

    combine(Quadrants {
        top_left: c11?,
        top_right: c12?,
        bottom_left: c21?,
        bottom_right: c22?,
    })
}

/// `A1 * B1 + A2 * B2` using the sequential recursion.
fn block_sum(
    a1: MatrixView<'_>,
    b1: MatrixView<'_>,
    a2: MatrixView<'_>,
    b2: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    let left = multiply_recursive(a1, b1, policy)?;
    let right = multiply_recursive(a2, b2, policy)?;
    add_views(left.view(), right.view(), policy)
}
