//! Strassen's seven-product recursive multiplication.
//!
//! ```text
//! M1 = A11 (B12 - B22)          C11 = M5 + M4 - M2 + M6
//! M2 = (A11 + A12) B22          C12 = M1 + M2
//! M3 = (A21 + A22) B11          C21 = M3 + M4
//! M4 = A22 (B21 - B11)          C22 = M5 + M1 - M3 - M7
//! M5 = (A11 + A22) (B11 + B22)
//! M6 = (A12 - A22) (B21 + B22)
//! M7 = (A11 - A21) (B11 + B12)
//! ```
//!
//! Below the crossover threshold the triple loop wins on constant factors,
//! so both forms delegate to it there. The parallel form evaluates the seven
//! products as seven pool tasks, each running the sequential recursion.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::arith::{add_views, sub_views, OverflowPolicy};
use crate::constants::STRASSEN_FAN_OUT;
use crate::error::MatmulError;
use crate::matrix::{Matrix, MatrixView};
use crate::multiplier::{validate_fan_out, validate_halving, validate_operands, MatrixMultiplier};
use crate::naive::multiply_views;
use crate::options::Options;
use crate::pool::WorkerPool;
use crate::quadrant::{combine, Quadrants};

/// Strassen multiplier with naive fallback below its thresholds.
#[derive(Debug, Clone)]
pub struct StrassenMultiplier {
    threshold: usize,
    parallel_threshold: usize,
    overflow: OverflowPolicy,
    pool: WorkerPool,
}

impl StrassenMultiplier {
    #[must_use]
    pub fn new() -> Self {
        let opts = Options::default();
        Self {
            threshold: opts.strassen_threshold,
            parallel_threshold: opts.parallel_strassen_threshold,
            overflow: opts.overflow,
            pool: WorkerPool::global(),
        }
    }

    /// Create a multiplier from `opts` (zero thresholds take their defaults).
    pub fn with_options(opts: &Options) -> Result<Self, MatmulError> {
        let opts = opts.clone().normalize();
        Ok(Self {
            threshold: opts.strassen_threshold,
            parallel_threshold: opts.parallel_strassen_threshold,
            overflow: opts.overflow,
            pool: WorkerPool::new(opts.max_threads)?,
        })
    }

    /// Sequential crossover size.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Parallel crossover size.
    #[must_use]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

impl Default for StrassenMultiplier {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixMultiplier for StrassenMultiplier {
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        validate_halving(a.size(), self.threshold)?;
        debug!(n = a.size(), threshold = self.threshold, "strassen multiply");
        multiply_recursive(a.view(), b.view(), self.threshold, self.overflow)
    }

    fn multiply_parallel(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
        validate_operands(a, b)?;
        let n = a.size();
        validate_fan_out(n, self.parallel_threshold, self.threshold)?;
        debug!(n, threshold = self.parallel_threshold, "strassen parallel multiply");

        if n <= self.parallel_threshold {
            return multiply_views(a.view(), b.view(), self.overflow);
        }
        let (threshold, policy) = (self.threshold, self.overflow);
        self.pool
            .install(|| multiply_fan_out(a.view(), b.view(), threshold, policy))
    }

    fn name(&self) -> &'static str {
        "Strassen"
    }
}

/// The seven Strassen products, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Product {
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    M7,
}

impl Product {
    const ALL: [Product; STRASSEN_FAN_OUT] = [
        Product::M1,
        Product::M2,
        Product::M3,
        Product::M4,
        Product::M5,
        Product::M6,
        Product::M7,
    ];

    /// Form this product's operands and multiply them recursively.
    fn compute(
        self,
        a: &Quadrants<MatrixView<'_>>,
        b: &Quadrants<MatrixView<'_>>,
        threshold: usize,
        policy: OverflowPolicy,
    ) -> Result<Matrix, MatmulError> {
        match self {
            Product::M1 => {
                let r = sub_views(b.top_right, b.bottom_right, policy)?;
                multiply_recursive(a.top_left, r.view(), threshold, policy)
            }
            Product::M2 => {
                let l = add_views(a.top_left, a.top_right, policy)?;
                multiply_recursive(l.view(), b.bottom_right, threshold, policy)
            }
            Product::M3 => {
                let l = add_views(a.bottom_left, a.bottom_right, policy)?;
                multiply_recursive(l.view(), b.top_left, threshold, policy)
            }
            Product::M4 => {
                let r = sub_views(b.bottom_left, b.top_left, policy)?;
                multiply_recursive(a.bottom_right, r.view(), threshold, policy)
            }
            Product::M5 => {
                let l = add_views(a.top_left, a.bottom_right, policy)?;
                let r = add_views(b.top_left, b.bottom_right, policy)?;
                multiply_recursive(l.view(), r.view(), threshold, policy)
            }
            Product::M6 => {
                let l = sub_views(a.top_right, a.bottom_right, policy)?;
                let r = add_views(b.bottom_left, b.bottom_right, policy)?;
                multiply_recursive(l.view(), r.view(), threshold, policy)
            }
            Product::M7 => {
                let l = sub_views(a.top_left, a.bottom_left, policy)?;
                let r = add_views(b.top_left, b.top_right, policy)?;
                multiply_recursive(l.view(), r.view(), threshold, policy)
            }
        }
    }
}

/// Sequential recursion; falls back to the triple loop at `threshold`.
pub(crate) fn multiply_recursive(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    threshold: usize,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    if a.size() <= threshold {
        return multiply_views(a, b, policy);
    }
    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    let products = Product::ALL
        .iter()
        .map(|p| p.compute(&qa, &qb, threshold, policy))
        .collect::<Result<Vec<_>, _>>()?;
    assemble(products, policy)
}

/// One level of seven-way fan-out; each product task recurses sequentially.
fn multiply_fan_out(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    threshold: usize,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    let qa = a.quadrants()?;
    let qb = b.quadrants()?;
    trace!(n = a.size(), tasks = STRASSEN_FAN_OUT, "forking product tasks");
    let products = Product::ALL
        .par_iter()
        .map(|p| p.compute(&qa, &qb, threshold, policy))
        .collect::<Result<Vec<_>, _>>()?;
    assemble(products, policy)
}

/// Combine M1..M7 into the four output quadrants and reassemble.
fn assemble(products: Vec<Matrix>, policy: OverflowPolicy) -> Result<Matrix, MatmulError> {
    let [m1, m2, m3, m4, m5, m6, m7]: [Matrix; STRASSEN_FAN_OUT] =
        products.try_into().map_err(|v: Vec<Matrix>| {
            MatmulError::Shape(format!("expected {STRASSEN_FAN_OUT} products, got {}", v.len()))
        })?;
    let add = |x: &Matrix, y: &Matrix| add_views(x.view(), y.view(), policy);
    let sub = |x: &Matrix, y: &Matrix| sub_views(x.view(), y.view(), policy);

    let c11 = add(&sub(&add(&m5, &m4)?, &m2)?, &m6)?;
    let c12 = add(&m1, &m2)?;
    let c21 = add(&m3, &m4)?;
    let c22 = sub(&sub(&add(&m5, &m1)?, &m3)?, &m7)?;

    combine(Quadrants {
        top_left: c11,
        top_right: c12,
        bottom_left: c21,
        bottom_right: c22,
    })
}
