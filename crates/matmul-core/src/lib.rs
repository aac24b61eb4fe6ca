//! # matmul-core
//!
//! Square integer matrix multiplication with three competing strategies:
//! the direct triple loop, eight-way divide-and-conquer, and Strassen's
//! seven-product recursion. Each strategy offers a sequential and a
//! fork-join parallel form behind the [`MatrixMultiplier`] trait.

pub mod arith;
pub mod constants;
pub mod divide_conquer;
pub mod error;
pub mod matrix;
pub mod multiplier;
pub mod naive;
pub mod options;
pub mod pool;
pub mod quadrant;
pub mod registry;
pub mod strassen;

// Re-exports
pub use arith::OverflowPolicy;
pub use constants::{
    DEFAULT_PARALLEL_DNC_THRESHOLD, DEFAULT_PARALLEL_STRASSEN_THRESHOLD,
    DEFAULT_STRASSEN_THRESHOLD,
};
pub use divide_conquer::DivideAndConquerMultiplier;
pub use error::MatmulError;
pub use matrix::{Element, Matrix, MatrixView};
pub use multiplier::MatrixMultiplier;
pub use naive::NaiveMultiplier;
pub use options::Options;
pub use quadrant::Quadrants;
pub use registry::{DefaultFactory, MultiplierFactory};
pub use strassen::StrassenMultiplier;

/// Multiply two square matrices with sequential Strassen and default options.
///
/// For thresholds, overflow checking or a dedicated pool, build a
/// multiplier with [`Options`] instead.
///
/// # Example
/// ```
/// use matmul_core::Matrix;
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let c = matmul_core::multiply(&a, &b).unwrap();
/// assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
    StrassenMultiplier::new().multiply(a, b)
}

/// Multiply two square matrices with parallel Strassen on the global pool.
pub fn multiply_parallel(a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
    StrassenMultiplier::new().multiply_parallel(a, b)
}
