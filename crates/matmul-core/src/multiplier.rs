//! Multiplication strategy trait and operand validation.
//!
//! `MatrixMultiplier` is the narrow interface every strategy implements:
//! a sequential and a parallel product plus a display name.

use crate::error::MatmulError;
use crate::matrix::Matrix;

/// Square matrix multiplication strategy.
pub trait MatrixMultiplier: Send + Sync {
    /// Compute `A * B` on the calling thread.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError>;

    /// Compute `A * B` with fork-join parallelism. Results are identical to
    /// [`MatrixMultiplier::multiply`].
    fn multiply_parallel(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError>;

    /// Get the name of this multiplication strategy.
    fn name(&self) -> &str;
}

/// Both operands must have the same size.
pub fn validate_operands(a: &Matrix, b: &Matrix) -> Result<(), MatmulError> {
    if a.size() != b.size() {
        return Err(MatmulError::DimensionMismatch {
            left: a.size(),
            right: b.size(),
        });
    }
    Ok(())
}

/// `n` must stay even at every recursion level above `base_case`.
///
/// For a base case of 1 this means `n` is a power of two.
pub fn validate_halving(n: usize, base_case: usize) -> Result<(), MatmulError> {
    let base_case = base_case.max(1);
    let mut size = n;
    while size > base_case {
        if size % 2 != 0 {
            return Err(MatmulError::InvalidDimension {
                n,
                reason: format!("size {size} is odd above base case {base_case}"),
            });
        }
        size /= 2;
    }
    Ok(())
}

/// Validate a parallel call that fans out once above `fan_out_base` and
/// then recurses sequentially down to `recursive_base`.
pub fn validate_fan_out(
    n: usize,
    fan_out_base: usize,
    recursive_base: usize,
) -> Result<(), MatmulError> {
    if n <= fan_out_base.max(1) {
        return Ok(());
    }
    if n % 2 != 0 {
        return Err(MatmulError::InvalidDimension {
            n,
            reason: format!("size {n} is odd above parallel base case {fan_out_base}"),
        });
    }
    validate_halving(n / 2, recursive_base).map_err(|err| match err {
        MatmulError::InvalidDimension { reason, .. } => MatmulError::InvalidDimension { n, reason },
        other => other,
    })
}
