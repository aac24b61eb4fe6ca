//! Quadrant splitting and recombination shared by the recursive strategies.

use crate::error::MatmulError;
use crate::matrix::Matrix;

/// The four equal quadrants of a square matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrants<T> {
    /// Rows and columns `[0, n/2)`.
    pub top_left: T,
    /// Rows `[0, n/2)`, columns `[n/2, n)`.
    pub top_right: T,
    /// Rows `[n/2, n)`, columns `[0, n/2)`.
    pub bottom_left: T,
    /// Rows and columns `[n/2, n)`.
    pub bottom_right: T,
}

impl<T> Quadrants<T> {
    /// Apply `f` to each quadrant.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Quadrants<U> {
        Quadrants {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_left: f(self.bottom_left),
            bottom_right: f(self.bottom_right),
        }
    }
}

/// Split `m` into four owned half-size matrices.
pub fn split(m: &Matrix) -> Result<Quadrants<Matrix>, MatmulError> {
    Ok(m.view().quadrants()?.map(|q| q.to_matrix()))
}

/// Reassemble four equal-size quadrants into one matrix of twice the size.
pub fn combine(parts: Quadrants<Matrix>) -> Result<Matrix, MatmulError> {
    let half = parts.top_left.size();
    for other in [&parts.top_right, &parts.bottom_left, &parts.bottom_right] {
        if other.size() != half {
            return Err(MatmulError::DimensionMismatch {
                left: half,
                right: other.size(),
            });
        }
    }

    let n = half * 2;
    let mut out = Matrix::zeros(n);
    if n == 0 {
        return Ok(out);
    }
    let dst = out.as_mut_slice();
    for i in 0..half {
        let top = i * n;
        let bottom = (i + half) * n;
        dst[top..top + half].copy_from_slice(parts.top_left.row(i));
        dst[top + half..top + n].copy_from_slice(parts.top_right.row(i));
        dst[bottom..bottom + half].copy_from_slice(parts.bottom_left.row(i));
        dst[bottom + half..bottom + n].copy_from_slice(parts.bottom_right.row(i));
    }
    Ok(out)
}
