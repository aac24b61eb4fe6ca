//! Elementwise matrix arithmetic and the element overflow policy.
//!
//! Every strategy routes its scalar `+`, `-` and `*` through one
//! `OverflowPolicy`, so results stay comparable across strategies.

use serde::{Deserialize, Serialize};

use crate::error::MatmulError;
use crate::matrix::{Element, Matrix, MatrixView};
use crate::multiplier::validate_operands;

/// How element arithmetic behaves when it leaves the `i64` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Two's-complement wrap-around (arithmetic modulo 2^64).
    ///
    /// Wrapping is a ring homomorphism, so naive, divide-and-conquer and
    /// Strassen agree bit for bit even when intermediates overflow.
    #[default]
    Wrapping,
    /// Fail with [`MatmulError::Overflow`] on the first overflowing operation.
    ///
    /// Strategies only agree under [`OverflowPolicy::Wrapping`]: Strassen
    /// forms intermediate sums the triple loop never does, so it may report
    /// `Overflow` on inputs whose naive product fits in `i64`.
    Checked,
}

impl OverflowPolicy {
    /// Add two elements.
    #[inline]
    pub fn add(self, a: Element, b: Element) -> Result<Element, MatmulError> {
        match self {
            Self::Wrapping => Ok(a.wrapping_add(b)),
            Self::Checked => a.checked_add(b).ok_or(MatmulError::Overflow { op: "add" }),
        }
    }

    /// Subtract two elements.
    #[inline]
    pub fn sub(self, a: Element, b: Element) -> Result<Element, MatmulError> {
        match self {
            Self::Wrapping => Ok(a.wrapping_sub(b)),
            Self::Checked => a.checked_sub(b).ok_or(MatmulError::Overflow { op: "sub" }),
        }
    }

    /// Multiply two elements.
    #[inline]
    pub fn mul(self, a: Element, b: Element) -> Result<Element, MatmulError> {
        match self {
            Self::Wrapping => Ok(a.wrapping_mul(b)),
            Self::Checked => a.checked_mul(b).ok_or(MatmulError::Overflow { op: "mul" }),
        }
    }

    /// Fused `acc + a * b`.
    #[inline]
    pub fn mul_add(self, acc: Element, a: Element, b: Element) -> Result<Element, MatmulError> {
        let product = self.mul(a, b)?;
        self.add(acc, product)
    }
}

/// Elementwise `A + B` with the default (wrapping) policy.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
    add_with(a, b, OverflowPolicy::default())
}

/// Elementwise `A - B` with the default (wrapping) policy.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatmulError> {
    subtract_with(a, b, OverflowPolicy::default())
}

/// Elementwise `A + B`.
pub fn add_with(a: &Matrix, b: &Matrix, policy: OverflowPolicy) -> Result<Matrix, MatmulError> {
    validate_operands(a, b)?;
    add_views(a.view(), b.view(), policy)
}

/// Elementwise `A - B`.
pub fn subtract_with(
    a: &Matrix,
    b: &Matrix,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    validate_operands(a, b)?;
    sub_views(a.view(), b.view(), policy)
}

pub(crate) fn add_views(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    zip_views(a, b, |x, y| policy.add(x, y))
}

pub(crate) fn sub_views(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    policy: OverflowPolicy,
) -> Result<Matrix, MatmulError> {
    zip_views(a, b, |x, y| policy.sub(x, y))
}

fn zip_views(
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    op: impl Fn(Element, Element) -> Result<Element, MatmulError>,
) -> Result<Matrix, MatmulError> {
    if a.size() != b.size() {
        return Err(MatmulError::DimensionMismatch {
            left: a.size(),
            right: b.size(),
        });
    }
    let n = a.size();
    let mut out = Matrix::zeros(n);
    if n == 0 {
        return Ok(out);
    }
    for (i, dst) in out.as_mut_slice().chunks_exact_mut(n).enumerate() {
        for ((d, &x), &y) in dst.iter_mut().zip(a.row(i)).zip(b.row(i)) {
            *d = op(x, y)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<Element>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn add_elementwise() {
        let c = add(&m(vec![vec![1, 2], vec![3, 4]]), &m(vec![vec![5, 6], vec![7, 8]])).unwrap();
        assert_eq!(c.to_rows(), vec![vec![6, 8], vec![10, 12]]);
    }

    #[test]
    fn subtract_elementwise() {
        let c =
            subtract(&m(vec![vec![1, 2], vec![3, 4]]), &m(vec![vec![5, 6], vec![7, 8]])).unwrap();
        assert_eq!(c.to_rows(), vec![vec![-4, -4], vec![-4, -4]]);
    }

    #[test]
    fn inputs_untouched() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = a.clone();
        let _ = add(&a, &b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn size_mismatch() {
        let err = add(&Matrix::zeros(2), &Matrix::zeros(3)).unwrap_err();
        assert_eq!(err, MatmulError::DimensionMismatch { left: 2, right: 3 });
        assert!(subtract(&Matrix::zeros(4), &Matrix::zeros(1)).is_err());
    }

    #[test]
    fn empty_operands() {
        assert_eq!(add(&Matrix::zeros(0), &Matrix::zeros(0)).unwrap().size(), 0);
    }

    #[test]
    fn wrapping_policy_wraps() {
        let a = m(vec![vec![Element::MAX]]);
        let b = m(vec![vec![1]]);
        assert_eq!(add(&a, &b).unwrap()[(0, 0)], Element::MIN);
        assert_eq!(OverflowPolicy::Wrapping.mul(Element::MAX, 2).unwrap(), -2);
    }

    #[test]
    fn checked_policy_reports_overflow() {
        let a = m(vec![vec![Element::MAX]]);
        let b = m(vec![vec![1]]);
        assert_eq!(
            add_with(&a, &b, OverflowPolicy::Checked).unwrap_err(),
            MatmulError::Overflow { op: "add" }
        );
        let c = m(vec![vec![Element::MIN]]);
        assert_eq!(
            subtract_with(&c, &b, OverflowPolicy::Checked).unwrap_err(),
            MatmulError::Overflow { op: "sub" }
        );
        assert_eq!(
            OverflowPolicy::Checked.mul(Element::MAX, 2).unwrap_err(),
            MatmulError::Overflow { op: "mul" }
        );
    }

    #[test]
    fn view_arithmetic_on_quadrants() {
        let a = Matrix::from_fn(4, |i, j| (i * 4 + j) as Element);
        let q = a.view().quadrants().unwrap();
        let sum = add_views(q.top_left, q.bottom_right, OverflowPolicy::Wrapping).unwrap();
        assert_eq!(sum.to_rows(), vec![vec![10, 12], vec![18, 20]]);
    }
}
