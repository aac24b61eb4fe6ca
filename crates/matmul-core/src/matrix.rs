//! Square matrix storage and borrowed strided views.
//!
//! `Matrix` owns one flat row-major buffer. `MatrixView` is a window into
//! such a buffer (offset, stride, size) so the recursive strategies can
//! address quadrants without copying them.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::MatmulError;
use crate::quadrant::Quadrants;

/// Element type of every matrix.
pub type Element = i64;

/// Square `n x n` matrix of integers in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct Matrix {
    n: usize,
    data: Vec<Element>,
}

impl Matrix {
    /// Create an all-zero matrix of size `n`.
    ///
    /// # Panics
    /// Panics with a capacity overflow if `n * n` elements cannot be allocated.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0; element_count(n).unwrap_or(usize::MAX)],
        }
    }

    /// Create the identity matrix of size `n`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Build a matrix from a function of `(row, col)`.
    ///
    /// # Panics
    /// Panics with a capacity overflow if `n * n` elements cannot be allocated.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> Element) -> Self {
        let mut data = Vec::with_capacity(element_count(n).unwrap_or(usize::MAX));
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    /// Wrap a flat row-major buffer of length `n * n`.
    pub fn from_vec(n: usize, data: Vec<Element>) -> Result<Self, MatmulError> {
        let len = element_count(n)
            .ok_or_else(|| MatmulError::Shape(format!("{n}x{n} matrix exceeds addressable size")))?;
        if data.len() != len {
            return Err(MatmulError::Shape(format!(
                "buffer of length {} cannot hold a {n}x{n} matrix",
                data.len()
            )));
        }
        Ok(Self { n, data })
    }

    /// Build a matrix from nested rows. Every row must have as many entries
    /// as there are rows.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self, MatmulError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(MatmulError::Shape(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Element at `(i, j)`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<Element> {
        if i >= self.n || j >= self.n {
            return None;
        }
        Some(self.data[i * self.n + j])
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[Element] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// The whole buffer in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }

    /// Copy out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Element>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    /// Check if this is the identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.data
            .iter()
            .enumerate()
            .all(|(idx, &v)| v == Element::from(idx / self.n.max(1) == idx % self.n.max(1)))
    }

    /// Check if every element is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Borrow the whole matrix as a view.
    #[must_use]
    pub fn view(&self) -> MatrixView<'_> {
        MatrixView {
            data: &self.data,
            n: self.n,
            stride: self.n,
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Element;

    fn index(&self, (i, j): (usize, usize)) -> &Element {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for size {}", self.n);
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Element {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for size {}", self.n);
        &mut self.data[i * self.n + j]
    }
}

/// Serialized form: `{ "n": 2, "rows": [[1, 2], [3, 4]] }`.
/// Number of elements in an `n x n` buffer, `None` if it overflows `usize`.
fn element_count(n: usize) -> Option<usize> {
    n.checked_mul(n)
}

#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    n: usize,
    rows: Vec<Vec<Element>>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = MatmulError;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        if repr.rows.len() != repr.n {
            return Err(MatmulError::Shape(format!(
                "declared size {} but found {} rows",
                repr.n,
                repr.rows.len()
            )));
        }
        Self::from_rows(repr.rows)
    }
}

impl From<Matrix> for MatrixRepr {
    fn from(m: Matrix) -> Self {
        Self {
            n: m.n,
            rows: m.to_rows(),
        }
    }
}

/// Borrowed square window into a row-major buffer.
///
/// Row `i` of the view is `data[i * stride..i * stride + n]`.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a [Element],
    n: usize,
    stride: usize,
}

impl<'a> MatrixView<'a> {
    /// Number of rows (and columns) of the window.
    #[must_use]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Row `i` of the window.
    #[must_use]
    pub fn row(&self, i: usize) -> &'a [Element] {
        let data = self.data;
        let start = i * self.stride;
        &data[start..start + self.n]
    }

    /// Element at `(i, j)` of the window.
    #[must_use]
    pub fn at(&self, i: usize, j: usize) -> Element {
        self.data[i * self.stride + j]
    }

    /// Split into four half-size windows over the same buffer.
    pub fn quadrants(&self) -> Result<Quadrants<MatrixView<'a>>, MatmulError> {
        if self.n % 2 != 0 {
            return Err(MatmulError::InvalidDimension {
                n: self.n,
                reason: "cannot split an odd-sized matrix into quadrants".into(),
            });
        }
        let (data, stride) = (self.data, self.stride);
        let half = self.n / 2;
        let window = |offset: usize| MatrixView {
            data: &data[offset..],
            n: half,
            stride,
        };
        Ok(Quadrants {
            top_left: window(0),
            top_right: window(half),
            bottom_left: window(half * stride),
            bottom_right: window(half * stride + half),
        })
    }

    /// Copy the window into an owned matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.n * self.n);
        for i in 0..self.n {
            data.extend_from_slice(self.row(i));
        }
        Matrix { n: self.n, data }
    }
}
