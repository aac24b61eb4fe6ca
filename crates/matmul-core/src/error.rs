//! Error type shared by every multiplication strategy.

/// Error type for matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatmulError {
    /// Operands of a binary operation have different sizes.
    #[error("dimension mismatch: {left}x{left} vs {right}x{right}")]
    DimensionMismatch {
        /// Size of the left operand.
        left: usize,
        /// Size of the right operand.
        right: usize,
    },

    /// A recursive strategy cannot halve the size down to its base case.
    #[error("invalid dimension {n}: {reason}")]
    InvalidDimension {
        /// The offending size.
        n: usize,
        /// Why the size was rejected.
        reason: String,
    },

    /// Checked arithmetic left the range of the element type.
    #[error("arithmetic overflow in {op}")]
    Overflow {
        /// The operation that overflowed (`add`, `sub` or `mul`).
        op: &'static str,
    },

    /// Raw data does not describe a square matrix.
    #[error("shape error: {0}")]
    Shape(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A dedicated worker pool could not be created.
    #[error("worker pool error: {0}")]
    Pool(String),
}
