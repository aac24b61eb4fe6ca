//! Constants for base-case thresholds and concurrency limits.

/// Size at or below which sequential Strassen delegates to the triple loop.
pub const DEFAULT_STRASSEN_THRESHOLD: usize = 16;

/// Size at or below which parallel Strassen delegates to the triple loop.
///
/// Lower than the sequential threshold: the seven-way fan-out only pays for
/// itself when each task still has a recursive product left to do.
pub const DEFAULT_PARALLEL_STRASSEN_THRESHOLD: usize = 8;

/// Size at or below which parallel divide-and-conquer delegates to the triple loop.
pub const DEFAULT_PARALLEL_DNC_THRESHOLD: usize = 8;

/// Base case of sequential divide-and-conquer (scalar product).
pub const DNC_BASE_CASE: usize = 1;

/// Fan-out of one parallel divide-and-conquer level (one task per output quadrant).
pub const DNC_FAN_OUT: usize = 4;

/// Fan-out of one parallel Strassen level (one task per product M1..M7).
pub const STRASSEN_FAN_OUT: usize = 7;
