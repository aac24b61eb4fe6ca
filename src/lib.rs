//! Integration test package for the matmul workspace.
//!
//! The tests live under `tests/`; this library target is intentionally empty.
