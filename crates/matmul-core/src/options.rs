//! Multiplication options and configuration.

use serde::{Deserialize, Serialize};

use crate::arith::OverflowPolicy;
use crate::constants::{
    DEFAULT_PARALLEL_DNC_THRESHOLD, DEFAULT_PARALLEL_STRASSEN_THRESHOLD,
    DEFAULT_STRASSEN_THRESHOLD,
};

/// Options shared by every multiplication strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Sequential Strassen base-case size.
    pub strassen_threshold: usize,
    /// Parallel Strassen base-case size.
    pub parallel_strassen_threshold: usize,
    /// Parallel divide-and-conquer base-case size.
    pub parallel_dnc_threshold: usize,
    /// Worker threads for parallel variants (0 = global rayon pool).
    pub max_threads: usize,
    /// Element arithmetic policy.
    pub overflow: OverflowPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strassen_threshold: DEFAULT_STRASSEN_THRESHOLD,
            parallel_strassen_threshold: DEFAULT_PARALLEL_STRASSEN_THRESHOLD,
            parallel_dnc_threshold: DEFAULT_PARALLEL_DNC_THRESHOLD,
            max_threads: 0,
            overflow: OverflowPolicy::default(),
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where thresholds are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.strassen_threshold == 0 {
            self.strassen_threshold = DEFAULT_STRASSEN_THRESHOLD;
        }
        if self.parallel_strassen_threshold == 0 {
            self.parallel_strassen_threshold = DEFAULT_PARALLEL_STRASSEN_THRESHOLD;
        }
        if self.parallel_dnc_threshold == 0 {
            self.parallel_dnc_threshold = DEFAULT_PARALLEL_DNC_THRESHOLD;
        }
        self
    }

    /// Builder-style setter for the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Builder-style setter for the worker thread cap.
    #[must_use]
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.strassen_threshold, 16);
        assert_eq!(opts.parallel_strassen_threshold, 8);
        assert_eq!(opts.parallel_dnc_threshold, 8);
        assert_eq!(opts.max_threads, 0);
        assert_eq!(opts.overflow, OverflowPolicy::Wrapping);
    }

    #[test]
    fn normalize_zero_thresholds() {
        let opts = Options {
            strassen_threshold: 0,
            parallel_strassen_threshold: 0,
            parallel_dnc_threshold: 0,
            ..Default::default()
        };
        assert_eq!(opts.normalize(), Options::default());
    }

    #[test]
    fn normalize_keeps_custom_thresholds() {
        let opts = Options {
            strassen_threshold: 32,
            ..Default::default()
        }
        .normalize();
        assert_eq!(opts.strassen_threshold, 32);
    }

    #[test]
    fn options_json_partial() {
        let opts: Options =
            serde_json::from_str(r#"{"strassen_threshold": 64, "overflow": "checked"}"#).unwrap();
        assert_eq!(opts.strassen_threshold, 64);
        assert_eq!(opts.parallel_dnc_threshold, DEFAULT_PARALLEL_DNC_THRESHOLD);
        assert_eq!(opts.overflow, OverflowPolicy::Checked);
    }
}
