//! Property-based tests across all multiplication strategies.
//!
//! These exercise the `MatrixMultiplier` trait directly, comparing every
//! strategy and both execution forms against the triple loop.

use proptest::prelude::*;

use matmul_core::divide_conquer::DivideAndConquerMultiplier;
use matmul_core::naive::NaiveMultiplier;
use matmul_core::strassen::StrassenMultiplier;
use matmul_core::{Element, MatmulError, Matrix, MatrixMultiplier, Options, OverflowPolicy};

/// Every (name, multiplier) pair under test, Strassen included twice so the
/// seven-product formulas run even on small inputs.
fn strategies() -> Vec<(&'static str, Box<dyn MatrixMultiplier>)> {
    let formulas_everywhere = Options {
        strassen_threshold: 1,
        parallel_strassen_threshold: 1,
        parallel_dnc_threshold: 1,
        max_threads: 4,
        ..Options::default()
    };
    vec![
        ("naive", Box::new(NaiveMultiplier::new())),
        ("dnc", Box::new(DivideAndConquerMultiplier::new())),
        (
            "dnc-fanout",
            Box::new(DivideAndConquerMultiplier::with_options(&formulas_everywhere).unwrap()),
        ),
        ("strassen", Box::new(StrassenMultiplier::new())),
        (
            "strassen-formulas",
            Box::new(StrassenMultiplier::with_options(&formulas_everywhere).unwrap()),
        ),
    ]
}

fn square(n: usize, elements: impl Strategy<Value = Element>) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(elements, n * n).prop_map(move |data| Matrix::from_vec(n, data).unwrap())
}

/// A pair of equal power-of-two-sized matrices with small entries.
fn matrix_pair(max_log2: u32) -> impl Strategy<Value = (Matrix, Matrix)> {
    (0..=max_log2).prop_flat_map(|e| {
        let n = 1usize << e;
        (square(n, -1000i64..=1000), square(n, -1000i64..=1000))
    })
}

fn matrix_triple(max_log2: u32) -> impl Strategy<Value = (Matrix, Matrix, Matrix)> {
    (0..=max_log2).prop_flat_map(|e| {
        let n = 1usize << e;
        (
            square(n, -100i64..=100),
            square(n, -100i64..=100),
            square(n, -100i64..=100),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// All strategies, sequential and parallel, agree with the triple loop.
    #[test]
    fn all_strategies_agree((a, b) in matrix_pair(6)) {
        let expected = NaiveMultiplier::new().multiply(&a, &b).unwrap();
        for (name, m) in strategies() {
            prop_assert_eq!(&m.multiply(&a, &b).unwrap(), &expected, "{} sequential n={}", name, a.size());
            prop_assert_eq!(&m.multiply_parallel(&a, &b).unwrap(), &expected, "{} parallel n={}", name, a.size());
        }
    }

    /// Multiplying by the identity on either side returns the operand.
    #[test]
    fn identity_is_neutral((a, _) in matrix_pair(6)) {
        let id = Matrix::identity(a.size());
        for (name, m) in strategies() {
            prop_assert_eq!(&m.multiply(&a, &id).unwrap(), &a, "{} A*I", name);
            prop_assert_eq!(&m.multiply_parallel(&id, &a).unwrap(), &a, "{} I*A", name);
        }
    }

    /// Multiplying by the zero matrix yields the zero matrix.
    #[test]
    fn zero_annihilates((a, _) in matrix_pair(6)) {
        let zero = Matrix::zeros(a.size());
        for (name, m) in strategies() {
            prop_assert!(m.multiply(&a, &zero).unwrap().is_zero(), "{} A*0", name);
            prop_assert!(m.multiply_parallel(&zero, &a).unwrap().is_zero(), "{} 0*A", name);
        }
    }

    /// (A*B)*C == A*(B*C), checked through the Strassen combine step.
    #[test]
    fn triple_product_associates((a, b, c) in matrix_triple(5)) {
        for (name, m) in strategies() {
            let left = m.multiply(&m.multiply(&a, &b).unwrap(), &c).unwrap();
            let right = m.multiply(&a, &m.multiply(&b, &c).unwrap()).unwrap();
            prop_assert_eq!(left, right, "{} n={}", name, a.size());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Wrapping arithmetic keeps every strategy bit-identical on full-range input.
    #[test]
    fn wrapping_agrees_on_full_range(e in 0u32..=5, seed in any::<u64>()) {
        let n = 1usize << e;
        let mut state = seed | 1;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as Element
        };
        let a = Matrix::from_fn(n, |_, _| next());
        let b = Matrix::from_fn(n, |_, _| next());
        let expected = NaiveMultiplier::new().multiply(&a, &b).unwrap();
        for (name, m) in strategies() {
            prop_assert_eq!(&m.multiply(&a, &b).unwrap(), &expected, "{}", name);
            prop_assert_eq!(&m.multiply_parallel(&a, &b).unwrap(), &expected, "{}", name);
        }
    }

    /// The triple loop accepts any size, sequential and row-parallel alike.
    #[test]
    fn naive_any_size(a in (0usize..20).prop_flat_map(|n| square(n, -50i64..=50))) {
        let naive = NaiveMultiplier::new();
        let id = Matrix::identity(a.size());
        prop_assert_eq!(&naive.multiply(&a, &id).unwrap(), &a);
        prop_assert_eq!(naive.multiply(&a, &a).unwrap(), naive.multiply_parallel(&a, &a).unwrap());
    }
}

fn sample(n: usize, seed: i64) -> Matrix {
    Matrix::from_fn(n, |i, j| ((i as i64 * 37 + j as i64 * 53 + seed) % 97) - 48)
}

/// [[1,2],[3,4]] * [[5,6],[7,8]] for every strategy and form.
#[test]
fn concrete_two_by_two() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
    let expected = vec![vec![19, 22], vec![43, 50]];
    for (name, m) in strategies() {
        assert_eq!(m.multiply(&a, &b).unwrap().to_rows(), expected, "{name}");
        assert_eq!(m.multiply_parallel(&a, &b).unwrap().to_rows(), expected, "{name}");
    }
}

/// At n = 4 both recursive strategies sit below their thresholds.
#[test]
fn concrete_four_by_four_identity() {
    let id = Matrix::identity(4);
    let r = sample(4, 5);
    let dnc = DivideAndConquerMultiplier::new();
    let strassen = StrassenMultiplier::new();
    for m in [&dnc as &dyn MatrixMultiplier, &strassen] {
        assert_eq!(m.multiply(&id, &r).unwrap(), r, "{}", m.name());
        assert_eq!(m.multiply(&r, &id).unwrap(), r, "{}", m.name());
        assert_eq!(m.multiply_parallel(&id, &r).unwrap(), r, "{}", m.name());
        assert_eq!(m.multiply_parallel(&r, &id).unwrap(), r, "{}", m.name());
    }
}

/// n = 1 returns the scalar product for every strategy.
#[test]
fn boundary_scalar() {
    let a = Matrix::from_rows(vec![vec![-12]]).unwrap();
    let b = Matrix::from_rows(vec![vec![11]]).unwrap();
    for (name, m) in strategies() {
        assert_eq!(m.multiply(&a, &b).unwrap()[(0, 0)], -132, "{name}");
        assert_eq!(m.multiply_parallel(&a, &b).unwrap()[(0, 0)], -132, "{name}");
    }
}

/// Sizes at each threshold and one level above it match the triple loop.
#[test]
fn boundary_thresholds() {
    let naive = NaiveMultiplier::new();
    let dnc = DivideAndConquerMultiplier::new();
    let strassen = StrassenMultiplier::new();
    for n in [
        strassen.threshold(),
        strassen.threshold() * 2,
        strassen.parallel_threshold(),
        strassen.parallel_threshold() * 2,
        dnc.parallel_threshold(),
    ] {
        let a = sample(n, 1);
        let b = sample(n, 2);
        let expected = naive.multiply(&a, &b).unwrap();
        assert_eq!(strassen.multiply(&a, &b).unwrap(), expected, "strassen n={n}");
        assert_eq!(strassen.multiply_parallel(&a, &b).unwrap(), expected, "strassen par n={n}");
        assert_eq!(dnc.multiply(&a, &b).unwrap(), expected, "dnc n={n}");
        assert_eq!(dnc.multiply_parallel(&a, &b).unwrap(), expected, "dnc par n={n}");
    }
}

/// Sizes differ: every strategy reports the mismatch instead of indexing past the end.
#[test]
fn mismatch_all_strategies() {
    let a = Matrix::zeros(4);
    let b = Matrix::zeros(8);
    for (name, m) in strategies() {
        assert_eq!(
            m.multiply(&a, &b).unwrap_err(),
            MatmulError::DimensionMismatch { left: 4, right: 8 },
            "{name}"
        );
        assert!(m.multiply_parallel(&b, &a).is_err(), "{name}");
    }
}

/// Non-power-of-two sizes fail fast in the recursive strategies.
#[test]
fn invalid_dimension_recursive_strategies() {
    let m = Matrix::zeros(34);
    for (name, mult) in strategies().into_iter().filter(|(name, _)| *name != "naive") {
        assert!(
            matches!(mult.multiply(&m, &m), Err(MatmulError::InvalidDimension { .. })),
            "{name}"
        );
    }
    assert!(NaiveMultiplier::new().multiply(&m, &m).unwrap().is_zero());
}

/// Checked arithmetic surfaces overflow from every strategy.
#[test]
fn checked_overflow_all_strategies() {
    let opts = Options::default().with_overflow(OverflowPolicy::Checked);
    let a = Matrix::from_fn(32, |_, _| Element::MAX / 8);
    let strategies: Vec<Box<dyn MatrixMultiplier>> = vec![
        Box::new(NaiveMultiplier::with_options(&opts).unwrap()),
        Box::new(DivideAndConquerMultiplier::with_options(&opts).unwrap()),
        Box::new(StrassenMultiplier::with_options(&opts).unwrap()),
    ];
    for m in &strategies {
        assert!(
            matches!(m.multiply(&a, &a), Err(MatmulError::Overflow { .. })),
            "{}",
            m.name()
        );
        assert!(
            matches!(m.multiply_parallel(&a, &a), Err(MatmulError::Overflow { .. })),
            "{}",
            m.name()
        );
    }
}

/// Checked and wrapping agree whenever nothing overflows.
#[test]
fn checked_matches_wrapping_in_range() {
    let checked = StrassenMultiplier::with_options(
        &Options::default().with_overflow(OverflowPolicy::Checked),
    )
    .unwrap();
    let a = sample(64, 3);
    let b = sample(64, 4);
    assert_eq!(
        checked.multiply_parallel(&a, &b).unwrap(),
        StrassenMultiplier::new().multiply(&a, &b).unwrap()
    );
}
