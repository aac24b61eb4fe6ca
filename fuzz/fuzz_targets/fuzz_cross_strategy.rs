#![no_main]

use libfuzzer_sys::fuzz_target;

use matmul_core::{
    DivideAndConquerMultiplier, Element, Matrix, MatrixMultiplier, NaiveMultiplier, Options,
    StrassenMultiplier,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the size (power of two up to 32), second the thresholds.
    let n = 1usize << (data[0] % 6);
    let threshold = 1usize << (data[1] % 5);
    let body = &data[2..];

    let entry = |k: usize| -> Element {
        if body.is_empty() {
            return 0;
        }
        let base = (k * 8) % body.len();
        let mut bytes = [0u8; 8];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = body[(base + i) % body.len()];
        }
        Element::from_le_bytes(bytes)
    };
    let a = Matrix::from_fn(n, |i, j| entry(i * n + j));
    let b = Matrix::from_fn(n, |i, j| entry(n * n + i * n + j));

    let opts = Options {
        strassen_threshold: threshold,
        parallel_strassen_threshold: threshold,
        parallel_dnc_threshold: threshold,
        max_threads: 2,
        ..Options::default()
    };
    let naive = NaiveMultiplier::new();
    let dnc = DivideAndConquerMultiplier::with_options(&opts).unwrap();
    let strassen = StrassenMultiplier::with_options(&opts).unwrap();

    // Wrapping arithmetic: every strategy must agree bit for bit.
    let expected = naive.multiply(&a, &b).unwrap();
    assert_eq!(naive.multiply_parallel(&a, &b).unwrap(), expected, "naive parallel n={n}");
    assert_eq!(dnc.multiply(&a, &b).unwrap(), expected, "dnc n={n}");
    assert_eq!(dnc.multiply_parallel(&a, &b).unwrap(), expected, "dnc parallel n={n}");
    assert_eq!(strassen.multiply(&a, &b).unwrap(), expected, "strassen n={n}");
    assert_eq!(
        strassen.multiply_parallel(&a, &b).unwrap(),
        expected,
        "strassen parallel n={n}"
    );
});
