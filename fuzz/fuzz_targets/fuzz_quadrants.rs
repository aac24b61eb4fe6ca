#![no_main]

use libfuzzer_sys::fuzz_target;

use matmul_core::quadrant::{combine, split};
use matmul_core::{Element, Matrix};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let n = usize::from(data[0] % 17);
    let body = &data[1..];
    let m = Matrix::from_fn(n, |i, j| {
        body.get(i * n + j).map_or(0, |&b| Element::from(b))
    });

    // Odd sizes must be rejected, never panic.
    match split(&m) {
        Ok(q) => assert_eq!(combine(q).unwrap(), m, "n={n}"),
        Err(_) => assert!(n % 2 == 1, "split rejected even n={n}"),
    }
});
