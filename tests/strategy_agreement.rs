//! Cross-check the naive, accumulator and GEMM strategies

use std::time::Duration;

use matbench::{
    fill_random, DenseRowMatrix, FlatMatrix, MonotonicClock, NdarrayGemm, Scalar, Strategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_flat<T: Scalar>(n: usize, seed: u64) -> FlatMatrix<T> {
    let mut m = DenseRowMatrix::<T>::new();
    fill_random(&mut m, n, n, &mut StdRng::seed_from_u64(seed));
    FlatMatrix::from_storage(&m)
}

fn products<T: Scalar>(a: &FlatMatrix<T>, b: &FlatMatrix<T>) -> Vec<FlatMatrix<T>> {
    let clock = MonotonicClock::new();
    Strategy::ALL
        .iter()
        .map(|strategy| {
            let mut c = FlatMatrix::zeros(a.nrows(), b.ncols());
            strategy.run(&NdarrayGemm, a, b, &mut c, &clock).unwrap();
            c
        })
        .collect()
}

fn check_agreement<T: Scalar>() {
    for n in [8, 16, 32] {
        let a = random_flat::<T>(n, n as u64);
        let b = random_flat::<T>(n, n as u64 + 100);

        let results = products(&a, &b);
        let vendor = &results[2];
        for (strategy, c) in Strategy::ALL.iter().zip(&results) {
            assert!(
                c.approx_eq(vendor),
                "{} disagrees with gemm at n = {} ({}): max diff {:?}",
                strategy,
                n,
                T::PRECISION,
                c.max_abs_diff(vendor)
            );
        }
    }
}

#[test]
fn test_double_precision_agreement() {
    check_agreement::<f64>();
}

#[test]
fn test_single_precision_agreement() {
    check_agreement::<f32>();
}

#[test]
fn test_integer_valued_inputs_agree_exactly() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in [8, 16, 32] {
        let a = FlatMatrix::from_fn(n, n, |_, _| rng.gen_range(-8..8) as f64);
        let b = FlatMatrix::from_fn(n, n, |_, _| rng.gen_range(-8..8) as f64);

        let results = products(&a, &b);
        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }
}

/// Statistical check; run with `cargo test -- --ignored` on a quiet machine
#[test]
#[ignore]
fn test_accumulator_not_slower_than_naive() {
    let n = 192;
    let a = random_flat::<f64>(n, 1);
    let b = random_flat::<f64>(n, 2);
    let clock = MonotonicClock::new();

    let median = |strategy: Strategy| {
        let mut times: Vec<Duration> = (0..7)
            .map(|_| {
                let mut c = FlatMatrix::zeros(n, n);
                strategy.run(&NdarrayGemm, &a, &b, &mut c, &clock).unwrap()
            })
            .collect();
        times.sort();
        times[times.len() / 2]
    };

    let naive = median(Strategy::Naive);
    let accumulator = median(Strategy::Accumulator);
    assert!(
        accumulator.as_secs_f64() <= naive.as_secs_f64() * 1.5,
        "accumulator {:?} vs naive {:?}",
        accumulator,
        naive
    );
}
