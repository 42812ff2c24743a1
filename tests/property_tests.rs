//! Property-based tests for luosieve's universal invariants (§8).
//!
//! Checked against a trial-division oracle for small ranges, and against
//! itself across different worker counts for thread-invariance — both
//! forms `proptest` is good at: finding the edge case a hand-picked anchor
//! would miss.

use luosieve::driver;
use luosieve::output::OrderedSink;
use luosieve::segment::Mode;
use proptest::prelude::*;

fn oracle_count(f: u64, n: u64) -> u64 {
    (f..=n).filter(|&v| is_prime_trial(v)).count() as u64
}

fn oracle_sum(f: u64, n: u64) -> u128 {
    (f..=n).filter(|&v| is_prime_trial(v)).map(|v| v as u128).sum()
}

fn is_prime_trial(v: u64) -> bool {
    if v < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= v {
        if v % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

fn no_sink() -> Option<&'static OrderedSink<Vec<u8>>> {
    None
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// (cross-mode agreement, range exactness) COUNT matches trial division
    /// for random small ranges.
    #[test]
    fn prop_count_matches_trial_division(f in 1u64..5000, len in 0u64..5000) {
        let n = f + len;
        let got = driver::run(f, n, 2, Mode::Count, no_sink(), |_| {}).unwrap();
        prop_assert_eq!(got.count, oracle_count(f, n));
    }

    /// (cross-mode agreement) SUM matches trial division for random small
    /// ranges well under the overflow limit.
    #[test]
    fn prop_sum_matches_trial_division(f in 1u64..5000, len in 0u64..5000) {
        let n = f + len;
        let got = driver::run(f, n, 2, Mode::Sum, no_sink(), |_| {}).unwrap();
        prop_assert_eq!(got.sum, oracle_sum(f, n));
    }

    /// (thread-invariance) COUNT is independent of worker count.
    #[test]
    fn prop_count_is_thread_invariant(f in 1u64..20_000, len in 0u64..20_000, t1 in 1u64..8, t2 in 1u64..8) {
        let n = f + len;
        let a = driver::run(f, n, t1, Mode::Count, no_sink(), |_| {}).unwrap();
        let b = driver::run(f, n, t2, Mode::Count, no_sink(), |_| {}).unwrap();
        prop_assert_eq!(a.count, b.count);
    }

    /// (thread-invariance, ordering) the PRINT byte stream is independent
    /// of worker count and strictly increasing.
    #[test]
    fn prop_print_stream_is_thread_invariant_and_ordered(f in 1u64..5000, len in 0u64..5000, t1 in 1u64..6, t2 in 1u64..6) {
        let n = f + len;

        let sink1 = OrderedSink::new(Vec::new());
        driver::run(f, n, t1, Mode::Print, Some(&sink1), |_| {}).unwrap();
        let out1 = sink1.into_inner().unwrap();

        let sink2 = OrderedSink::new(Vec::new());
        driver::run(f, n, t2, Mode::Print, Some(&sink2), |_| {}).unwrap();
        let out2 = sink2.into_inner().unwrap();

        prop_assert_eq!(&out1, &out2);

        let text = String::from_utf8(out1).unwrap();
        let primes: Vec<u64> = text.lines().map(|l| l.parse().unwrap()).collect();
        for pair in primes.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert_eq!(primes.len() as u64, oracle_count(f, n));
    }

    /// (boundary inclusion) 2 and 3 appear in the PRINT stream iff they
    /// fall within [F, N], regardless of F_adj's wheel alignment.
    #[test]
    fn prop_boundary_primes_included_iff_in_range(f in 1u64..10, n in 1u64..40) {
        prop_assume!(n >= f);
        let sink = OrderedSink::new(Vec::new());
        driver::run(f, n, 2, Mode::Print, Some(&sink), |_| {}).unwrap();
        let out = sink.into_inner().unwrap();
        let text = String::from_utf8(out).unwrap();
        let primes: std::collections::HashSet<u64> =
            text.lines().map(|l| l.parse().unwrap()).collect();

        prop_assert_eq!(primes.contains(&2), f <= 2 && 2 <= n);
        prop_assert_eq!(primes.contains(&3), f <= 3 && 3 <= n);
    }

    /// (range exactness) no emitted prime lies outside [F, N].
    #[test]
    fn prop_print_never_emits_outside_range(f in 1u64..5000, len in 0u64..5000) {
        let n = f + len;
        let sink = OrderedSink::new(Vec::new());
        driver::run(f, n, 3, Mode::Print, Some(&sink), |_| {}).unwrap();
        let out = sink.into_inner().unwrap();
        let text = String::from_utf8(out).unwrap();
        for line in text.lines() {
            let v: u64 = line.parse().unwrap();
            prop_assert!(v >= f && v <= n);
        }
    }
}

#[test]
fn is_prime_and_pre_sieve_tables_are_deterministic_across_runs() {
    use luosieve::{presieve, small_primes};
    let n = 5_000_000u64;
    let a = small_primes::build(n);
    let b = small_primes::build(n);
    for i in 0..a.nbits() {
        assert_eq!(a.get(i), b.get(i));
    }

    let step_sz = driver::step_size_for(n);
    let f_adj = luosieve::segment::f_adj(1);
    let pa = presieve::build(step_sz, n, f_adj);
    let pb = presieve::build(step_sz, n, f_adj);
    for i in 0..pa.nbits() {
        assert_eq!(pa.get(i), pb.get(i));
    }
}
