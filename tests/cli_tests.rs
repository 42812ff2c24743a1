//! CLI integration tests for the `luosieve` binary.
//!
//! These spawn the compiled binary via `assert_cmd` and assert on exit
//! code, stdout, and stderr, exercising the §6/§8 contracts directly: the
//! literal reference anchors, the print/exit-code behavior at small ranges,
//! and bounds/flag validation.

use assert_cmd::Command;
use predicates::prelude::*;

fn luosieve() -> Command {
    Command::cargo_bin("luosieve").unwrap()
}

// == Reference anchors (§8) =================================================

#[test]
fn count_f1_n100_is_25() {
    luosieve()
        .args(["1", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 25"));
}

#[test]
fn count_f1_n1000_is_168() {
    luosieve()
        .args(["1", "1000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 168"));
}

#[test]
fn count_single_arg_defaults_from_to_one() {
    luosieve()
        .args(["100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 25"));
}

#[test]
fn sum_f1_n2e6_matches_reference() {
    luosieve()
        .args(["1", "2000000", "--sum"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Sum of primes: 142913828922"));
}

#[test]
fn print_f1_n30_emits_expected_sequence() {
    luosieve()
        .args(["1", "30", "-p"])
        .assert()
        .success()
        .stdout("2\n3\n5\n7\n11\n13\n17\n19\n23\n29\n");
}

#[test]
fn print_single_prime_at_floor() {
    luosieve()
        .args(["97", "97", "-p"])
        .assert()
        .success()
        .stdout("97\n");
}

#[test]
fn print_empty_range_exits_one_with_no_stdout() {
    luosieve()
        .args(["24", "28", "-p"])
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn count_empty_range_exits_one() {
    luosieve().args(["24", "28"]).assert().code(1);
}

// == Scientific notation =====================================================

#[test]
fn accepts_scientific_notation_bounds() {
    luosieve()
        .args(["1e2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 25"));
}

// == Quiet mode ===============================================================

#[test]
fn quiet_suppresses_stderr_summary() {
    luosieve()
        .args(["1", "100", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// == Thread-count flag ========================================================

#[test]
fn explicit_threads_do_not_change_the_count() {
    luosieve()
        .args(["1", "1000", "--threads=1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 168"));
    luosieve()
        .args(["1", "1000", "--threads=4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Primes found: 168"));
}

#[test]
fn maxworkers_percentage_and_auto_are_accepted() {
    luosieve()
        .args(["1", "1000", "--maxworkers=50%"])
        .assert()
        .success();
    luosieve()
        .args(["1", "1000", "--maxworkers=auto"])
        .assert()
        .success();
}

// == Validation ===============================================================

#[test]
fn rejects_n_less_than_f() {
    luosieve().args(["100", "10"]).assert().code(predicate::function(|&c: &i32| c > 1));
}

#[test]
fn rejects_sum_above_limit() {
    luosieve()
        .args(["1", "29505444491", "--sum"])
        .assert()
        .code(predicate::function(|&c: &i32| c > 1));
}

#[test]
fn rejects_print_and_sum_together() {
    luosieve()
        .args(["1", "100", "-p", "-s"])
        .assert()
        .code(predicate::function(|&c: &i32| c > 1));
}

#[test]
fn rejects_garbage_bound() {
    luosieve().args(["not-a-number"]).assert().failure();
}
