//! End-to-end checks driving the checker through real AIGER text, covering the pieces the
//! closure-built models in `car-checker`'s own tests cannot: primary inputs in the witness, and
//! gate logic in the bad output.
use std::io::Write as _;

use car_aig::{load_file, load_str};
use car_checker::{check, Model, Outcome, Settings};
use car_formula::Lit;

/// One input feeding one latch, reset low; bad is the latch. Raising the input for a single
/// cycle sets the latch, so the circuit is unsafe with a two-cycle witness whose first cycle
/// must assert the input.
const INPUT_SETS_LATCH: &str = "aag 2 1 1 1 0\n2\n4 2\n4\n";

/// The same shape, but the latch's next-state function is the constant-false literal, so the bad
/// output can never be reached.
const LATCH_FORCED_LOW: &str = "aag 2 1 1 1 0\n2\n4 0\n4\n";

/// A latch holding its own value plus an and-gate of the latch with its negation; the gate is
/// the bad output. No state satisfies it, but the literal is a real gate wire, not the syntactic
/// constant, so the verdict must come out of the solvers.
const CONTRADICTORY_GATE: &str = "aag 3 0 1 1 1\n2 2\n6\n6 2 3\n";

#[test]
fn input_driven_latch_is_unsafe_with_a_two_cycle_witness() {
    let model = load_str(INPUT_SETS_LATCH).unwrap();
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    match outcome {
        Outcome::Unsafe { trace } => {
            assert_eq!(trace.len(), 2);
            // The first cycle must raise the input to load the latch.
            assert_eq!(trace[0], vec![Lit::from_dimacs(1)]);
        }
        other => panic!("expected Unsafe, got {:?}", other),
    }
}

#[test]
fn forced_low_latch_is_safe() {
    let model = load_str(LATCH_FORCED_LOW).unwrap();
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Safe { .. }));
}

#[test]
fn contradictory_gate_output_is_safe_without_an_invariant_search() {
    let model = load_str(CONTRADICTORY_GATE).unwrap();
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Safe { invariant_level: 0 }));
}

#[test]
fn verdicts_agree_across_generalization_settings() {
    let model = load_str(INPUT_SETS_LATCH).unwrap();
    for settings in [
        Settings {
            partial: true,
            ..Settings::default()
        },
        Settings {
            muc: true,
            rotate: true,
            ..Settings::default()
        },
    ] {
        let outcome = check(&model, 0, &settings).unwrap();
        assert!(matches!(outcome, Outcome::Unsafe { .. }));
    }
}

#[test]
fn load_file_round_trips_through_the_filesystem() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INPUT_SETS_LATCH.as_bytes()).unwrap();
    let model = load_file(file.path()).unwrap();
    assert_eq!(model.num_inputs(), 1);
    assert_eq!(model.num_latches(), 1);
    assert_eq!(model.outputs().len(), 1);
}
