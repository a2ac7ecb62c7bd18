//! End-to-end scenarios driving [`check`] against small hand-built models, rather than through a
//! real AIGER file (that round trip is covered in `car-aig`).
use std::time::Duration;

use rustc_hash::FxHashMap;

use car_checker::{check, Model, Outcome, Settings};
use car_formula::{Lit, Var};

/// A minimal, no-input transition system: every latch's next-state value is an arbitrary
/// function of the *current* latch literals, supplied by the caller as a closure.
struct ToyModel {
    num_latches: usize,
    max_id: u32,
    initial_state: Vec<Lit>,
    outputs: Vec<Lit>,
    true_id: Lit,
    prime_of: FxHashMap<u32, u32>,
    previous_of: FxHashMap<u32, u32>,
    clauses: Vec<Vec<Lit>>,
}

impl ToyModel {
    /// `initial[i]` is latch `i`'s reset value; `next` maps `(true_id, false_id, current latch
    /// literals)` to one next-state literal per latch; `outputs` maps the same inputs to the
    /// model's output literals.
    fn build(
        initial: &[bool],
        next: impl Fn(Lit, Lit, &[Lit]) -> Vec<Lit>,
        outputs: impl Fn(Lit, Lit, &[Lit]) -> Vec<Lit>,
    ) -> ToyModel {
        let num_latches = initial.len();
        let header_max = num_latches as u32;
        let const_var = header_max + 1;
        let true_id = Lit::from_var(Var::new(const_var), true);
        let false_id = -true_id;
        let latches: Vec<Lit> = (1..=num_latches as u32)
            .map(|v| Lit::from_var(Var::new(v), true))
            .collect();

        let mut prime_of = FxHashMap::default();
        let mut previous_of = FxHashMap::default();
        let mut next_var = const_var + 1;
        for &lit in &latches {
            let var = lit.var().index();
            prime_of.insert(var, next_var);
            previous_of.insert(next_var, var);
            next_var += 1;
        }
        let max_id = next_var - 1;

        let mut clauses = vec![vec![true_id]];
        let next_lits = next(true_id, false_id, &latches);
        assert_eq!(next_lits.len(), num_latches);

        let mut initial_state = Vec::with_capacity(num_latches);
        for (i, &lit) in latches.iter().enumerate() {
            initial_state.push(lit.with_polarity(initial[i]));
            let primed_var = prime_of[&lit.var().index()];
            let primed = Lit::from_var(Var::new(primed_var), true);
            let n = next_lits[i];
            clauses.push(vec![-primed, n]);
            clauses.push(vec![primed, -n]);
        }

        let outputs = outputs(true_id, false_id, &latches);

        ToyModel {
            num_latches,
            max_id,
            initial_state,
            outputs,
            true_id,
            prime_of,
            previous_of,
            clauses,
        }
    }
}

impl Model for ToyModel {
    fn num_inputs(&self) -> usize {
        0
    }

    fn num_latches(&self) -> usize {
        self.num_latches
    }

    fn max_id(&self) -> u32 {
        self.max_id
    }

    fn initial_state(&self) -> &[Lit] {
        &self.initial_state
    }

    fn outputs(&self) -> &[Lit] {
        &self.outputs
    }

    fn true_id(&self) -> Lit {
        self.true_id
    }

    fn false_id(&self) -> Lit {
        -self.true_id
    }

    fn prime(&self, lit: Lit) -> Lit {
        let var = *self
            .prime_of
            .get(&lit.var().index())
            .expect("prime() called on a non-latch literal");
        Lit::from_var(Var::new(var), lit.is_positive())
    }

    fn previous(&self, lit: Lit) -> Vec<Lit> {
        match self.previous_of.get(&lit.var().index()) {
            Some(&var) => vec![Lit::from_var(Var::new(var), lit.is_positive())],
            None => Vec::new(),
        }
    }

    fn is_latch(&self, var: Var) -> bool {
        let index = var.index();
        index >= 1 && index <= self.num_latches as u32
    }

    fn is_input(&self, _var: Var) -> bool {
        false
    }

    fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn trivial_true_bad_is_immediately_unsafe() {
    init_logging();
    let model = ToyModel::build(&[], |_, _, _| vec![], |true_id, _, _| vec![true_id]);
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    match outcome {
        Outcome::Unsafe { trace } => assert!(trace.is_empty()),
        other => panic!("expected Unsafe, got {:?}", other),
    }
}

#[test]
fn trivial_false_bad_is_immediately_safe() {
    init_logging();
    let model = ToyModel::build(&[], |_, _, _| vec![], |_, false_id, _| vec![false_id]);
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Safe { invariant_level: 0 }));
}

/// Two latches start low; the first is forced high on the very first step regardless of anything
/// else, and the bad output is exactly that latch.
#[test]
fn one_step_reachable_bad_is_unsafe() {
    init_logging();
    let model = ToyModel::build(
        &[false, false],
        |true_id, _, latches| vec![true_id, latches[1]],
        |_, _, latches| vec![latches[0]],
    );
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    match outcome {
        // One cycle to reach the bad latch value, plus the cycle on which the output is read at
        // the state where it first holds.
        Outcome::Unsafe { trace } => assert_eq!(trace.len(), 2),
        other => panic!("expected Unsafe, got {:?}", other),
    }
}

/// A single latch held low forever; its own value is the bad output, so it can never fire.
#[test]
fn unreachable_bad_is_safe_with_an_invariant_at_frame_one() {
    init_logging();
    let model = ToyModel::build(
        &[false],
        |_, _, latches| vec![latches[0]],
        |_, _, latches| vec![latches[0]],
    );
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Safe { invariant_level: 1 }));
}

/// A 3-bit shift register seeded with a single high bit that walks one position per cycle; bad is
/// the bit reaching the far end, two cycles after the start.
fn shift_register() -> ToyModel {
    ToyModel::build(
        &[true, false, false],
        |_, false_id, latches| vec![false_id, latches[0], latches[1]],
        |_, _, latches| vec![latches[2]],
    )
}

#[test]
fn deep_but_bounded_counterexample_has_expected_trace_length() {
    init_logging();
    let model = shift_register();
    let outcome = check(&model, 0, &Settings::default()).unwrap();
    match outcome {
        // Two transitions to walk the bit into place, plus the cycle that reads it.
        Outcome::Unsafe { trace } => assert_eq!(trace.len(), 3),
        other => panic!("expected Unsafe, got {:?}", other),
    }
}

#[test]
fn partial_mode_does_not_change_the_verdict() {
    init_logging();
    let model = shift_register();

    let without_partial = check(&model, 0, &Settings::default()).unwrap();
    let with_partial = check(
        &model,
        0,
        &Settings {
            partial: true,
            ..Settings::default()
        },
    )
    .unwrap();

    assert!(matches!(without_partial, Outcome::Unsafe { .. }));
    assert!(matches!(with_partial, Outcome::Unsafe { .. }));
}

#[test]
fn rotation_and_end_heuristics_do_not_change_the_verdict() {
    init_logging();
    let model = shift_register();
    let settings = Settings {
        rotate: true,
        end: true,
        ..Settings::default()
    };
    let outcome = check(&model, 0, &settings).unwrap();
    match outcome {
        Outcome::Unsafe { trace } => assert_eq!(trace.len(), 3),
        other => panic!("expected Unsafe, got {:?}", other),
    }
}

#[test]
fn muc_and_propagation_settings_still_find_the_invariant() {
    init_logging();
    let model = ToyModel::build(
        &[false],
        |_, _, latches| vec![latches[0]],
        |_, _, latches| vec![latches[0]],
    );
    let settings = Settings {
        muc: true,
        propagation: true,
        ..Settings::default()
    };
    let outcome = check(&model, 0, &settings).unwrap();
    assert!(matches!(outcome, Outcome::Safe { .. }));
}

#[test]
fn exhausted_time_budget_reports_a_timeout() {
    init_logging();
    let model = shift_register();
    let settings = Settings {
        timelimit: Some(Duration::from_secs(0)),
        ..Settings::default()
    };
    let outcome = check(&model, 0, &settings).unwrap();
    assert!(matches!(outcome, Outcome::Timeout));
}
