//! Checker error taxonomy.
use thiserror::Error;

/// Failures that can terminate a `Check` call without producing a verdict.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The SAT oracle returned neither SAT nor UNSAT within its limit.
    ///
    /// The algorithm has no recovery policy for this: a solve that can't decide leaves the
    /// over-sequence in an unknown state, so the query is abandoned.
    #[error("SAT oracle returned an unknown result for a query that must be decided")]
    SolverUnknown,

    /// An internal invariant was violated, e.g. a query expected to be UNSAT (partial-state
    /// generalization) came back SAT.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// The externally visible result of checking one bad output.
#[derive(Debug)]
pub enum Outcome {
    /// No reachable state satisfies the bad output; carries the frame level at which an inductive
    /// invariant was found.
    Safe { invariant_level: usize },
    /// A reachable state satisfies the bad output; carries the witnessing input trace, one input
    /// cube per cycle in execution order, the final cycle being the one on which the bad output
    /// fires.
    Unsafe { trace: Vec<Vec<car_formula::Lit>> },
    /// The wall-clock budget configured in [`Settings::timelimit`](crate::Settings::timelimit)
    /// was exceeded before a verdict was reached.
    Timeout,
}
