//! The partial-state solver: shrinks a concrete assignment to a sub-cube that still forces the
//! same outcome (a specific successor, or the bad output), so the under-sequence stores the most
//! general witness the oracle can justify.
use car_formula::{canonicalize, cube_from, Cube, Lit};

use crate::error::CheckerError;
use crate::model::Model;
use crate::oracle::SatContext;
use crate::settings::Settings;

/// Wraps a [`SatContext`] loaded with the transition relation. Each successor-directed query
/// installs a one-shot guarded clause; the guard is retired with a unit clause immediately after
/// use, so constraints from earlier queries never leak into later ones.
pub struct PartialSolver<'m, M> {
    ctx: SatContext,
    model: &'m M,
    muc: bool,
}

impl<'m, M: Model> PartialSolver<'m, M> {
    pub fn new(model: &'m M, settings: &Settings) -> PartialSolver<'m, M> {
        let mut ctx = SatContext::new(model.max_id());
        ctx.load_clauses(model.clauses());
        PartialSolver {
            ctx,
            model,
            muc: settings.muc,
        }
    }

    /// The latch-variable literals of the most recent conflict, optionally MUC-shrunk first.
    fn latch_core(&mut self) -> Cube {
        let raw = self.ctx.failed_assumptions();
        let shrunk = if self.muc {
            self.ctx.minimal_unsat_core(&raw)
        } else {
            raw
        };
        let mut core: Cube = shrunk
            .into_iter()
            .filter(|lit| self.model.is_latch(lit.var()))
            .collect();
        canonicalize(&mut core);
        core
    }

    /// Shrinks `latches` to a sub-cube that, together with `inputs`, still forces the transition
    /// to land exactly on `successor`.
    ///
    /// A fresh guard literal activates a clause demanding the successor differ from `successor`
    /// in at least one primed latch; since the assignment is known to transit to `successor`, the
    /// query must be UNSAT, and its conflict restricted to the latch literals is the generalized
    /// cube. A SAT result means the assignment did not actually force that successor, which
    /// breaks the search's core invariant and is surfaced as fatal.
    pub fn shrink_to_successor(
        &mut self,
        inputs: &[Lit],
        latches: &[Lit],
        successor: &[Lit],
    ) -> Result<Cube, CheckerError> {
        let guard = self.ctx.new_var();
        let mut clause = Vec::with_capacity(successor.len() + 1);
        clause.push(-guard);
        clause.extend(successor.iter().map(|&lit| -self.model.prime(lit)));
        self.ctx.add_clause(&clause);

        let mut assumption = Vec::with_capacity(inputs.len() + latches.len() + 1);
        assumption.push(guard);
        assumption.extend_from_slice(inputs);
        assumption.extend_from_slice(latches);

        if self.ctx.solve(&assumption)? {
            return Err(CheckerError::Internal(
                "a discovered predecessor does not force its recorded successor".to_string(),
            ));
        }
        let core = self.latch_core();
        self.ctx.add_clause(&[-guard]);

        if core.is_empty() {
            Ok(cube_from(latches.iter().copied()))
        } else {
            Ok(core)
        }
    }

    /// Shrinks `latches` to a sub-cube that, together with `inputs`, still forces the bad output
    /// to hold. The negated bad literal stands in for the successor clause, asserted as an
    /// assumption, and is stripped from the returned core in case the bad output is itself a
    /// latch.
    pub fn shrink_to_bad(
        &mut self,
        inputs: &[Lit],
        latches: &[Lit],
        bad: Lit,
    ) -> Result<Cube, CheckerError> {
        let mut assumption = Vec::with_capacity(inputs.len() + latches.len() + 1);
        assumption.extend_from_slice(inputs);
        assumption.extend_from_slice(latches);
        assumption.push(-bad);

        if self.ctx.solve(&assumption)? {
            return Err(CheckerError::Internal(
                "a start state does not satisfy the bad output it was enumerated for".to_string(),
            ));
        }
        let mut core = self.latch_core();
        core.retain(|lit| lit.var() != bad.var());

        if core.is_empty() {
            Ok(cube_from(latches.iter().copied()))
        } else {
            Ok(core)
        }
    }
}
