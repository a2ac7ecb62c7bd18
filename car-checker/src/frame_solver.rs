//! The frame solver: the checker's main SAT context. It holds the transition relation plus one
//! guarded blocking clause per learned cube per frame level, and answers whether the state under
//! test still has a one-step predecessor the queried frame permits.
use car_formula::{canonicalize, Cube, Lit};

use crate::error::CheckerError;
use crate::model::Model;
use crate::oracle::SatContext;
use crate::settings::Settings;

/// Wraps one [`SatContext`] loaded with the model's transition relation, plus one activation
/// literal per frame level.
///
/// A query at level `k` asserts the state under test on the *primed* latch copies and the frame
/// flag `f_k`; the blocking clauses at `k` are over the current-state latches, so they constrain
/// the predecessor side of the transition. A satisfying assignment's current-state variables are
/// therefore a predecessor inside frame `k`, and an UNSAT conflict is a subset of the primed
/// assumption literals, which maps back through the model's primed-variable relation to a
/// sub-cube of the state under test.
pub struct FrameSolver<'m, M> {
    ctx: SatContext,
    model: &'m M,
    frame_flags: Vec<Lit>,
    muc: bool,
}

impl<'m, M: Model> FrameSolver<'m, M> {
    pub fn new(model: &'m M, settings: &Settings) -> FrameSolver<'m, M> {
        let mut ctx = SatContext::new(model.max_id());
        ctx.load_clauses(model.clauses());
        FrameSolver {
            ctx,
            model,
            frame_flags: Vec::new(),
            muc: settings.muc,
        }
    }

    fn frame_flag(&mut self, level: usize) -> Lit {
        while self.frame_flags.len() <= level {
            self.frame_flags.push(self.ctx.new_var());
        }
        self.frame_flags[level]
    }

    /// Installs a blocking clause for `cube` at `level`: while `f_level` is assumed, no
    /// predecessor candidate may contain `cube`.
    pub fn add_blocking_cube(&mut self, cube: &[Lit], level: usize) {
        let flag = self.frame_flag(level);
        let mut clause = Vec::with_capacity(cube.len() + 1);
        clause.push(-flag);
        clause.extend(cube.iter().map(|&lit| -lit));
        self.ctx.add_clause(&clause);
    }

    /// Installs every cube of a frame the sequence has just advanced onto, making `level`
    /// queryable.
    pub fn add_new_frame(&mut self, cubes: &[Cube], level: usize) {
        for cube in cubes {
            self.add_blocking_cube(cube, level);
        }
    }

    /// Tests whether the state described by `latches` has a one-step predecessor not blocked at
    /// `level`. The latch literals are asserted on their primed copies, in the given order, so a
    /// caller-chosen ordering (rotation) directly steers which conflict the oracle reports.
    pub fn solve(&mut self, latches: &[Lit], level: usize) -> Result<bool, CheckerError> {
        let flag = self.frame_flag(level);
        let mut assumption = Vec::with_capacity(latches.len() + 1);
        assumption.push(flag);
        assumption.extend(latches.iter().map(|&lit| self.model.prime(lit)));
        self.ctx.solve(&assumption)
    }

    /// Tests whether `latches`, taken as a current-state assignment with the inputs left free,
    /// can satisfy the bad output directly. The bad literal is asserted as an assumption, never
    /// as a clause, so the same context stays usable for every later query.
    pub fn solve_with_bad(&mut self, latches: &[Lit], bad: Lit) -> Result<bool, CheckerError> {
        let mut assumption = Vec::with_capacity(latches.len() + 1);
        assumption.push(bad);
        assumption.extend_from_slice(latches);
        self.ctx.solve(&assumption)
    }

    /// Reads the predecessor discovered by the most recent SAT result: its input assignment and
    /// its current-state latch assignment.
    pub fn assignment(&self) -> (Cube, Cube) {
        let num_inputs = self.model.num_inputs() as u32;
        let num_latches = self.model.num_latches() as u32;
        let inputs = self.ctx.assignment(1..=num_inputs);
        let latches = self
            .ctx
            .assignment(num_inputs + 1..=num_inputs + num_latches);
        (inputs, latches)
    }

    /// Extracts the (optionally MUC-reduced) conflict of the most recent UNSAT result and maps
    /// its primed literals back to current-state latch literals, preserving sign. Assumption
    /// literals with no preimage (the frame flag) drop out of the mapping.
    pub fn unsat_core(&mut self) -> Cube {
        let raw = self.ctx.failed_assumptions();
        let shrunk = if self.muc {
            self.ctx.minimal_unsat_core(&raw)
        } else {
            raw
        };
        let mut core: Cube = Vec::with_capacity(shrunk.len());
        for lit in shrunk {
            core.extend(self.model.previous(lit));
        }
        canonicalize(&mut core);
        core
    }
}
