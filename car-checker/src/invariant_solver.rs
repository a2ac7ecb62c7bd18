//! The invariant solver: an ephemeral context for the fixed-point sweep over the frame sequence.
//!
//! The sweep asks, per frame, whether some state the frame permits escapes every earlier frame.
//! No transition step is involved: the query is pure set inclusion between the frames'
//! state sets, expressed over the current-state variables.
use car_formula::{Cube, Lit};

use crate::error::CheckerError;
use crate::model::Model;
use crate::oracle::SatContext;

pub struct InvariantSolver {
    ctx: SatContext,
    assumptions: Vec<Lit>,
}

impl InvariantSolver {
    pub fn new(model: &impl Model) -> InvariantSolver {
        let mut ctx = SatContext::new(model.max_id());
        ctx.load_clauses(model.clauses());
        InvariantSolver {
            ctx,
            assumptions: Vec::new(),
        }
    }

    /// Permanently constrains the state to be blocked by some cube of `frame`, i.e. to lie
    /// outside the frame's permitted set: one selector per cube, each selector forcing its
    /// cube's literals, the selectors disjoined. Called for every frame already swept, so the
    /// accumulated constraints say "outside every earlier frame".
    ///
    /// An empty frame permits every state; no clause can express "outside everything", so the
    /// accumulation skips it, which only weakens the query.
    pub fn add_constraint_or(&mut self, frame: &[Cube]) {
        if frame.is_empty() {
            return;
        }
        let mut selectors = Vec::with_capacity(frame.len());
        for cube in frame {
            let selector = self.ctx.new_var();
            for &lit in cube.iter() {
                self.ctx.add_clause(&[-selector, lit]);
            }
            selectors.push(selector);
        }
        self.ctx.add_clause(&selectors);
    }

    /// Constrains the state to be permitted by `frame` (blocked by none of its cubes), gated by
    /// a fresh flag that is recorded as an assumption so
    /// [`flip_last_constraint`](InvariantSolver::flip_last_constraint) can disable the whole
    /// constraint after its one query.
    pub fn add_constraint_and(&mut self, frame: &[Cube]) {
        let flag = self.ctx.new_var();
        for cube in frame {
            let mut clause: Vec<Lit> = cube.iter().map(|&lit| -lit).collect();
            clause.push(-flag);
            self.ctx.add_clause(&clause);
        }
        self.assumptions.push(flag);
    }

    /// Disables the most recent [`add_constraint_and`](InvariantSolver::add_constraint_and) by
    /// negating its recorded flag, reclaiming the context for the next frame without retracting
    /// any clause.
    pub fn flip_last_constraint(&mut self) {
        if let Some(last) = self.assumptions.last_mut() {
            *last = -*last;
        }
    }

    /// Solves under the accumulated flags. UNSAT means no state permitted by the frame under
    /// test escapes every earlier frame: the sequence has closed into a fixed point.
    pub fn solve(&mut self) -> Result<bool, CheckerError> {
        let assumptions = self.assumptions.clone();
        self.ctx.solve(&assumptions)
    }
}
