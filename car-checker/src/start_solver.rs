//! The start solver: enumerates the states the search grows its proof-obligation tree from,
//! i.e. states that satisfy the bad output and are not yet blocked beyond the loaded frames.
//! Kept as its own context (rather than folded into the frame solver) so these queries'
//! assumptions never interact with frame flags or predecessor-blocking clauses.
use car_formula::{Cube, Lit};

use crate::error::CheckerError;
use crate::model::Model;
use crate::oracle::SatContext;

pub struct StartSolver {
    ctx: SatContext,
    flag: Lit,
    bad: Lit,
    num_inputs: usize,
    num_latches: usize,
    constrained: bool,
}

impl StartSolver {
    pub fn new(model: &impl Model, bad: Lit) -> StartSolver {
        let mut ctx = SatContext::new(model.max_id());
        ctx.load_clauses(model.clauses());
        let flag = ctx.new_var();
        StartSolver {
            ctx,
            flag,
            bad,
            num_inputs: model.num_inputs(),
            num_latches: model.num_latches(),
            constrained: false,
        }
    }

    /// Starts a new enumeration round: allocates a fresh rolling flag, letting every blocking
    /// clause installed under the previous flag decay. Called whenever the frame sequence
    /// advances, since the cubes those clauses carried are loaded into the frame solver at that
    /// point.
    pub fn refresh_flag(&mut self) {
        self.flag = self.ctx.new_var();
        self.constrained = false;
    }

    /// Excludes every state containing `cube` from the current enumeration round.
    pub fn add_blocking_cube(&mut self, cube: &[Lit]) {
        let mut clause = Vec::with_capacity(cube.len() + 1);
        clause.push(-self.flag);
        clause.extend(cube.iter().map(|&lit| -lit));
        self.ctx.add_clause(&clause);
        self.constrained = true;
    }

    /// Whether any blocking cube has been installed since the last
    /// [`refresh_flag`](StartSolver::refresh_flag). When enumeration comes up empty on an
    /// unconstrained round, no state at all satisfies the bad output.
    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    /// Finds one more state satisfying the bad output that the current round's blocking clauses
    /// permit, returning its input and latch assignments, or `None` once the round is exhausted.
    /// The inputs are the combinational witness making the bad output hold at that state.
    pub fn enumerate(&mut self) -> Result<Option<(Cube, Cube)>, CheckerError> {
        if !self.ctx.solve(&[self.flag, self.bad])? {
            return Ok(None);
        }
        let inputs = self.ctx.assignment(1..=self.num_inputs as u32);
        let latches = self.ctx.assignment(
            self.num_inputs as u32 + 1..=(self.num_inputs + self.num_latches) as u32,
        );
        Ok(Some((inputs, latches)))
    }
}
