//! A thin façade over the incremental SAT oracle, shared by the checker's four solver contexts.
use car_formula::Lit as CarLit;

use crate::error::CheckerError;

fn to_varisat(lit: CarLit) -> varisat::Lit {
    varisat::Lit::from_dimacs(lit.code() as isize)
}

fn from_varisat(lit: varisat::Lit) -> CarLit {
    CarLit::from_dimacs(lit.to_dimacs() as i32)
}

/// One incremental SAT context: a `varisat` solver plus a monotonically increasing variable
/// counter for activation literals the checker allocates on top of the model's own variables.
///
/// Each of the checker's four solver roles (frame, partial-state, start-state, invariant) owns
/// one of these exclusively; none is ever shared or cloned.
pub struct SatContext {
    solver: varisat::Solver<'static>,
    next_var: u32,
}

impl SatContext {
    /// Creates a context whose first freely-allocatable variable is `max_id + 1`.
    pub fn new(max_id: u32) -> SatContext {
        SatContext {
            solver: varisat::Solver::new(),
            next_var: max_id + 1,
        }
    }

    /// Allocates a fresh activation variable, returning its positive literal.
    pub fn new_var(&mut self) -> CarLit {
        let var = self.next_var;
        self.next_var += 1;
        CarLit::from_dimacs(var as i32)
    }

    /// Loads the model's transition clauses (or any other fixed clause set) into the solver.
    pub fn load_clauses(&mut self, clauses: &[Vec<CarLit>]) {
        use varisat::ExtendFormula;
        for clause in clauses {
            let lits: Vec<varisat::Lit> = clause.iter().copied().map(to_varisat).collect();
            self.solver.add_clause(&lits);
        }
    }

    /// Adds a single clause.
    pub fn add_clause(&mut self, literals: &[CarLit]) {
        use varisat::ExtendFormula;
        let lits: Vec<varisat::Lit> = literals.iter().copied().map(to_varisat).collect();
        self.solver.add_clause(&lits);
    }

    /// Solves under the given assumptions.
    pub fn solve(&mut self, assumptions: &[CarLit]) -> Result<bool, CheckerError> {
        let lits: Vec<varisat::Lit> = assumptions.iter().copied().map(to_varisat).collect();
        self.solver.assume(&lits);
        self.solver.solve().map_err(|_| CheckerError::SolverUnknown)
    }

    /// The satisfying assignment of the most recent SAT result, restricted to the given
    /// variables, returned as signed literals in the polarity the model holds.
    ///
    /// A variable the solver never saw (it occurs in no clause and no assumption) has no entry in
    /// the model and is simply skipped, which leaves the returned cube partial.
    pub fn assignment(&self, vars: impl Iterator<Item = u32>) -> Vec<CarLit> {
        let model = self.solver.model().unwrap_or_default();
        let mut by_var = rustc_hash::FxHashMap::default();
        for lit in model {
            by_var.insert(lit.var().to_dimacs() as u32, lit.is_positive());
        }
        vars.filter_map(|var| {
            by_var
                .get(&var)
                .map(|&positive| CarLit::from_dimacs(if positive { var as i32 } else { -(var as i32) }))
        })
        .collect()
    }

    /// The subset of assumption literals responsible for the most recent UNSAT result, in the
    /// polarity they were assumed with.
    pub fn failed_assumptions(&self) -> Vec<CarLit> {
        self.solver
            .failed_core()
            .unwrap_or_default()
            .iter()
            .copied()
            .map(from_varisat)
            .collect()
    }

    /// Shrinks an unsatisfiable assumption set (as returned by
    /// [`failed_assumptions`](SatContext::failed_assumptions)) towards a minimal one, dropping
    /// one literal at a time and re-solving, bounded to at most
    /// [`MUC_ITERATION_CAP`](crate::settings::MUC_ITERATION_CAP) attempts.
    ///
    /// A literal whose removal makes the query satisfiable is essential and is kept; a removal
    /// that stays UNSAT replaces the working set with the fresh (possibly much smaller)
    /// conflict. The result is the kept literals plus whatever the iteration bound left
    /// unexamined, so it is always still unsatisfiable, if not guaranteed minimal.
    pub fn minimal_unsat_core(&mut self, core: &[CarLit]) -> Vec<CarLit> {
        let cap = core.len().min(crate::settings::MUC_ITERATION_CAP);
        let mut working: Vec<CarLit> = core.to_vec();
        let mut kept: Vec<CarLit> = Vec::new();

        for _ in 0..cap {
            if working.is_empty() {
                break;
            }
            let candidate = working.remove(0);
            let mut assumption = working.clone();
            assumption.extend_from_slice(&kept);

            match self.solve(&assumption) {
                Ok(true) => kept.push(candidate),
                Ok(false) => {
                    working = self
                        .failed_assumptions()
                        .into_iter()
                        .filter(|lit| !kept.contains(lit))
                        .collect();
                }
                Err(_) => {
                    kept.push(candidate);
                    break;
                }
            }
        }

        kept.extend(working);
        kept
    }
}
