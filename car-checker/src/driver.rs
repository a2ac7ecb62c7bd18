//! The main check loop: grows the under-sequence backwards from the bad states and the
//! over-sequence upwards from the initial state until one of them wins.
use std::time::Instant;

use log::info;

use car_formula::{cube_from, Cube, Lit};

use crate::error::{CheckerError, Outcome};
use crate::frame::OverSequence;
use crate::frame_solver::FrameSolver;
use crate::invariant_solver::InvariantSolver;
use crate::model::Model;
use crate::partial_solver::PartialSolver;
use crate::settings::Settings;
use crate::start_solver::StartSolver;
use crate::state::{reconstruct_trace, StateHandle, UnderSequence};
use crate::task::{Task, TaskStack};
use crate::visualization;

/// Checks whether `model` can ever drive `model.outputs()[bad_index]` true from its initial
/// state.
pub fn check<M: Model>(
    model: &M,
    bad_index: usize,
    settings: &Settings,
) -> Result<Outcome, CheckerError> {
    check_with_graph(model, bad_index, settings).map(|(outcome, _)| outcome)
}

/// Like [`check`], additionally returning a GML rendering of the under-sequence explored by the
/// query (partial on timeout) when [`Settings::visualization`] is set.
pub fn check_with_graph<M: Model>(
    model: &M,
    bad_index: usize,
    settings: &Settings,
) -> Result<(Outcome, Option<String>), CheckerError> {
    let bad = model.outputs()[bad_index];
    let initial_latches = cube_from(model.initial_state().iter().copied());

    let outcome;
    let under;
    if bad == model.true_id() {
        info!("output {} is the constant-true literal", bad_index);
        outcome = Outcome::Unsafe { trace: Vec::new() };
        under = UnderSequence::new(initial_latches);
    } else if bad == model.false_id() {
        info!("output {} is the constant-false literal", bad_index);
        outcome = Outcome::Safe { invariant_level: 0 };
        under = UnderSequence::new(initial_latches);
    } else {
        let mut search = Search::new(model, bad, bad_index, settings);
        outcome = search.run()?;
        under = search.under;
    }

    let graph = if settings.visualization {
        Some(visualization::to_gml(&under))
    } else {
        None
    };
    Ok((outcome, graph))
}

/// One query's worth of search state: the solver contexts, both sequences, the work stack, and
/// the per-iteration bookkeeping.
struct Search<'m, M: Model> {
    model: &'m M,
    settings: &'m Settings,
    bad: Lit,
    bad_index: usize,
    started: Instant,
    under: UnderSequence,
    over: OverSequence,
    frame_solver: FrameSolver<'m, M>,
    start_solver: StartSolver,
    partial_solver: Option<PartialSolver<'m, M>>,
    rotation: Rotation,
    roots: Vec<StateHandle>,
    stack: TaskStack,
    min_update_level: usize,
}

impl<'m, M: Model> Search<'m, M> {
    fn new(model: &'m M, bad: Lit, bad_index: usize, settings: &'m Settings) -> Search<'m, M> {
        let initial_latches = cube_from(model.initial_state().iter().copied());
        Search {
            model,
            settings,
            bad,
            bad_index,
            started: Instant::now(),
            under: UnderSequence::new(initial_latches),
            over: OverSequence::new(),
            frame_solver: FrameSolver::new(model, settings),
            start_solver: StartSolver::new(model, bad),
            partial_solver: if settings.partial {
                Some(PartialSolver::new(model, settings))
            } else {
                None
            },
            rotation: Rotation::new(settings.rotate),
            roots: Vec::new(),
            stack: TaskStack::new(),
            min_update_level: 0,
        }
    }

    fn run(&mut self) -> Result<Outcome, CheckerError> {
        let initial_latches = self.under.get(self.under.initial()).latches.clone();

        if self.frame_solver.solve_with_bad(&initial_latches, self.bad)? {
            info!("output {} already holds in the initial state", self.bad_index);
            let (inputs, _) = self.frame_solver.assignment();
            self.under.set_initial_inputs(inputs);
            return Ok(Outcome::Unsafe {
                trace: reconstruct_trace(&self.under),
            });
        }

        // Frame 0 permits exactly the initial state: one unit cube per negated initial literal.
        for &lit in &initial_latches {
            self.over.insert(cube_from(std::iter::once(-lit)), 0);
        }
        let seeds = self.over.frame(0).to_vec();
        self.frame_solver.add_new_frame(&seeds, 0);
        self.over.set_effective_level(0);
        self.start_solver.refresh_flag();

        loop {
            self.min_update_level = self.over.len();

            if self.settings.end {
                if let Some(outcome) = self.revisit_roots()? {
                    return Ok(outcome);
                }
            }

            while let Some((inputs, latches)) = self.start_solver.enumerate()? {
                let latches = match self.partial_solver.as_mut() {
                    Some(partial) => partial.shrink_to_bad(&inputs, &latches, self.bad)?,
                    None => latches,
                };
                let root = self.under.push_root(inputs, latches);
                self.roots.push(root);
                self.stack
                    .push(Task::new(root, self.over.effective_level() as i64));
                if let Some(outcome) = self.drain_stack()? {
                    return Ok(outcome);
                }
            }

            if !self.start_solver.is_constrained() {
                // The round was never constrained, so an empty enumeration means no state at all
                // satisfies the bad output.
                info!("output {} is satisfied by no state", self.bad_index);
                return Ok(Outcome::Safe { invariant_level: 0 });
            }

            if self.timed_out() {
                return Ok(Outcome::Timeout);
            }

            if self.settings.propagation {
                self.propagate()?;
            }
            self.advance();

            if let Some(level) = self.invariant_level()? {
                info!("frame {} is an inductive invariant", level);
                return Ok(Outcome::Safe {
                    invariant_level: level,
                });
            }
        }
    }

    /// Works the stack down to empty, or to a terminal verdict.
    fn drain_stack(&mut self) -> Result<Option<Outcome>, CheckerError> {
        while let Some(mut task) = self.stack.pop() {
            if self.timed_out() {
                return Ok(Some(Outcome::Timeout));
            }

            if !task.located {
                let latches = self.under.get(task.state).latches.clone();
                let start = (task.frame_level + 1) as usize;
                task.frame_level = self.over.get_new_level(&latches, start);
                if task.frame_level > self.over.effective_level() as i64 {
                    // Blocked beyond every loaded frame; the next iteration re-derives the
                    // obligation if it is still relevant.
                    continue;
                }
            }
            task.located = false;

            if task.frame_level == -1 {
                // Not blocked even by frame 0: the initial state satisfies this cube, so the
                // chain from here to its root is an execution into a bad state.
                let node = self.under.get(task.state).clone();
                self.under.relink_initial(node.pre_state, node.inputs);
                info!("found a counterexample for output {}", self.bad_index);
                return Ok(Some(Outcome::Unsafe {
                    trace: reconstruct_trace(&self.under),
                }));
            }

            let level = task.frame_level as usize;
            let latches = self.under.get(task.state).latches.clone();
            let assumption = self.rotation.order(&latches, level);

            if self.frame_solver.solve(&assumption, level)? {
                let (inputs, found) = self.frame_solver.assignment();
                let found = match self.partial_solver.as_mut() {
                    Some(partial) => partial.shrink_to_successor(&inputs, &found, &latches)?,
                    None => found,
                };
                let child_level = self.over.get_new_level(&found, 0);
                let child = self.under.push(task.state, inputs, found);
                self.stack.push(task);
                self.stack.push(Task::new(child, child_level));
            } else {
                self.rotation.record(&latches, level);
                let mut core = self.frame_solver.unsat_core();
                retain_state_literals(&mut core, &latches);
                if core.is_empty() {
                    core = latches.clone();
                }
                self.block(core, level + 1);
                task.frame_level += 1;
                self.stack.push(task);
            }
        }
        Ok(None)
    }

    /// Installs a learned cube at `level`, routing the clause to whichever solver currently
    /// answers queries against that frame: the frame solver for loaded levels, the start
    /// solver's rolling round for the level just beyond them.
    fn block(&mut self, cube: Cube, level: usize) {
        if level <= self.over.effective_level() {
            self.frame_solver.add_blocking_cube(&cube, level);
        } else {
            self.start_solver.add_blocking_cube(&cube);
        }
        self.over.insert(cube, level);
        self.min_update_level = self.min_update_level.min(level);
    }

    /// Re-seeds obligations from previously enumerated start states, newest first, before asking
    /// the start solver for fresh witnesses.
    fn revisit_roots(&mut self) -> Result<Option<Outcome>, CheckerError> {
        for root in self.roots.clone().into_iter().rev() {
            let latches = self.under.get(root).latches.clone();
            if self
                .over
                .is_blocked_by_frame(&latches, self.over.effective_level() + 1)
            {
                continue;
            }
            self.stack
                .push(Task::new(root, self.over.effective_level() as i64));
            if let Some(outcome) = self.drain_stack()? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Retests every cube below the effective level with the frame solver; a cube whose states
    /// have no predecessor in their own frame also blocks one level up, so a copy is installed
    /// there. The cube itself stays where it was.
    fn propagate(&mut self) -> Result<(), CheckerError> {
        for level in 0..self.over.effective_level() {
            for cube in self.over.frame(level).to_vec() {
                if !self.frame_solver.solve(&cube, level)? {
                    self.block(cube, level + 1);
                }
            }
        }
        Ok(())
    }

    /// Loads the next frame into the frame solver and opens a fresh start-solver round.
    fn advance(&mut self) {
        let next = self.over.effective_level() + 1;
        let cubes = self.over.frame(next).to_vec();
        self.frame_solver.add_new_frame(&cubes, next);
        self.over.set_effective_level(next);
        self.start_solver.refresh_flag();
    }

    /// Sweeps every frame with a fresh invariant solver, accumulating each swept frame's
    /// blocked-set constraint before moving on. Frames below `min_update_level` did not change
    /// this iteration and are only accumulated. Returns the first level whose permitted states
    /// are all covered by earlier frames.
    fn invariant_level(&mut self) -> Result<Option<usize>, CheckerError> {
        let mut solver = InvariantSolver::new(self.model);
        for level in 0..self.over.len() {
            let frame = self.over.frame(level);
            if level < self.min_update_level {
                solver.add_constraint_or(frame);
                continue;
            }
            solver.add_constraint_and(frame);
            let inductive = !solver.solve()?;
            solver.flip_last_constraint();
            if inductive {
                return Ok(Some(level));
            }
            solver.add_constraint_or(frame);
        }
        Ok(None)
    }

    fn timed_out(&self) -> bool {
        match self.settings.timelimit {
            Some(limit) => self.started.elapsed() > limit,
            None => false,
        }
    }
}

/// Drops core literals that do not occur in the state the core was derived from. The mapped
/// conflict can mention a latch the state's cube leaves unconstrained (a partial cube, or an
/// assignment the oracle never fixed); such a literal must not strengthen the blocking cube.
fn retain_state_literals(core: &mut Cube, state_latches: &[Lit]) {
    core.retain(|lit| state_latches.binary_search(lit).is_ok());
}

/// Assumption-ordering heuristic: remembers, per frame level, the latch cube of the last state
/// that conflicted there, and fronts the literals a new query shares with it. Related queries
/// then tend to fail on the same assumption prefix, which keeps the reported cores small and
/// similar.
struct Rotation {
    enabled: bool,
    hints: Vec<Option<Cube>>,
}

impl Rotation {
    fn new(enabled: bool) -> Rotation {
        Rotation {
            enabled,
            hints: Vec::new(),
        }
    }

    fn order(&self, latches: &[Lit], level: usize) -> Vec<Lit> {
        let hint = match self.hints.get(level) {
            Some(Some(hint)) if self.enabled => hint,
            _ => return latches.to_vec(),
        };
        let (mut fronted, mut rest): (Vec<Lit>, Vec<Lit>) = latches
            .iter()
            .copied()
            .partition(|lit| hint.binary_search(lit).is_ok());
        fronted.append(&mut rest);
        fronted
    }

    fn record(&mut self, latches: &[Lit], level: usize) {
        if !self.enabled {
            return;
        }
        while self.hints.len() <= level {
            self.hints.push(None);
        }
        self.hints[level] = Some(latches.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_formula::cube_from;

    fn cube(codes: &[i32]) -> Cube {
        cube_from(codes.iter().map(|&c| Lit::from_dimacs(c)))
    }

    #[test]
    fn core_filter_keeps_only_literals_of_the_state() {
        let mut core = cube(&[1, -2, 4]);
        retain_state_literals(&mut core, &cube(&[1, -2, 3]));
        assert_eq!(core, cube(&[1, -2]));
    }

    #[test]
    fn rotation_fronts_shared_literals() {
        let mut rotation = Rotation::new(true);
        rotation.record(&cube(&[-2, 3]), 1);
        let ordered = rotation.order(&cube(&[1, -2, 3]), 1);
        assert_eq!(
            ordered,
            vec![
                Lit::from_dimacs(-2),
                Lit::from_dimacs(3),
                Lit::from_dimacs(1),
            ]
        );
    }

    #[test]
    fn rotation_is_inert_when_disabled() {
        let mut rotation = Rotation::new(false);
        rotation.record(&cube(&[-2]), 0);
        assert_eq!(rotation.order(&cube(&[1, -2]), 0), cube(&[1, -2]));
    }
}
