//! The under-sequence: the tree of concrete states discovered by SAT witnesses.
//!
//! The tree is rooted at the start states (states satisfying the bad output) and grows towards
//! the initial state: every non-root node is a one-step predecessor, in transition order, of the
//! node it was expanded from. A node's `pre_state` handle therefore points at its temporal
//! *successor*, and its `inputs` are the inputs consumed on the step from itself to that
//! successor. Once a node indistinguishable from the initial state appears, the canonical
//! initial node is spliced onto its chain and the whole path reads off, front to back, as an
//! execution from the initial state into a bad state.
use car_formula::Cube;

/// A handle into an [`UnderSequence`]'s arena.
///
/// States are produced strictly in expansion order and never removed, so a small integer handle
/// is enough; there is no need for reference-counted graph nodes, and the tree is trivially
/// serializable for visualization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StateHandle(usize);

impl StateHandle {
    /// The raw arena index, for display or serialization (e.g. GML node ids).
    pub fn raw(self) -> usize {
        self.0
    }
}

/// A node in the under-sequence.
#[derive(Clone, Debug)]
pub struct StateNode {
    /// The input assignment for this state's outgoing step towards `pre_state`. For a root
    /// (start) state, these are instead the inputs witnessing that the bad output holds there.
    pub inputs: Cube,
    /// The latch assignment: a full assignment unless partial-state generalization is enabled,
    /// in which case it may be a strict sub-cube sufficient to force the recorded outcome.
    pub latches: Cube,
    /// The state this one was expanded from (its temporal successor), or `None` for a root.
    pub pre_state: Option<StateHandle>,
    /// Expansion distance from the root start state this node's chain grew out of.
    pub depth: u32,
}

/// The arena of every state discovered during one query.
pub struct UnderSequence {
    nodes: Vec<StateNode>,
}

impl UnderSequence {
    /// Creates a fresh under-sequence containing only the initial state.
    pub fn new(initial_latches: Cube) -> UnderSequence {
        UnderSequence {
            nodes: vec![StateNode {
                inputs: Vec::new(),
                latches: initial_latches,
                pre_state: None,
                depth: 0,
            }],
        }
    }

    /// The handle of the initial state.
    pub fn initial(&self) -> StateHandle {
        StateHandle(0)
    }

    /// Appends a predecessor of `pre_state` reached backwards through the given step.
    pub fn push(&mut self, pre_state: StateHandle, inputs: Cube, latches: Cube) -> StateHandle {
        let depth = self.nodes[pre_state.0].depth + 1;
        self.nodes.push(StateNode {
            inputs,
            latches,
            pre_state: Some(pre_state),
            depth,
        });
        StateHandle(self.nodes.len() - 1)
    }

    /// Appends a new root: a start state enumerated directly from the bad output, with the
    /// inputs witnessing the violation there.
    pub fn push_root(&mut self, inputs: Cube, latches: Cube) -> StateHandle {
        self.nodes.push(StateNode {
            inputs,
            latches,
            pre_state: None,
            depth: 0,
        });
        StateHandle(self.nodes.len() - 1)
    }

    /// Looks up a state by handle.
    pub fn get(&self, handle: StateHandle) -> &StateNode {
        &self.nodes[handle.0]
    }

    /// Overwrites the initial state's recorded inputs.
    ///
    /// Used when the immediate check finds the bad output satisfied at depth zero: the initial
    /// state itself becomes the counterexample, and these inputs are its witness.
    pub fn set_initial_inputs(&mut self, inputs: Cube) {
        self.nodes[0].inputs = inputs;
    }

    /// Splices the canonical initial node in place of a discovered node whose latch cube the
    /// initial state satisfies: the initial node adopts that node's successor link and step
    /// inputs, closing the chain into a replayable execution.
    pub fn relink_initial(&mut self, pre_state: Option<StateHandle>, inputs: Cube) {
        self.nodes[0].pre_state = pre_state;
        self.nodes[0].inputs = inputs;
    }

    /// Total number of states discovered, including the initial state.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over every discovered state, for visualization.
    pub fn iter(&self) -> impl Iterator<Item = (StateHandle, &StateNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (StateHandle(i), node))
    }
}

/// Reads the counterexample off a spliced under-sequence: starting at the initial node, emits
/// each node's step inputs and follows the successor links until the root start state, whose
/// inputs (the witness for the bad output itself) form the final entry. The result is already in
/// execution order, one input cube per cycle.
pub fn reconstruct_trace(sequence: &UnderSequence) -> Vec<Cube> {
    let mut steps = Vec::new();
    let mut current = sequence.initial();
    loop {
        let node = sequence.get(current);
        steps.push(node.inputs.clone());
        match node.pre_state {
            Some(next) => current = next,
            None => break,
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_formula::{cube_from, Lit};

    fn cube(codes: &[i32]) -> Cube {
        cube_from(codes.iter().map(|&c| Lit::from_dimacs(c)))
    }

    #[test]
    fn trace_runs_from_the_initial_state_into_the_root() {
        let mut seq = UnderSequence::new(cube(&[-2]));
        let root = seq.push_root(cube(&[1]), cube(&[2]));
        let mid = seq.push(root, cube(&[-1]), cube(&[2, -3]));
        // A further predecessor of `mid` turned out to coincide with the initial state, so the
        // initial node is spliced onto the chain with that step's inputs.
        seq.relink_initial(Some(mid), cube(&[1]));
        assert_eq!(
            reconstruct_trace(&seq),
            vec![cube(&[1]), cube(&[-1]), cube(&[1])]
        );
    }

    #[test]
    fn immediate_violation_is_a_single_cycle_trace() {
        let mut seq = UnderSequence::new(cube(&[-2]));
        seq.set_initial_inputs(cube(&[-1]));
        assert_eq!(reconstruct_trace(&seq), vec![cube(&[-1])]);
    }

    #[test]
    fn depth_counts_expansion_distance_from_the_root() {
        let mut seq = UnderSequence::new(cube(&[-2]));
        let root = seq.push_root(cube(&[]), cube(&[2]));
        let mid = seq.push(root, cube(&[]), cube(&[3]));
        assert_eq!(seq.get(root).depth, 0);
        assert_eq!(seq.get(mid).depth, 1);
    }
}
