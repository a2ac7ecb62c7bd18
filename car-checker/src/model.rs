//! The interface the checker expects from a loaded transition system.
use car_formula::{Lit, Var};

/// A finite-state sequential system over latches and inputs, given in CNF-via-Tseitin form.
///
/// This is the "Model" collaborator from the checker's dependency list: it is consumed read-only,
/// constructed once up front (typically from an AIG), and never mutated by the checker. Variable
/// numbering follows the AIG convention: inputs occupy `1..=num_inputs()`, latches occupy the
/// following `num_latches()` indices, and everything else (gates, primed latch copies, activation
/// literals the checker itself allocates) follows after `max_id()` at load time.
pub trait Model {
    /// Number of primary inputs.
    fn num_inputs(&self) -> usize;

    /// Number of latches.
    fn num_latches(&self) -> usize;

    /// Highest variable index already in use by the model (clauses, primed copies, and so on).
    /// The checker allocates fresh activation variables starting above this.
    fn max_id(&self) -> u32;

    /// The initial value of every latch, one literal per latch, in latch order.
    fn initial_state(&self) -> &[Lit];

    /// The candidate "bad" variables, one per circuit output.
    fn outputs(&self) -> &[Lit];

    /// A literal that is always true, used to detect when a bad output is a syntactic constant.
    fn true_id(&self) -> Lit;

    /// A literal that is always false, used to detect when a bad output is a syntactic constant.
    fn false_id(&self) -> Lit;

    /// Maps a current-state latch literal to its primed (next-state) copy, preserving sign.
    fn prime(&self, lit: Lit) -> Lit;

    /// Maps a primed latch literal back to the current-state literal(s) that produce it.
    ///
    /// This is the inverse of [`prime`](Model::prime). For the forward direction with a
    /// fresh-variable primed encoding this is always a single-element result, but the interface
    /// allows richer models (e.g. gate-sharing or the backward direction) to return more than one
    /// preimage.
    fn previous(&self, lit: Lit) -> Vec<Lit>;

    /// Whether `var` is one of the model's latches.
    fn is_latch(&self, var: Var) -> bool;

    /// Whether `var` is one of the model's inputs.
    fn is_input(&self, var: Var) -> bool;

    /// The CNF clauses defining the transition relation (gate semantics plus the equivalence of
    /// every latch's primed copy with its declared next-state function).
    fn clauses(&self) -> &[Vec<Lit>];
}
