//! Checker configuration.
use std::time::Duration;

/// Options that change how the checker searches, independent of the model being checked.
///
/// Mirrors the options a command-line driver would expose; defaults match running plain forward
/// CAR with no optional refinements enabled.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Generalize a discovered state to a minimal cube that still forces its recorded outcome
    /// (a specific successor, or the bad output itself).
    pub partial: bool,
    /// Reorder latch literals in assumptions using the cube of the last conflicting query.
    pub rotate: bool,
    /// Between outer iterations, copy cubes that still block one level up into that frame.
    pub propagation: bool,
    /// Extract a minimal unsatisfiable core from each raw conflict.
    pub muc: bool,
    /// Revisit previously enumerated start states, newest first, before asking for fresh ones.
    pub end: bool,
    /// Wall-clock bound; exceeding it aborts the query with [`Outcome::Timeout`](crate::Outcome).
    pub timelimit: Option<Duration>,
    /// Emit a graph-markup dump of the under-sequence on exit.
    pub visualization: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            partial: false,
            rotate: false,
            propagation: false,
            muc: false,
            end: false,
            timelimit: None,
            visualization: false,
        }
    }
}

/// Bound on how many literals the MUC-extraction loop will try to drop, one at a time.
///
/// Keeps the shrink loop's cost linear in the core size even for pathologically large conflicts.
pub const MUC_ITERATION_CAP: usize = 216;
