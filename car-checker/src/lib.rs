//! Complementary approximate reachability: a SAT-based safety model checker for finite-state
//! transition systems given in CNF-via-Tseitin form.
//!
//! [`Model`] is the only thing a caller must supply; everything else ([`check`]) is generic over
//! it, so the checker itself knows nothing about AIGER, Verilog, or any other source format.
pub mod counterexample;
mod driver;
mod error;
mod frame;
mod frame_solver;
mod invariant_solver;
mod model;
mod oracle;
mod partial_solver;
mod settings;
mod start_solver;
mod state;
mod task;
pub mod visualization;

pub use driver::{check, check_with_graph};
pub use error::{CheckerError, Outcome};
pub use frame::OverSequence;
pub use model::Model;
pub use settings::{Settings, MUC_ITERATION_CAP};
pub use state::{StateHandle, StateNode, UnderSequence};
