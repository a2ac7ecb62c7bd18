//! Literal, variable and cube types shared by the car safety model checker.

pub mod cube;
pub mod lit;

pub use cube::{canonicalize, cube_from, is_subset, Cube};
pub use lit::{Lit, Var};
