//! Loads ASCII AIGER circuits into the transition-relation representation the checker expects.
mod aiger;
mod error;
mod model;

use std::fs;
use std::path::Path;

pub use aiger::{parse, AndLine, Header, LatchLine, RawAiger, Reset};
pub use error::AigerError;
pub use model::AigModel;

/// Reads and parses an AIGER file from disk, then builds its CNF transition relation.
pub fn load_file(path: impl AsRef<Path>) -> Result<AigModel, AigerError> {
    let text = fs::read_to_string(path)?;
    load_str(&text)
}

/// Parses AIGER text already in memory and builds its CNF transition relation.
pub fn load_str(text: &str) -> Result<AigModel, AigerError> {
    let raw = aiger::parse(text)?;
    AigModel::build(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_trivial_circuit_from_text() {
        let model = load_str("aag 2 0 1 1 0\n2 2\n2\n").unwrap();
        use car_checker::Model;
        assert_eq!(model.num_latches(), 1);
    }

    #[test]
    fn rejects_file_with_no_outputs() {
        let err = load_str("aag 0 0 0 0 0\n").unwrap_err();
        assert!(matches!(err, AigerError::NoOutputs));
    }
}
