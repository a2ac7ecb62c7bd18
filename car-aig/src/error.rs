//! Errors produced while loading an AIGER model.
use thiserror::Error;

/// Failures while parsing or validating an AIGER circuit.
///
/// All of these are `MalformedInput` in the checker's error taxonomy: the file could not be
/// interpreted as a well-formed sequential AIG, so loading fails fast rather than handing the
/// checker a model it cannot reason about.
#[derive(Debug, Error)]
pub enum AigerError {
    #[error("line {line}: expected an AIGER header, found {found:?}")]
    MissingHeader { line: usize, found: String },

    #[error("unsupported AIGER format tag {tag:?}, expected \"aag\" or \"aig\"")]
    UnsupportedFormat { tag: String },

    #[error("line {line}: malformed AIGER header: {header:?}")]
    InvalidHeader { line: usize, header: String },

    #[error("expected {expected} more lines of body, found end of file")]
    UnexpectedEof { expected: usize },

    #[error("line {line}: expected a literal, found {found:?}")]
    ExpectedLiteral { line: usize, found: String },

    #[error("literal {literal} references undefined variable {var} (max var is {max_var})")]
    LiteralOutOfRange {
        literal: i64,
        var: u32,
        max_var: u32,
    },

    #[error("and gate output {lhs} is not a fresh gate variable")]
    InvalidGateOutput { lhs: u32 },

    #[error("the circuit has no outputs to check")]
    NoOutputs,

    #[error("error reading AIGER input: {0}")]
    Io(#[from] std::io::Error),
}
