//! Formatting a counterexample trace for display.
use std::fmt::Write as _;

use car_formula::{Lit, Var};

/// Renders a counterexample trace as one line per cycle, oldest first: each line lists the
/// cycle's assigned input literals as space-separated signed IDs.
///
/// An input the oracle never fixed on some cycle is simply absent from that line; printing a
/// made-up value would misrepresent the witness as more determined than the solver actually
/// found it to be.
pub fn format_trace(trace: &[Vec<Lit>]) -> String {
    let mut out = String::new();
    for step in trace {
        let rendered: Vec<String> = step.iter().map(|lit| lit.code().to_string()).collect();
        let _ = writeln!(out, "{}", rendered.join(" "));
    }
    out
}

/// Renders a single cube (e.g. a frame's blocking cube) as a human-readable conjunction, for
/// diagnostics rather than machine consumption.
pub fn format_cube(cube: &[Lit]) -> String {
    cube.iter()
        .map(|lit| {
            let var: Var = lit.var();
            if lit.is_positive() {
                format!("l{}", var.index())
            } else {
                format!("!l{}", var.index())
            }
        })
        .collect::<Vec<_>>()
        .join(" & ")
}
