//! A minimal GML (Graph Modelling Language) dump of the under-sequence, for loading into an
//! external graph viewer. Out of scope for anything beyond a flat node/edge listing: no layout,
//! no styling, no frame-membership annotation.
use std::fmt::Write as _;

use crate::state::UnderSequence;

/// Renders every discovered state as a node and every predecessor link as an edge.
pub fn to_gml(sequence: &UnderSequence) -> String {
    let mut out = String::new();
    out.push_str("graph [\n  directed 1\n");
    for (handle, node) in sequence.iter() {
        let _ = writeln!(out, "  node [ id {} label \"depth {}\" ]", handle.raw(), node.depth);
    }
    for (handle, node) in sequence.iter() {
        if let Some(pre) = node.pre_state {
            let _ = writeln!(
                out,
                "  edge [ source {} target {} ]",
                pre.raw(),
                handle.raw()
            );
        }
    }
    out.push_str("]\n");
    out
}
