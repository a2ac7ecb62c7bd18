//! Builds the CNF-via-Tseitin transition relation the checker expects, from a parsed AIGER file.
use rustc_hash::FxHashMap;

use car_formula::{Lit, Var};

use crate::aiger::{RawAiger, Reset};
use crate::error::AigerError;

/// A loaded sequential circuit, ready to hand to [`car_checker::check`].
///
/// Variable numbering matches the AIGER convention directly (inputs `1..=I`, latches the next `L`
/// indices, gate outputs after that), plus two variables this type allocates itself: a dedicated
/// constant-true variable, and one primed copy per latch.
#[derive(Debug)]
pub struct AigModel {
    num_inputs: usize,
    num_latches: usize,
    max_id: u32,
    initial_state: Vec<Lit>,
    outputs: Vec<Lit>,
    true_id: Lit,
    prime_of: FxHashMap<u32, u32>,
    previous_of: FxHashMap<u32, u32>,
    clauses: Vec<Vec<Lit>>,
}

fn aiger_lit(raw: u32, true_id: Lit) -> Lit {
    let var = raw / 2;
    let positive = raw % 2 == 0;
    if var == 0 {
        if positive {
            -true_id
        } else {
            true_id
        }
    } else {
        Lit::from_var(Var::new(var), positive)
    }
}

fn check_in_range(raw: u32, max_var: u32) -> Result<(), AigerError> {
    let var = raw / 2;
    if var != 0 && var > max_var {
        return Err(AigerError::LiteralOutOfRange {
            literal: raw as i64,
            var,
            max_var,
        });
    }
    Ok(())
}

impl AigModel {
    /// Builds a model from an already-parsed AIGER file.
    ///
    /// Fails only if the file declares gates or latches referencing a variable index higher than
    /// its own header's `max_var`, which would mean the file is internally inconsistent.
    pub fn build(raw: RawAiger) -> Result<AigModel, AigerError> {
        let num_inputs = raw.header.num_inputs as usize;
        let num_latches = raw.header.num_latches as usize;
        let header_max = raw.header.max_var;

        let const_var = header_max + 1;
        let true_id = Lit::from_var(Var::new(const_var), true);

        let mut prime_of = FxHashMap::default();
        let mut previous_of = FxHashMap::default();
        let mut next_prime = const_var + 1;
        for offset in 0..num_latches as u32 {
            let latch_var = num_inputs as u32 + 1 + offset;
            prime_of.insert(latch_var, next_prime);
            previous_of.insert(next_prime, latch_var);
            next_prime += 1;
        }
        let max_id = next_prime - 1;

        let mut clauses = Vec::new();
        clauses.push(vec![true_id]);

        for gate in &raw.and_gates {
            let lhs_var = gate.lhs / 2;
            if lhs_var == 0 || lhs_var > header_max {
                return Err(AigerError::InvalidGateOutput { lhs: gate.lhs });
            }
            check_in_range(gate.rhs0, header_max)?;
            check_in_range(gate.rhs1, header_max)?;
            let lhs = Lit::from_var(Var::new(lhs_var), true);
            let rhs0 = aiger_lit(gate.rhs0, true_id);
            let rhs1 = aiger_lit(gate.rhs1, true_id);
            clauses.push(vec![-lhs, rhs0]);
            clauses.push(vec![-lhs, rhs1]);
            clauses.push(vec![lhs, -rhs0, -rhs1]);
        }

        let mut initial_state = Vec::with_capacity(num_latches);
        for (offset, latch) in raw.latches.iter().enumerate() {
            let latch_var = num_inputs as u32 + 1 + offset as u32;
            let current = Lit::from_var(Var::new(latch_var), true);
            let positive_init = matches!(latch.reset, Reset::High);
            initial_state.push(current.with_polarity(positive_init));

            check_in_range(latch.next, header_max)?;
            let next = aiger_lit(latch.next, true_id);
            let primed_var = *prime_of.get(&latch_var).expect("primed var allocated above");
            let primed = Lit::from_var(Var::new(primed_var), true);
            clauses.push(vec![-primed, next]);
            clauses.push(vec![primed, -next]);
        }

        let mut outputs = Vec::with_capacity(raw.outputs.len());
        for &raw_lit in &raw.outputs {
            check_in_range(raw_lit, header_max)?;
            outputs.push(aiger_lit(raw_lit, true_id));
        }

        if outputs.is_empty() {
            return Err(AigerError::NoOutputs);
        }

        Ok(AigModel {
            num_inputs,
            num_latches,
            max_id,
            initial_state,
            outputs,
            true_id,
            prime_of,
            previous_of,
            clauses,
        })
    }
}

impl car_checker::Model for AigModel {
    fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    fn num_latches(&self) -> usize {
        self.num_latches
    }

    fn max_id(&self) -> u32 {
        self.max_id
    }

    fn initial_state(&self) -> &[Lit] {
        &self.initial_state
    }

    fn outputs(&self) -> &[Lit] {
        &self.outputs
    }

    fn true_id(&self) -> Lit {
        self.true_id
    }

    fn false_id(&self) -> Lit {
        -self.true_id
    }

    fn prime(&self, lit: Lit) -> Lit {
        let primed_var = *self
            .prime_of
            .get(&lit.var().index())
            .expect("prime() called on a non-latch literal");
        Lit::from_var(Var::new(primed_var), lit.is_positive())
    }

    fn previous(&self, lit: Lit) -> Vec<Lit> {
        match self.previous_of.get(&lit.var().index()) {
            Some(&latch_var) => vec![Lit::from_var(Var::new(latch_var), lit.is_positive())],
            None => Vec::new(),
        }
    }

    fn is_latch(&self, var: Var) -> bool {
        let index = var.index();
        index > self.num_inputs as u32 && index <= (self.num_inputs + self.num_latches) as u32
    }

    fn is_input(&self, var: Var) -> bool {
        let index = var.index();
        index >= 1 && index <= self.num_inputs as u32
    }

    fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger;
    use car_checker::Model;

    #[test]
    fn single_latch_held_low_has_unreachable_set_output() {
        // aag 2 0 1 1 0: one latch, resets low, holds its own value; output is the latch itself.
        let raw = aiger::parse("aag 2 0 1 1 0\n2 2\n2\n").unwrap();
        let model = AigModel::build(raw).unwrap();
        assert_eq!(model.num_latches(), 1);
        assert_eq!(model.num_inputs(), 0);
        assert_eq!(model.initial_state().len(), 1);
        assert!(!model.initial_state()[0].is_positive());
        assert_eq!(model.outputs().len(), 1);
    }

    #[test]
    fn rejects_output_literal_beyond_max_var() {
        // Header declares max_var 2, but the output literal references variable 5.
        let raw = aiger::parse("aag 2 0 1 1 0\n2 2\n10\n").unwrap();
        let err = AigModel::build(raw).unwrap_err();
        assert!(matches!(err, AigerError::LiteralOutOfRange { var: 5, max_var: 2, .. }));
    }

    #[test]
    fn prime_and_previous_round_trip() {
        let raw = aiger::parse("aag 2 0 1 1 0\n2 2\n2\n").unwrap();
        let model = AigModel::build(raw).unwrap();
        let latch = model.initial_state()[0].with_polarity(true);
        let primed = model.prime(latch);
        assert_eq!(model.previous(primed), vec![latch]);
    }
}
