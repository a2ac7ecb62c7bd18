//! Cubes: conjunctions of literals, dually used as blocking clauses.
use std::cmp::Ordering;

use crate::lit::Lit;

/// An ordered, duplicate-free sequence of literals, sorted by [`Lit`]'s canonical order (absolute
/// value, then sign).
///
/// A cube is interpreted as the conjunction of its literals when describing a (partial) state, and
/// dually as the clause formed by negating every literal when installed as a blocking clause in a
/// frame.
pub type Cube = Vec<Lit>;

/// Sorts and deduplicates `lits` in place into canonical cube order.
pub fn canonicalize(lits: &mut Vec<Lit>) {
    lits.sort();
    lits.dedup();
}

/// Builds a canonical cube from an iterator of literals.
pub fn cube_from(lits: impl IntoIterator<Item = Lit>) -> Cube {
    let mut cube: Cube = lits.into_iter().collect();
    canonicalize(&mut cube);
    cube
}

/// Tests whether `subset` is contained in `superset`, viewing both as sets of literals.
///
/// Both slices must already be in canonical cube order. This is the basis for subsumption checks:
/// a cube that is a subset of another is a logically stronger (or equal) statement, so the
/// superset cube is redundant once the subset is known to hold at the same or a deeper frame.
pub fn is_subset(mut subset: &[Lit], mut superset: &[Lit]) -> bool {
    while let Some((&sub_min, sub_rest)) = subset.split_first() {
        match superset.split_first() {
            Some((&super_min, super_rest)) => match sub_min.cmp(&super_min) {
                Ordering::Less => return false,
                Ordering::Greater => superset = super_rest,
                Ordering::Equal => {
                    superset = super_rest;
                    subset = sub_rest;
                }
            },
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;

    fn cube(codes: &[i32]) -> Cube {
        cube_from(codes.iter().map(|&c| Lit::from_dimacs(c)))
    }

    #[test]
    fn subset_detection() {
        assert!(is_subset(&cube(&[1, -2]), &cube(&[1, -2, 3])));
        assert!(!is_subset(&cube(&[1, 2]), &cube(&[1, -2, 3])));
        assert!(is_subset(&cube(&[]), &cube(&[1, 2])));
        assert!(is_subset(&cube(&[1, 2]), &cube(&[1, 2])));
    }

    #[test]
    fn canonicalize_sorts_and_dedups() {
        let mut lits = vec![
            Lit::from_dimacs(3),
            Lit::from_dimacs(-1),
            Lit::from_dimacs(3),
        ];
        canonicalize(&mut lits);
        assert_eq!(lits, vec![Lit::from_dimacs(-1), Lit::from_dimacs(3)]);
    }

    use proptest::prelude::*;

    fn arb_codes() -> impl Strategy<Value = Vec<i32>> {
        prop::collection::vec(1..64i32, 0..12)
            .prop_flat_map(|vars| {
                let signs = prop::collection::vec(any::<bool>(), vars.len());
                (Just(vars), signs)
            })
            .prop_map(|(vars, signs)| {
                vars.into_iter()
                    .zip(signs)
                    .map(|(v, positive)| if positive { v } else { -v })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(codes in arb_codes()) {
            let mut once: Vec<Lit> = codes.iter().map(|&c| Lit::from_dimacs(c)).collect();
            canonicalize(&mut once);
            let mut twice = once.clone();
            canonicalize(&mut twice);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn every_cube_is_a_subset_of_itself(codes in arb_codes()) {
            let cube = cube_from(codes.iter().map(|&c| Lit::from_dimacs(c)));
            prop_assert!(is_subset(&cube, &cube));
        }

        #[test]
        fn subset_survives_adding_literals(codes in arb_codes(), extra in 1..64i32) {
            let base = cube_from(codes.iter().map(|&c| Lit::from_dimacs(c)));
            let mut grown = base.clone();
            grown.push(Lit::from_dimacs(extra));
            let grown = cube_from(grown);
            prop_assert!(is_subset(&base, &grown));
        }
    }
}
