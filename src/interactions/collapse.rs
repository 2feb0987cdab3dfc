use super::structs::{CollapsedCandidate, InteractionCandidate};
use crate::structure::Atom;

/// Nearest pair of atoms between two groups.
///
/// Returns `None` if either group is empty. Ties keep the first pair found
/// when walking `first` in the outer loop.
pub fn nearest_pair<'a>(first: &'a [Atom], second: &'a [Atom]) -> Option<(&'a Atom, &'a Atom)> {
    let mut best: Option<(&Atom, &Atom, f64)> = None;
    for a in first {
        for b in second {
            let d2 = a.distance_squared(b);
            match best {
                Some((_, _, min)) if d2 >= min => {}
                _ => best = Some((a, b, d2)),
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Reduce a candidate to one atom per side.
///
/// Candidates that are already single-atom on both sides pass through
/// unchanged. Candidates with an empty side are dropped.
pub fn collapse(candidate: InteractionCandidate) -> Option<CollapsedCandidate> {
    let InteractionCandidate {
        category,
        mut first,
        mut second,
        energy,
    } = candidate;

    if first.len() == 1 && second.len() == 1 {
        return Some(CollapsedCandidate {
            category,
            first: first.remove(0),
            second: second.remove(0),
            energy,
        });
    }

    let (a, b) = nearest_pair(&first, &second)?;
    Some(CollapsedCandidate {
        category,
        first: a.clone(),
        second: b.clone(),
        energy,
    })
}

/// Collapse every candidate, keeping detector order.
pub fn collapse_all(candidates: Vec<InteractionCandidate>) -> Vec<CollapsedCandidate> {
    candidates.into_iter().filter_map(collapse).collect()
}
