//! Reduction of raw detector output to validated per-residue interactions.
pub mod collapse;
pub mod structs;
pub mod validate;

// Re-exports
pub use collapse::{collapse, collapse_all, nearest_pair};
pub use structs::*;
pub use validate::{classify, orientation, validate, validate_all};

use crate::structure::AtomId;
use std::collections::HashSet;

/// Collapse and validate the detector output for one residue.
pub fn residue_interactions(
    candidates: Vec<InteractionCandidate>,
    ligand: &HashSet<AtomId>,
    residue: &HashSet<AtomId>,
) -> Vec<ValidatedInteraction> {
    let collapsed = collapse_all(candidates);
    validate_all(&collapsed, ligand, residue)
}
