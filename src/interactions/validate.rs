use super::structs::{
    Category, CollapsedCandidate, InteractionLabel, Orientation, ValidatedInteraction,
};
use crate::structure::AtomId;
use std::collections::HashSet;

/// Determine which side of `candidate` holds the ligand atom.
///
/// The detector does not keep a consistent side order, so both
/// ligand-receptor and receptor-ligand pairings are accepted. Returns `None`
/// if the pair does not join the ligand to this residue.
pub fn orientation(
    candidate: &CollapsedCandidate,
    ligand: &HashSet<AtomId>,
    residue: &HashSet<AtomId>,
) -> Option<Orientation> {
    let (first, second) = (&candidate.first.id, &candidate.second.id);
    if ligand.contains(first) && residue.contains(second) {
        Some(Orientation::LigandFirst)
    } else if residue.contains(first) && ligand.contains(second) {
        Some(Orientation::ReceptorFirst)
    } else {
        None
    }
}

/// Map a category to its output label. Only hydrogen bonds depend on the
/// orientation; `Distance` contacts are never reported.
pub fn classify(category: Category, orientation: Orientation) -> Option<InteractionLabel> {
    match (category, orientation) {
        (Category::Hbond, Orientation::LigandFirst) => Some(InteractionLabel::HbDon),
        (Category::Hbond, Orientation::ReceptorFirst) => Some(InteractionLabel::HbAcc),
        (Category::Metal | Category::Ionic, _) => Some(InteractionLabel::Ion),
        (Category::Covalent, _) => Some(InteractionLabel::Cov),
        (Category::Arene, _) => Some(InteractionLabel::Arene),
        (Category::Distance, _) => None,
    }
}

/// Check a collapsed candidate against the ligand and residue atom sets.
pub fn validate(
    candidate: &CollapsedCandidate,
    ligand: &HashSet<AtomId>,
    residue: &HashSet<AtomId>,
) -> Option<ValidatedInteraction> {
    if !(candidate.category.is_atomic_bond() || candidate.category == Category::Arene) {
        return None;
    }

    let orientation = orientation(candidate, ligand, residue)?;
    let label = classify(candidate.category, orientation)?;
    let (ligand_atom, receptor_atom) = match orientation {
        Orientation::LigandFirst => (candidate.first.id, candidate.second.id),
        Orientation::ReceptorFirst => (candidate.second.id, candidate.first.id),
    };

    Some(ValidatedInteraction {
        label,
        energy: candidate.energy,
        ligand_atom,
        receptor_atom,
    })
}

/// Validate every candidate, keeping detector order and dropping invalid ones.
pub fn validate_all(
    candidates: &[CollapsedCandidate],
    ligand: &HashSet<AtomId>,
    residue: &HashSet<AtomId>,
) -> Vec<ValidatedInteraction> {
    candidates
        .iter()
        .filter_map(|c| validate(c, ligand, residue))
        .collect()
}
