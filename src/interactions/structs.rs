use crate::structure::{Atom, AtomId};
use core::fmt;
use std::str::FromStr;

/// Interaction categories reported by the detector.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Category {
    Hbond,
    Metal,
    Ionic,
    Covalent,
    Arene,
    Distance,
}

impl Category {
    /// Every category, in the order requested from the detector.
    pub const ALL: [Category; 6] = [
        Category::Hbond,
        Category::Metal,
        Category::Ionic,
        Category::Covalent,
        Category::Arene,
        Category::Distance,
    ];

    /// Categories between two individual atoms that count towards scores.
    pub fn is_atomic_bond(&self) -> bool {
        matches!(
            self,
            Category::Hbond | Category::Metal | Category::Ionic | Category::Covalent
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Hbond => "Hbond",
            Category::Metal => "Metal",
            Category::Ionic => "Ionic",
            Category::Covalent => "Covalent",
            Category::Arene => "Arene",
            Category::Distance => "Distance",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hbond" => Ok(Category::Hbond),
            "metal" => Ok(Category::Metal),
            "ionic" => Ok(Category::Ionic),
            "covalent" => Ok(Category::Covalent),
            "arene" => Ok(Category::Arene),
            "distance" => Ok(Category::Distance),
            _ => Err(s.to_string()),
        }
    }
}

/// A raw detection between one or more atoms on each side.
///
/// For hydrogen bonds the `first` side is the donor. For every other
/// category the side order carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionCandidate {
    pub category: Category,
    pub first: Vec<Atom>,
    pub second: Vec<Atom>,
    pub energy: Option<f64>,
}

/// A candidate reduced to a single atom on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedCandidate {
    pub category: Category,
    pub first: Atom,
    pub second: Atom,
    pub energy: Option<f64>,
}

/// Which side of a candidate the ligand atom sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Ligand atom on the first (donor) side
    LigandFirst,
    /// Receptor atom on the first (donor) side
    ReceptorFirst,
}

/// Canonical interaction type written to the output table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum InteractionLabel {
    /// Hydrogen bond donated by the ligand
    HbDon,
    /// Hydrogen bond accepted by the ligand
    HbAcc,
    Ion,
    Cov,
    Arene,
}

impl fmt::Display for InteractionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InteractionLabel::HbDon => "hbdon",
            InteractionLabel::HbAcc => "hbacc",
            InteractionLabel::Ion => "ion",
            InteractionLabel::Cov => "cov",
            InteractionLabel::Arene => "arene",
        };
        write!(f, "{label}")
    }
}

/// An interaction between the ligand and one receptor residue.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInteraction {
    pub label: InteractionLabel,
    pub energy: Option<f64>,
    pub ligand_atom: AtomId,
    pub receptor_atom: AtomId,
}

impl fmt::Display for ValidatedInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ligand atom {lig} has {label} with receptor atom {rec} ({energy})",
            lig = self.ligand_atom.0,
            label = self.label,
            rec = self.receptor_atom.0,
            energy = self
                .energy
                .map_or("no energy".to_string(), |e| format!("{e:.3}"))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip_through_display() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        assert_eq!("  HBOND ".parse::<Category>(), Ok(Category::Hbond));
        assert!("pi-stack".parse::<Category>().is_err());
    }

    #[test]
    fn distance_and_arene_are_not_atomic_bonds() {
        assert!(Category::Metal.is_atomic_bond());
        assert!(!Category::Arene.is_atomic_bond());
        assert!(!Category::Distance.is_atomic_bond());
    }
}
