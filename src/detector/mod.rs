//! Interface to the geometric/energetic interaction detector.
//!
//! The engine never computes interaction geometry itself. A detector is
//! handed the atoms of the ligand and of one receptor residue and returns the
//! raw candidates it finds between them.
pub mod tabulated;

pub use tabulated::{AtomSelector, TabulatedDetector};

use crate::errors::DetectorError;
use crate::interactions::{Category, InteractionCandidate};
use crate::structure::Atom;

/// Minimum |energy| in kcal/mol for a hydrogen bond to be reported
pub const HBOND_ENERGY_MIN: f64 = 0.5;
/// Minimum |energy| in kcal/mol for an arene or hydrophobic contact to be reported
pub const HYDROPHOBIC_ENERGY_MIN: f64 = 0.5;
/// Minimum |energy| in kcal/mol for an ionic or metal contact to be reported
pub const IONIC_ENERGY_MIN: f64 = 0.5;
/// Maximum distance in Å for a plain distance contact
pub const DISTANCE_THRESHOLD: f64 = 4.5;

/// Thresholds forwarded to the detector.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorOptions {
    pub hbond_energy_min: f64,
    pub hydrophobic_energy_min: f64,
    pub ionic_energy_min: f64,
    pub distance_threshold: f64,
    /// Also report hydrogen bonds between two receptor atoms
    pub include_receptor_receptor_hbonds: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            hbond_energy_min: HBOND_ENERGY_MIN,
            hydrophobic_energy_min: HYDROPHOBIC_ENERGY_MIN,
            ionic_energy_min: IONIC_ENERGY_MIN,
            distance_threshold: DISTANCE_THRESHOLD,
            include_receptor_receptor_hbonds: false,
        }
    }
}

impl DetectorOptions {
    /// Energy cutoff applying to `category`, if any.
    pub fn energy_min(&self, category: Category) -> Option<f64> {
        match category {
            Category::Hbond => Some(self.hbond_energy_min),
            Category::Metal | Category::Ionic => Some(self.ionic_energy_min),
            Category::Arene => Some(self.hydrophobic_energy_min),
            Category::Covalent | Category::Distance => None,
        }
    }
}

/// One detector call: the ligand against a single receptor residue.
#[derive(Debug, Clone, Copy)]
pub struct DetectionRequest<'a> {
    /// Row of the docking table the atoms were loaded for
    pub entry: usize,
    pub categories: &'a [Category],
    pub ligand: &'a [&'a Atom],
    pub receptor: &'a [&'a Atom],
    pub options: &'a DetectorOptions,
}

/// Source of raw interaction candidates.
///
/// Implementations must be shareable between worker threads.
pub trait InteractionDetector: Sync {
    /// Candidates between `request.ligand` and `request.receptor`, in the
    /// detector's own order.
    fn detect(
        &self,
        request: &DetectionRequest<'_>,
    ) -> Result<Vec<InteractionCandidate>, DetectorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_cutoffs_by_category() {
        let options = DetectorOptions {
            hbond_energy_min: 1.0,
            hydrophobic_energy_min: 2.0,
            ionic_energy_min: 3.0,
            ..Default::default()
        };
        assert_eq!(options.energy_min(Category::Hbond), Some(1.0));
        assert_eq!(options.energy_min(Category::Arene), Some(2.0));
        assert_eq!(options.energy_min(Category::Metal), Some(3.0));
        assert_eq!(options.energy_min(Category::Covalent), None);
    }
}
