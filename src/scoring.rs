//! Per-residue energy sums and selection of reported interactions.
use crate::interactions::{InteractionLabel, ValidatedInteraction};

/// Number of individual interactions reported per residue.
pub const REPORTED_SLOTS: usize = 2;

/// Type written for a reported interaction that has no label.
pub const NO_LABEL: &str = "None";

/// One reported interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotValue {
    pub energy: f64,
    pub label: String,
}

/// Aggregated result for one residue.
///
/// `slots` holds at most [`REPORTED_SLOTS`] entries; slots that are not
/// present are left unwritten in the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueScore {
    pub sum: f64,
    pub slots: Vec<SlotValue>,
}

impl ResidueScore {
    /// Score of a residue that does not exist in the structure.
    pub fn missing() -> Self {
        Self {
            sum: f64::NAN,
            slots: vec![],
        }
    }

    pub fn is_missing(&self) -> bool {
        self.sum.is_nan()
    }
}

/// Value written for one reported interaction. A missing energy counts as
/// zero and a missing label is written as [`NO_LABEL`].
pub fn slot_value(label: Option<InteractionLabel>, energy: Option<f64>) -> SlotValue {
    SlotValue {
        energy: energy.unwrap_or(0.0),
        label: label.map_or(NO_LABEL.to_string(), |l| l.to_string()),
    }
}

/// Score a residue present in the structure.
///
/// All interactions contribute to the sum, missing energies as zero. Only the
/// first [`REPORTED_SLOTS`] in detector order are reported individually.
pub fn score_residue(interactions: &[ValidatedInteraction]) -> ResidueScore {
    let sum = interactions.iter().filter_map(|i| i.energy).sum::<f64>();
    let slots = interactions
        .iter()
        .take(REPORTED_SLOTS)
        .map(|i| slot_value(Some(i.label), i.energy))
        .collect();
    ResidueScore { sum, slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::AtomId;

    fn interaction(label: InteractionLabel, energy: Option<f64>) -> ValidatedInteraction {
        ValidatedInteraction {
            label,
            energy,
            ligand_atom: AtomId(0),
            receptor_atom: AtomId(1),
        }
    }

    #[test]
    fn missing_residue_has_nan_sum_and_no_slots() {
        let score = ResidueScore::missing();
        assert!(score.sum.is_nan());
        assert!(score.is_missing());
        assert!(score.slots.is_empty());
    }

    #[test]
    fn no_interactions_sum_to_zero() {
        let score = score_residue(&[]);
        assert_eq!(score.sum, 0.0);
        assert!(!score.is_missing());
        assert!(score.slots.is_empty());
    }

    #[test]
    fn null_energy_keeps_label() {
        let score = score_residue(&[interaction(InteractionLabel::HbDon, None)]);
        assert_eq!(score.sum, 0.0);
        assert_eq!(
            score.slots,
            vec![SlotValue {
                energy: 0.0,
                label: "hbdon".to_string()
            }]
        );
    }

    #[test]
    fn null_energy_and_label() {
        assert_eq!(
            slot_value(None, None),
            SlotValue {
                energy: 0.0,
                label: "None".to_string()
            }
        );
        assert_eq!(slot_value(Some(InteractionLabel::Cov), Some(-4.0)).label, "cov");
    }

    #[test]
    fn all_interactions_summed_first_two_reported() {
        let interactions = [
            interaction(InteractionLabel::HbAcc, Some(-1.0)),
            interaction(InteractionLabel::Ion, Some(-2.0)),
            interaction(InteractionLabel::Arene, Some(-0.5)),
            interaction(InteractionLabel::HbDon, Some(-0.3)),
        ];
        let score = score_residue(&interactions);
        assert!((score.sum - -3.8).abs() < 1e-9);
        assert_eq!(score.slots.len(), 2);
        assert_eq!(score.slots[0].energy, -1.0);
        assert_eq!(score.slots[0].label, "hbacc");
        assert_eq!(score.slots[1].energy, -2.0);
        assert_eq!(score.slots[1].label, "ion");
    }
}
