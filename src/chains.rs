use crate::errors::ChainError;
use crate::structure::{Atom, AtomId, Chain, ChainOrigin, Complex};
use std::collections::HashSet;
use tracing::debug;

/// A complex split into exactly one receptor chain and one ligand chain.
#[derive(Debug, Clone)]
pub struct ClassifiedComplex {
    pub receptor: Chain,
    /// The ligand is modelled as a single pseudo-residue
    pub ligand: Chain,
}

impl ClassifiedComplex {
    pub fn ligand_atoms(&self) -> Vec<&Atom> {
        self.ligand.atoms().collect()
    }

    pub fn ligand_atom_ids(&self) -> HashSet<AtomId> {
        self.ligand.atoms().map(|a| a.id).collect()
    }
}

/// Partition the chains of `complex` by residue count.
///
/// Chains with more than one residue are receptor chains, chains with exactly
/// one residue are ligand chains. Receptor chains after the first are merged
/// into it, keeping residue order.
///
/// Single-residue chains read from the receptor structure (ions, cofactors)
/// are never the ligand. Among the remaining ligand chains, the first one read
/// from the ligand structure is preferred, then the first untagged one. Other
/// single-residue chains are discarded.
pub fn classify_chains(complex: Complex) -> Result<ClassifiedComplex, ChainError> {
    let mut receptors: Vec<Chain> = vec![];
    let mut ligands: Vec<Chain> = vec![];
    for chain in complex.chains {
        match (chain.residue_count(), chain.origin) {
            (0, _) => {}
            (1, ChainOrigin::Receptor) => debug!(
                "Ignoring single-residue chain {} ({}) of the receptor structure",
                chain.id,
                chain.residues[0].name
            ),
            (1, _) => ligands.push(chain),
            _ => receptors.push(chain),
        }
    }

    let mut receptor_iter = receptors.into_iter();
    let mut receptor = receptor_iter.next().ok_or(ChainError::NoReceptor)?;
    for mut other in receptor_iter {
        debug!(
            "Merging {} residues of chain {} into receptor chain {}",
            other.residue_count(),
            other.id,
            receptor.id
        );
        receptor.residues.append(&mut other.residues);
    }

    let preferred = ligands
        .iter()
        .position(|c| c.origin == ChainOrigin::Ligand)
        .unwrap_or(0);
    if preferred >= ligands.len() {
        return Err(ChainError::NoLigand);
    }
    if ligands.len() > 1 {
        debug!(
            "Found {} single-residue chains, using chain {} as ligand",
            ligands.len(),
            ligands[preferred].id
        );
    }
    let ligand = ligands.swap_remove(preferred);

    Ok(ClassifiedComplex { receptor, ligand })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ComplexBuilder;

    fn receptor_residues(
        builder: ComplexBuilder,
        chain: &str,
        range: std::ops::Range<isize>,
    ) -> ComplexBuilder {
        range.fold(builder.chain(chain), |b, resi| {
            b.residue(resi, "ALA").atom("CA", [resi as f64, 0.0, 0.0])
        })
    }

    #[test]
    fn single_receptor_and_ligand() {
        let builder = receptor_residues(ComplexBuilder::new(), "A", 1..5);
        let complex = builder
            .chain("L")
            .residue(1, "LIG")
            .atom("C1", [0.0, 3.0, 0.0])
            .build();

        let classified = classify_chains(complex).unwrap();
        assert_eq!(classified.receptor.id, "A");
        assert_eq!(classified.receptor.residue_count(), 4);
        assert_eq!(classified.ligand.id, "L");
        assert_eq!(classified.ligand_atoms().len(), 1);
    }

    #[test]
    fn multi_chain_receptor_is_merged() {
        let builder = receptor_residues(ComplexBuilder::new(), "A", 1..4);
        let builder = builder.chain("L").residue(900, "LIG").atom("C1", [0.0; 3]);
        let builder = receptor_residues(builder, "B", 10..13);
        let classified = classify_chains(builder.build()).unwrap();

        assert_eq!(classified.receptor.id, "A");
        let resis: Vec<isize> = classified.receptor.residues.iter().map(|r| r.resi).collect();
        assert_eq!(resis, vec![1, 2, 3, 10, 11, 12]);
        // Atoms keep the chain they were read from
        let moved = classified.receptor.residue(11).unwrap();
        assert_eq!(moved.atoms[0].chain, "B");
    }

    #[test]
    fn receptor_side_ion_is_not_the_ligand() {
        let builder = receptor_residues(ComplexBuilder::new(), "A", 1..5)
            .origin(ChainOrigin::Receptor)
            .chain("B")
            .origin(ChainOrigin::Receptor)
            .residue(2001, "NA")
            .atom("NA", [5.0, 5.0, 5.0])
            .chain("L")
            .origin(ChainOrigin::Ligand)
            .residue(1, "LIG")
            .atom("C1", [0.0, 3.0, 0.0]);
        let classified = classify_chains(builder.build()).unwrap();
        assert_eq!(classified.ligand.id, "L");
        assert_eq!(classified.ligand.residues[0].name, "LIG");
        assert_eq!(classified.receptor.residue_count(), 4);
    }

    #[test]
    fn ligand_file_chain_preferred_over_untagged() {
        let builder = receptor_residues(ComplexBuilder::new(), "A", 1..5)
            .chain("X")
            .residue(1, "HEM")
            .atom("FE", [9.0, 9.0, 9.0])
            .chain("L")
            .origin(ChainOrigin::Ligand)
            .residue(1, "LIG")
            .atom("C1", [0.0, 3.0, 0.0]);
        let classified = classify_chains(builder.build()).unwrap();
        assert_eq!(classified.ligand.id, "L");
    }

    #[test]
    fn only_receptor_side_single_residue_chains() {
        let builder = receptor_residues(ComplexBuilder::new(), "A", 1..5)
            .chain("B")
            .origin(ChainOrigin::Receptor)
            .residue(2001, "NA")
            .atom("NA", [5.0, 5.0, 5.0]);
        assert_eq!(classify_chains(builder.build()).unwrap_err(), ChainError::NoLigand);
    }

    #[test]
    fn missing_receptor_is_an_error() {
        let complex = ComplexBuilder::new()
            .chain("L")
            .residue(1, "LIG")
            .atom("C1", [0.0; 3])
            .build();
        assert_eq!(classify_chains(complex).unwrap_err(), ChainError::NoReceptor);
    }

    #[test]
    fn missing_ligand_is_an_error() {
        let complex = receptor_residues(ComplexBuilder::new(), "A", 1..3).build();
        assert_eq!(classify_chains(complex).unwrap_err(), ChainError::NoLigand);
    }
}
