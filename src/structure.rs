//! In-memory representation of a loaded receptor-ligand complex.
use core::fmt;
use nalgebra as na;
use pdbtbx::*;
use tracing::debug;

/// Identifier of an atom that is unique within one [`Complex`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AtomId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Unique handle within the complex
    pub id: AtomId,
    /// Serial number from the source file
    pub serial: usize,
    /// Atom name, e.g. `OG1`
    pub name: String,
    /// Chain the atom was read from
    pub chain: String,
    /// Sequential id of the residue the atom was read from
    pub resi: isize,
    pub pos: na::Point3<f64>,
}

impl Atom {
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        na::distance_squared(&self.pos, &other.pos)
    }

    /// Whether the atom is addressed by `chain/resi/name`.
    pub fn matches(&self, chain: &str, resi: isize, name: &str) -> bool {
        self.resi == resi && self.name == name && self.chain == chain
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {chain}, Residue {resi}, Atom {name} {serial}",
            chain = self.chain,
            resi = self.resi,
            name = self.name,
            serial = self.serial
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Sequential residue id, unique within its chain
    pub resi: isize,
    pub name: String,
    pub atoms: Vec<Atom>,
}

/// Input structure a chain was read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainOrigin {
    /// Built directly, without a source file
    #[default]
    Unspecified,
    Receptor,
    Ligand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    pub origin: ChainOrigin,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// First residue with the sequential id `resi`, if the structure has it.
    pub fn residue(&self, resi: isize) -> Option<&Residue> {
        self.residues.iter().find(|r| r.resi == resi)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.atoms.iter())
    }
}

/// All chains of a receptor and its docked ligand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Complex {
    pub chains: Vec<Chain>,
}

impl Complex {
    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atoms().count()).sum()
    }
}

/// Whether `name` is a standard amino acid, including the protonation
/// variants written by common docking preparation tools.
pub fn is_amino_acid(name: &str) -> bool {
    matches!(
        name.trim().to_ascii_uppercase().as_str(),
        "ALA"
            | "ARG"
            | "ASN"
            | "ASP"
            | "CYS"
            | "GLN"
            | "GLU"
            | "GLY"
            | "HIS"
            | "ILE"
            | "LEU"
            | "LYS"
            | "MET"
            | "PHE"
            | "PRO"
            | "SER"
            | "THR"
            | "TRP"
            | "TYR"
            | "VAL"
            | "HID"
            | "HIE"
            | "HIP"
            | "HSD"
            | "HSE"
            | "HSP"
            | "CYX"
            | "ASH"
            | "GLH"
            | "LYN"
    )
}

/// Assembles a [`Complex`] and hands out complex-unique [`AtomId`]s.
#[derive(Debug, Default)]
pub struct ComplexBuilder {
    chains: Vec<Chain>,
    next_atom: usize,
}

impl ComplexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new, empty chain.
    pub fn chain(mut self, id: &str) -> Self {
        self.chains.push(Chain {
            id: id.to_string(),
            origin: ChainOrigin::Unspecified,
            residues: vec![],
        });
        self
    }

    /// Mark the current chain as read from the receptor or the ligand.
    pub fn origin(mut self, origin: ChainOrigin) -> Self {
        self.current_chain().origin = origin;
        self
    }

    /// Start a new residue on the current chain.
    pub fn residue(mut self, resi: isize, name: &str) -> Self {
        self.push_residue(resi, name);
        self
    }

    /// Add an atom to the current residue.
    pub fn atom(mut self, name: &str, pos: [f64; 3]) -> Self {
        let serial = self.next_atom + 1;
        self.push_atom(serial, name, na::Point3::from(pos));
        self
    }

    /// Append every chain of the first model of `pdb`.
    ///
    /// For receptor structures only amino acid residues are kept, so waters,
    /// ions and cofactors never take the place of a protein residue. Chains
    /// left without residues are dropped.
    pub fn add_pdb(&mut self, pdb: &PDB, origin: ChainOrigin) {
        let Some(model) = pdb.models().next() else {
            return;
        };
        for chain in model.chains() {
            self.chains.push(Chain {
                id: chain.id().to_string(),
                origin,
                residues: vec![],
            });
            for residue in chain.residues() {
                let name = residue.name().unwrap_or("");
                if origin == ChainOrigin::Receptor && !is_amino_acid(name) {
                    debug!(
                        "Skipping {name} {} on receptor chain {}",
                        residue.serial_number(),
                        chain.id()
                    );
                    continue;
                }
                self.push_residue(residue.serial_number(), name);
                for atom in residue.atoms() {
                    let (x, y, z) = atom.pos();
                    self.push_atom(atom.serial_number(), atom.name(), na::Point3::new(x, y, z));
                }
            }
            if self.chains.last().is_some_and(|c| c.residues.is_empty()) {
                self.chains.pop();
            }
        }
    }

    pub fn build(self) -> Complex {
        Complex {
            chains: self.chains,
        }
    }

    fn current_chain(&mut self) -> &mut Chain {
        if self.chains.is_empty() {
            self.chains.push(Chain {
                id: String::new(),
                origin: ChainOrigin::Unspecified,
                residues: vec![],
            });
        }
        let last = self.chains.len() - 1;
        &mut self.chains[last]
    }

    fn push_residue(&mut self, resi: isize, name: &str) {
        self.current_chain().residues.push(Residue {
            resi,
            name: name.to_string(),
            atoms: vec![],
        });
    }

    fn push_atom(&mut self, serial: usize, name: &str, pos: na::Point3<f64>) {
        let id = AtomId(self.next_atom);
        self.next_atom += 1;

        let chain = self.current_chain();
        let chain_id = chain.id.clone();
        if chain.residues.is_empty() {
            chain.residues.push(Residue {
                resi: 0,
                name: String::new(),
                atoms: vec![],
            });
        }
        if let Some(residue) = chain.residues.last_mut() {
            residue.atoms.push(Atom {
                id,
                serial,
                name: name.to_string(),
                chain: chain_id,
                resi: residue.resi,
                pos,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_unique_ids() {
        let complex = ComplexBuilder::new()
            .chain("A")
            .residue(1, "ALA")
            .atom("N", [0.0, 0.0, 0.0])
            .atom("CA", [1.0, 0.0, 0.0])
            .chain("L")
            .residue(1, "LIG")
            .atom("C1", [5.0, 0.0, 0.0])
            .build();

        let ids: Vec<AtomId> = complex
            .chains
            .iter()
            .flat_map(|c| c.atoms().map(|a| a.id))
            .collect();
        assert_eq!(ids, vec![AtomId(0), AtomId(1), AtomId(2)]);
        assert_eq!(complex.atom_count(), 3);

        let lig_atom = &complex.chains[1].residues[0].atoms[0];
        assert!(lig_atom.matches("L", 1, "C1"));
        assert!(!lig_atom.matches("A", 1, "C1"));
    }

    #[test]
    fn residue_lookup_by_id() {
        let complex = ComplexBuilder::new()
            .chain("A")
            .residue(10, "SER")
            .residue(12, "THR")
            .build();
        let chain = &complex.chains[0];
        assert_eq!(chain.residue(12).map(|r| r.name.as_str()), Some("THR"));
        assert!(chain.residue(11).is_none());
    }

    #[test]
    fn amino_acids_and_hetero_residues() {
        assert!(is_amino_acid("SER"));
        assert!(is_amino_acid("hie"));
        assert!(!is_amino_acid("HOH"));
        assert!(!is_amino_acid("NA"));
        assert!(!is_amino_acid("LIG"));
    }

    #[test]
    fn origin_marks_current_chain() {
        let complex = ComplexBuilder::new()
            .chain("A")
            .origin(ChainOrigin::Receptor)
            .residue(1, "ALA")
            .chain("L")
            .residue(1, "LIG")
            .build();
        assert_eq!(complex.chains[0].origin, ChainOrigin::Receptor);
        assert_eq!(complex.chains[1].origin, ChainOrigin::Unspecified);
    }

    #[test]
    fn squared_distance() {
        let complex = ComplexBuilder::new()
            .residue(1, "GLY")
            .atom("N", [0.0, 0.0, 0.0])
            .atom("CA", [1.0, 2.0, 2.0])
            .build();
        let atoms = &complex.chains[0].residues[0].atoms;
        assert_eq!(atoms[0].distance_squared(&atoms[1]), 9.0);
    }
}
