//! Loading receptor and ligand structures for a docking entry.
use crate::errors::LoadError;
use crate::pipeline::Entry;
use crate::structure::{ChainOrigin, Complex, ComplexBuilder};
use pdbtbx::*;
use std::path::Path;
use tracing::{debug, warn};

/// Source of the structures referenced by a docking entry.
///
/// Implementations must be shareable between worker threads.
pub trait StructureLoader: Sync {
    /// Load the receptor and ligand of `entry` into one complex, receptor
    /// chains first.
    fn load(&self, entry: &Entry) -> Result<Complex, LoadError>;
}

/// Open an atomic data file with [`pdbtbx::ReadOptions`].
///
/// Unlike a plain protein load, hetero residues are kept so that ligands
/// survive. Non-breaking problems in the file are logged and returned.
pub fn load_model(input_file: &str) -> Result<(PDB, Vec<PDBError>), LoadError> {
    if !Path::new(input_file).is_file() {
        return Err(LoadError::Io(format!("{input_file} does not exist")));
    }

    let (pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(input_file)
        .map_err(|errors| LoadError::Parse {
            path: input_file.to_string(),
            messages: errors.iter().map(|e| e.to_string()).collect(),
        })?;

    for e in &errors {
        match e.level() {
            pdbtbx::ErrorLevel::BreakingError | pdbtbx::ErrorLevel::InvalidatingError => {
                warn!("{input_file}: {e}")
            }
            _ => debug!("{input_file}: {e}"),
        }
    }

    if pdb.atom_count() == 0 {
        return Err(LoadError::Empty {
            path: input_file.to_string(),
        });
    }
    Ok((pdb, errors))
}

/// Reads the receptor and ligand paths of an entry as PDB or mmCIF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdbFileLoader;

impl StructureLoader for PdbFileLoader {
    fn load(&self, entry: &Entry) -> Result<Complex, LoadError> {
        let path = |p: &Option<String>, what: &str| {
            p.clone().ok_or_else(|| LoadError::Io(format!("No {what} structure given")))
        };
        let (receptor, _) = load_model(&path(&entry.receptor, "receptor")?)?;
        let (ligand, _) = load_model(&path(&entry.ligand, "ligand")?)?;

        let mut builder = ComplexBuilder::new();
        builder.add_pdb(&receptor, ChainOrigin::Receptor);
        builder.add_pdb(&ligand, ChainOrigin::Ligand);
        let complex = builder.build();
        debug!(
            "Loaded {} chains with {} atoms for entry {}",
            complex.chains.len(),
            complex.atom_count(),
            entry.index
        );
        Ok(complex)
    }
}
