//! # bwcontacts
//!
//! Per-ligand interaction profiles of class A GPCR docking results, keyed by
//! Ballesteros-Weinstein position.
//!
//! For every docking entry the receptor and ligand are loaded, the receptor's
//! seven transmembrane helices are walked residue by residue, and the
//! interactions an [`InteractionDetector`] reports between the ligand and each
//! residue are reduced to an energy sum plus the first two interactions. The
//! results land in one wide table with five fields per BW position, returned
//! as a Polars DataFrame.

pub mod boundaries;
pub mod bw;
pub mod chains;
pub mod detector;
pub mod errors;
pub mod interactions;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod structure;
mod utils;

// Re-export key public types
pub use boundaries::{BoundaryTable, TmBoundaries};
pub use bw::{bw_code, bw_position, BwCode, TmBoundary, TmDomain};
pub use chains::{classify_chains, ClassifiedComplex};
pub use detector::{DetectionRequest, DetectorOptions, InteractionDetector, TabulatedDetector};
pub use errors::{ChainError, DetectorError, EntryError, LoadError, OutputError, TableError};
pub use loader::{load_model, PdbFileLoader, StructureLoader};
pub use output::{FieldKey, FieldKind, FinalizedTable, OutputSchema, OutputTable, Slot, NA};
pub use pipeline::{
    entries_from_df, BatchOptions, BatchProcessor, BatchReport, Entry, Failure, TableColumns,
};
pub use structure::{Atom, AtomId, Complex, ComplexBuilder};
pub use utils::{read_df_from_file, run_with_threads, write_df_to_file, DataFrameFileType};

use polars::prelude::*;
use tracing::debug;

/// Compute the BW interaction profile of every row of a docking table.
///
/// # Arguments
///
/// * `docking` - One row per docking result, with ligand, receptor and target fields
/// * `boundaries` - One row per target with `TM{k}_start`, `TM_{k}.50` and `TM{k}_end`
/// * `columns` - Field names of both tables
/// * `loader` - Source of the structures named in `docking`
/// * `detector` - Source of the raw interaction candidates
/// * `options` - Detector thresholds and thread count
///
/// # Returns
///
/// The profile DataFrame, one row per docking entry in input order with five
/// columns per BW position (`{tm}.{pos}_intenergysum`, `_intenergy1`,
/// `_inttype1`, `_intenergy2`, `_inttype2`), plus the report of entries that
/// failed. Failed entries keep their row, filled with `NaN`/`"NA"`.
///
/// # Example
///
/// ```no_run
/// use bwcontacts::*;
/// use std::path::Path;
///
/// let docking = read_df_from_file(Path::new("docking.csv")).unwrap();
/// let boundaries = read_df_from_file(Path::new("tm_boundaries.csv")).unwrap();
/// let candidates = read_df_from_file(Path::new("interactions.csv")).unwrap();
/// let detector = TabulatedDetector::from_df(&candidates).unwrap();
///
/// let (profiles, report) = get_bw_profiles(
///     &docking,
///     &boundaries,
///     &TableColumns::default(),
///     &PdbFileLoader,
///     &detector,
///     BatchOptions::default(),
/// )
/// .unwrap();
/// println!("{} rows, {} failures", profiles.height(), report.failures.len());
/// ```
pub fn get_bw_profiles(
    docking: &DataFrame,
    boundaries: &DataFrame,
    columns: &TableColumns,
    loader: &dyn StructureLoader,
    detector: &dyn InteractionDetector,
    options: BatchOptions,
) -> Result<(DataFrame, BatchReport), TableError> {
    let boundaries = BoundaryTable::from_df(boundaries, &columns.boundary_target)?;
    let entries = entries_from_df(docking, columns)?;
    let schema = OutputSchema::from_boundaries(&boundaries);
    debug!(
        "Read {} entries and {} targets, {} output fields",
        entries.len(),
        boundaries.len(),
        schema.len()
    );

    let processor = BatchProcessor::new(loader, detector, &boundaries, options);
    let (table, report) = processor.run(&entries, schema);
    Ok((table.to_df()?, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(name: &str) -> String {
        let root = env!("CARGO_MANIFEST_DIR");
        format!("{}/test-data/{}", root, name)
    }

    fn boundary_df() -> DataFrame {
        // TM3 covers the fixture receptor, residues 110..=115 with 113 at x.50
        let mut columns = vec![Column::new("target".into(), ["test_receptor"])];
        for tm in TmDomain::all() {
            let (start, x50, end) = if tm.number() == 3 {
                (110i64, 113, 115)
            } else {
                let base = 300 + 40 * i64::from(tm.number());
                (base, base + 10, base + 20)
            };
            columns.push(Column::new(boundaries::start_column(tm).into(), [start]));
            columns.push(Column::new(boundaries::anchor_column(tm).into(), [x50]));
            columns.push(Column::new(boundaries::end_column(tm).into(), [end]));
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn profiles_from_files() {
        let docking = df!(
            "ligand" => [test_file("ligand.pdb"), test_file("missing.pdb")],
            "receptor" => [test_file("receptor.pdb"), test_file("receptor.pdb")],
            "target" => ["test_receptor", "test_receptor"],
        )
        .unwrap();
        let candidates = df!(
            "entry" => [0i64, 0, 0],
            "interaction" => ["Hbond", "Ionic", "Distance"],
            "from" => ["L/1/N1", "A/113/OD1;A/113/OD2", "L/1/C1"],
            "to" => ["A/113/OD1", "L/1/N1", "A/114/OG"],
            "energy" => [Some(-2.5), Some(-4.0), None],
        )
        .unwrap();
        let detector = TabulatedDetector::from_df(&candidates).unwrap();

        let (df, report) = get_bw_profiles(
            &docking,
            &boundary_df(),
            &TableColumns::default(),
            &PdbFileLoader,
            &detector,
            BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry, 1);
        assert_eq!(report.failures[0].stage, "load");

        let f64_at = |name: &str, row: usize| df.column(name).unwrap().f64().unwrap().get(row);
        let str_at = |name: &str, row: usize| {
            df.column(name)
                .unwrap()
                .str()
                .unwrap()
                .get(row)
                .map(|s| s.to_string())
        };

        assert_eq!(f64_at("3.50_intenergysum", 0), Some(-6.5));
        assert_eq!(str_at("3.50_inttype1", 0).as_deref(), Some("hbdon"));
        assert_eq!(str_at("3.50_inttype2", 0).as_deref(), Some("ion"));
        // Distance contacts count for nothing
        assert_eq!(f64_at("3.51_intenergysum", 0), Some(0.0));
        assert_eq!(str_at("3.51_inttype1", 0).as_deref(), Some(NA));
        // Residues absent from the structure
        assert!(f64_at("1.50_intenergysum", 0).unwrap().is_nan());
        assert!(f64_at("3.50_intenergysum", 1).unwrap().is_nan());
    }

    #[test]
    fn null_docking_cells_keep_rows() {
        let receptor = test_file("receptor_with_water.pdb");
        let docking = df!(
            "ligand" => [None, Some(test_file("ligand.pdb"))],
            "receptor" => [receptor.clone(), receptor],
            "target" => ["test_receptor", "test_receptor"],
        )
        .unwrap();
        let candidates = df!(
            "entry" => [1i64],
            "interaction" => ["Hbond"],
            "from" => ["L/1/N1"],
            "to" => ["A/113/OD1"],
            "energy" => [-2.5],
        )
        .unwrap();
        let detector = TabulatedDetector::from_df(&candidates).unwrap();

        let (df, report) = get_bw_profiles(
            &docking,
            &boundary_df(),
            &TableColumns::default(),
            &PdbFileLoader,
            &detector,
            BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, "input");
        let sums = df.column("3.50_intenergysum").unwrap().f64().unwrap().clone();
        assert!(sums.get(0).unwrap().is_nan());
        // The sodium chain of the receptor file does not replace the ligand
        assert_eq!(sums.get(1), Some(-2.5));
    }
}
