//! Batch processing of docking entries into the BW interaction table.
use crate::boundaries::{BoundaryTable, TmBoundaries};
use crate::bw::{bw_code, BwCode, TmDomain};
use crate::chains::{classify_chains, ClassifiedComplex};
use crate::detector::{DetectionRequest, DetectorOptions, InteractionDetector};
use crate::errors::{EntryError, TableError};
use crate::interactions::{residue_interactions, Category};
use crate::loader::StructureLoader;
use crate::output::{FinalizedTable, OutputSchema, OutputTable};
use crate::scoring::{score_residue, ResidueScore};
use crate::structure::{Atom, AtomId};
use crate::utils::{run_with_threads, string_column};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// One docking result.
///
/// Fields are `None` where the docking table holds a null. Such entries still
/// get their output row and fail on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Row of the docking table, and of the output table
    pub index: usize,
    /// Reference to the docked ligand structure
    pub ligand: Option<String>,
    /// Reference to the receptor structure
    pub receptor: Option<String>,
    /// Target identifier joined against the boundary table
    pub target: Option<String>,
}

impl Entry {
    /// First of `ligand`, `receptor` and `target` that holds no value.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("ligand", &self.ligand),
            ("receptor", &self.receptor),
            ("target", &self.target),
        ]
        .into_iter()
        .find_map(|(field, value)| value.is_none().then_some(field))
    }
}

/// Field names of the input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    pub ligand: String,
    pub receptor: String,
    pub target: String,
    /// Target identifier field of the boundary table
    pub boundary_target: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            ligand: "ligand".to_string(),
            receptor: "receptor".to_string(),
            target: "target".to_string(),
            boundary_target: "target".to_string(),
        }
    }
}

/// Read the docking table, one [`Entry`] per row.
///
/// Only a missing column is an error. Null cells are kept on the entry.
pub fn entries_from_df(
    df: &DataFrame,
    columns: &TableColumns,
) -> Result<Vec<Entry>, TableError> {
    let ligands = string_column(df, &columns.ligand)?;
    let receptors = string_column(df, &columns.receptor)?;
    let targets = string_column(df, &columns.target)?;

    Ok(ligands
        .into_iter()
        .zip(receptors)
        .zip(targets)
        .enumerate()
        .map(|(index, ((ligand, receptor), target))| Entry {
            index,
            ligand,
            receptor,
            target,
        })
        .collect())
}

/// Runtime settings of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub detector: DetectorOptions,
    /// Worker threads, 0 for all cores. Entries are processed in parallel
    /// unless this is 1.
    pub num_threads: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            detector: DetectorOptions::default(),
            num_threads: 1,
        }
    }
}

/// State owned by the worker processing one entry.
///
/// The loaded structure lives exactly as long as this context.
pub struct EntryContext<'a> {
    pub entry: &'a Entry,
    pub boundaries: &'a TmBoundaries,
    pub complex: ClassifiedComplex,
    ligand_ids: HashSet<AtomId>,
}

impl<'a> EntryContext<'a> {
    pub fn new(
        entry: &'a Entry,
        boundaries: &'a TmBoundaries,
        complex: ClassifiedComplex,
    ) -> Self {
        let ligand_ids = complex.ligand_atom_ids();
        Self {
            entry,
            boundaries,
            complex,
            ligand_ids,
        }
    }
}

/// Everything produced for one entry, applied to the output table afterwards.
#[derive(Debug)]
pub struct EntryOutcome {
    pub index: usize,
    /// Residue scores in processing order
    pub scores: Vec<(BwCode, ResidueScore)>,
    pub errors: Vec<EntryError>,
}

impl EntryOutcome {
    fn failed(index: usize, error: EntryError) -> Self {
        Self {
            index,
            scores: vec![],
            errors: vec![error],
        }
    }
}

/// An entry that could not be fully processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub entry: usize,
    pub stage: String,
    pub message: String,
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub entries: usize,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    /// Number of entries without any failure.
    pub fn succeeded(&self) -> usize {
        let failed: HashSet<usize> = self.failures.iter().map(|f| f.entry).collect();
        self.entries - failed.len()
    }

    pub fn to_df(&self) -> PolarsResult<DataFrame> {
        df!(
            "entry" => self.failures.iter().map(|f| f.entry as u64).collect::<Vec<u64>>(),
            "stage" => self.failures.iter().map(|f| f.stage.clone()).collect::<Vec<String>>(),
            "message" => self.failures.iter().map(|f| f.message.clone()).collect::<Vec<String>>(),
        )
    }
}

/// Drives entries through loading, classification, detection and scoring.
pub struct BatchProcessor<'a> {
    loader: &'a dyn StructureLoader,
    detector: &'a dyn InteractionDetector,
    boundaries: &'a BoundaryTable,
    options: BatchOptions,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        loader: &'a dyn StructureLoader,
        detector: &'a dyn InteractionDetector,
        boundaries: &'a BoundaryTable,
        options: BatchOptions,
    ) -> Self {
        Self {
            loader,
            detector,
            boundaries,
            options,
        }
    }

    /// Process a single entry.
    ///
    /// A null field, a missing boundary record, a failed load or an
    /// unclassifiable complex stop the entry. A detector failure only skips the affected residue.
    pub fn process_entry(&self, entry: &Entry) -> EntryOutcome {
        if let Some(field) = entry.missing_field() {
            let error = EntryError::MissingValue(field.to_string());
            return EntryOutcome::failed(entry.index, error);
        }

        let target = entry.target.as_deref().unwrap_or_default();
        let Some(boundaries) = self.boundaries.get(target) else {
            let error = EntryError::TargetNotFound(target.to_string());
            return EntryOutcome::failed(entry.index, error);
        };

        let complex = match self
            .loader
            .load(entry)
            .map_err(EntryError::from)
            .and_then(|c| classify_chains(c).map_err(EntryError::from))
        {
            Ok(complex) => complex,
            Err(e) => return EntryOutcome::failed(entry.index, e),
        };
        debug!(
            "Entry {}: receptor chain {} with {} residues, ligand chain {}",
            entry.index,
            complex.receptor.id,
            complex.receptor.residue_count(),
            complex.ligand.id
        );

        let ctx = EntryContext::new(entry, boundaries, complex);
        let mut outcome = EntryOutcome {
            index: entry.index,
            scores: vec![],
            errors: vec![],
        };
        for tm in TmDomain::all() {
            self.process_domain(&ctx, tm, &mut outcome);
        }
        outcome
    }

    fn process_domain(&self, ctx: &EntryContext<'_>, tm: TmDomain, outcome: &mut EntryOutcome) {
        let boundary = ctx.boundaries.get(tm);
        debug!(
            "Entry {}: TM{tm} start {} x50 {} end {}",
            ctx.entry.index, boundary.start, boundary.x50, boundary.end
        );
        let ligand_atoms: Vec<&Atom> = ctx.complex.ligand_atoms();

        for resi in boundary.residues() {
            let code = bw_code(tm, resi, boundary);
            let Some(residue) = ctx.complex.receptor.residue(resi) else {
                trace!("Entry {}: {code} (residue {resi}) is missing", ctx.entry.index);
                outcome.scores.push((code, ResidueScore::missing()));
                continue;
            };

            let receptor_atoms: Vec<&Atom> = residue.atoms.iter().collect();
            let request = DetectionRequest {
                entry: ctx.entry.index,
                categories: &Category::ALL,
                ligand: &ligand_atoms,
                receptor: &receptor_atoms,
                options: &self.options.detector,
            };
            let candidates = match self.detector.detect(&request) {
                Ok(candidates) => candidates,
                Err(source) => {
                    outcome.errors.push(EntryError::Detector { tm, resi, source });
                    continue;
                }
            };

            let residue_ids: HashSet<AtomId> = residue.atoms.iter().map(|a| a.id).collect();
            let interactions = residue_interactions(candidates, &ctx.ligand_ids, &residue_ids);
            let score = score_residue(&interactions);
            trace!(
                "Entry {}: {code} {} sum {:.3} from {} interactions",
                ctx.entry.index,
                residue.name,
                score.sum,
                interactions.len()
            );
            outcome.scores.push((code, score));
        }
    }

    /// Process every entry and return the finalized table with a report.
    ///
    /// Output rows follow `entries` order. The sentinel post-pass always runs
    /// once, after every entry, whatever failed along the way.
    pub fn run(&self, entries: &[Entry], schema: OutputSchema) -> (FinalizedTable, BatchReport) {
        info!(
            "Processing {} entries against {} TM boundary records ({} output fields)",
            entries.len(),
            self.boundaries.len(),
            schema.len()
        );

        let outcomes: Vec<EntryOutcome> = if self.options.num_threads == 1 {
            entries.iter().map(|e| self.process_entry(e)).collect()
        } else {
            run_with_threads(self.options.num_threads, || {
                debug!("Using {} thread(s)", rayon::current_num_threads());
                entries.par_iter().map(|e| self.process_entry(e)).collect()
            })
        };

        let mut table = OutputTable::new(schema, entries.len());
        let mut report = BatchReport {
            entries: entries.len(),
            failures: vec![],
        };
        for (row, outcome) in outcomes.into_iter().enumerate() {
            for error in outcome.errors {
                warn!("Entry {}: {error}", outcome.index);
                report.failures.push(Failure {
                    entry: outcome.index,
                    stage: error.stage().to_string(),
                    message: error.to_string(),
                });
            }
            for (code, score) in &outcome.scores {
                if let Err(e) = table.write_score(row, *code, score) {
                    warn!("Entry {}: {e}", outcome.index);
                    report.failures.push(Failure {
                        entry: outcome.index,
                        stage: "output".to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let table = table.finalize();
        info!(
            "Finished {} entries: {} succeeded, {} failures",
            report.entries,
            report.succeeded(),
            report.failures.len()
        );
        (table, report)
    }
}
