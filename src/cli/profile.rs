use bwcontacts::{
    get_bw_profiles, read_df_from_file, write_df_to_file, BatchOptions, DataFrameFileType,
    DetectorOptions, PdbFileLoader, TableColumns, TabulatedDetector,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Table of docking results (CSV or Parquet), one row per docked ligand
    #[arg(short, long)]
    docking: PathBuf,

    /// Table of TM helix boundaries per target (CSV or Parquet)
    #[arg(short, long)]
    boundaries: PathBuf,

    /// Pre-computed interaction candidates with the columns
    /// entry, interaction, from, to and energy
    #[arg(short, long)]
    interactions: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the output file
    #[arg(short = 'f', long = "filename", default_value_t = String::from("bw_profiles"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Docking table column holding the ligand structure path
    #[arg(long, default_value_t = String::from("ligand"))]
    ligand_column: String,

    /// Docking table column holding the receptor structure path
    #[arg(long, default_value_t = String::from("receptor"))]
    receptor_column: String,

    /// Docking table column holding the target identifier
    #[arg(long, default_value_t = String::from("target"))]
    target_column: String,

    /// Boundary table column holding the target identifier
    #[arg(long, default_value_t = String::from("target"))]
    boundary_target_column: String,

    /// Minimum |energy| in kcal/mol for hydrogen bonds
    #[arg(long, default_value_t = bwcontacts::detector::HBOND_ENERGY_MIN)]
    hbond_energy: f64,

    /// Minimum |energy| in kcal/mol for arene and hydrophobic contacts
    #[arg(long, default_value_t = bwcontacts::detector::HYDROPHOBIC_ENERGY_MIN)]
    hydrophobic_energy: f64,

    /// Minimum |energy| in kcal/mol for ionic and metal contacts
    #[arg(long, default_value_t = bwcontacts::detector::IONIC_ENERGY_MIN)]
    ionic_energy: f64,

    /// Distance cutoff in Å for plain distance contacts
    #[arg(long, default_value_t = bwcontacts::detector::DISTANCE_THRESHOLD)]
    distance_threshold: f64,

    /// Keep hydrogen bonds between two receptor atoms
    #[arg(long, default_value_t = false)]
    receptor_receptor_hbonds: bool,

    /// Number of threads to use for parallel processing, 0 for all cores
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

impl Args {
    fn columns(&self) -> TableColumns {
        TableColumns {
            ligand: self.ligand_column.clone(),
            receptor: self.receptor_column.clone(),
            target: self.target_column.clone(),
            boundary_target: self.boundary_target_column.clone(),
        }
    }

    fn options(&self) -> BatchOptions {
        BatchOptions {
            detector: DetectorOptions {
                hbond_energy_min: self.hbond_energy,
                hydrophobic_energy_min: self.hydrophobic_energy,
                ionic_energy_min: self.ionic_energy,
                distance_threshold: self.distance_threshold,
                include_receptor_receptor_hbonds: self.receptor_receptor_hbonds,
            },
            num_threads: self.num_threads,
        }
    }
}

fn read_input(path: &Path, what: &str) -> Option<polars::prelude::DataFrame> {
    match read_df_from_file(path) {
        Ok(df) => {
            debug!("Read {} rows of {what} from {}", df.height(), path.display());
            Some(df)
        }
        Err(e) => {
            error!("Failed to read {what} from {}: {e}", path.display());
            None
        }
    }
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let output_path = match std::path::absolute(&args.output) {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to resolve the output directory: {}", e);
            return;
        }
    };

    let Some(docking) = read_input(&args.docking, "docking results") else {
        return;
    };
    let Some(boundaries) = read_input(&args.boundaries, "TM boundaries") else {
        return;
    };
    let Some(candidates) = read_input(&args.interactions, "interaction candidates") else {
        return;
    };
    let detector = match TabulatedDetector::from_df(&candidates) {
        Ok(detector) => detector,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let (mut df_profiles, report) = match get_bw_profiles(
        &docking,
        &boundaries,
        &args.columns(),
        &PdbFileLoader,
        &detector,
        args.options(),
    ) {
        Ok(res) => res,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    // Prepare output directory
    if let Err(e) = std::fs::create_dir_all(&output_path) {
        error!("Failed to create {}: {e}", output_path.display());
        return;
    }
    let output_file = output_path.join(&args.filename);

    if let Err(e) = write_df_to_file(&mut df_profiles, &output_file, args.output_format) {
        error!("Failed to save results: {e}");
        return;
    }
    info!(
        "Results saved to {}",
        output_file
            .with_extension(args.output_format.to_string())
            .display()
    );

    if !report.failures.is_empty() {
        warn!(
            "{} of {} entries had failures",
            report.entries - report.succeeded(),
            report.entries
        );
        let failures_file = output_path.join(format!("{}_failures", args.filename));
        match report
            .to_df()
            .and_then(|mut df| write_df_to_file(&mut df, &failures_file, args.output_format))
        {
            Ok(()) => info!(
                "Failures saved to {}",
                failures_file
                    .with_extension(args.output_format.to_string())
                    .display()
            ),
            Err(e) => error!("Failed to save the failure report: {e}"),
        }
    }
}
