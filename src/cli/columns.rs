use bwcontacts::{read_df_from_file, BoundaryTable, OutputSchema};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Table of TM helix boundaries per target (CSV or Parquet)
    #[arg(short, long)]
    boundaries: PathBuf,

    /// Boundary table column holding the target identifier
    #[arg(long, default_value_t = String::from("target"))]
    boundary_target_column: String,
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let df = match read_df_from_file(&args.boundaries) {
        Ok(df) => df,
        Err(e) => {
            error!("Failed to read {}: {e}", args.boundaries.display());
            return;
        }
    };
    let boundaries = match BoundaryTable::from_df(&df, &args.boundary_target_column) {
        Ok(table) => table,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let schema = OutputSchema::from_boundaries(&boundaries);
    info!("{} fields for {} targets", schema.len(), boundaries.len());
    for key in schema.fields() {
        println!("{key}");
    }
}
