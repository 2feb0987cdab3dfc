use crate::errors::TableError;
use polars::prelude::*;
use std::path::Path;
use tracing::warn;

/// Run `f` inside a rayon pool of `num_threads` threads (0 for all cores).
///
/// Falls back to the calling thread if the pool cannot be built.
pub fn run_with_threads<F, R>(num_threads: usize, f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
    {
        Ok(pool) => pool.install(f),
        Err(e) => {
            warn!("Failed to build a pool of {num_threads} threads: {e}");
            f()
        }
    }
}

/// Read a CSV or Parquet file into a DataFrame, chosen by file extension.
pub fn read_df_from_file(file_path: &Path) -> PolarsResult<DataFrame> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("parquet") => {
            let file = std::fs::File::open(file_path)?;
            ParquetReader::new(file).finish()
        }
        _ => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
            .finish(),
    }
}

/// Write a DataFrame to `file_path`, replacing its extension with the one of `file_type`.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> PolarsResult<()> {
    let file_suffix = file_type.to_string();
    let mut file = std::fs::File::create(file_path.with_extension(file_suffix))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}

/// Extract a column as owned strings.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, TableError> {
    let column = df
        .column(name)
        .map_err(|_| TableError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Extract a column as signed integers. Values that do not fit are null.
pub(crate) fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<isize>>, TableError> {
    let column = df
        .column(name)
        .map_err(|_| TableError::MissingColumn(name.to_string()))?
        .cast(&DataType::Int64)?;
    Ok(column
        .i64()?
        .into_iter()
        .map(|v| v.and_then(|x| isize::try_from(x).ok()))
        .collect())
}

/// Extract a column as floats.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, TableError> {
    let column = df
        .column(name)
        .map_err(|_| TableError::MissingColumn(name.to_string()))?
        .cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}
