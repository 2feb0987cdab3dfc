//! Error types for loading, classification, detection and table I/O.
use crate::bw::TmDomain;
use core::fmt;
use polars::prelude::PolarsError;

/// Failure to turn an entry's structure references into a [`crate::Complex`].
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened
    Io(String),
    /// The file was read but could not be parsed
    Parse { path: String, messages: Vec<String> },
    /// The file parsed but contained no atoms
    Empty { path: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "Failed to read structure: {msg}"),
            LoadError::Parse { path, messages } => {
                write!(f, "Failed to parse {path}: {}", messages.join("; "))
            }
            LoadError::Empty { path } => write!(f, "No atoms found in {path}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

/// The chains of a complex could not be split into a receptor and a ligand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// No chain has more than one residue
    NoReceptor,
    /// No chain consists of a single residue
    NoLigand,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::NoReceptor => write!(f, "No multi-residue receptor chain found"),
            ChainError::NoLigand => write!(f, "No single-residue ligand chain found"),
        }
    }
}

impl std::error::Error for ChainError {}

/// Failure reported by an [`crate::InteractionDetector`].
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// The candidate table is malformed
    Table(String),
    /// A candidate carries a category name that is not recognized
    UnknownCategory(String),
    /// An atom selector does not follow the `chain/resi/atom` format
    UnresolvedAtom(String),
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorError::Table(msg) => write!(f, "Invalid interaction table: {msg}"),
            DetectorError::UnknownCategory(name) => {
                write!(f, "Unknown interaction category '{name}'")
            }
            DetectorError::UnresolvedAtom(sel) => write!(f, "Malformed atom selector '{sel}'"),
        }
    }
}

impl std::error::Error for DetectorError {}

/// Failure to read or build one of the tabular inputs and outputs.
#[derive(Debug)]
pub enum TableError {
    Polars(PolarsError),
    /// A required column is absent
    MissingColumn(String),
    /// A cell holds a null or out-of-range value
    InvalidValue { column: String, row: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Polars(e) => write!(f, "{e}"),
            TableError::MissingColumn(name) => write!(f, "Missing column '{name}'"),
            TableError::InvalidValue { column, row } => {
                write!(f, "Invalid value in column '{column}' at row {row}")
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Polars(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PolarsError> for TableError {
    fn from(err: PolarsError) -> Self {
        TableError::Polars(err)
    }
}

/// Reason a single docking entry could not be (fully) processed.
#[derive(Debug)]
pub enum EntryError {
    /// A field of the docking table row is null
    MissingValue(String),
    StructureLoad(LoadError),
    /// The entry's target has no TM boundary record
    TargetNotFound(String),
    Chains(ChainError),
    Detector {
        tm: TmDomain,
        resi: isize,
        source: DetectorError,
    },
}

impl EntryError {
    /// Short label of the processing stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            EntryError::MissingValue(_) => "input",
            EntryError::StructureLoad(_) => "load",
            EntryError::TargetNotFound(_) => "boundaries",
            EntryError::Chains(_) => "chains",
            EntryError::Detector { .. } => "detector",
        }
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::MissingValue(field) => write!(f, "No {field} given"),
            EntryError::StructureLoad(e) => write!(f, "{e}"),
            EntryError::TargetNotFound(target) => {
                write!(f, "No TM boundaries for target '{target}'")
            }
            EntryError::Chains(e) => write!(f, "{e}"),
            EntryError::Detector { tm, resi, source } => {
                write!(f, "Detector failed on TM{tm} residue {resi}: {source}")
            }
        }
    }
}

impl std::error::Error for EntryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EntryError::StructureLoad(e) => Some(e),
            EntryError::Chains(e) => Some(e),
            EntryError::Detector { source, .. } => Some(source),
            EntryError::MissingValue(_) | EntryError::TargetNotFound(_) => None,
        }
    }
}

impl From<LoadError> for EntryError {
    fn from(err: LoadError) -> Self {
        EntryError::StructureLoad(err)
    }
}

impl From<ChainError> for EntryError {
    fn from(err: ChainError) -> Self {
        EntryError::Chains(err)
    }
}

/// Invalid write into an [`crate::OutputTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutputError {
    /// The field is not part of the output schema
    UnknownField(String),
    /// The row index is past the end of the table
    RowOutOfRange { row: usize, rows: usize },
    /// A numeric value was written to a categorical field or vice versa
    TypeMismatch(String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::UnknownField(name) => write!(f, "Field '{name}' is not in the schema"),
            OutputError::RowOutOfRange { row, rows } => {
                write!(f, "Row {row} is out of range for a table of {rows} rows")
            }
            OutputError::TypeMismatch(name) => write!(f, "Wrong value type for field '{name}'"),
        }
    }
}

impl std::error::Error for OutputError {}
