//! The per-entry BW interaction table.
//!
//! Every BW position that can occur across the seven helices contributes five
//! fields: an energy sum and two `(energy, type)` pairs. The layout is fixed
//! once by an [`OutputSchema`]; writes address fields through [`FieldKey`]s
//! rather than by building names. Cells that are never written are filled
//! with sentinels by [`OutputTable::finalize`], which consumes the table so
//! the fill runs exactly once.
use crate::boundaries::BoundaryTable;
use crate::bw::{BwCode, TmDomain};
use crate::errors::OutputError;
use crate::scoring::ResidueScore;
use core::fmt;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

/// Sentinel for categorical cells that were never written.
pub const NA: &str = "NA";

/// One of the two individually reported interactions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn number(&self) -> usize {
        match self {
            Slot::First => 1,
            Slot::Second => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    Categorical,
}

/// The five fields stored for every BW position.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKind {
    EnergySum,
    Energy(Slot),
    Type(Slot),
}

impl FieldKind {
    /// Field order within one BW position.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::EnergySum,
        FieldKind::Energy(Slot::First),
        FieldKind::Type(Slot::First),
        FieldKind::Energy(Slot::Second),
        FieldKind::Type(Slot::Second),
    ];

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::EnergySum | FieldKind::Energy(_) => FieldType::Numeric,
            FieldKind::Type(_) => FieldType::Categorical,
        }
    }

    fn suffix(&self) -> String {
        match self {
            FieldKind::EnergySum => "intenergysum".to_string(),
            FieldKind::Energy(slot) => format!("intenergy{}", slot.number()),
            FieldKind::Type(slot) => format!("inttype{}", slot.number()),
        }
    }
}

/// Address of one output field, e.g. `3.32_inttype1`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldKey {
    pub code: BwCode,
    pub kind: FieldKind,
}

impl FieldKey {
    pub fn new(code: BwCode, kind: FieldKind) -> Self {
        Self { code, kind }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.code, self.kind.suffix())
    }
}

/// Enumerated set of output fields.
#[derive(Debug, Clone, Default)]
pub struct OutputSchema {
    fields: Vec<FieldKey>,
    index: HashMap<FieldKey, usize>,
}

impl OutputSchema {
    /// Build the schema for the given BW position ranges, ordered by helix,
    /// then position, then [`FieldKind::ALL`].
    pub fn from_ranges(ranges: &BTreeMap<TmDomain, RangeInclusive<isize>>) -> Self {
        let fields: Vec<FieldKey> = ranges
            .iter()
            .flat_map(|(tm, range)| {
                range.clone().flat_map(move |position| {
                    let code = BwCode { tm: *tm, position };
                    FieldKind::ALL.map(|kind| FieldKey::new(code, kind))
                })
            })
            .collect();
        let index = fields.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        Self { fields, index }
    }

    /// Schema covering every BW position of every target in `boundaries`.
    pub fn from_boundaries(boundaries: &BoundaryTable) -> Self {
        Self::from_ranges(&boundaries.position_ranges())
    }

    pub fn fields(&self) -> &[FieldKey] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, key: &FieldKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, code: &BwCode) -> bool {
        self.index.contains_key(&FieldKey::new(*code, FieldKind::EnergySum))
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Numeric(f64),
    Categorical(String),
}

#[derive(Debug, Clone)]
enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// Output cells accumulated during a batch, before sentinel filling.
#[derive(Debug, Clone)]
pub struct OutputTable {
    schema: OutputSchema,
    rows: usize,
    columns: Vec<ColumnData>,
}

impl OutputTable {
    /// An empty table with `rows` rows, one per docking entry.
    pub fn new(schema: OutputSchema, rows: usize) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|key| match key.kind.field_type() {
                FieldType::Numeric => ColumnData::Numeric(vec![None; rows]),
                FieldType::Categorical => ColumnData::Categorical(vec![None; rows]),
            })
            .collect();
        Self {
            schema,
            rows,
            columns,
        }
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Set a single cell. Writing the same value twice has no further effect.
    pub fn write(
        &mut self,
        row: usize,
        key: FieldKey,
        value: CellValue,
    ) -> Result<(), OutputError> {
        if row >= self.rows {
            return Err(OutputError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        let idx = self
            .schema
            .index_of(&key)
            .ok_or_else(|| OutputError::UnknownField(key.to_string()))?;
        match (&mut self.columns[idx], value) {
            (ColumnData::Numeric(col), CellValue::Numeric(v)) => col[row] = Some(v),
            (ColumnData::Categorical(col), CellValue::Categorical(v)) => col[row] = Some(v),
            _ => return Err(OutputError::TypeMismatch(key.to_string())),
        }
        Ok(())
    }

    /// Write the sum and every reported slot of a residue score.
    /// Unreported slots are left untouched.
    pub fn write_score(
        &mut self,
        row: usize,
        code: BwCode,
        score: &ResidueScore,
    ) -> Result<(), OutputError> {
        self.write(
            row,
            FieldKey::new(code, FieldKind::EnergySum),
            CellValue::Numeric(score.sum),
        )?;
        for (slot, value) in Slot::ALL.iter().zip(score.slots.iter()) {
            self.write(
                row,
                FieldKey::new(code, FieldKind::Energy(*slot)),
                CellValue::Numeric(value.energy),
            )?;
            self.write(
                row,
                FieldKey::new(code, FieldKind::Type(*slot)),
                CellValue::Categorical(value.label.clone()),
            )?;
        }
        Ok(())
    }

    /// The value written so far, `None` if the cell is still unset.
    pub fn get(&self, row: usize, key: &FieldKey) -> Option<CellValue> {
        let idx = self.schema.index_of(key)?;
        match &self.columns[idx] {
            ColumnData::Numeric(col) => col.get(row).copied().flatten().map(CellValue::Numeric),
            ColumnData::Categorical(col) => col
                .get(row)
                .cloned()
                .flatten()
                .map(CellValue::Categorical),
        }
    }

    /// Fill every unset cell with its sentinel: `NaN` for numeric fields and
    /// [`NA`] for categorical fields.
    pub fn finalize(self) -> FinalizedTable {
        let columns = self
            .columns
            .into_iter()
            .map(|col| match col {
                ColumnData::Numeric(values) => FinalColumn::Numeric(
                    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
                ),
                ColumnData::Categorical(values) => FinalColumn::Categorical(
                    values
                        .into_iter()
                        .map(|v| v.unwrap_or_else(|| NA.to_string()))
                        .collect(),
                ),
            })
            .collect();
        FinalizedTable {
            schema: self.schema,
            rows: self.rows,
            columns,
        }
    }
}

#[derive(Debug, Clone)]
enum FinalColumn {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

/// Output table in which every cell holds a value or its sentinel.
#[derive(Debug, Clone)]
pub struct FinalizedTable {
    schema: OutputSchema,
    rows: usize,
    columns: Vec<FinalColumn>,
}

impl FinalizedTable {
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, row: usize, key: &FieldKey) -> Option<CellValue> {
        let idx = self.schema.index_of(key)?;
        match &self.columns[idx] {
            FinalColumn::Numeric(col) => col.get(row).copied().map(CellValue::Numeric),
            FinalColumn::Categorical(col) => col.get(row).cloned().map(CellValue::Categorical),
        }
    }

    /// Convert to a DataFrame with one column per schema field, in schema order.
    pub fn to_df(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .schema
            .fields()
            .iter()
            .zip(self.columns.iter())
            .map(|(key, col)| {
                let name = PlSmallStr::from(key.to_string());
                match col {
                    FinalColumn::Numeric(values) => Column::new(name, values.as_slice()),
                    FinalColumn::Categorical(values) => Column::new(name, values.as_slice()),
                }
            })
            .collect::<Vec<Column>>();
        DataFrame::new(columns)
    }
}
