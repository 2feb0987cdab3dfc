//! Per-target transmembrane helix boundaries.
use crate::bw::{TmBoundary, TmDomain, TM_COUNT};
use crate::errors::TableError;
use crate::utils::{int_column, string_column};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

/// Boundaries of all seven helices of one target, indexed by helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmBoundaries([TmBoundary; TM_COUNT as usize]);

impl TmBoundaries {
    pub fn new(boundaries: [TmBoundary; TM_COUNT as usize]) -> Self {
        Self(boundaries)
    }

    pub fn get(&self, tm: TmDomain) -> &TmBoundary {
        &self.0[usize::from(tm.number() - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TmDomain, &TmBoundary)> {
        TmDomain::all().zip(self.0.iter())
    }
}

/// Name of the column holding the first residue of helix `k`.
pub fn start_column(tm: TmDomain) -> String {
    format!("TM{tm}_start")
}

/// Name of the column holding the `x.50` anchor residue of helix `k`.
pub fn anchor_column(tm: TmDomain) -> String {
    format!("TM_{tm}.50")
}

/// Name of the column holding the last residue of helix `k`.
pub fn end_column(tm: TmDomain) -> String {
    format!("TM{tm}_end")
}

/// Reference boundary data keyed by target identifier.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTable {
    targets: HashMap<String, TmBoundaries>,
}

impl BoundaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: &str, boundaries: TmBoundaries) {
        self.targets.insert(target.to_string(), boundaries);
    }

    /// Boundaries for `target`, matched by exact string comparison.
    pub fn get(&self, target: &str) -> Option<&TmBoundaries> {
        self.targets.get(target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Smallest range of BW positions per helix covering every target.
    pub fn position_ranges(&self) -> BTreeMap<TmDomain, RangeInclusive<isize>> {
        let mut ranges: BTreeMap<TmDomain, RangeInclusive<isize>> = BTreeMap::new();
        for boundaries in self.targets.values() {
            for (tm, boundary) in boundaries.iter() {
                let range = boundary.position_range();
                ranges
                    .entry(tm)
                    .and_modify(|r| {
                        *r = (*r.start()).min(*range.start())..=(*r.end()).max(*range.end())
                    })
                    .or_insert(range);
            }
        }
        ranges
    }

    /// Read the table from a DataFrame with one row per target.
    ///
    /// Every row needs the `target_column` plus `TM{k}_start`, `TM_{k}.50`
    /// and `TM{k}_end` for `k` in `1..=7`. Later rows replace earlier rows
    /// with the same target.
    pub fn from_df(df: &DataFrame, target_column: &str) -> Result<Self, TableError> {
        let targets = string_column(df, target_column)?;

        let mut columns = vec![];
        for tm in TmDomain::all() {
            columns.push([
                int_column(df, &start_column(tm))?,
                int_column(df, &anchor_column(tm))?,
                int_column(df, &end_column(tm))?,
            ]);
        }

        let mut table = Self::new();
        for (row, target) in targets.into_iter().enumerate() {
            let target = target.ok_or_else(|| TableError::InvalidValue {
                column: target_column.to_string(),
                row,
            })?;

            let mut boundaries = [TmBoundary::new(0, 0, 0); TM_COUNT as usize];
            for (tm, cols) in TmDomain::all().zip(columns.iter()) {
                let value = |i: usize, name: String| {
                    cols[i]
                        .get(row)
                        .copied()
                        .flatten()
                        .ok_or(TableError::InvalidValue { column: name, row })
                };
                boundaries[usize::from(tm.number() - 1)] = TmBoundary::new(
                    value(0, start_column(tm))?,
                    value(1, anchor_column(tm))?,
                    value(2, end_column(tm))?,
                );
            }
            table.insert(&target, TmBoundaries::new(boundaries));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_df() -> DataFrame {
        let mut columns = vec![Column::new(
            "target".into(),
            vec!["adrb2_human".to_string(), "drd2_human".to_string()],
        )];
        for tm in TmDomain::all() {
            let k = i64::from(tm.number());
            columns.push(Column::new(
                start_column(tm).into(),
                vec![k * 40, k * 40 + 1],
            ));
            columns.push(Column::new(
                anchor_column(tm).into(),
                vec![k * 40 + 15, k * 40 + 15],
            ));
            columns.push(Column::new(
                end_column(tm).into(),
                vec![k * 40 + 30, k * 40 + 28],
            ));
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn reads_all_helices() {
        let table = BoundaryTable::from_df(&boundary_df(), "target").unwrap();
        assert_eq!(table.len(), 2);

        let tm3 = TmDomain::new(3).unwrap();
        let adrb2 = table.get("adrb2_human").unwrap();
        assert_eq!(adrb2.get(tm3), &TmBoundary::new(120, 135, 150));
        assert!(table.get("ADRB2_HUMAN").is_none());
    }

    #[test]
    fn position_ranges_cover_all_targets() {
        let table = BoundaryTable::from_df(&boundary_df(), "target").unwrap();
        let ranges = table.position_ranges();
        assert_eq!(ranges.len(), 7);
        // start is 15 residues before the anchor, end at most 15 after
        assert_eq!(ranges[&TmDomain::new(1).unwrap()], 35..=65);
    }

    #[test]
    fn missing_column_is_reported() {
        let df = boundary_df().drop("TM_4.50").unwrap();
        match BoundaryTable::from_df(&df, "target") {
            Err(TableError::MissingColumn(name)) => assert_eq!(name, "TM_4.50"),
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
