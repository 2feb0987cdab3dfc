use super::{DetectionRequest, InteractionDetector};
use crate::errors::{DetectorError, TableError};
use crate::interactions::{nearest_pair, Category, InteractionCandidate};
use crate::structure::Atom;
use crate::utils::{float_column, int_column, string_column};
use core::fmt;
use polars::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::trace;

/// Separator between atoms of a multi-atom side.
const GROUP_SEPARATOR: char = ';';

/// Reference to an atom as `chain/resi/name`, e.g. `A/113/OD1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSelector {
    pub chain: String,
    pub resi: isize,
    pub name: String,
}

impl AtomSelector {
    fn resolve<'a>(&self, pool: &[&'a Atom]) -> Option<&'a Atom> {
        pool.iter()
            .find(|a| a.matches(&self.chain, self.resi, &self.name))
            .copied()
    }
}

impl FromStr for AtomSelector {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('/').collect();
        match fields.as_slice() {
            [chain, resi, name] if !name.is_empty() => Ok(Self {
                chain: chain.to_string(),
                resi: resi
                    .parse()
                    .map_err(|_| DetectorError::UnresolvedAtom(s.to_string()))?,
                name: name.to_string(),
            }),
            _ => Err(DetectorError::UnresolvedAtom(s.to_string())),
        }
    }
}

impl fmt::Display for AtomSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.chain, self.resi, self.name)
    }
}

fn parse_group(s: &str) -> Result<Vec<AtomSelector>, DetectorError> {
    s.split(GROUP_SEPARATOR)
        .filter(|x| !x.trim().is_empty())
        .map(AtomSelector::from_str)
        .collect()
}

/// One pre-computed detection.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedRow {
    pub category: Category,
    /// Donor side for hydrogen bonds
    pub from: Vec<AtomSelector>,
    pub to: Vec<AtomSelector>,
    pub energy: Option<f64>,
}

/// Detector replaying candidates exported by an external detection run.
///
/// The table needs the columns `entry`, `interaction`, `from`, `to` and
/// `energy`. Atom sides are `;`-separated [`AtomSelector`]s. A row is only
/// returned for a request if every one of its atoms is among the requested
/// ligand and receptor atoms.
#[derive(Debug, Clone, Default)]
pub struct TabulatedDetector {
    rows: HashMap<usize, Vec<TabulatedRow>>,
}

impl TabulatedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: usize, row: TabulatedRow) {
        self.rows.entry(entry).or_default().push(row);
    }

    /// Number of rows stored for `entry`.
    pub fn row_count(&self, entry: usize) -> usize {
        self.rows.get(&entry).map_or(0, |r| r.len())
    }

    pub fn from_df(df: &DataFrame) -> Result<Self, DetectorError> {
        let table_err = |e: TableError| DetectorError::Table(e.to_string());
        let entries = int_column(df, "entry").map_err(table_err)?;
        let categories = string_column(df, "interaction").map_err(table_err)?;
        let from = string_column(df, "from").map_err(table_err)?;
        let to = string_column(df, "to").map_err(table_err)?;
        let energies = float_column(df, "energy").map_err(table_err)?;

        let mut detector = Self::new();
        for row in 0..df.height() {
            let entry = entries[row]
                .and_then(|e| usize::try_from(e).ok())
                .ok_or_else(|| DetectorError::Table(format!("Invalid entry at row {row}")))?;
            let category_name = categories[row].as_deref().unwrap_or("");
            let category = category_name
                .parse::<Category>()
                .map_err(DetectorError::UnknownCategory)?;

            detector.push(
                entry,
                TabulatedRow {
                    category,
                    from: parse_group(from[row].as_deref().unwrap_or(""))?,
                    to: parse_group(to[row].as_deref().unwrap_or(""))?,
                    energy: energies[row],
                },
            );
        }
        Ok(detector)
    }
}

fn resolve_group(group: &[AtomSelector], pool: &[&Atom]) -> Option<Vec<Atom>> {
    group
        .iter()
        .map(|sel| sel.resolve(pool).cloned())
        .collect()
}

impl InteractionDetector for TabulatedDetector {
    fn detect(
        &self,
        request: &DetectionRequest<'_>,
    ) -> Result<Vec<InteractionCandidate>, DetectorError> {
        let Some(rows) = self.rows.get(&request.entry) else {
            return Ok(vec![]);
        };
        let options = request.options;
        let pool: Vec<&Atom> = request
            .ligand
            .iter()
            .chain(request.receptor.iter())
            .copied()
            .collect();

        let candidates = rows
            .iter()
            .filter(|row| request.categories.contains(&row.category))
            .filter_map(|row| {
                let first = resolve_group(&row.from, &pool)?;
                let second = resolve_group(&row.to, &pool)?;
                if first.is_empty() || second.is_empty() {
                    return None;
                }

                if let (Some(min), Some(energy)) = (options.energy_min(row.category), row.energy) {
                    if energy.abs() < min {
                        trace!("Dropping {} with energy {energy} below {min}", row.category);
                        return None;
                    }
                }

                if row.category == Category::Distance {
                    let (a, b) = nearest_pair(&first, &second)?;
                    if a.distance_squared(b).sqrt() > options.distance_threshold {
                        return None;
                    }
                }

                if row.category == Category::Hbond && !options.include_receptor_receptor_hbonds {
                    let on_ligand = |atoms: &[Atom]| {
                        atoms
                            .iter()
                            .any(|a| request.ligand.iter().any(|l| l.id == a.id))
                    };
                    if !on_ligand(&first) && !on_ligand(&second) {
                        return None;
                    }
                }

                Some(InteractionCandidate {
                    category: row.category,
                    first,
                    second,
                    energy: row.energy,
                })
            })
            .collect();
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DetectorOptions;
    use crate::structure::ComplexBuilder;

    fn sel(s: &str) -> Vec<AtomSelector> {
        parse_group(s).unwrap()
    }

    fn row(category: Category, from: &str, to: &str, energy: Option<f64>) -> TabulatedRow {
        TabulatedRow {
            category,
            from: sel(from),
            to: sel(to),
            energy,
        }
    }

    struct Atoms {
        ligand: Vec<Atom>,
        residue: Vec<Atom>,
    }

    fn atoms() -> Atoms {
        let mut complex = ComplexBuilder::new()
            .chain("A")
            .residue(113, "ASP")
            .atom("OD1", [0.0, 0.0, 0.0])
            .atom("OD2", [1.2, 0.0, 0.0])
            .chain("L")
            .residue(1, "LIG")
            .atom("N1", [0.0, 2.8, 0.0])
            .atom("C7", [0.0, 9.0, 0.0])
            .build();
        Atoms {
            ligand: complex.chains.remove(1).residues.remove(0).atoms,
            residue: complex.chains.remove(0).residues.remove(0).atoms,
        }
    }

    fn detect(
        detector: &TabulatedDetector,
        atoms: &Atoms,
        options: &DetectorOptions,
    ) -> Vec<InteractionCandidate> {
        let ligand: Vec<&Atom> = atoms.ligand.iter().collect();
        let receptor: Vec<&Atom> = atoms.residue.iter().collect();
        let request = DetectionRequest {
            entry: 0,
            categories: &Category::ALL,
            ligand: &ligand,
            receptor: &receptor,
            options,
        };
        detector.detect(&request).unwrap()
    }

    #[test]
    fn selectors_parse() {
        let s: AtomSelector = "A/113/OD1".parse().unwrap();
        assert_eq!(s.to_string(), "A/113/OD1");
        assert_eq!(sel("A/1/C1; A/1/C2").len(), 2);
        assert!("A/x/OD1".parse::<AtomSelector>().is_err());
        assert!("A/113".parse::<AtomSelector>().is_err());
    }

    #[test]
    fn returns_rows_resolved_in_request() {
        let mut detector = TabulatedDetector::new();
        detector.push(0, row(Category::Hbond, "L/1/N1", "A/113/OD1", Some(-2.0)));
        detector.push(0, row(Category::Ionic, "A/113/OD1;A/113/OD2", "L/1/N1", Some(-4.0)));
        // Atom of another residue
        detector.push(0, row(Category::Hbond, "L/1/N1", "A/114/OG", Some(-2.0)));
        // Another entry
        detector.push(1, row(Category::Hbond, "L/1/N1", "A/113/OD1", Some(-2.0)));

        let found = detect(&detector, &atoms(), &DetectorOptions::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].category, Category::Hbond);
        assert_eq!(found[1].first.len(), 2);
    }

    #[test]
    fn applies_thresholds() {
        let mut detector = TabulatedDetector::new();
        detector.push(0, row(Category::Hbond, "L/1/N1", "A/113/OD1", Some(-0.2)));
        detector.push(0, row(Category::Hbond, "L/1/N1", "A/113/OD1", None));
        detector.push(0, row(Category::Distance, "L/1/C7", "A/113/OD1", None));
        detector.push(0, row(Category::Distance, "L/1/N1", "A/113/OD2", None));
        detector.push(0, row(Category::Hbond, "A/113/OD2", "A/113/OD1", Some(-1.0)));

        let options = DetectorOptions::default();
        let found = detect(&detector, &atoms(), &options);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].energy, None);
        assert_eq!(found[1].category, Category::Distance);

        let options = DetectorOptions {
            include_receptor_receptor_hbonds: true,
            ..Default::default()
        };
        assert_eq!(detect(&detector, &atoms(), &options).len(), 3);
    }

    #[test]
    fn reads_candidate_table() {
        let df = df!(
            "entry" => [0i64, 0, 2],
            "interaction" => ["Hbond", "Arene", "Covalent"],
            "from" => ["L/1/N1", "L/1/C1;L/1/C2", "A/5/SG"],
            "to" => ["A/113/OD1", "A/200/CZ", "L/1/C9"],
            "energy" => [Some(-1.5), None, Some(-20.0)],
        )
        .unwrap();
        let detector = TabulatedDetector::from_df(&df).unwrap();
        assert_eq!(detector.row_count(0), 2);
        assert_eq!(detector.row_count(1), 0);
        assert_eq!(detector.row_count(2), 1);

        let bad = df!(
            "entry" => [0i64],
            "interaction" => ["Halogen"],
            "from" => ["L/1/N1"],
            "to" => ["A/113/OD1"],
            "energy" => [-1.0],
        )
        .unwrap();
        assert_eq!(
            TabulatedDetector::from_df(&bad).unwrap_err(),
            DetectorError::UnknownCategory("Halogen".to_string())
        );
    }
}
