//! Ballesteros-Weinstein numbering of transmembrane residues.
//!
//! Every one of the seven TM helices has a conserved anchor residue that is
//! assigned position `50`. All other residues on the helix are numbered
//! relative to that anchor, so `3.32` is the residue 18 positions before the
//! anchor of TM3.
use core::fmt;

/// Number of transmembrane helices in a class-A GPCR.
pub const TM_COUNT: u8 = 7;

/// Position assigned to the anchor residue of every helix.
pub const ANCHOR_POSITION: isize = 50;

/// One of the seven transmembrane helices.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TmDomain(u8);

impl TmDomain {
    /// Returns `None` unless `number` is in `1..=7`.
    pub fn new(number: u8) -> Option<Self> {
        (1..=TM_COUNT).contains(&number).then_some(Self(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// All helices in ascending order.
    pub fn all() -> impl Iterator<Item = TmDomain> {
        (1..=TM_COUNT).map(TmDomain)
    }
}

impl fmt::Display for TmDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Residue numbers delimiting one helix in a given structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmBoundary {
    /// First residue of the helix
    pub start: isize,
    /// Residue at the `x.50` anchor position
    pub x50: isize,
    /// Last residue of the helix
    pub end: isize,
}

impl TmBoundary {
    pub fn new(start: isize, x50: isize, end: isize) -> Self {
        Self { start, x50, end }
    }

    /// Sequential residue ids covered by the helix, in ascending order.
    pub fn residues(&self) -> std::ops::RangeInclusive<isize> {
        self.start..=self.end
    }

    /// BW codes of the first and last residue on the helix.
    pub fn position_range(&self) -> std::ops::RangeInclusive<isize> {
        bw_position(self.start, self)..=bw_position(self.end, self)
    }
}

/// A structure-independent residue label such as `3.32`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BwCode {
    pub tm: TmDomain,
    pub position: isize,
}

impl fmt::Display for BwCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tm, self.position)
    }
}

/// Convert the sequential residue id `resi` to its BW position on a helix.
///
/// The lower branch compares `resi` against the literal anchor value rather
/// than `boundary.x50`; both arms reduce to the same offset so the result is
/// monotonic in `resi`. No bounds checking is done, callers are expected to
/// stay within [`TmBoundary::residues`].
pub fn bw_position(resi: isize, boundary: &TmBoundary) -> isize {
    if resi <= ANCHOR_POSITION {
        ANCHOR_POSITION - (boundary.x50 - resi)
    } else if resi == boundary.x50 {
        ANCHOR_POSITION
    } else {
        ANCHOR_POSITION + (resi - boundary.x50)
    }
}

/// Full BW code of the residue `resi` on helix `tm`.
pub fn bw_code(tm: TmDomain, resi: isize, boundary: &TmBoundary) -> BwCode {
    BwCode {
        tm,
        position: bw_position(resi, boundary),
    }
}
