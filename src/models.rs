//! Data models for the medal board.
//!
//! This module contains the medal-tally table loaded from disk and the
//! aggregate views derived from it.

use serde::{Deserialize, Serialize};

/// A ratio that may be undefined (e.g. gold share of a country with zero
/// medals). `None` is carried through to presentation and never replaced
/// by a number.
pub type Ratio = Option<f64>;

/// One row of the medal-tally file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalRecord {
    /// Country name, used as the grouping key.
    pub country: String,
    /// Edition (year) of the games.
    pub year: u32,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    /// Total medals as recorded in the source, not recomputed.
    pub total: u64,
}

impl MedalRecord {
    #[cfg(test)]
    pub fn new(country: &str, year: u32, gold: u64, silver: u64, bronze: u64, total: u64) -> Self {
        Self {
            country: country.to_string(),
            year,
            gold,
            silver,
            bronze,
            total,
        }
    }

    /// Whether gold + silver + bronze matches the recorded total. A medal
    /// sum that overflows `u64` never matches.
    pub fn is_consistent(&self) -> bool {
        self.gold
            .checked_add(self.silver)
            .and_then(|sum| sum.checked_add(self.bronze))
            == Some(self.total)
    }
}

/// The full medal table, in file order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MedalTable {
    records: Vec<MedalRecord>,
    quality_warnings: usize,
}

impl MedalTable {
    /// Build a table, counting rows whose medal columns don't add up to
    /// their total. Such rows are kept as-is.
    pub fn new(records: Vec<MedalRecord>) -> Self {
        let quality_warnings = records.iter().filter(|r| !r.is_consistent()).count();
        Self {
            records,
            quality_warnings,
        }
    }

    pub fn records(&self) -> &[MedalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MedalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows failing the gold + silver + bronze == total check.
    pub fn quality_warnings(&self) -> usize {
        self.quality_warnings
    }

    /// Sum of the `total` column, saturating at `u64::MAX`.
    pub fn total_medals(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |sum, r| sum.saturating_add(r.total))
    }
}

impl FromIterator<MedalRecord> for MedalTable {
    fn from_iter<I: IntoIterator<Item = MedalRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Medal sums for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryTotal {
    pub country: String,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    pub total: u64,
    /// Number of distinct editions the country appears in.
    pub games: usize,
}

/// Medal sums for one edition across all countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMedals {
    pub year: u32,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    pub total: u64,
}

/// Total medals for one country at one edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCountryTotal {
    pub year: u32,
    pub country: String,
    pub total: u64,
}

/// Quality-versus-quantity ratios for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryEfficiency {
    pub country: String,
    pub total: u64,
    pub gold: u64,
    pub games: usize,
    /// Total medals divided by distinct editions participated.
    pub medals_per_game: Ratio,
    /// 100 * gold / total.
    pub gold_ratio_percent: Ratio,
}

/// A country whose recent per-game average grew past the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    pub country: String,
    pub historical_avg: f64,
    pub recent_avg: f64,
}

impl Improvement {
    /// Recent average as a multiple of the historical one.
    pub fn growth(&self) -> Ratio {
        if self.historical_avg > 0.0 {
            Some(self.recent_avg / self.historical_avg)
        } else {
            None
        }
    }
}

/// First and last appearance of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipationSpan {
    pub country: String,
    pub first_year: u32,
    pub last_year: u32,
    pub span_years: u32,
    pub games: usize,
}

/// Headline numbers for the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub countries: usize,
    pub total_medals: u64,
    pub first_year: Option<u32>,
    pub last_year: Option<u32>,
    pub editions: usize,
    pub records: usize,
    pub quality_warnings: usize,
}

/// Spread of one medal column over every row of the table. All values
/// are `None` for an empty table; `std` needs at least two rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: &'static str,
    pub count: usize,
    pub mean: Ratio,
    /// Sample standard deviation.
    pub std: Ratio,
    pub min: Option<u64>,
    pub q1: Ratio,
    pub median: Ratio,
    pub q3: Ratio,
    pub max: Option<u64>,
}
